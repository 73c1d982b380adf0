//! Spot-axis segmentation of a merged observation group.
//!
//! Each group regresses two quadratics, one on each side of a spot
//! cutoff. The cutoff starts at a fixed fraction of the spot range and
//! shrinks toward the midpoint while the minority segment, the one the
//! surface later extrapolates from, is starved of observations. The
//! at-the-money side never shrinks.

use tarf_models::instruments::OptionType;

use super::store::Observation;
use crate::mc::ProxySettings;

/// Final cutoff with the partition rank it induces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CutoffSplit {
    /// Spot value separating the segments.
    pub cutoff: f64,
    /// Observations with `spot <= cutoff`; the rest lie above.
    pub below: usize,
}

/// Splits a sorted group at an adaptively shrunk cutoff.
///
/// The critical segment lies above the cutoff for calls and below it
/// for puts. While it holds fewer points than either the minimum data
/// fraction (fixed from the initial cutoff) or the regression floor,
/// the cutoff fraction moves toward 0.5 by the configured shrink
/// factor; crossing 0.5 stops the search regardless, leaving the final
/// starvation to surface as a regression error.
pub(crate) fn find_cutoff(
    data: &[Observation],
    option_type: OptionType,
    settings: &ProxySettings,
) -> CutoffSplit {
    let is_call = option_type.is_call();
    let n = data.len();
    let spot_min = data.first().map_or(0.0, |o| o.spot);
    let spot_max = data.last().map_or(0.0, |o| o.spot);
    let span = spot_max - spot_min;

    let mut rel = if is_call {
        settings.relative_cutoff
    } else {
        1.0 - settings.relative_cutoff
    };
    // Frozen at the initial fraction
    let min_data_segment = ((1.0 - rel) * settings.min_cutoff_ratio * n as f64) as usize + 1;
    let floor = min_data_segment.max(settings.min_regression_points);

    loop {
        let cutoff = spot_min + rel * span;
        let below = data.partition_point(|o| o.spot <= cutoff);
        let critical = if is_call { n - below } else { below };

        let can_shrink = if is_call { rel > 0.5 } else { rel < 0.5 };
        if critical < floor && can_shrink {
            if is_call {
                rel *= settings.cutoff_shrink_factor;
            } else {
                rel /= settings.cutoff_shrink_factor;
            }
            continue;
        }
        return CutoffSplit { cutoff, below };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations(spots: &[f64]) -> Vec<Observation> {
        spots
            .iter()
            .map(|&spot| Observation { spot, value: 0.0 })
            .collect()
    }

    fn uniform(n: usize) -> Vec<Observation> {
        observations(&(0..n).map(|i| 1.0 + i as f64 / n as f64).collect::<Vec<_>>())
    }

    #[test]
    fn test_well_populated_call_keeps_initial_cutoff() {
        let data = uniform(1000);
        let settings = ProxySettings::default();
        let split = find_cutoff(&data, OptionType::Call, &settings);

        // cutoff = min + 0.8 * span; roughly 20% of points lie above
        let span = data[999].spot - data[0].spot;
        assert!((split.cutoff - (data[0].spot + 0.8 * span)).abs() < 1e-12);
        assert!(split.below > 750 && split.below < 850);
    }

    #[test]
    fn test_put_grows_its_critical_segment_to_the_frozen_bound() {
        // The put bound freezes at (1 - 0.2) * 0.33 * n + 1 = 265, but
        // a 20% cutoff over uniform spots leaves only ~200 below, so
        // the fraction climbs until the bound is met
        let data = uniform(1000);
        let settings = ProxySettings::default();
        let split = find_cutoff(&data, OptionType::Put, &settings);

        assert!(split.below >= 265 && split.below <= 270);
        assert!(split.cutoff > 1.25 && split.cutoff < 1.28);
    }

    #[test]
    fn test_starved_tail_pulls_the_cutoff_down() {
        // 180 points cluster low, 23 spread high: the 80% cutoff leaves
        // only 8 points above and must shrink until 14 fit
        let mut spots: Vec<f64> = (0..180).map(|i| 1.0 + i as f64 * 0.002).collect();
        spots.extend((0..23).map(|i| 1.45 + i as f64 * 0.025));
        let data = observations(&spots);
        let settings = ProxySettings::default();
        let split = find_cutoff(&data, OptionType::Call, &settings);

        let n = data.len();
        let min_data_segment = (0.2 * 0.33 * n as f64) as usize + 1;
        assert_eq!(min_data_segment, 14);
        assert_eq!(n - split.below, 14);
        assert!(split.cutoff < 1.8);
        assert!(split.cutoff > 1.5);
    }

    #[test]
    fn test_shrink_gives_up_at_the_midpoint() {
        // Only 4 points sit high, too few for the floor of 7 at any
        // admissible cutoff: the fraction stops just under 0.5 and the
        // starvation is left for the regression-size check
        let mut spots: Vec<f64> = (0..36).map(|i| 1.0 + i as f64 * 0.001).collect();
        spots.extend_from_slice(&[1.19, 1.195, 1.198, 1.2]);
        let data = observations(&spots);
        let settings = ProxySettings {
            relative_cutoff: 0.51,
            ..Default::default()
        };
        let split = find_cutoff(&data, OptionType::Call, &settings);

        let span = 0.2;
        assert_eq!(data.len() - split.below, 4);
        assert!(split.cutoff >= 1.0 + 0.5 * 0.99 * span - 1e-12);
        assert!(split.cutoff <= 1.0 + 0.51 * span);
    }

    #[test]
    fn test_partition_rank_matches_cutoff() {
        let data = uniform(100);
        let split = find_cutoff(&data, OptionType::Call, &ProxySettings::default());
        for (i, o) in data.iter().enumerate() {
            if i < split.below {
                assert!(o.spot <= split.cutoff);
            } else {
                assert!(o.spot > split.cutoff);
            }
        }
    }
}
