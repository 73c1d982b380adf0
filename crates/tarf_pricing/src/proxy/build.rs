//! Regression pass turning recorded observations into proxy functions.
//!
//! Rows (one per open fixing) are independent, so the grid is fitted in
//! parallel. Within a row, sparse accumulation buckets first pool into
//! groups, then each group fits one function shared by all its buckets.

use std::sync::Arc;

use rayon::prelude::*;
use tarf_core::math::least_squares::fit_quadratic;
use tarf_models::instruments::OptionType;
use tracing::debug;

use super::error::DomainError;
use super::function::{FittedSegment, ProxyFunction};
use super::merge::group_buckets;
use super::segment::find_cutoff;
use super::store::{merge_sorted, Observation, ObservationStore};
use crate::mc::ProxySettings;

/// Spot spans narrower than this fraction of the spot scale collapse
/// the group to a constant instead of a regression.
const DEGENERATE_SPAN_TOLERANCE: f64 = 1e-8;

/// Fits one function per bucket group of a fixing row and expands the
/// result back to per-bucket handles. Buckets in the same group share
/// one allocation.
pub(crate) fn build_functions_for_row(
    row: &[Vec<Observation>],
    fixing_index: usize,
    option_type: OptionType,
    settings: &ProxySettings,
) -> Result<Vec<Arc<ProxyFunction>>, DomainError> {
    let sizes: Vec<usize> = row.iter().map(Vec::len).collect();
    let groups = group_buckets(&sizes, settings.density_factor, settings.min_regression_points);

    let mut functions = Vec::with_capacity(row.len());
    for group in groups {
        let mut merged: Vec<Observation> = Vec::new();
        for bucket in group.clone() {
            merged = merge_sorted(&merged, &row[bucket]);
        }
        let function = Arc::new(fit_group(&merged, fixing_index, option_type, settings)?);
        for _ in group {
            functions.push(Arc::clone(&function));
        }
    }
    Ok(functions)
}

/// Fits every row of a populated store in parallel, preserving row order.
pub(crate) fn build_grid(
    store: ObservationStore,
    option_type: OptionType,
    settings: &ProxySettings,
) -> Result<Vec<Vec<Arc<ProxyFunction>>>, DomainError> {
    let rows = store.into_rows();
    rows.par_iter()
        .enumerate()
        .map(|(fixing_index, row)| {
            build_functions_for_row(row, fixing_index, option_type, settings)
        })
        .collect()
}

/// Fits a single merged group: a constant when the spot range is
/// degenerate, otherwise two quadratic segments split at the cutoff.
fn fit_group(
    data: &[Observation],
    fixing_index: usize,
    option_type: OptionType,
    settings: &ProxySettings,
) -> Result<ProxyFunction, DomainError> {
    let (spot_min, spot_max) = match (data.first(), data.last()) {
        (Some(first), Some(last)) => (first.spot, last.spot),
        _ => (0.0, 0.0),
    };
    if spot_max - spot_min < DEGENERATE_SPAN_TOLERANCE * spot_max.abs().max(1.0) {
        let count = data.len().max(1) as f64;
        let value = data.iter().map(|o| o.value).sum::<f64>() / count;
        debug!(
            fixing = fixing_index,
            observations = data.len(),
            value,
            "degenerate spot range, fitting a constant"
        );
        return Ok(ProxyFunction::Constant {
            value,
            core_region: (spot_min, spot_max),
        });
    }

    let split = find_cutoff(data, option_type, settings);
    let (below_data, above_data) = data.split_at(split.below);
    let need = settings.min_regression_points;
    if below_data.len() < need {
        return Err(DomainError::SegmentTooSmall {
            fixing_index,
            segment: "below",
            got: below_data.len(),
            need,
        });
    }
    if above_data.len() < need {
        return Err(DomainError::SegmentTooSmall {
            fixing_index,
            segment: "above",
            got: above_data.len(),
            need,
        });
    }

    let below = fit_segment(below_data, fixing_index, "below", option_type)?;
    let above = fit_segment(above_data, fixing_index, "above", option_type)?;

    let n = data.len();
    let tail_percentile = if option_type.is_call() {
        settings.lower_extrapolation_percentile
    } else {
        1.0 - settings.lower_extrapolation_percentile
    };
    let anchor = data[percentile_index(n, tail_percentile)].spot;
    // The tangent anchor must stay on its own segment's side of the cutoff.
    let lower_cutoff = if option_type.is_call() {
        anchor.min(split.cutoff)
    } else {
        anchor.max(split.cutoff)
    };
    let core_region = (
        data[percentile_index(n, settings.core_percentile)].spot,
        data[percentile_index(n, 1.0 - settings.core_percentile)].spot,
    );

    Ok(ProxyFunction::Quadratic {
        option_type,
        cutoff: split.cutoff,
        lower_cutoff,
        core_region,
        below,
        above,
    })
}

fn fit_segment(
    data: &[Observation],
    fixing_index: usize,
    segment: &'static str,
    option_type: OptionType,
) -> Result<FittedSegment, DomainError> {
    let xs: Vec<f64> = data.iter().map(|o| o.spot).collect();
    let ys: Vec<f64> = data.iter().map(|o| o.value).collect();
    let coefficients = fit_quadratic(&xs, &ys).map_err(|_| DomainError::SingularRegression {
        fixing_index,
        segment,
    })?;
    Ok(FittedSegment::new(coefficients, option_type))
}

fn percentile_index(n: usize, percentile: f64) -> usize {
    ((n as f64 * percentile) as usize).min(n.saturating_sub(1))
}
