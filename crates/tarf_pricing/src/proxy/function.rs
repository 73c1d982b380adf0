//! Per-cell regression functions of the proxy surface.
//!
//! Each populated cell of the surface carries one [`ProxyFunction`]: either a
//! single constant (when the observed spot range is degenerate) or a pair of
//! fitted quadratics split at a cutoff spot. The quadratic form clamps each
//! segment flat at its vertex on the side where the raw parabola would bend
//! back against the payoff direction, patches the two segments together so the
//! surface cannot dip at the cutoff, and extends the tail beyond the core data
//! range as a tangent line where the vertex clamp leaves that side unbounded.

use tarf_models::instruments::OptionType;

/// Curvature below this magnitude is treated as zero and the segment kept as
/// a plain line with no vertex clamp.
pub(crate) const VERTEX_EPSILON: f64 = 1e-12;

/// Flat extrapolation applied to a fitted segment at its vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clamp {
    /// Spots above the vertex evaluate at the vertex.
    FlatAbove(f64),
    /// Spots below the vertex evaluate at the vertex.
    FlatBelow(f64),
}

/// One fitted quadratic `a x^2 + b x + c` together with its vertex clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedSegment {
    a: f64,
    b: f64,
    c: f64,
    clamp: Option<Clamp>,
}

impl FittedSegment {
    /// Builds a segment from regression coefficients in ascending order
    /// (`[c, b, a]`), choosing the clamp side from the payoff direction.
    ///
    /// A call value grows with spot, so a concave segment (`a < 0`) must stop
    /// falling past its maximum and a convex one (`a > 0`) must stop rising
    /// backwards below its minimum. Puts mirror both cases.
    pub(crate) fn new(coefficients: [f64; 3], option_type: OptionType) -> Self {
        let [c, b, a] = coefficients;
        let clamp = if a.abs() < VERTEX_EPSILON {
            None
        } else {
            let vertex = -b / (2.0 * a);
            let flat_side = option_type.sign() * if a > 0.0 { -1.0 } else { 1.0 };
            if flat_side > 0.0 {
                Some(Clamp::FlatAbove(vertex))
            } else {
                Some(Clamp::FlatBelow(vertex))
            }
        };
        Self { a, b, c, clamp }
    }

    /// Evaluates the segment with its vertex clamp applied.
    pub fn value(&self, x: f64) -> f64 {
        let x = match self.clamp {
            Some(Clamp::FlatAbove(vertex)) => x.min(vertex),
            Some(Clamp::FlatBelow(vertex)) => x.max(vertex),
            None => x,
        };
        (self.a * x + self.b) * x + self.c
    }

    /// Tangent line of the unclamped quadratic at `anchor`, evaluated at `x`.
    pub(crate) fn tangent_at(&self, anchor: f64, x: f64) -> f64 {
        (2.0 * self.a * anchor + self.b) * x + self.c - self.a * anchor * anchor
    }

    /// Vertex clamp of this segment, if the curvature was large enough to
    /// define one.
    #[inline]
    pub fn clamp(&self) -> Option<Clamp> {
        self.clamp
    }

    /// Raw coefficients `(a, b, c)` of the fitted parabola.
    #[inline]
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }
}

/// Regression function attached to one (fixing, accumulation bucket) cell.
///
/// `core_region` is the central spot range that was actually populated when
/// the function was fitted; queries outside it rely on the clamp and tangent
/// extrapolation rules and carry less information.
#[derive(Clone, Debug, PartialEq)]
pub enum ProxyFunction {
    /// All observations shared (numerically) one spot: the cell value does
    /// not depend on the queried spot.
    Constant {
        /// Mean observed value, returned for every query.
        value: f64,
        /// The single observed spot, as a degenerate range.
        core_region: (f64, f64),
    },
    /// Two quadratic segments split at `cutoff`, with tangent extrapolation
    /// anchored at `lower_cutoff` on the out-of-the-money side.
    Quadratic {
        /// Payoff direction the cutoff search was oriented by.
        option_type: OptionType,
        /// Spot separating the two fitted segments.
        cutoff: f64,
        /// Tangent anchor bounding the out-of-the-money tail.
        lower_cutoff: f64,
        /// Observed spot range the fit is supported on.
        core_region: (f64, f64),
        /// Segment fitted to observations at or below the cutoff.
        below: FittedSegment,
        /// Segment fitted to observations above the cutoff.
        above: FittedSegment,
    },
}

impl ProxyFunction {
    /// Evaluates the cell function at `spot`.
    ///
    /// For the quadratic form the out-of-the-money tail (below `lower_cutoff`
    /// for a call, above it for a put) switches to the segment's tangent line
    /// when that segment's clamp leaves the tail unbounded; everywhere else
    /// the clamped segments apply, with each side floored at the other
    /// segment's cutoff value so the two fits cannot open a gap at the seam.
    pub fn evaluate(&self, spot: f64) -> f64 {
        match self {
            ProxyFunction::Constant { value, .. } => *value,
            ProxyFunction::Quadratic {
                option_type,
                cutoff,
                lower_cutoff,
                below,
                above,
                ..
            } => match option_type {
                OptionType::Call => {
                    if spot <= *cutoff {
                        if spot <= *lower_cutoff
                            && matches!(below.clamp(), Some(Clamp::FlatAbove(_)))
                        {
                            return below.tangent_at(*lower_cutoff, spot);
                        }
                        below.value(spot)
                    } else {
                        above.value(spot).max(below.value(*cutoff))
                    }
                }
                OptionType::Put => {
                    if spot > *cutoff {
                        if spot >= *lower_cutoff
                            && matches!(above.clamp(), Some(Clamp::FlatBelow(_)))
                        {
                            return above.tangent_at(*lower_cutoff, spot);
                        }
                        above.value(spot)
                    } else {
                        below.value(spot).max(above.value(*cutoff))
                    }
                }
            },
        }
    }

    /// Central spot range populated by the observations behind this function.
    #[inline]
    pub fn core_region(&self) -> (f64, f64) {
        match self {
            ProxyFunction::Constant { core_region, .. } => *core_region,
            ProxyFunction::Quadratic { core_region, .. } => *core_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn call_function() -> ProxyFunction {
        // Below: -0.5 x^2 + 2.5 x - 1, vertex 2.5, rising over the data range.
        // Above: -0.2 x^2 + x, vertex 2.5, peaks at 1.25 which stays under the
        // below segment's cutoff value of 1.625, so the seam patch holds the
        // whole above side flat.
        ProxyFunction::Quadratic {
            option_type: OptionType::Call,
            cutoff: 1.5,
            lower_cutoff: 0.5,
            core_region: (0.4, 2.9),
            below: FittedSegment::new([-1.0, 2.5, -0.5], OptionType::Call),
            above: FittedSegment::new([0.0, 1.0, -0.2], OptionType::Call),
        }
    }

    #[test]
    fn test_clamp_side_follows_payoff_direction() {
        let cases = [
            (OptionType::Call, -0.5, "above"),
            (OptionType::Call, 0.5, "below"),
            (OptionType::Put, -0.5, "below"),
            (OptionType::Put, 0.5, "above"),
        ];
        for (option_type, a, side) in cases {
            let segment = FittedSegment::new([0.0, 1.0, a], option_type);
            match (segment.clamp(), side) {
                (Some(Clamp::FlatAbove(_)), "above") => {}
                (Some(Clamp::FlatBelow(_)), "below") => {}
                (clamp, _) => panic!("{option_type:?} with a={a} produced {clamp:?}"),
            }
        }
    }

    #[test]
    fn test_value_freezes_at_the_vertex() {
        // x^2 for a call clamps flat below the vertex at zero.
        let segment = FittedSegment::new([0.0, 0.0, 1.0], OptionType::Call);
        assert_eq!(segment.clamp(), Some(Clamp::FlatBelow(0.0)));
        assert_eq!(segment.value(2.0), 4.0);
        assert_eq!(segment.value(-3.0), 0.0);

        // -x^2 + 4x for a call clamps flat above the vertex at two.
        let segment = FittedSegment::new([0.0, 4.0, -1.0], OptionType::Call);
        assert_eq!(segment.clamp(), Some(Clamp::FlatAbove(2.0)));
        assert_eq!(segment.value(1.0), 3.0);
        assert_eq!(segment.value(5.0), 4.0);
    }

    #[test]
    fn test_negligible_curvature_keeps_the_line() {
        let segment = FittedSegment::new([0.3, 1.2, 1e-15], OptionType::Call);
        assert_eq!(segment.clamp(), None);
        for x in [-50.0, -1.0, 0.0, 1.0, 50.0] {
            assert_relative_eq!(segment.value(x), 1.2 * x + 0.3, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tangent_touches_the_quadratic_at_its_anchor() {
        let segment = FittedSegment::new([-1.0, 2.5, -0.5], OptionType::Call);
        let anchor = 0.5;
        assert_relative_eq!(
            segment.tangent_at(anchor, anchor),
            segment.value(anchor),
            epsilon = 1e-12
        );
        // Slope 2 a x + b at the anchor.
        let h = 1e-6;
        let slope = (segment.tangent_at(anchor, anchor + h)
            - segment.tangent_at(anchor, anchor - h))
            / (2.0 * h);
        assert_relative_eq!(slope, 2.0 * -0.5 * anchor + 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_ignores_the_spot() {
        let function = ProxyFunction::Constant {
            value: 0.0375,
            core_region: (1.15, 1.15),
        };
        for spot in [0.0, 0.5, 1.15, 2.0, 100.0] {
            assert_eq!(function.evaluate(spot), 0.0375);
        }
        assert_eq!(function.core_region(), (1.15, 1.15));
    }

    #[test]
    fn test_call_tail_extends_as_a_tangent_line() {
        let function = call_function();
        // Below 0.5 the concave below segment leaves the left side unbounded,
        // so the tangent at the anchor takes over: value c - a L^2 at zero.
        assert_relative_eq!(function.evaluate(0.0), -0.875, epsilon = 1e-12);
        // Continuity at the anchor itself.
        let at_anchor: f64 = -0.5 * 0.25 + 2.5 * 0.5 - 1.0;
        assert_relative_eq!(function.evaluate(0.5), at_anchor, epsilon = 1e-12);
        assert_relative_eq!(
            function.evaluate(0.5 - 1e-9),
            at_anchor,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_seam_patch_floors_the_above_segment() {
        let function = call_function();
        // The below segment reaches 1.625 at the cutoff; the above segment
        // never exceeds 1.25, so the patch holds every spot past the cutoff
        // at the seam value.
        let seam: f64 = -0.5 * 1.5 * 1.5 + 2.5 * 1.5 - 1.0;
        assert_relative_eq!(function.evaluate(1.5), seam, epsilon = 1e-12);
        for spot in [1.51, 2.0, 2.5, 4.0, 10.0] {
            assert_relative_eq!(function.evaluate(spot), seam, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_call_values_never_decrease_in_spot() {
        let function = call_function();
        let mut previous = f64::NEG_INFINITY;
        let mut spot = -1.0;
        while spot < 4.0 {
            let value = function.evaluate(spot);
            assert!(
                value >= previous - 1e-12,
                "call proxy decreased at spot {spot}: {previous} -> {value}"
            );
            previous = value;
            spot += 0.01;
        }
    }

    #[test]
    fn test_put_values_never_increase_in_spot() {
        // Above segment is concave, so the put clamp is FlatBelow and the
        // upper tail switches to the tangent line past the anchor.
        let function = ProxyFunction::Quadratic {
            option_type: OptionType::Put,
            cutoff: 2.0,
            lower_cutoff: 3.0,
            core_region: (0.8, 3.4),
            below: FittedSegment::new([3.2, -1.8, 0.3], OptionType::Put),
            above: FittedSegment::new([0.2, 0.4, -0.1], OptionType::Put),
        };
        let mut previous = f64::INFINITY;
        let mut spot = 0.5;
        while spot < 6.0 {
            let value = function.evaluate(spot);
            assert!(
                value <= previous + 1e-12,
                "put proxy increased at spot {spot}: {previous} -> {value}"
            );
            previous = value;
            spot += 0.01;
        }
        // The tangent keeps falling instead of flattening at the vertex.
        assert!(function.evaluate(6.0) < function.evaluate(3.5) - 0.1);
    }

    #[test]
    fn test_put_seam_floors_the_below_segment() {
        // Above segment pinned so high that the below side would dip under
        // it at the cutoff without the patch.
        let function = ProxyFunction::Quadratic {
            option_type: OptionType::Put,
            cutoff: 1.0,
            lower_cutoff: 2.0,
            core_region: (0.5, 2.2),
            below: FittedSegment::new([0.9, -0.1, 0.0], OptionType::Put),
            above: FittedSegment::new([1.3, -0.2, 0.0], OptionType::Put),
        };
        // above.value(1.0) = 1.1 exceeds below.value(1.0) = 0.8.
        for spot in [0.5, 0.8, 1.0] {
            assert!(function.evaluate(spot) >= 1.1 - 1e-12);
        }
    }
}
