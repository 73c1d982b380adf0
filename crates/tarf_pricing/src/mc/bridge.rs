//! Brownian bridge path construction.
//!
//! Builds a Wiener path by bisection: the first variate fixes the
//! terminal value, subsequent variates fill midpoints conditioned on
//! the already-constructed neighbours. Most of the path variance is
//! thereby loaded onto the earliest variates, which is what makes the
//! construction attractive for low-discrepancy or coarse sampling.

use super::grid::TimeGrid;

/// Precomputed bridge over a fixed time grid.
///
/// The construction order, interpolation weights, and conditional
/// standard deviations depend only on the grid, so they are derived
/// once and reused for every path.
#[derive(Clone, Debug)]
pub struct BrownianBridge {
    size: usize,
    bridge_index: Vec<usize>,
    left_index: Vec<usize>,
    right_index: Vec<usize>,
    left_weight: Vec<f64>,
    right_weight: Vec<f64>,
    std_dev: Vec<f64>,
}

impl BrownianBridge {
    /// Prepares the bridge for the given grid.
    pub fn new(grid: &TimeGrid) -> Self {
        let size = grid.steps();
        let t: Vec<f64> = (0..size).map(|i| grid.time(i + 1)).collect();

        let mut bridge_index = vec![0usize; size];
        let mut left_index = vec![0usize; size];
        let mut right_index = vec![0usize; size];
        let mut left_weight = vec![0.0; size];
        let mut right_weight = vec![0.0; size];
        let mut std_dev = vec![0.0; size];

        // map[i] != 0 marks path point i as already constructed
        let mut map = vec![0usize; size];
        map[size - 1] = 1;
        bridge_index[0] = size - 1;
        std_dev[0] = t[size - 1].sqrt();

        let mut j = 0;
        for i in 1..size {
            while map[j] != 0 {
                j += 1;
            }
            let mut k = j;
            while map[k] == 0 {
                k += 1;
            }
            let l = j + ((k - 1 - j) >> 1);
            map[l] = i;
            bridge_index[i] = l;
            left_index[i] = j;
            right_index[i] = k;
            if j != 0 {
                left_weight[i] = (t[k] - t[l]) / (t[k] - t[j - 1]);
                right_weight[i] = (t[l] - t[j - 1]) / (t[k] - t[j - 1]);
                std_dev[i] = ((t[l] - t[j - 1]) * (t[k] - t[l]) / (t[k] - t[j - 1])).sqrt();
            } else {
                right_weight[i] = t[l] / t[k];
                std_dev[i] = (t[l] * (t[k] - t[l]) / t[k]).sqrt();
            }
            j = k + 1;
            if j >= size {
                j = 0;
            }
        }

        Self {
            size,
            bridge_index,
            left_index,
            right_index,
            left_weight,
            right_weight,
            std_dev,
        }
    }

    /// Number of steps the bridge spans.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Turns standard normal variates into Wiener increments over each
    /// grid step.
    ///
    /// `output[i]` receives `W(t_{i+1}) - W(t_i)`; divide by the step's
    /// square-root width to recover standard normal equivalents.
    ///
    /// # Panics
    ///
    /// Panics if either slice length differs from [`size`](Self::size).
    pub fn transform(&self, input: &[f64], output: &mut [f64]) {
        assert_eq!(input.len(), self.size);
        assert_eq!(output.len(), self.size);

        // Construct the path levels in bisection order
        output[self.size - 1] = self.std_dev[0] * input[0];
        for i in 1..self.size {
            let j = self.left_index[i];
            let k = self.right_index[i];
            let l = self.bridge_index[i];
            if j != 0 {
                output[l] = self.left_weight[i] * output[j - 1]
                    + self.right_weight[i] * output[k]
                    + self.std_dev[i] * input[i];
            } else {
                output[l] = self.right_weight[i] * output[k] + self.std_dev[i] * input[i];
            }
        }
        // Difference the levels into per-step increments
        for i in (1..self.size).rev() {
            output[i] -= output[i - 1];
        }
    }
}
