//! Single-path evaluation: evolve, pay out, record.

use std::sync::Arc;

use tarf_models::instruments::fx::TarfContract;
use tarf_models::models::StochasticProcess;

use super::bridge::BrownianBridge;
use super::error::EngineError;
use super::grid::TimeGrid;
use crate::proxy::{Observation, ObservationStore};
use crate::rng::NormalStream;

/// Per-path working buffers, reused across the paths of one worker.
pub(super) struct PathScratch {
    normals: Vec<f64>,
    increments: Vec<f64>,
    dw: Vec<f64>,
    spots: Vec<f64>,
    acc_before: Vec<f64>,
    discounted: Vec<f64>,
}

impl PathScratch {
    fn new(steps: usize, fixings: usize) -> Self {
        Self {
            normals: vec![0.0; steps],
            increments: vec![0.0; steps],
            dw: vec![0.0; steps],
            spots: vec![0.0; steps + 1],
            acc_before: vec![0.0; fixings],
            discounted: vec![0.0; fixings],
        }
    }
}

/// Stateless path evaluator shared by all worker threads.
///
/// A path walks the time grid from the valuation date, pays every open
/// fixing it meets and discounts each cash flow back to the valuation
/// date with the discount factor of its payment date. When a store is
/// supplied, the path also records one observation per open fixing: the
/// spot at the fixing and the discounted value of everything the path
/// pays from that fixing on, keyed by the amount accumulated before it.
/// Knocked-out paths keep recording; their remaining rows hold zeros,
/// which is exactly what the surface must learn for those states.
pub(super) struct PathSampler {
    process: Arc<dyn StochasticProcess>,
    contract: Arc<dyn TarfContract>,
    grid: TimeGrid,
    bridge: Option<BrownianBridge>,
    fixing_indices: Vec<usize>,
    payment_dfs: Vec<f64>,
    sqrt_dt: Vec<f64>,
    accumulated_start: f64,
    nominal: f64,
}

impl PathSampler {
    /// `payment_dfs` are the valuation-date discount factors of the open
    /// payment dates, aligned index-wise with the grid's mandatory times.
    pub(super) fn new(
        process: Arc<dyn StochasticProcess>,
        contract: Arc<dyn TarfContract>,
        grid: TimeGrid,
        bridge: Option<BrownianBridge>,
        payment_dfs: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(grid.mandatory_indices().len(), payment_dfs.len());
        let fixing_indices = grid.mandatory_indices().to_vec();
        let sqrt_dt = (0..grid.steps()).map(|i| grid.dt(i).sqrt()).collect();
        let accumulated_start = contract.accumulated_amount();
        let nominal = contract.source_nominal();
        Self {
            process,
            contract,
            grid,
            bridge,
            fixing_indices,
            payment_dfs,
            sqrt_dt,
            accumulated_start,
            nominal,
        }
    }

    pub(super) fn open_fixings(&self) -> usize {
        self.fixing_indices.len()
    }

    pub(super) fn scratch(&self) -> PathScratch {
        PathScratch::new(self.grid.steps(), self.fixing_indices.len())
    }

    /// Draws one set of normals and turns them into per-step draws.
    fn prepare(&self, stream: &mut dyn NormalStream, scratch: &mut PathScratch) {
        let PathScratch {
            normals,
            increments,
            dw,
            ..
        } = scratch;

        stream.fill_normal(normals);
        match &self.bridge {
            Some(bridge) => {
                bridge.transform(normals, increments);
                // The bridge emits Wiener increments; the process wants
                // standard normals and applies sqrt(dt) itself.
                for (i, value) in dw.iter_mut().enumerate() {
                    *value = increments[i] / self.sqrt_dt[i];
                }
            }
            None => dw.copy_from_slice(normals),
        }
    }

    fn negate_draws(scratch: &mut PathScratch) {
        for value in scratch.dw.iter_mut() {
            *value = -*value;
        }
    }

    /// Evolves the prepared draws, pays the fixings and records into the
    /// store when one is supplied. Returns the discounted path payoff.
    fn evaluate(
        &self,
        scratch: &mut PathScratch,
        store: Option<&mut ObservationStore>,
    ) -> Result<f64, EngineError> {
        let PathScratch {
            dw,
            spots,
            acc_before,
            discounted,
            ..
        } = scratch;

        spots[0] = self.process.initial_value();
        for step in 0..self.grid.steps() {
            spots[step + 1] = self.process.evolve(
                self.grid.time(step),
                spots[step],
                self.grid.dt(step),
                dw[step],
            )?;
        }

        let mut accumulated = self.accumulated_start;
        for (k, &index) in self.fixing_indices.iter().enumerate() {
            acc_before[k] = accumulated;
            let payout = self.contract.payout(spots[index], &mut accumulated);
            discounted[k] = payout * self.payment_dfs[k] * self.nominal;
        }
        let total: f64 = discounted.iter().sum();

        if let Some(store) = store {
            let open = self.fixing_indices.len();
            let mut residual = 0.0;
            for k in (0..open).rev() {
                residual += discounted[k];
                store.record(
                    open - 1 - k,
                    acc_before[k],
                    Observation {
                        spot: spots[self.fixing_indices[k]],
                        value: residual,
                    },
                );
            }
        }

        Ok(total)
    }

    /// Evaluates one path and returns its discounted payoff.
    ///
    /// `antithetic` flips the sign of every draw before evaluating.
    pub(super) fn run_path(
        &self,
        stream: &mut dyn NormalStream,
        antithetic: bool,
        scratch: &mut PathScratch,
        store: Option<&mut ObservationStore>,
    ) -> Result<f64, EngineError> {
        self.prepare(stream, scratch);
        if antithetic {
            Self::negate_draws(scratch);
        }
        self.evaluate(scratch, store)
    }

    /// Evaluates a path and its mirror from one set of draws.
    ///
    /// Both legs record observations; the pair shares a single spin of
    /// the stream, so the mirror reuses the variates rather than
    /// consuming fresh ones.
    pub(super) fn run_pair(
        &self,
        stream: &mut dyn NormalStream,
        scratch: &mut PathScratch,
        mut store: Option<&mut ObservationStore>,
    ) -> Result<(f64, f64), EngineError> {
        self.prepare(stream, scratch);
        let up = self.evaluate(scratch, store.as_deref_mut())?;
        Self::negate_draws(scratch);
        let down = self.evaluate(scratch, store.as_deref_mut())?;
        Ok((up, down))
    }
}
