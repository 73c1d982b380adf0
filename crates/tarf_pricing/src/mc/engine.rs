//! The Monte Carlo pricing engine for target redemption forwards.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tarf_core::types::{Date, DayCountConvention};
use tarf_models::instruments::fx::TarfContract;
use tarf_models::instruments::payoff::OptionType;
use tarf_models::models::{SharedCurve, StochasticProcess};
use tracing::{debug, warn};

use super::bridge::BrownianBridge;
use super::config::McEngineConfig;
use super::error::{ConfigurationError, EngineError};
use super::grid::TimeGrid;
use super::sampler::PathSampler;
use super::statistics::Statistics;
use crate::proxy::{build_grid, bucket_limits, ObservationStore, ProxySurface};
use crate::rng::RandomSource;

/// Paths evaluated per parallel work item.
const PATH_BATCH: u64 = 1024;

/// First wave of a tolerance-driven run.
const MIN_TOLERANCE_SAMPLES: u64 = 1023;

/// How the engine decides when to stop drawing samples.
#[derive(Clone, Copy, Debug)]
enum SampleBudget {
    Fixed(u64),
    Tolerance { tolerance: f64, max: Option<u64> },
}

/// Outcome of the simulation, with the fitted proxy surface when one
/// was requested.
#[derive(Clone, Debug)]
pub struct TarfResults {
    value: f64,
    error_estimate: Option<f64>,
    samples: usize,
    converged: bool,
    proxy: Option<ProxySurface>,
}

impl TarfResults {
    /// Estimated present value in target currency units.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Standard error of the estimate, when the sample statistics
    /// admit one.
    #[inline]
    pub fn error_estimate(&self) -> Option<f64> {
        self.error_estimate
    }

    /// Samples folded into the estimate; an antithetic pair counts as
    /// one sample.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// False when a tolerance-driven run exhausted its sample budget
    /// before reaching the tolerance.
    #[inline]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// The proxy surface fitted from this run, if one was requested.
    #[inline]
    pub fn proxy(&self) -> Option<&ProxySurface> {
        self.proxy.as_ref()
    }

    /// Consumes the results, handing the surface over.
    pub fn into_proxy(self) -> Option<ProxySurface> {
        self.proxy
    }

    /// Symmetric 95% confidence interval around the estimate.
    pub fn confidence_95(&self) -> Option<(f64, f64)> {
        self.error_estimate
            .map(|error| (self.value - 1.96 * error, self.value + 1.96 * error))
    }
}

/// Monte Carlo engine pricing one TARF and distilling its paths into a
/// [`ProxySurface`].
///
/// Construction validates the configuration and freezes everything the
/// simulation needs: the time grid through the open fixing times, the
/// discount factors of the open payment dates, and the accumulation
/// bucket fences. [`calculate`] then runs paths in deterministic
/// batches; with a fixed seed, two runs of the same engine produce
/// bit-identical values and surfaces regardless of thread scheduling.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use tarf_core::market_data::FlatCurve;
/// use tarf_core::types::Date;
/// use tarf_models::instruments::fx::{CouponType, FxTarf};
/// use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
/// use tarf_models::models::{GbmProcess, SharedCurve};
/// use tarf_models::schedules::FixingSchedule;
/// use tarf_pricing::mc::{McEngineConfig, McTarfEngine, RunningStatistics};
/// use tarf_pricing::rng::PseudoRandomSource;
///
/// let domestic: SharedCurve = Arc::new(FlatCurve::new(0.0));
/// let foreign: SharedCurve = Arc::new(FlatCurve::new(0.0));
///
/// let schedule = FixingSchedule::monthly(
///     Date::from_ymd(2026, 2, 16).unwrap(),
///     12,
///     2,
/// ).unwrap();
/// let tarf = FxTarf::new(
///     schedule,
///     StrikedPayoff::new(OptionType::Call, 1.10).unwrap(),
///     StrikedPayoff::new(OptionType::Put, 1.10).unwrap(),
///     0.10,
///     0.0,
///     1_000_000.0,
///     CouponType::Capped,
/// ).unwrap();
///
/// // Volatility zero: the spot never leaves 1.15, so the capped
/// // structure pays out exactly its target.
/// let process = GbmProcess::new(1.15, 0.0, Arc::clone(&domestic), foreign).unwrap();
///
/// let config = McEngineConfig {
///     steps: Some(12),
///     samples: Some(64),
///     ..McEngineConfig::default()
/// };
/// let mut engine = McTarfEngine::new(
///     Arc::new(process),
///     domestic,
///     Arc::new(tarf),
///     Arc::new(PseudoRandomSource::new()),
///     Box::new(RunningStatistics::new()),
///     Date::from_ymd(2026, 1, 15).unwrap(),
///     config,
/// ).unwrap();
///
/// let results = engine.calculate().unwrap();
/// assert!((results.value() - 100_000.0).abs() < 1e-6);
/// assert!(results.proxy().is_some());
/// ```
///
/// [`calculate`]: McTarfEngine::calculate
pub struct McTarfEngine {
    sampler: PathSampler,
    random_source: Arc<dyn RandomSource>,
    statistics: Box<dyn Statistics>,
    config: McEngineConfig,
    budget: SampleBudget,
    option_type: OptionType,
    limits: Vec<f64>,
    origin_date: Date,
    open_fixing_dates: Vec<Date>,
    last_payment_date: Date,
}

impl fmt::Debug for McTarfEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McTarfEngine")
            .field("config", &self.config)
            .field("budget", &self.budget)
            .field("option_type", &self.option_type)
            .field("limits", &self.limits)
            .field("origin_date", &self.origin_date)
            .field("open_fixing_dates", &self.open_fixing_dates)
            .field("last_payment_date", &self.last_payment_date)
            .finish_non_exhaustive()
    }
}

impl McTarfEngine {
    /// Builds an engine for one contract and valuation date.
    ///
    /// Year fractions for the grid and for discounting use ACT/365F.
    ///
    /// # Errors
    ///
    /// * [`ConfigurationError`] variants for an invalid configuration, a
    ///   tolerance without an error-estimating source, a contract with
    ///   no fixing after `valuation_date`, or one already at its target
    /// * [`EngineError::MarketData`] when a payment date's discount
    ///   factor cannot be read off the curve
    pub fn new(
        process: Arc<dyn StochasticProcess>,
        discount_curve: SharedCurve,
        contract: Arc<dyn TarfContract>,
        random_source: Arc<dyn RandomSource>,
        statistics: Box<dyn Statistics>,
        valuation_date: Date,
        config: McEngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if config.tolerance.is_some() && !random_source.supports_error_estimate() {
            return Err(ConfigurationError::ToleranceUnsupported.into());
        }
        let budget = match (config.samples, config.tolerance) {
            (Some(samples), None) => SampleBudget::Fixed(samples as u64),
            (None, Some(tolerance)) => SampleBudget::Tolerance {
                tolerance,
                max: config.max_samples.map(|max| max as u64),
            },
            _ => return Err(ConfigurationError::SamplesSpecification.into()),
        };

        let target = contract.target();
        let accumulated = contract.accumulated_amount();
        if accumulated >= target {
            return Err(ConfigurationError::ContractTerminated {
                accumulated,
                target,
            }
            .into());
        }
        let open_pairs = contract.schedule().open_pairs(valuation_date);
        if open_pairs.is_empty() {
            return Err(ConfigurationError::NoOpenFixings.into());
        }

        let day_count = DayCountConvention::default();
        let fixing_times: Vec<f64> = open_pairs
            .iter()
            .map(|(fixing, _)| day_count.year_fraction(valuation_date, *fixing))
            .collect();
        let horizon = fixing_times[fixing_times.len() - 1];
        let steps = match (config.steps, config.steps_per_year) {
            (Some(steps), None) => steps,
            (None, Some(per_year)) => ((per_year as f64 * horizon) as usize).max(1),
            _ => return Err(ConfigurationError::StepsSpecification.into()),
        };
        let grid = TimeGrid::new(&fixing_times, steps)?;
        let bridge = config.brownian_bridge.then(|| BrownianBridge::new(&grid));

        let mut payment_dfs = Vec::with_capacity(open_pairs.len());
        for (_, payment) in &open_pairs {
            let t = day_count.year_fraction(valuation_date, *payment);
            payment_dfs.push(discount_curve.discount_factor(t)?);
        }

        let limits = bucket_limits(accumulated, target, config.proxy.accumulation_buckets);
        let option_type = contract.long_position_type();
        let open_fixing_dates: Vec<Date> = open_pairs.iter().map(|(fixing, _)| *fixing).collect();
        let last_payment_date = open_pairs[open_pairs.len() - 1].1;

        debug!(
            fixings = open_fixing_dates.len(),
            steps = grid.steps(),
            horizon,
            process = process.name(),
            "engine initialised"
        );
        let sampler = PathSampler::new(process, contract, grid, bridge, payment_dfs);

        Ok(Self {
            sampler,
            random_source,
            statistics,
            config,
            budget,
            option_type,
            limits,
            origin_date: valuation_date,
            open_fixing_dates,
            last_payment_date,
        })
    }

    /// Runs the simulation and, unless disabled, fits the proxy surface
    /// from its recorded observations.
    ///
    /// A tolerance-driven run draws waves of samples until the standard
    /// error falls under the tolerance; if a maximum sample count cuts
    /// it short, the results carry `converged() == false` but remain
    /// usable, surface included.
    ///
    /// # Errors
    ///
    /// * [`EngineError::Model`] when the process rejects a step
    /// * [`EngineError::Domain`] when the recorded observations cannot
    ///   support the proxy regression
    pub fn calculate(&mut self) -> Result<TarfResults, EngineError> {
        self.statistics.reset();
        let mut store = self
            .config
            .generate_proxy
            .then(|| ObservationStore::new(self.sampler.open_fixings(), self.limits.clone()));

        let mut drawn: u64 = 0;
        let mut converged = true;
        match self.budget {
            SampleBudget::Fixed(samples) => {
                self.run_batches(samples, &mut drawn, &mut store)?;
            }
            SampleBudget::Tolerance { tolerance, max } => {
                let initial = match max {
                    Some(max) => MIN_TOLERANCE_SAMPLES.min(max),
                    None => MIN_TOLERANCE_SAMPLES,
                };
                self.run_batches(initial, &mut drawn, &mut store)?;
                loop {
                    let error = self.statistics.error_estimate().unwrap_or(f64::INFINITY);
                    if error <= tolerance {
                        break;
                    }
                    if let Some(max) = max {
                        if drawn >= max {
                            converged = false;
                            warn!(
                                samples = drawn,
                                error,
                                tolerance,
                                "sample budget exhausted before the tolerance"
                            );
                            break;
                        }
                    }
                    let next = next_wave(drawn, error, tolerance, max);
                    debug!(samples = drawn, error, next, "drawing another wave");
                    self.run_batches(next, &mut drawn, &mut store)?;
                }
            }
        }

        let proxy = match store {
            Some(store) => {
                let grid = build_grid(store, self.option_type, &self.config.proxy)?;
                Some(ProxySurface::new(
                    self.origin_date,
                    self.open_fixing_dates.clone(),
                    self.limits.clone(),
                    self.last_payment_date,
                    grid,
                ))
            }
            None => None,
        };

        let value = self.statistics.mean();
        let error_estimate = self.statistics.error_estimate();
        let samples = self.statistics.samples();
        debug!(samples, value, converged, "simulation complete");

        Ok(TarfResults {
            value,
            error_estimate,
            samples,
            converged,
            proxy,
        })
    }

    /// Draws `count` further samples in parallel chunks.
    ///
    /// Chunks are folded back in chunk order, so statistics and store
    /// contents never depend on worker scheduling.
    fn run_batches(
        &mut self,
        count: u64,
        drawn: &mut u64,
        store: &mut Option<ObservationStore>,
    ) -> Result<(), EngineError> {
        if count == 0 {
            return Ok(());
        }
        let end = *drawn + count;
        let mut chunks = Vec::new();
        let mut first = *drawn;
        while first < end {
            let len = (end - first).min(PATH_BATCH);
            chunks.push((first, len));
            first += len;
        }

        let sampler = &self.sampler;
        let source = self.random_source.as_ref();
        let seed = self.config.seed;
        let antithetic = self.config.antithetic;
        let store_limits = store.is_some().then(|| self.limits.as_slice());
        let outcomes: Vec<Result<ChunkOutcome, EngineError>> = chunks
            .into_par_iter()
            .map(|(first, len)| {
                run_chunk(sampler, source, seed, antithetic, store_limits, first, len)
            })
            .collect();

        for outcome in outcomes {
            let outcome = outcome?;
            for value in outcome.values {
                self.statistics.add_sample(value);
            }
            if let (Some(store), Some(partial)) = (store.as_mut(), outcome.store) {
                store.merge_from(partial);
            }
        }
        *drawn = end;
        Ok(())
    }
}

struct ChunkOutcome {
    values: Vec<f64>,
    store: Option<ObservationStore>,
}

fn run_chunk(
    sampler: &PathSampler,
    source: &dyn RandomSource,
    seed: u64,
    antithetic: bool,
    store_limits: Option<&[f64]>,
    first_path: u64,
    count: u64,
) -> Result<ChunkOutcome, EngineError> {
    let mut scratch = sampler.scratch();
    let mut store =
        store_limits.map(|limits| ObservationStore::new(sampler.open_fixings(), limits.to_vec()));
    let mut values = Vec::with_capacity(count as usize);
    for i in 0..count {
        let mut stream = source.stream_for_path(seed, first_path + i);
        let value = if antithetic {
            let (up, down) = sampler.run_pair(stream.as_mut(), &mut scratch, store.as_mut())?;
            0.5 * (up + down)
        } else {
            sampler.run_path(stream.as_mut(), false, &mut scratch, store.as_mut())?
        };
        values.push(value);
    }
    Ok(ChunkOutcome { values, store })
}

/// Size of the next tolerance wave: scale the sample count by the
/// squared error ratio with a 0.8 safety factor, floor at the initial
/// wave size, and never overshoot the budget.
fn next_wave(drawn: u64, error: f64, tolerance: f64, max: Option<u64>) -> u64 {
    let order = 0.8 * (error / tolerance).powi(2) * drawn as f64;
    let grow = order - drawn as f64;
    let mut next = if grow.is_finite() && grow > 0.0 {
        grow as u64
    } else {
        0
    };
    next = next.max(MIN_TOLERANCE_SAMPLES);
    if let Some(max) = max {
        next = next.min(max.saturating_sub(drawn));
    }
    next
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use tarf_core::market_data::FlatCurve;
    use tarf_models::instruments::fx::{CouponType, FxTarf};
    use tarf_models::instruments::payoff::StrikedPayoff;
    use tarf_models::models::GbmProcess;
    use tarf_models::schedules::FixingSchedule;

    use super::*;
    use crate::mc::RunningStatistics;
    use crate::rng::{NormalStream, PseudoRandomSource};

    fn flat(rate: f64) -> SharedCurve {
        Arc::new(FlatCurve::new(rate))
    }

    fn contract(accumulated: f64) -> Arc<dyn TarfContract> {
        let schedule =
            FixingSchedule::monthly(Date::from_ymd(2026, 2, 16).unwrap(), 12, 2).unwrap();
        Arc::new(
            FxTarf::new(
                schedule,
                StrikedPayoff::new(OptionType::Call, 1.10).unwrap(),
                StrikedPayoff::new(OptionType::Put, 1.10).unwrap(),
                0.10,
                accumulated,
                1_000_000.0,
                CouponType::Capped,
            )
            .unwrap(),
        )
    }

    fn valuation_date() -> Date {
        Date::from_ymd(2026, 1, 15).unwrap()
    }

    fn engine(volatility: f64, config: McEngineConfig) -> Result<McTarfEngine, EngineError> {
        let process = GbmProcess::new(1.15, volatility, flat(0.0), flat(0.0)).unwrap();
        McTarfEngine::new(
            Arc::new(process),
            flat(0.0),
            contract(0.0),
            Arc::new(PseudoRandomSource::new()),
            Box::new(RunningStatistics::new()),
            valuation_date(),
            config,
        )
    }

    #[test]
    fn test_zero_volatility_prices_the_capped_strip_exactly() {
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(64),
            ..McEngineConfig::default()
        };
        let results = engine(0.0, config).unwrap().calculate().unwrap();

        // Spot frozen at 1.15 accrues 0.05 per fixing; the capped
        // knockout coupon makes the total exactly the target.
        assert_relative_eq!(results.value(), 100_000.0, epsilon = 1e-6);
        assert_eq!(results.samples(), 64);
        assert!(results.converged());
        assert_eq!(results.error_estimate(), Some(0.0));

        // Every path is identical, so the whole surface is constant.
        let proxy = results.proxy().unwrap();
        assert_eq!(proxy.rows(), 12);
        assert_relative_eq!(
            proxy.evaluate(11, 0.0, 1.15).unwrap(),
            100_000.0,
            epsilon = 1e-6
        );
        // After the knockout nothing is left to pay.
        assert_relative_eq!(proxy.evaluate(0, 0.10, 1.15).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_seed_reproduces_bitwise() {
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(256),
            ..McEngineConfig::default()
        };
        let a = engine(0.10, config.clone()).unwrap().calculate().unwrap();
        let b = engine(0.10, config.clone()).unwrap().calculate().unwrap();
        assert_eq!(a.value().to_bits(), b.value().to_bits());
        assert_eq!(
            a.error_estimate().map(f64::to_bits),
            b.error_estimate().map(f64::to_bits)
        );

        let reseeded = McEngineConfig { seed: 7, ..config };
        let c = engine(0.10, reseeded).unwrap().calculate().unwrap();
        assert_ne!(a.value().to_bits(), c.value().to_bits());
    }

    #[test]
    fn test_terminated_contract_is_rejected() {
        let process = GbmProcess::new(1.15, 0.1, flat(0.0), flat(0.0)).unwrap();
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(64),
            ..McEngineConfig::default()
        };
        let err = McTarfEngine::new(
            Arc::new(process),
            flat(0.0),
            contract(0.10),
            Arc::new(PseudoRandomSource::new()),
            Box::new(RunningStatistics::new()),
            valuation_date(),
            config,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::ContractTerminated { .. })
        ));
    }

    #[test]
    fn test_past_schedule_is_rejected() {
        let process = GbmProcess::new(1.15, 0.1, flat(0.0), flat(0.0)).unwrap();
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(64),
            ..McEngineConfig::default()
        };
        let err = McTarfEngine::new(
            Arc::new(process),
            flat(0.0),
            contract(0.0),
            Arc::new(PseudoRandomSource::new()),
            Box::new(RunningStatistics::new()),
            Date::from_ymd(2027, 6, 1).unwrap(),
            config,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::NoOpenFixings)
        ));
    }

    #[test]
    fn test_tolerance_requires_an_error_estimate() {
        struct ZeroStream;
        impl NormalStream for ZeroStream {
            fn next_normal(&mut self) -> f64 {
                0.0
            }
        }
        struct NoEstimateSource;
        impl RandomSource for NoEstimateSource {
            fn stream_for_path(&self, _seed: u64, _path_index: u64) -> Box<dyn NormalStream> {
                Box::new(ZeroStream)
            }
            fn supports_error_estimate(&self) -> bool {
                false
            }
        }

        let process = GbmProcess::new(1.15, 0.1, flat(0.0), flat(0.0)).unwrap();
        let config = McEngineConfig {
            steps: Some(12),
            tolerance: Some(10.0),
            ..McEngineConfig::default()
        };
        let err = McTarfEngine::new(
            Arc::new(process),
            flat(0.0),
            contract(0.0),
            Arc::new(NoEstimateSource),
            Box::new(RunningStatistics::new()),
            valuation_date(),
            config,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::ToleranceUnsupported)
        ));
    }

    #[test]
    fn test_tolerance_run_stops_at_its_budget() {
        let config = McEngineConfig {
            steps: Some(12),
            tolerance: Some(1e-12),
            max_samples: Some(2000),
            ..McEngineConfig::default()
        };
        let results = engine(0.10, config).unwrap().calculate().unwrap();
        assert!(!results.converged());
        assert_eq!(results.samples(), 2000);
        assert!(results.error_estimate().unwrap() > 1e-12);
        // The surface is still fitted from what was drawn.
        assert!(results.proxy().is_some());
    }

    #[test]
    fn test_tolerance_run_converges_on_an_easy_target() {
        let config = McEngineConfig {
            steps: Some(12),
            tolerance: Some(10_000.0),
            max_samples: Some(1 << 20),
            ..McEngineConfig::default()
        };
        let results = engine(0.10, config).unwrap().calculate().unwrap();
        assert!(results.converged());
        assert!(results.error_estimate().unwrap() <= 10_000.0);
    }

    #[test]
    fn test_proxy_generation_can_be_disabled() {
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(64),
            generate_proxy: false,
            ..McEngineConfig::default()
        };
        let results = engine(0.10, config).unwrap().calculate().unwrap();
        assert!(results.proxy().is_none());
    }

    #[test]
    fn test_antithetic_pairs_count_as_one_sample() {
        let config = McEngineConfig {
            steps: Some(12),
            samples: Some(100),
            antithetic: true,
            ..McEngineConfig::default()
        };
        let results = engine(0.10, config).unwrap().calculate().unwrap();
        assert_eq!(results.samples(), 100);
    }

    #[test]
    fn test_next_wave_growth_and_caps() {
        // Far from the tolerance the wave grows, capped by the budget.
        assert_eq!(next_wave(1023, 1.0, 1e-6, Some(2000)), 977);
        // Without a budget the growth formula runs free.
        let unbounded = next_wave(1023, 2.0, 1.0, None);
        assert_eq!(unbounded, (0.8 * 4.0 * 1023.0 - 1023.0) as u64);
        // Close to the tolerance the floor still applies.
        assert_eq!(next_wave(5000, 1.01, 1.0, None), MIN_TOLERANCE_SAMPLES);
    }
}
