//! Estimation pipeline properties
//!
//! Runs the numerical stages end to end on a deterministic synthetic
//! market:
//! 1. Pivot binned observations into volume and price panels
//! 2. Daily summaries and lagged scaling factors
//! 3. Intraday volume profile and impact states for every kernel
//! 4. Regression moments per stock-day
//! 5. Walk-forward ridge fit

use approx::assert_relative_eq;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use impact_core::{
    BinnedObservation, ImpactKernel, MomentSummary, ObservationBatch, RegressionMoments,
    StockDay, YearMonth,
};
use impact_estimation::{
    EstimationConfig, ImpactStateEngine, RidgeEstimator, ScalingTable, daily_moment_summaries,
    intraday_volume_profile, regression_observations, rolling_scaling_factors, summarize,
};

const BUCKETS_PER_DAY: u32 = 48;
const STOCKS: [&str; 3] = ["AAPL", "MSFT", "XOM"];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic uniform noise in [-0.5, 0.5)
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    }
}

fn trading_days(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = from;
    while day <= to {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

/// Prices move with signed flow, so impact changes explain returns
fn synthetic_market(days: &[NaiveDate], seed: u64) -> Vec<BinnedObservation> {
    let mut rng = Lcg(seed);
    let open = NaiveTime::from_hms_opt(9, 57, 0).unwrap();
    let mut rows = Vec::new();

    for (s, stock) in STOCKS.iter().enumerate() {
        let mut price = 50.0 * (s + 1) as f64;
        for date in days {
            for b in 0..BUCKETS_PER_DAY {
                let flow = rng.next() * 2000.0;
                price *= 1.0 + 0.004 * flow / 1000.0 + 0.0002 * rng.next();
                // Every seventh bucket has no quote
                let mid = (b % 7 != 3).then_some(price);
                let time = open + Duration::seconds(i64::from(b) * 10);
                rows.push(BinnedObservation::new(*stock, *date, time, flow, mid));
            }
        }
    }
    rows
}

fn test_config() -> EstimationConfig {
    EstimationConfig {
        rolling_window_days: 5,
        ..Default::default()
    }
}

/// Moment summaries of one kernel for one batch of observations
fn kernel_summaries(
    config: &EstimationConfig,
    table: &ScalingTable,
    kernel: ImpactKernel,
    rows: &[BinnedObservation],
) -> Vec<MomentSummary> {
    let batch = ObservationBatch::pivot(rows).unwrap();
    let profile = intraday_volume_profile(&batch.volume, config.decay_factor()).unwrap();
    let engine = ImpactStateEngine::new(table, config.decay_factor());
    let states = engine.compute(kernel, &batch.volume, Some(&profile)).unwrap();
    daily_moment_summaries(
        &states,
        &batch.price,
        config.horizon_buckets(),
        config.cutoff_time,
    )
    .unwrap()
}

fn scaling_table(config: &EstimationConfig, rows: &[BinnedObservation]) -> ScalingTable {
    let batch = ObservationBatch::pivot(rows).unwrap();
    let summaries = summarize(&batch, config.buckets_per_session).unwrap();
    let factors = rolling_scaling_factors(&summaries, config.rolling_window_days).unwrap();
    ScalingTable::from_rows(factors)
}

#[test]
fn test_moments_are_additive_across_batches() {
    init_logging();
    let config = test_config();
    let jan = trading_days(
        NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2019, 1, 31).unwrap(),
    );
    let feb = trading_days(
        NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2019, 2, 28).unwrap(),
    );
    let all_days: Vec<NaiveDate> = jan.iter().chain(feb.iter()).copied().collect();
    let rows = synthetic_market(&all_days, 7);
    let table = scaling_table(&config, &rows);

    let (jan_rows, feb_rows): (Vec<_>, Vec<_>) = rows
        .iter()
        .cloned()
        .partition(|r| YearMonth::of(r.date) == YearMonth::new(2019, 1));

    for kernel in ImpactKernel::ALL {
        let whole = kernel_summaries(&config, &table, kernel, &rows);
        let mut split = kernel_summaries(&config, &table, kernel, &jan_rows);
        split.extend(kernel_summaries(&config, &table, kernel, &feb_rows));

        // Stock-days are independent, so batching does not change them
        assert_eq!(whole.len(), split.len(), "{kernel}");
        split.sort_by(|a, b| a.key().cmp(&b.key()));
        let mut whole_sorted = whole.clone();
        whole_sorted.sort_by(|a, b| a.key().cmp(&b.key()));
        for (a, b) in whole_sorted.iter().zip(&split) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.moments.count, b.moments.count);
            assert_relative_eq!(a.moments.xy, b.moments.xy, max_relative = 1e-12);
            assert_relative_eq!(a.moments.yy, b.moments.yy, max_relative = 1e-12);
        }

        let whole_total: RegressionMoments = whole.iter().map(|s| s.moments).sum();
        let split_total: RegressionMoments = split.iter().map(|s| s.moments).sum();
        assert!(whole_total.count > 0, "{kernel} produced no observations");
        assert_eq!(whole_total.count, split_total.count);
        assert_relative_eq!(whole_total.xx, split_total.xx, max_relative = 1e-9);
    }
}

#[test]
fn test_daily_totals_match_observations() {
    init_logging();
    let config = test_config();
    let days = trading_days(
        NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2019, 3, 29).unwrap(),
    );
    let rows = synthetic_market(&days, 11);
    let table = scaling_table(&config, &rows);
    let batch = ObservationBatch::pivot(&rows).unwrap();
    let engine = ImpactStateEngine::new(&table, config.decay_factor());

    let states = engine.compute(ImpactKernel::Sqrt, &batch.volume, None).unwrap();
    let observations = regression_observations(
        &states,
        &batch.price,
        config.horizon_buckets(),
        config.cutoff_time,
    )
    .unwrap();
    let summaries = daily_moment_summaries(
        &states,
        &batch.price,
        config.horizon_buckets(),
        config.cutoff_time,
    )
    .unwrap();

    let from_observations: RegressionMoments = observations.iter().map(|o| o.moments).sum();
    let from_days: RegressionMoments = summaries.iter().map(|s| s.moments).sum();
    assert_eq!(from_observations.count, from_days.count);
    assert_relative_eq!(from_observations.x, from_days.x, max_relative = 1e-9);
    assert_relative_eq!(from_observations.xy, from_days.xy, max_relative = 1e-9);
    assert_relative_eq!(from_observations.yy, from_days.yy, max_relative = 1e-9);

    // Nothing before the cutoff enters the regression
    assert!(observations.iter().all(|o| o.time >= config.cutoff_time));
}

#[test]
fn test_flow_change_stays_within_its_stock_day() {
    init_logging();
    let config = test_config();
    let days = trading_days(
        NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2019, 4, 30).unwrap(),
    );
    let rows = synthetic_market(&days, 3);
    let table = scaling_table(&config, &rows);

    let target = StockDay::new("MSFT", days[10]);
    let perturbed: Vec<BinnedObservation> = rows
        .iter()
        .cloned()
        .map(|mut r| {
            if r.key() == target {
                r.trade *= -3.0;
            }
            r
        })
        .collect();

    for kernel in [ImpactKernel::Linear, ImpactKernel::Sqrt, ImpactKernel::ReducedForm] {
        let base = kernel_summaries(&config, &table, kernel, &rows);
        let changed = kernel_summaries(&config, &table, kernel, &perturbed);
        assert_eq!(base.len(), changed.len());
        for (a, b) in base.iter().zip(&changed) {
            if a.key() == target {
                assert_ne!(a.moments.x, b.moments.x, "{kernel} ignored the perturbation");
            } else {
                assert_eq!(a.moments, b.moments, "{kernel} leaked into {}", a.key());
            }
        }
    }
}

#[test]
fn test_walk_forward_recovers_positive_impact() {
    init_logging();
    let config = test_config();
    let days = trading_days(
        NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2019, 3, 29).unwrap(),
    );
    let rows = synthetic_market(&days, 2019);
    let table = scaling_table(&config, &rows);
    let estimator = RidgeEstimator::new(config.ridge_lambda);

    for kernel in config.kernels.clone() {
        let summaries = kernel_summaries(&config, &table, kernel, &rows);
        let results = estimator.walk_forward(&summaries);

        // Jan→Feb and Feb→Mar for every stock
        assert_eq!(results.len(), 2 * STOCKS.len(), "{kernel}");
        for result in &results {
            assert_eq!(result.out_of_sample_month, result.in_sample_month.next());
            assert!(result.beta_estimate > 0.0, "{kernel} {}: {}", result.stock, result.beta_estimate);
            assert!(result.is_rsq > 0.0 && result.is_rsq <= 1.0);
            assert!(result.oos_rsq <= 1.0);
        }
    }
}
