//! End-to-end checks of the estimation pipeline on synthetic outbreaks.

use chrono::NaiveDate;
use rt_tracker::parser::{ParseOptions, parse_dataset};
use rt_tracker::rt::{
    RtConfig, RtEstimator, interval, likelihood::likelihood_table, posterior::get_posteriors,
    preprocess::prepare_cases,
};
use rt_tracker::series::CaseSeries;

fn cumulative_series(daily: impl Iterator<Item = u64>) -> CaseSeries {
    let start: NaiveDate = "2020-03-01".parse().unwrap();
    let mut total = 0;
    let pairs = daily
        .enumerate()
        .map(|(i, d)| {
            total += d;
            (start + chrono::Days::new(i as u64), total)
        })
        .collect();
    CaseSeries::cumulative(pairs).unwrap()
}

/// Daily counts growing at rate `r` from `base`.
fn exponential_daily(base: f64, r: f64, days: usize) -> impl Iterator<Item = u64> {
    (0..days).map(move |t| (base * (r * t as f64).exp()).round() as u64)
}

#[test]
fn test_exponential_growth_converges_to_implied_rt() {
    // r = gamma * (Rt - 1), so r = 0.1 with gamma = 1/7 implies Rt = 1.7.
    let cases = cumulative_series(exponential_daily(20.0, 0.1, 60));
    let estimator = RtEstimator::new(RtConfig::default());
    let outcome = estimator.estimate(&cases).unwrap();

    // Check away from the trailing edge, where the smoother has a full
    // window.
    let interior = &outcome.records[outcome.records.len() - 5];
    assert!(
        (interior.most_likely - 1.7).abs() < 0.15,
        "interior ML {} expected near 1.7",
        interior.most_likely
    );

    let last = outcome.records.last().unwrap();
    assert!(
        (last.most_likely - 1.7).abs() < 0.3,
        "trailing ML {} expected near 1.7",
        last.most_likely
    );
}

#[test]
fn test_constant_counts_converge_to_one() {
    let cases = cumulative_series(std::iter::repeat_n(100u64, 35));
    let estimator = RtEstimator::new(RtConfig::default());
    let outcome = estimator.estimate(&cases).unwrap();

    let last = outcome.records.last().unwrap();
    assert!(
        (last.most_likely - 1.0).abs() < 0.1,
        "steady-state ML {} expected near 1.0",
        last.most_likely
    );
}

#[test]
fn test_intervals_bracket_point_estimates() {
    let cases = cumulative_series(exponential_daily(15.0, 0.05, 45));
    let estimator = RtEstimator::new(RtConfig::default());
    let outcome = estimator.estimate(&cases).unwrap();

    assert!(!outcome.records.is_empty());
    for record in &outcome.records {
        assert!(record.low_90 <= record.most_likely, "{record:?}");
        assert!(record.most_likely <= record.high_90, "{record:?}");
    }
}

#[test]
fn test_hdi_encloses_required_mass() {
    let cfg = RtConfig::default();
    let grid = cfg.grid();
    let cases = cumulative_series(exponential_daily(20.0, 0.08, 40));

    let prepared = prepare_cases(&cases, &cfg);
    let likelihoods = likelihood_table(&prepared, &grid.view(), cfg.gamma);
    let posteriors = get_posteriors(&prepared, &likelihoods, &grid.view(), cfg.sigma).unwrap();

    for dist in &posteriors.distributions {
        let total: f64 = dist.sum();
        assert!((total - 1.0).abs() < 1e-9);

        let hdi = interval::highest_density_interval(&dist.view(), &grid.view(), cfg.ci_mass);
        let lo = (hdi.low / cfg.grid_step).round() as usize;
        let hi = (hdi.high / cfg.grid_step).round() as usize;
        let enclosed: f64 = dist.iter().skip(lo + 1).take(hi - lo).sum();
        assert!(enclosed > cfg.ci_mass, "enclosed {enclosed}");
    }
}

#[test]
fn test_pipeline_from_csv_is_reproducible() {
    let mut body = String::from("date,total_cases,total_tests\n");
    let start: NaiveDate = "2020-03-01".parse().unwrap();
    let mut cases = 0u64;
    for (t, daily) in exponential_daily(10.0, 0.07, 50).enumerate() {
        cases += daily;
        let tests = (t as u64 + 1) * 900;
        body.push_str(&format!(
            "{},{},{}\n",
            start + chrono::Days::new(t as u64),
            cases,
            tests
        ));
    }

    let parsed = parse_dataset(body.as_bytes(), &ParseOptions::default()).unwrap();
    assert!(parsed.tests.is_some());

    let estimator = RtEstimator::new(RtConfig::default());
    let first = estimator.estimate(&parsed.cases).unwrap();
    let second = estimator.estimate(&parsed.cases).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.log_likelihood, second.log_likelihood);
    assert!(first.log_likelihood.is_finite());
}
