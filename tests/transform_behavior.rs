//! Behavior-driven tests for the series transformer
//!
//! These tests verify HOW close prices become RS-Ratio and RS-Momentum
//! series: warm-up lengths, point-in-time correctness, gap handling and the
//! failure taxonomy.

use rotagraph_core::{
    transform, Panel, PricePanel, RrgError, Symbol, TradingDate, WindowParams, WindowPreset,
};
use rotagraph_tests::{symbol, weekdays_from};

fn trading_days(count: usize) -> Vec<TradingDate> {
    weekdays_from("2025-01-06", count)
}

fn benchmark_prices(count: usize) -> Vec<Option<f64>> {
    (0..count).map(|i| Some(100.0 * (1.0 + 0.001 * i as f64))).collect()
}

fn wavy_prices(count: usize, phase: f64) -> Vec<Option<f64>> {
    (0..count)
        .map(|i| Some(50.0 + 4.0 * ((i as f64) / 7.0 + phase).sin() + 0.05 * i as f64))
        .collect()
}

fn sample_panel(count: usize) -> PricePanel {
    Panel::prices(
        trading_days(count),
        vec![
            (symbol("1306.T"), benchmark_prices(count)),
            (symbol("1617.T"), wavy_prices(count, 0.0)),
            (symbol("1631.T"), wavy_prices(count, 1.5)),
        ],
    )
    .expect("valid panel")
}

fn instruments() -> Vec<Symbol> {
    vec![symbol("1617.T"), symbol("1631.T")]
}

fn leading_none(values: &[Option<f64>]) -> usize {
    values.iter().take_while(|value| value.is_none()).count()
}

// =============================================================================
// Transformer: Warm-up
// =============================================================================

#[test]
fn when_history_is_continuous_oscillators_appear_after_their_warmup() {
    // Given: 120 continuous trading days
    let panel = sample_panel(120);
    let params = WindowParams::default();

    // When: The panel is transformed with the default 60/5/10 windows
    let panels = transform(&panel, &symbol("1306.T"), &instruments(), &params)
        .expect("transform should succeed");

    // Then: RS-Ratio is undefined for exactly ratio_window - 1 observations
    for instrument in instruments() {
        let ratio = panels.rs_ratio.column(&instrument).expect("column");
        assert_eq!(leading_none(ratio), params.ratio_warmup());
        assert!(ratio[params.ratio_warmup()..].iter().all(Option::is_some));

        // And: RS-Momentum for exactly change_period + smoothing - 1 observations
        let momentum = panels.rs_momentum.column(&instrument).expect("column");
        assert_eq!(leading_none(momentum), params.momentum_warmup());
        assert_eq!(params.momentum_warmup(), 14);
        assert!(momentum[params.momentum_warmup()..].iter().all(Option::is_some));
    }
}

#[test]
fn classic_preset_uses_its_own_warmup_lengths() {
    // Given: The classic 52/4/13 preset
    let params = WindowPreset::Classic.params();
    let panel = sample_panel(80);

    // When: The panel is transformed
    let panels = transform(&panel, &symbol("1306.T"), &instruments(), &params)
        .expect("transform should succeed");

    // Then: Warm-up follows the preset's windows
    let instrument = symbol("1617.T");
    assert_eq!(leading_none(panels.rs_ratio.column(&instrument).expect("column")), 51);
    assert_eq!(leading_none(panels.rs_momentum.column(&instrument).expect("column")), 16);
}

// =============================================================================
// Transformer: Point-in-time correctness
// =============================================================================

#[test]
fn perturbing_a_later_price_never_changes_earlier_values() {
    // Given: A panel and a copy whose prices after day 80 are shocked
    let count = 110;
    let cutoff = 80;
    let original = sample_panel(count);

    let mut shocked_instrument = wavy_prices(count, 0.0);
    let mut shocked_benchmark = benchmark_prices(count);
    for row in (cutoff + 1)..count {
        shocked_instrument[row] = shocked_instrument[row].map(|price| price * 3.0);
        shocked_benchmark[row] = shocked_benchmark[row].map(|price| price * 0.5);
    }
    let shocked = Panel::prices(
        trading_days(count),
        vec![
            (symbol("1306.T"), shocked_benchmark),
            (symbol("1617.T"), shocked_instrument),
            (symbol("1631.T"), wavy_prices(count, 1.5)),
        ],
    )
    .expect("valid panel");

    // When: Both panels are transformed
    let params = WindowParams::new(20, 5, 10);
    let before = transform(&original, &symbol("1306.T"), &instruments(), &params).expect("ok");
    let after = transform(&shocked, &symbol("1306.T"), &instruments(), &params).expect("ok");

    // Then: Every value dated on or before the cutoff is identical
    for instrument in instruments() {
        let ratio_before = before.rs_ratio.column(&instrument).expect("column");
        let ratio_after = after.rs_ratio.column(&instrument).expect("column");
        assert_eq!(ratio_before[..=cutoff], ratio_after[..=cutoff]);

        let momentum_before = before.rs_momentum.column(&instrument).expect("column");
        let momentum_after = after.rs_momentum.column(&instrument).expect("column");
        assert_eq!(momentum_before[..=cutoff], momentum_after[..=cutoff]);
    }

    // And: The shocked instrument does change afterwards
    let ratio_before = before.rs_ratio.column(&symbol("1617.T")).expect("column");
    let ratio_after = after.rs_ratio.column(&symbol("1617.T")).expect("column");
    assert_ne!(ratio_before[cutoff + 1], ratio_after[cutoff + 1]);
}

#[test]
fn constant_prices_sit_exactly_on_the_pivot() {
    // Given: Benchmark and instrument both flat at 100 for 65 days
    let panel = Panel::prices(
        trading_days(65),
        vec![
            (symbol("1306.T"), vec![Some(100.0); 65]),
            (symbol("1617.T"), vec![Some(100.0); 65]),
        ],
    )
    .expect("valid panel");

    // When: The panel is transformed
    let panels = transform(
        &panel,
        &symbol("1306.T"),
        &[symbol("1617.T")],
        &WindowParams::default(),
    )
    .expect("transform should succeed");

    // Then: Every defined value is exactly 100
    let ratio = panels.rs_ratio.column(&symbol("1617.T")).expect("column");
    let momentum = panels.rs_momentum.column(&symbol("1617.T")).expect("column");
    assert!(ratio.iter().flatten().all(|value| *value == 100.0));
    assert!(momentum.iter().flatten().all(|value| *value == 100.0));
    assert_eq!(ratio.iter().flatten().count(), 6);
}

// =============================================================================
// Transformer: Missing data
// =============================================================================

#[test]
fn a_missing_price_restarts_the_rolling_windows() {
    // Given: An instrument with a one-day provider gap on day 30
    let count = 60;
    let mut prices = wavy_prices(count, 0.0);
    prices[30] = None;
    let panel = Panel::prices(
        trading_days(count),
        vec![(symbol("1306.T"), benchmark_prices(count)), (symbol("1617.T"), prices)],
    )
    .expect("valid panel");

    // When: The panel is transformed with a 10-day ratio window
    let params = WindowParams::new(10, 2, 3);
    let panels =
        transform(&panel, &symbol("1306.T"), &[symbol("1617.T")], &params).expect("ok");

    // Then: The ratio is undefined from the gap until ten new observations exist
    let ratio = panels.rs_ratio.column(&symbol("1617.T")).expect("column");
    assert!(ratio[29].is_some());
    assert!(ratio[30..40].iter().all(Option::is_none));
    assert!(ratio[40].is_some());

    // And: No value is forward-filled into the gap
    let rs = panels.relative_strength.column(&symbol("1617.T")).expect("column");
    assert_eq!(rs[30], None);
}

#[test]
fn an_instrument_absent_from_the_panel_yields_an_undefined_column() {
    // Given: A request for an instrument the provider returned nothing for
    let panel = sample_panel(90);
    let requested = vec![symbol("1617.T"), symbol("1633.T")];

    // When: The panel is transformed
    let panels = transform(&panel, &symbol("1306.T"), &requested, &WindowParams::default())
        .expect("other instruments still produce values");

    // Then: The absent instrument keeps its place with no values
    assert_eq!(panels.rs_ratio.symbols(), requested.as_slice());
    let missing = panels.rs_ratio.column(&symbol("1633.T")).expect("column");
    assert!(missing.iter().all(Option::is_none));
}

// =============================================================================
// Transformer: Failure taxonomy
// =============================================================================

#[test]
fn when_benchmark_is_not_in_the_panel_transform_reports_missing_benchmark() {
    let panel = sample_panel(90);

    let err = transform(&panel, &symbol("1321.T"), &instruments(), &WindowParams::default())
        .expect_err("must fail");

    assert!(matches!(err, RrgError::MissingBenchmark { benchmark } if benchmark == "1321.T"));
}

#[test]
fn when_panel_has_no_rows_transform_reports_empty_input() {
    let panel = Panel::prices(
        Vec::new(),
        vec![(symbol("1306.T"), Vec::new()), (symbol("1617.T"), Vec::new())],
    )
    .expect("an empty panel is still well-formed");

    let err = transform(&panel, &symbol("1306.T"), &[symbol("1617.T")], &WindowParams::default())
        .expect_err("must fail");

    assert!(matches!(err, RrgError::EmptyInput));
}

#[test]
fn when_benchmark_has_no_prices_transform_reports_empty_benchmark_series() {
    let panel = Panel::prices(
        trading_days(90),
        vec![
            (symbol("1306.T"), vec![None; 90]),
            (symbol("1617.T"), wavy_prices(90, 0.0)),
        ],
    )
    .expect("valid panel");

    let err = transform(&panel, &symbol("1306.T"), &[symbol("1617.T")], &WindowParams::default())
        .expect_err("must fail");

    assert!(matches!(err, RrgError::EmptyBenchmarkSeries { .. }));
}

#[test]
fn when_history_is_shorter_than_the_window_transform_reports_empty_result() {
    // Given: 40 days of history against a 60-day ratio window
    let panel = sample_panel(40);

    let err = transform(&panel, &symbol("1306.T"), &instruments(), &WindowParams::default())
        .expect_err("must fail");

    assert!(matches!(err, RrgError::EmptyResult));
    assert_eq!(err.category(), rotagraph_core::ErrorCategory::InsufficientHistory);
}
