//! Benchmarks for the series transformer and snapshot builder.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rotagraph_core::{
    build_snapshots, transform, Panel, PricePanel, SnapshotParams, Symbol, TradingDate,
    WindowParams,
};

const INSTRUMENTS: usize = 17;

fn symbols() -> Vec<Symbol> {
    (0..INSTRUMENTS)
        .filter_map(|i| Symbol::parse(&format!("{}.T", 1617 + i)).ok())
        .collect()
}

fn create_panel(days: usize) -> PricePanel {
    let mut dates = Vec::with_capacity(days);
    let mut current = TradingDate::parse("2020-01-06").expect("valid date");
    for _ in 0..days {
        dates.push(current);
        current = current.next_weekday().expect("date in range");
    }

    let mut columns = vec![(
        Symbol::parse("1306.T").expect("valid symbol"),
        (0..days)
            .map(|row| Some(2_000.0 + row as f64 * 0.5 + (row as f64 * 0.1).sin() * 20.0))
            .collect(),
    )];
    for (offset, symbol) in symbols().into_iter().enumerate() {
        let phase = offset as f64;
        let values = (0..days)
            .map(|row| Some(100.0 + row as f64 * 0.02 + (row as f64 * 0.05 + phase).sin() * 5.0))
            .collect();
        columns.push((symbol, values));
    }

    Panel::prices(dates, columns).expect("valid panel")
}

fn bench_transform(c: &mut Criterion) {
    let benchmark = Symbol::parse("1306.T").expect("valid symbol");
    let instruments = symbols();
    let params = WindowParams::default();

    let mut group = c.benchmark_group("Transform");
    for days in [250, 1_000, 5_000] {
        let panel = create_panel(days);
        group.bench_with_input(BenchmarkId::new("17_instruments", days), &panel, |b, panel| {
            b.iter(|| {
                transform(
                    black_box(panel),
                    black_box(&benchmark),
                    black_box(&instruments),
                    &params,
                )
            });
        });
    }
    group.finish();
}

fn bench_snapshots(c: &mut Criterion) {
    let benchmark = Symbol::parse("1306.T").expect("valid symbol");
    let panel = create_panel(1_000);
    let panels = transform(&panel, &benchmark, &symbols(), &WindowParams::default())
        .expect("transform");
    let target = panel.dates()[panel.rows() - 1];

    let mut group = c.benchmark_group("Snapshots");
    for lookback in [20, 60, 250] {
        let params = SnapshotParams::new(lookback, 20);
        group.bench_with_input(BenchmarkId::new("lookback", lookback), &params, |b, params| {
            b.iter(|| {
                build_snapshots(
                    black_box(&panels.rs_ratio),
                    black_box(&panels.rs_momentum),
                    black_box(&panel),
                    target,
                    params,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_snapshots);
criterion_main!(benches);
