//! Benchmarks for dashboard view building and chart rendering

use coin_pulse::dashboard::{render_chart, MarketView};
use coin_pulse::store::PriceSample;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

const SYMBOLS: [&str; 4] = ["BTC_USDT", "ETH_USDT", "SOL_USDT", "DOGE_USDT"];

/// 200 newest-first rows, the dashboard's default window
fn recent_rows() -> Vec<PriceSample> {
    (0..50)
        .rev()
        .flat_map(|minute| {
            SYMBOLS.iter().enumerate().map(move |(i, symbol)| {
                PriceSample::new(
                    format!("2025-01-04 20:{:02}:00", minute),
                    *symbol,
                    Decimal::from(90_000 / (i as i64 + 1) + minute * 7),
                )
            })
        })
        .collect()
}

fn benchmark_market_view(c: &mut Criterion) {
    let rows = recent_rows();

    c.bench_function("market_view_200_rows", |b| {
        b.iter(|| MarketView::from_samples(black_box(rows.clone())))
    });
}

fn benchmark_chart_render(c: &mut Criterion) {
    let view = MarketView::from_samples(recent_rows());
    let series = view.series("BTC_USDT").expect("BTC_USDT in benchmark data");

    c.bench_function("render_chart_80x20", |b| {
        b.iter(|| render_chart(black_box(series), 80, 20))
    });
}

criterion_group!(benches, benchmark_market_view, benchmark_chart_render);
criterion_main!(benches);
