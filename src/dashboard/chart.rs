//! Line chart rendered off-screen with ratatui

use super::view::SymbolSeries;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};
use rust_decimal::prelude::ToPrimitive;

const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 6;

/// Render price over time as plain text lines.
///
/// Samples are spaced evenly along the x axis; the y axis is fitted to the
/// series range instead of starting at zero.
pub fn render_chart(series: &SymbolSeries, width: u16, height: u16) -> String {
    if series.samples.is_empty() {
        return format!("No samples for {}\n", series.symbol);
    }

    let points: Vec<(f64, f64)> = series
        .samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.price.to_f64().unwrap_or_default()))
        .collect();

    let (low, high) = y_bounds(&points);
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let first_time = short_time(&series.samples[0].time);
    let last_time = series
        .latest()
        .map(|s| short_time(&s.time))
        .unwrap_or_default();

    let dataset = Dataset::default()
        .name(series.symbol.clone())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} price ", series.symbol)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first_time), Span::raw(last_time)]),
        )
        .y_axis(
            Axis::default()
                .bounds([low, high])
                .labels(vec![
                    Span::raw(format!("{:.2}", low)),
                    Span::raw(format!("{:.2}", high)),
                ]),
        );

    let area = Rect::new(0, 0, width.max(MIN_WIDTH), height.max(MIN_HEIGHT));
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_to_text(&buf)
}

/// Price range padded so flat series still get a visible line
fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let low = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let high = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let pad = if high > low {
        (high - low) * 0.05
    } else {
        (high.abs() * 0.01).max(1.0)
    };
    (low - pad, high + pad)
}

/// "2025-01-04 20:30:00" -> "01-04 20:30"
fn short_time(time: &str) -> String {
    time.get(5..16).unwrap_or(time).to_string()
}

fn buffer_to_text(buf: &Buffer) -> String {
    let width = buf.area.width as usize;
    let mut out = String::new();
    for row in buf.content.chunks(width) {
        let line: String = row.iter().map(|cell| cell.symbol()).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
