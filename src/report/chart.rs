//! Text plots of a group's history and forecast.
//!
//! Legend: `*` observed quantity, `o` forecast, `.` interval band.

use crate::pipeline::ForecastFigure;
use chrono::NaiveDate;
use std::fmt::Write;

const ACTUAL: char = '*';
const FORECAST: char = 'o';
const BAND: char = '.';
const LABEL_WIDTH: usize = 10;

struct Canvas {
    width: usize,
    height: usize,
    start: NaiveDate,
    span_days: f64,
    low: f64,
    high: f64,
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn column(&self, date: NaiveDate) -> usize {
        if self.span_days <= 0.0 {
            return 0;
        }
        let offset = (date - self.start).num_days() as f64 / self.span_days;
        ((offset * (self.width - 1) as f64).round() as usize).min(self.width - 1)
    }

    fn row(&self, value: f64) -> usize {
        let range = self.high - self.low;
        let frac = if range > 0.0 {
            ((value - self.low) / range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        // Row 0 is the top of the plot.
        (self.height - 1) - (frac * (self.height - 1) as f64).round() as usize
    }

    fn put(&mut self, date: NaiveDate, value: f64, mark: char) {
        if !value.is_finite() {
            return;
        }
        let (r, c) = (self.row(value), self.column(date));
        self.cells[r][c] = mark;
    }

    fn band(&mut self, date: NaiveDate, lower: f64, upper: f64) {
        if !(lower.is_finite() && upper.is_finite()) {
            return;
        }
        let c = self.column(date);
        let (top, bottom) = (self.row(upper), self.row(lower));
        for r in top..=bottom {
            if self.cells[r][c] == ' ' {
                self.cells[r][c] = BAND;
            }
        }
    }
}

/// Render `figure` into a `width` x `height` character plot with axis labels.
pub fn render_chart(figure: &ForecastFigure, width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let forecast = &figure.forecast;

    let mut out = String::new();
    let _ = writeln!(out, "{}", figure.title);

    let first = figure
        .actual_dates
        .first()
        .into_iter()
        .chain(forecast.dates().first())
        .min()
        .copied();
    let last = figure
        .actual_dates
        .last()
        .into_iter()
        .chain(forecast.dates().last())
        .max()
        .copied();
    let (start, end) = match (first, last) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            out.push_str("(no data)\n");
            return out;
        }
    };

    let values = figure
        .actual_values
        .iter()
        .chain(forecast.yhat())
        .chain(forecast.lower())
        .chain(forecast.upper())
        .copied()
        .filter(|v| v.is_finite());
    let (low, high) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let mut canvas = Canvas {
        width,
        height,
        start,
        span_days: (end - start).num_days() as f64,
        low,
        high,
        cells: vec![vec![' '; width]; height],
    };

    for (i, &date) in forecast.dates().iter().enumerate() {
        canvas.band(date, forecast.lower()[i], forecast.upper()[i]);
    }
    for (&date, &value) in forecast.dates().iter().zip(forecast.yhat()) {
        canvas.put(date, value, FORECAST);
    }
    for (&date, &value) in figure.actual_dates.iter().zip(&figure.actual_values) {
        canvas.put(date, value, ACTUAL);
    }

    for (r, line) in canvas.cells.iter().enumerate() {
        let label = if r == 0 {
            format!("{high:>w$.1}", w = LABEL_WIDTH)
        } else if r == height - 1 {
            format!("{low:>w$.1}", w = LABEL_WIDTH)
        } else {
            " ".repeat(LABEL_WIDTH)
        };
        let body: String = line.iter().collect();
        let _ = writeln!(out, "{label} |{}", body.trim_end());
    }

    let _ = writeln!(out, "{} +{}", " ".repeat(LABEL_WIDTH), "-".repeat(width));
    let start_label = start.to_string();
    let end_label = end.to_string();
    let gap = (width + 1).saturating_sub(start_label.len() + end_label.len());
    let _ = writeln!(
        out,
        "{}  {start_label}{}{end_label}",
        " ".repeat(LABEL_WIDTH),
        " ".repeat(gap.max(1))
    );
    let _ = writeln!(out, "{ACTUAL} actual   {FORECAST} forecast   {BAND} interval");
    out
}
