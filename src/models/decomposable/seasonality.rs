//! Fourier-series seasonal components.

use std::f64::consts::PI;

/// Variance below which a feature column carries no information.
const MIN_FEATURE_VARIANCE: f64 = 1e-10;

/// A named periodic component expressed as a truncated Fourier series.
#[derive(Debug, Clone, PartialEq)]
pub struct Seasonality {
    pub name: String,
    /// Period in days.
    pub period: f64,
    pub fourier_order: usize,
}

impl Seasonality {
    pub fn new(name: impl Into<String>, period: f64, fourier_order: usize) -> Self {
        Self {
            name: name.into(),
            period,
            fourier_order,
        }
    }

    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    pub fn daily() -> Self {
        Self::new("daily", 1.0, 4)
    }

    /// Monthly component with a 30.5 day period.
    pub fn monthly(fourier_order: usize) -> Self {
        Self::new("monthly", 30.5, fourier_order)
    }

    /// All sine/cosine terms of this component.
    pub fn terms(&self) -> Vec<FourierTerm> {
        (1..=self.fourier_order)
            .flat_map(|harmonic| {
                [
                    FourierTerm {
                        period: self.period,
                        harmonic,
                        kind: TermKind::Sin,
                    },
                    FourierTerm {
                        period: self.period,
                        harmonic,
                        kind: TermKind::Cos,
                    },
                ]
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Sin,
    Cos,
}

/// A single Fourier basis function of time in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierTerm {
    pub period: f64,
    pub harmonic: usize,
    pub kind: TermKind,
}

impl FourierTerm {
    pub fn value(&self, day: f64) -> f64 {
        let x = 2.0 * PI * self.harmonic as f64 * day / self.period;
        match self.kind {
            TermKind::Sin => x.sin(),
            TermKind::Cos => x.cos(),
        }
    }

    pub fn column(&self, days: &[f64]) -> Vec<f64> {
        days.iter().map(|&d| self.value(d)).collect()
    }
}

/// Build feature columns for every term, dropping columns with no variance.
///
/// A term is dropped when it is constant over `days`: a daily component
/// sampled once per day is the typical case. Returns the kept terms with
/// their columns in matching order.
pub fn informative_terms(
    seasonalities: &[Seasonality],
    days: &[f64],
) -> (Vec<FourierTerm>, Vec<Vec<f64>>) {
    let mut terms = Vec::new();
    let mut columns = Vec::new();

    for term in seasonalities.iter().flat_map(|s| s.terms()) {
        let column = term.column(days);
        if column_variance(&column) > MIN_FEATURE_VARIANCE {
            terms.push(term);
            columns.push(column);
        }
    }

    (terms, columns)
}

fn column_variance(column: &[f64]) -> f64 {
    if column.len() < 2 {
        return 0.0;
    }
    let n = column.len() as f64;
    let mean = column.iter().sum::<f64>() / n;
    column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
