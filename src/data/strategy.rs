//! Missing-value strategies.
//!
//! Each strategy works on one column at a time and only ever sees that
//! column's own values.

use super::cleaner::CleanerError;
use statrs::statistics::{Data, Median, Statistics};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Rule for synthesizing replacements for absent numeric observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MissingStrategy {
    #[default]
    Mean,
    Median,
    /// Most frequent value; the smallest one wins a tie.
    Mode,
    /// Carry the last seen value forward. A leading gap takes the first value.
    ForwardFill,
    /// Carry the next value backward. A trailing gap takes the last value.
    BackwardFill,
}

impl MissingStrategy {
    pub const ALL: [MissingStrategy; 5] = [
        MissingStrategy::Mean,
        MissingStrategy::Median,
        MissingStrategy::Mode,
        MissingStrategy::ForwardFill,
        MissingStrategy::BackwardFill,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::Mode => "mode",
            MissingStrategy::ForwardFill => "forward_fill",
            MissingStrategy::BackwardFill => "backward_fill",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name()).collect()
    }

    /// Single replacement value for the value-based strategies.
    ///
    /// Returns `None` for the positional fills and when the column has no
    /// observed values at all.
    pub fn fill_value(self, values: &[Option<f64>]) -> Option<f64> {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        match self {
            MissingStrategy::Mean => mean(&present),
            MissingStrategy::Median => median(present),
            MissingStrategy::Mode => mode(&present).or_else(|| mean(&present)),
            MissingStrategy::ForwardFill | MissingStrategy::BackwardFill => None,
        }
    }

    /// Fill every missing slot of a column.
    ///
    /// A column with no observed values is returned unchanged.
    pub fn fill(self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        match self {
            MissingStrategy::ForwardFill => backward_pass(&forward_pass(values)),
            MissingStrategy::BackwardFill => forward_pass(&backward_pass(values)),
            _ => match self.fill_value(values) {
                Some(fill) => values.iter().map(|v| Some(v.unwrap_or(fill))).collect(),
                None => values.to_vec(),
            },
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MissingStrategy {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| CleanerError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

fn median(values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values).median())
}

fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &v in values {
        // -0.0 and 0.0 are the same observation
        let v = if v == 0.0 { 0.0 } else { v };
        *counts.entry(v.to_bits()).or_default() += 1;
    }

    let mut best: Option<(usize, f64)> = None;
    for (bits, count) in counts {
        let value = f64::from_bits(bits);
        best = match best {
            Some((best_count, best_value))
                if best_count > count || (best_count == count && best_value <= value) =>
            {
                Some((best_count, best_value))
            }
            _ => Some((count, value)),
        };
    }
    best.map(|(_, value)| value)
}

fn forward_pass(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

fn backward_pass(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next = None;
    let mut filled: Vec<Option<f64>> = values
        .iter()
        .rev()
        .map(|v| {
            if v.is_some() {
                next = *v;
            }
            next
        })
        .collect();
    filled.reverse();
    filled
}
