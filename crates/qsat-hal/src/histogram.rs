//! Text histograms of measurement counts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::result::Counts;

/// Row order of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramOrder {
    /// Ascending bitstring, like the x axis of a bar chart.
    #[default]
    Bitstring,
    /// Descending count, ties by ascending bitstring.
    Count,
}

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    /// The outcome.
    pub bitstring: String,
    /// Its count.
    pub count: u64,
    /// Its share of all shots.
    pub probability: f64,
    /// Bar length in characters.
    pub bar_len: usize,
    /// Whether the outcome was flagged, e.g. as a satisfying assignment.
    pub marked: bool,
}

/// A bar chart of counts.
#[derive(Debug, Clone)]
pub struct Histogram {
    rows: Vec<HistogramRow>,
    hidden: usize,
    total: u64,
}

impl Histogram {
    /// Default bar width in characters.
    pub const DEFAULT_WIDTH: usize = 40;

    /// Build from counts. Bars are scaled so the largest count spans `width`
    /// characters; `max_rows` keeps only the first rows in `order`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(counts: &Counts, order: HistogramOrder, max_rows: Option<usize>, width: usize) -> Self {
        let total = counts.total_shots();
        let max = counts.iter().map(|(_, c)| c).max().unwrap_or(0);
        let entries = match order {
            HistogramOrder::Bitstring => counts.iter().collect::<Vec<_>>(),
            HistogramOrder::Count => counts.sorted(),
        };
        let keep = max_rows.unwrap_or(entries.len()).min(entries.len());
        let rows = entries[..keep]
            .iter()
            .map(|&(bits, count)| {
                let bar_len = if max == 0 {
                    0
                } else {
                    ((count as f64 / max as f64) * width as f64).round() as usize
                };
                HistogramRow {
                    bitstring: bits.to_string(),
                    count,
                    probability: if total == 0 {
                        0.0
                    } else {
                        count as f64 / total as f64
                    },
                    bar_len: if count > 0 { bar_len.max(1) } else { 0 },
                    marked: false,
                }
            })
            .collect();
        Self {
            rows,
            hidden: entries.len() - keep,
            total,
        }
    }

    /// All outcomes in bitstring order at the default width.
    pub fn from_counts(counts: &Counts) -> Self {
        Self::new(counts, HistogramOrder::Bitstring, None, Self::DEFAULT_WIDTH)
    }

    /// Flag rows whose bitstring satisfies `predicate`.
    pub fn mark_with(mut self, mut predicate: impl FnMut(&str) -> bool) -> Self {
        for row in &mut self.rows {
            row.marked = predicate(&row.bitstring);
        }
        self
    }

    /// Visible rows.
    pub fn rows(&self) -> &[HistogramRow] {
        &self.rows
    }

    /// Outcomes cut off by `max_rows`.
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Total shots behind the chart.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count_width = self
            .rows
            .iter()
            .map(|r| r.count.to_string().len())
            .max()
            .unwrap_or(1);
        for row in &self.rows {
            write!(
                f,
                "{}: {:>count_width$} ({:>5.1}%) {}",
                row.bitstring,
                row.count,
                row.probability * 100.0,
                "█".repeat(row.bar_len)
            )?;
            if row.marked {
                write!(f, " ✓")?;
            }
            writeln!(f)?;
        }
        if self.hidden > 0 {
            writeln!(f, "... {} more outcomes", self.hidden)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Counts {
        [("00", 10), ("01", 40), ("10", 20), ("11", 30)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_bars_scale_to_largest() {
        let hist = Histogram::new(&sample(), HistogramOrder::Bitstring, None, 20);
        let lens: Vec<_> = hist.rows().iter().map(|r| r.bar_len).collect();
        assert_eq!(lens, vec![5, 20, 10, 15]);
        assert_eq!(hist.total(), 100);
    }

    #[test]
    fn test_count_order_and_truncation() {
        let hist = Histogram::new(&sample(), HistogramOrder::Count, Some(2), 10);
        let bits: Vec<_> = hist.rows().iter().map(|r| r.bitstring.as_str()).collect();
        assert_eq!(bits, vec!["01", "11"]);
        assert_eq!(hist.hidden(), 2);
        assert!(hist.to_string().ends_with("... 2 more outcomes\n"));
    }

    #[test]
    fn test_small_counts_still_visible() {
        let counts: Counts = [("0", 1000), ("1", 1)].into_iter().collect();
        let hist = Histogram::from_counts(&counts);
        assert_eq!(hist.rows()[1].bar_len, 1);
    }

    #[test]
    fn test_display_and_marks() {
        let hist = Histogram::new(&sample(), HistogramOrder::Bitstring, None, 4)
            .mark_with(|b| b == "11");
        let text = hist.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "00: 10 ( 10.0%) █");
        assert_eq!(lines[3], "11: 30 ( 30.0%) ███ ✓");
    }

    #[test]
    fn test_empty_counts() {
        let hist = Histogram::from_counts(&Counts::new());
        assert!(hist.rows().is_empty());
        assert_eq!(hist.to_string(), "");
    }
}
