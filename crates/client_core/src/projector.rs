//! Report -> display rows and ranked font-size distribution.

use shared::protocol::{FontSize, Report};

pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStat {
    pub label: &'static str,
    pub value: String,
}

impl DisplayStat {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Six summary rows in fixed order; absent metrics render as [`PLACEHOLDER`].
pub fn project(report: &Report) -> Vec<DisplayStat> {
    let px = |size: Option<FontSize>| {
        size.map(|size| format!("{size}px"))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    let range = match (report.min_font_size, report.max_font_size) {
        (Some(min), Some(max)) => format!("{min} - {max}px"),
        _ => PLACEHOLDER.to_string(),
    };

    vec![
        DisplayStat::new("Total texts", report.total_texts.to_string()),
        DisplayStat::new("Fitted texts", report.fitted_texts.to_string()),
        DisplayStat::new("Unique font sizes", report.unique_font_sizes.to_string()),
        DisplayStat::new("Average font size", px(report.average_font_size)),
        DisplayStat::new("Most common size", px(report.most_common_size)),
        DisplayStat::new("Font size range", range),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedBucket {
    pub size: FontSize,
    pub count: u64,
    pub percentage: f64,
}

impl RankedBucket {
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    NoData,
    Ranked(Vec<RankedBucket>),
}

impl Distribution {
    pub fn buckets(&self) -> &[RankedBucket] {
        match self {
            Distribution::NoData => &[],
            Distribution::Ranked(buckets) => buckets,
        }
    }
}

/// Buckets by count descending; equal counts keep the order the service sent.
pub fn rank_distribution(report: &Report) -> Distribution {
    let Some(distribution) = report
        .font_size_distribution
        .as_ref()
        .filter(|distribution| !distribution.is_empty())
    else {
        return Distribution::NoData;
    };

    let fitted = report.fitted_texts;
    let mut ranked: Vec<RankedBucket> = distribution
        .buckets()
        .iter()
        .map(|bucket| RankedBucket {
            size: bucket.size,
            count: bucket.count,
            percentage: if fitted == 0 {
                0.0
            } else {
                bucket.count as f64 / fitted as f64 * 100.0
            },
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    Distribution::Ranked(ranked)
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
