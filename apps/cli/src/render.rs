//! Plain-text and JSON rendering of a finished session.

use std::fmt::Write as _;

use client_core::{AnalysisResult, DisplayStat, Distribution, ViewController};
use serde::Serialize;
use shared::domain::ViewKind;

#[derive(Debug, Serialize)]
pub struct StatRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BucketRow {
    pub size: String,
    pub count: u64,
    pub percentage: String,
}

#[derive(Debug, Serialize)]
pub struct ViewRow<'a> {
    pub view: ViewKind,
    pub url: &'a str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<&'a str>,
    pub stats: Vec<StatRow<'a>>,
    /// `None` renders the no-data placeholder.
    pub distribution: Option<Vec<BucketRow>>,
    pub views: Vec<ViewRow<'a>>,
}

pub fn document<'a>(
    result: &'a AnalysisResult,
    stats: &'a [DisplayStat],
    distribution: &Distribution,
    view: &ViewController,
) -> ResultDocument<'a> {
    let distribution = match distribution {
        Distribution::NoData => None,
        Distribution::Ranked(buckets) => Some(
            buckets
                .iter()
                .map(|bucket| BucketRow {
                    size: format!("{}px", bucket.size),
                    count: bucket.count,
                    percentage: bucket.percentage_label(),
                })
                .collect(),
        ),
    };

    ResultDocument {
        task_id: result.task_id.as_ref().map(|task_id| task_id.0.as_str()),
        stats: stats
            .iter()
            .map(|stat| StatRow {
                label: stat.label,
                value: &stat.value,
            })
            .collect(),
        distribution,
        views: result
            .images
            .iter()
            .map(|(kind, url)| ViewRow {
                view: kind,
                url,
                active: view.is_active(kind),
            })
            .collect(),
    }
}

pub fn text(doc: &ResultDocument<'_>) -> String {
    let mut out = String::new();
    if let Some(task_id) = doc.task_id {
        let _ = writeln!(out, "task: {task_id}");
    }

    let _ = writeln!(out, "\nstatistics");
    let width = doc
        .stats
        .iter()
        .map(|row| row.label.len())
        .max()
        .unwrap_or_default();
    for row in &doc.stats {
        let _ = writeln!(out, "  {:<width$}  {}", row.label, row.value);
    }

    let _ = writeln!(out, "\nfont size distribution");
    match &doc.distribution {
        None => {
            let _ = writeln!(out, "  no data");
        }
        Some(rows) => {
            for row in rows {
                let _ = writeln!(
                    out,
                    "  {:>8}  {:>6}  {:>4} occurrences",
                    row.size, row.percentage, row.count
                );
            }
        }
    }

    let _ = writeln!(out, "\nviews");
    for row in &doc.views {
        let marker = if row.active { '*' } else { ' ' };
        let _ = writeln!(out, " {marker}{:<14} {}", row.view.as_str(), row.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{
        project, rank_distribution, ClientSettings, ResolvedImages, ViewController,
    };
    use shared::{
        domain::TaskId,
        protocol::{ImagePaths, Report},
    };

    fn result(report: Report) -> AnalysisResult {
        let paths = ImagePaths {
            normalized: "/api/image/a_normalized.jpg".to_string(),
            ocr_detection: "/api/image/a_ocr_detection.jpg".to_string(),
            overlay: "/api/image/a_overlay.jpg".to_string(),
            annotated: "/api/image/a_annotated.jpg".to_string(),
        };
        AnalysisResult {
            task_id: Some(TaskId("a".to_string())),
            report,
            images: ResolvedImages::resolve(&paths, &ClientSettings::default()),
        }
    }

    #[test]
    fn text_marks_active_view_and_ranks_buckets() {
        let report: Report = serde_json::from_str(
            r#"{"total_texts":10,"fitted_texts":8,"unique_font_sizes":3,
                "font_size_distribution":{"14":4,"10":2,"18":2}}"#,
        )
        .expect("report");
        let result = result(report);
        let stats = project(&result.report);
        let distribution = rank_distribution(&result.report);
        let mut view = ViewController::default();
        view.select_view(ViewKind::Overlay);

        let rendered = text(&document(&result, &stats, &distribution, &view));
        assert!(rendered.contains("*overlay"));
        assert!(rendered.contains(" normalized"));
        let first = rendered.find("14px").expect("14px row");
        let second = rendered.find("10px").expect("10px row");
        assert!(first < second);
        assert!(rendered.contains("50.0%"));
    }

    #[test]
    fn json_uses_null_distribution_for_no_data() {
        let result = result(Report::default());
        let stats = project(&result.report);
        let distribution = rank_distribution(&result.report);
        let view = ViewController::default();

        let doc = document(&result, &stats, &distribution, &view);
        let value = serde_json::to_value(&doc).expect("json");
        assert!(value["distribution"].is_null());
        assert_eq!(value["views"][0]["view"], "normalized");
        assert_eq!(value["views"][0]["active"], true);
        assert!(text(&doc).contains("no data"));
    }
}
