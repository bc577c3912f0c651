use super::*;

fn sample_report() -> Report {
    serde_json::from_str(
        r#"{
            "total_texts": 10,
            "fitted_texts": 8,
            "unique_font_sizes": 3,
            "average_font_size": 14.5,
            "most_common_size": 14,
            "min_font_size": 10,
            "max_font_size": 18,
            "font_size_distribution": {"14": 4, "10": 2, "18": 2}
        }"#,
    )
    .expect("report")
}

#[test]
fn projects_six_rows_in_fixed_order() {
    let stats = project(&sample_report());

    let values: Vec<&str> = stats.iter().map(|stat| stat.value.as_str()).collect();
    assert_eq!(values, vec!["10", "8", "3", "14.5px", "14px", "10 - 18px"]);

    let labels: Vec<&str> = stats.iter().map(|stat| stat.label).collect();
    assert_eq!(
        labels,
        vec![
            "Total texts",
            "Fitted texts",
            "Unique font sizes",
            "Average font size",
            "Most common size",
            "Font size range"
        ]
    );
}

#[test]
fn absent_metrics_render_placeholder() {
    let report = Report {
        total_texts: 5,
        ..Report::default()
    };

    let values: Vec<String> = project(&report).into_iter().map(|stat| stat.value).collect();
    assert_eq!(values, vec!["5", "0", "0", "N/A", "N/A", "N/A"]);
}

#[test]
fn range_needs_both_bounds() {
    let report = Report {
        min_font_size: Some(FontSize(12.0)),
        ..Report::default()
    };
    assert_eq!(project(&report)[5].value, PLACEHOLDER);
}

#[test]
fn ranks_by_count_and_keeps_tie_order() {
    let ranked = rank_distribution(&sample_report());

    let rows: Vec<(String, u64, String)> = ranked
        .buckets()
        .iter()
        .map(|bucket| (bucket.size.to_string(), bucket.count, bucket.percentage_label()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("14".to_string(), 4, "50.0%".to_string()),
            ("10".to_string(), 2, "25.0%".to_string()),
            ("18".to_string(), 2, "25.0%".to_string()),
        ]
    );
}

#[test]
fn tie_order_follows_service_order_not_numeric_order() {
    let report: Report = serde_json::from_str(
        r#"{"fitted_texts": 6, "font_size_distribution": {"18": 2, "12": 1, "10": 2, "24": 1}}"#,
    )
    .expect("report");

    let sizes: Vec<String> = rank_distribution(&report)
        .buckets()
        .iter()
        .map(|bucket| bucket.size.to_string())
        .collect();
    assert_eq!(sizes, vec!["18", "10", "12", "24"]);
}

#[test]
fn ranking_is_sorted_permutation_with_full_percentage() {
    let inputs: [&[(f64, u64)]; 4] = [
        &[(12.0, 3), (14.0, 7), (16.0, 1)],
        &[(9.0, 1), (10.0, 1), (11.0, 1)],
        &[(20.0, 5)],
        &[(8.0, 2), (30.0, 9), (12.5, 4), (14.0, 9), (16.0, 0)],
    ];

    for input in inputs {
        let distribution: shared::protocol::FontSizeDistribution =
            input.iter().copied().collect();
        let report = Report {
            fitted_texts: distribution.total_count(),
            font_size_distribution: Some(distribution),
            ..Report::default()
        };

        let ranked = rank_distribution(&report);
        let buckets = ranked.buckets();
        assert_eq!(buckets.len(), input.len());
        assert!(buckets.windows(2).all(|pair| pair[0].count >= pair[1].count));
        for (size, count) in input {
            assert!(buckets
                .iter()
                .any(|bucket| bucket.size.0 == *size && bucket.count == *count));
        }
        let total: f64 = buckets.iter().map(|bucket| bucket.percentage).sum();
        assert!((total - 100.0).abs() < 0.01, "total was {total}");
    }
}

#[test]
fn zero_fitted_with_empty_distribution_shows_no_data() {
    let report: Report = serde_json::from_str(
        r#"{"total_texts": 3, "fitted_texts": 0, "font_size_distribution": {}}"#,
    )
    .expect("report");

    assert_eq!(rank_distribution(&report), Distribution::NoData);
    assert!(rank_distribution(&Report::default()).buckets().is_empty());
}

#[test]
fn zero_fitted_with_buckets_does_not_divide_by_zero() {
    let report = Report {
        fitted_texts: 0,
        font_size_distribution: Some([(12.0, 2)].into_iter().collect()),
        ..Report::default()
    };

    let ranked = rank_distribution(&report);
    assert_eq!(ranked.buckets()[0].percentage_label(), "0.0%");
}
