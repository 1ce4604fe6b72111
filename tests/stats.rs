mod common;

use camp_scrape::stats::{AgeStats, PriceStats, Summary, ages, is_free, numeric_price};
use common::record;

#[test]
fn price_text_yields_first_digit_run() {
    assert_eq!(numeric_price("50€"), Some(50.0));
    assert_eq!(numeric_price("nuo 120 Eur, su nuolaida 90"), Some(120.0));
    assert_eq!(numeric_price("Nemokama"), None);
    assert_eq!(numeric_price("–"), None);
}

#[test]
fn only_ascii_digits_count_and_only_the_first_run_is_read() {
    assert_eq!(numeric_price("٥٠ €"), None);
    assert_eq!(numeric_price("٥٠ arba 60 €"), Some(60.0));
    assert_eq!(numeric_price("99999999999999999999 arba 60"), Some(1e20));
    assert!(ages("٧-١٢ metų").is_empty());
    assert_eq!(ages("٧-12"), vec![12]);
}

#[test]
fn age_text_yields_every_digit_run() {
    assert_eq!(ages("7-12"), vec![7, 12]);
    assert_eq!(ages("nuo 6 metų"), vec![6]);
    assert!(ages("–").is_empty());
}

#[test]
fn free_marker_matches_case_insensitively() {
    let records = vec![
        record("A", "Org", "6-9", "Nemokama"),
        record("B", "Org", "6-9", "NEMOKAMA renginio metu"),
        record("C", "Org", "6-9", "100 €"),
    ];

    assert!(is_free("Nemokama", "nemokama"));
    assert!(!is_free("100 €", "nemokama"));
    assert_eq!(Summary::compute(&records, "nemokama").free, 2);
}

#[test]
fn summary_over_non_numeric_prices_is_zeroed() {
    let records = vec![
        record("A", "Org A", "–", "Nemokama"),
        record("B", "Org B", "–", "–"),
    ];

    let summary = Summary::compute(&records, "nemokama");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.avg_price, 0.0);
    assert_eq!(summary.min_price, 0.0);
    assert_eq!(summary.max_price, 0.0);
    assert_eq!(summary.organizers, 2);
    assert!(summary.render("€").contains("Average Price: 0.00€\n"));
}

#[test]
fn price_stats_over_non_numeric_prices_are_defined() {
    let records = vec![
        record("A", "Org", "–", "Nemokama"),
        record("B", "Org", "–", "kaina derinama"),
    ];

    let stats = PriceStats::compute(&records);

    assert_eq!(stats, PriceStats::default());
    assert_eq!(stats.quartiles, [0.0, 0.0, 0.0]);
    assert!(stats.outliers.is_empty());
    assert_eq!(PriceStats::compute(&[]), PriceStats::default());
}

#[test]
fn quartiles_interpolate_between_ranks() {
    let stats = PriceStats::from_values(&[4.0, 1.0, 3.0, 2.0]);

    assert_eq!(stats.quartiles, [1.75, 2.5, 3.25]);
    assert_eq!(stats.median, 2.5);
    assert_eq!(stats.mean, 2.5);
    assert!((stats.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
    assert!(stats.outliers.is_empty());
}

#[test]
fn interquartile_rule_flags_outliers() {
    let stats = PriceStats::from_values(&[10.0, 1000.0, 20.0, 30.0, 40.0]);

    assert_eq!(stats.quartiles, [20.0, 30.0, 40.0]);
    assert_eq!(stats.outliers, vec![1000.0]);
}

#[test]
fn age_stats_count_both_range_ends() {
    let records = vec![
        record("A", "Org", "7-12", "50€"),
        record("B", "Org", "5-9", "50€"),
        record("C", "Org", "–", "50€"),
    ];

    let stats = AgeStats::compute(&records);

    assert_eq!(stats.mean, 8.25);
    assert_eq!(stats.min, 5);
    assert_eq!(stats.max, 12);
    assert_eq!(stats.most_common, 5);
    assert_eq!(AgeStats::compute(&[]), AgeStats::default());
}
