use crate::model::ListingRecord;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

// ASCII only: other scripts' decimal digits are not numbers here
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit regex must compile"));

pub fn numeric_price(text: &str) -> Option<f64> {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn ages(text: &str) -> Vec<u32> {
    DIGITS
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .collect()
}

pub fn is_free(price: &str, marker: &str) -> bool {
    price.to_lowercase().contains(&marker.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total: usize,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub free: usize,
    pub organizers: usize,
}

impl Summary {
    pub fn compute(records: &[ListingRecord], free_marker: &str) -> Self {
        let prices: Vec<f64> = records.iter().filter_map(|r| numeric_price(&r.price)).collect();
        let organizers: HashSet<&str> = records.iter().map(|r| r.organizer.as_str()).collect();

        Self {
            total: records.len(),
            avg_price: mean(&prices),
            min_price: prices.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_price: prices.iter().copied().reduce(f64::max).unwrap_or(0.0),
            free: records
                .iter()
                .filter(|r| is_free(&r.price, free_marker))
                .count(),
            organizers: organizers.len(),
        }
    }

    pub fn render(&self, currency: &str) -> String {
        let mut out = String::new();
        out.push_str("Summer Camps Summary\n");
        out.push_str("===================\n\n");
        out.push_str(&format!("Total Camps: {}\n", self.total));
        out.push_str(&format!("Average Price: {:.2}{currency}\n", self.avg_price));
        out.push_str(&format!(
            "Price Range: {:.2}{currency} - {:.2}{currency}\n",
            self.min_price, self.max_price
        ));
        out.push_str(&format!("Free Camps: {}\n", self.free));
        out.push_str(&format!("Unique Organizers: {}\n", self.organizers));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub quartiles: [f64; 3],
    pub outliers: Vec<f64>,
}

impl PriceStats {
    pub fn compute(records: &[ListingRecord]) -> Self {
        let prices: Vec<f64> = records.iter().filter_map(|r| numeric_price(&r.price)).collect();
        Self::from_values(&prices)
    }

    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let q2 = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low = q1 - 1.5 * iqr;
        let high = q3 + 1.5 * iqr;

        Self {
            mean: mean(values),
            median: q2,
            std_dev: population_std(values),
            quartiles: [q1, q2, q3],
            // input order, as the prices appear in the records
            outliers: values
                .iter()
                .copied()
                .filter(|v| *v < low || *v > high)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgeStats {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    pub most_common: u32,
}

impl AgeStats {
    pub fn compute(records: &[ListingRecord]) -> Self {
        let samples: Vec<u32> = records.iter().flat_map(|r| ages(&r.age_group)).collect();
        Self::from_samples(&samples)
    }

    pub fn from_samples(samples: &[u32]) -> Self {
        let (Some(min), Some(max)) = (samples.iter().min(), samples.iter().max()) else {
            return Self::default();
        };

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for age in samples {
            *counts.entry(*age).or_default() += 1;
        }
        // ties resolve to the youngest age
        let most_common = counts
            .iter()
            .fold((0u32, 0usize), |best, (age, count)| {
                if *count > best.1 { (*age, *count) } else { best }
            })
            .0;

        let as_f64: Vec<f64> = samples.iter().map(|v| f64::from(*v)).collect();
        Self {
            mean: mean(&as_f64),
            min: *min,
            max: *max,
            most_common,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// linear interpolation between closest ranks
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}
