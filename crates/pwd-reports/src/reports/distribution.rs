use serde::Serialize;
use std::collections::HashMap;

/// Label for records whose category field is missing, e.g. an unknown barangay.
pub const UNKNOWN: &str = "Unknown";
/// Label for optional descriptive fields left blank, e.g. disability type.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Counts records per category label, most frequent first.
///
/// Labels compare by exact, case-sensitive equality. A `None` or blank label is
/// counted under `fallback`. Ties keep the order in which categories were first seen.
pub fn distribution<'a, R, I, F>(records: I, classify: F, fallback: &str) -> Vec<CategoryCount>
where
    R: 'a + ?Sized,
    I: IntoIterator<Item = &'a R>,
    F: Fn(&'a R) -> Option<&'a str>,
{
    distribution_of_labels(records.into_iter().map(classify), fallback)
}

/// Same as [`distribution`] over labels that were already extracted, which lets a
/// record contribute to several categories.
pub fn distribution_of_labels<'a, I>(labels: I, fallback: &str) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for label in labels {
        let label = match label {
            Some(value) if !value.trim().is_empty() => value,
            _ => fallback,
        };
        match index.get(label) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(label.to_string(), counts.len());
                counts.push(CategoryCount {
                    category: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Counts labels against a fixed category list, keeping that order and zero-filling.
/// Labels outside the list are ignored.
pub fn fixed_order_counts<'a, I>(categories: &[&str], labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<CategoryCount> = categories
        .iter()
        .map(|category| CategoryCount {
            category: (*category).to_string(),
            count: 0,
        })
        .collect();

    for label in labels {
        if let Some(entry) = counts.iter_mut().find(|entry| entry.category == label) {
            entry.count += 1;
        }
    }

    counts
}

/// Percentage of `total`, or 0 when there is nothing to divide by.
pub fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn shares(counts: &[CategoryCount]) -> Vec<CategoryShare> {
    let total: usize = counts.iter().map(|entry| entry.count).sum();
    counts
        .iter()
        .map(|entry| CategoryShare {
            category: entry.category.clone(),
            count: entry.count,
            percentage: percentage_of(entry.count, total),
        })
        .collect()
}
