//! Batch validation of contest configuration
//!
//! Every check collects all problems before failing so a caller can fix a
//! whole payload in one round trip.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;

use crate::models::StageKind;

/// Validate a full replacement set of stage windows.
///
/// Each window needs start <= end (a single-day window is fine), each stage may appear once, and no two
/// windows may share a day. Every pair is compared, not only neighbours.
pub fn validate_stage_windows(windows: &[(StageKind, NaiveDate, NaiveDate)]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for (stage, start, end) in windows {
        if start > end {
            problems.push(format!(
                "stage {}: start date {} is after end date {}",
                stage, start, end
            ));
        }
    }

    for stage in duplicates(windows.iter().map(|(stage, _, _)| *stage)) {
        problems.push(format!("stage {} is listed more than once", stage));
    }

    for (i, (stage_a, start_a, end_a)) in windows.iter().enumerate() {
        for (stage_b, start_b, end_b) in &windows[i + 1..] {
            // Inclusive ranges share a day when each starts no later than the other ends
            if start_a <= end_b && start_b <= end_a {
                problems.push(format!(
                    "stage {} ({} to {}) overlaps stage {} ({} to {})",
                    stage_a, start_a, end_a, stage_b, start_b, end_b
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Validate criteria items: non-empty unique names and 0 <= min <= max
pub fn validate_criteria(items: &[(String, i32, i32)]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for (name, min_points, max_points) in items {
        if name.trim().is_empty() {
            problems.push("criterion name must not be empty".to_string());
            continue;
        }
        if *min_points < 0 {
            problems.push(format!("criterion {}: min_points must not be negative", name));
        }
        if min_points > max_points {
            problems.push(format!(
                "criterion {}: min_points {} exceeds max_points {}",
                name, min_points, max_points
            ));
        }
    }

    for name in duplicates(items.iter().map(|(name, _, _)| name.as_str())) {
        problems.push(format!("criterion {} is listed more than once", name));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Validate nomination names: non-empty and unique
pub fn validate_nominations(names: &[String]) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if names.iter().any(|name| name.trim().is_empty()) {
        problems.push("nomination name must not be empty".to_string());
    }
    for name in duplicates(names.iter().map(String::as_str)) {
        problems.push(format!("nomination {} is listed more than once", name));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Values that occur more than once, in order of their second occurrence
pub fn duplicates<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut repeated = Vec::new();
    let mut reported = HashSet::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        *count += 1;
        if *count > 1 && reported.insert(value.clone()) {
            repeated.push(value);
        }
    }

    repeated
}
