//! Pure aggregation functions over employee collections.
//!
//! # Invariants
//! - Averages use round-half-up on exact integer sums.
//! - `average_score` is `0.0` for an empty collection.
//! - Department counts and task sums add up to the collection totals.
//! - Every score falls into exactly one histogram bucket.

use crate::model::employee::Employee;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of records in the collection.
pub fn total_count(records: &[Employee]) -> usize {
    records.len()
}

/// Sum of `tasks_completed` across the collection.
pub fn total_tasks(records: &[Employee]) -> u64 {
    records
        .iter()
        .map(|employee| u64::from(employee.tasks_completed))
        .sum()
}

/// Mean performance score rounded to one decimal place.
///
/// Returns `0.0` for an empty collection.
pub fn average_score(records: &[Employee]) -> f64 {
    rounded_mean(score_sum(records), records.len() as u64, 1)
}

/// Record with the highest score; the first one wins ties.
pub fn top_performer(records: &[Employee]) -> Option<&Employee> {
    records.iter().fold(None, |best, current| match best {
        Some(best) if best.performance_score >= current.performance_score => Some(best),
        _ => Some(current),
    })
}

/// First `n` records by descending score, keeping input order on ties.
pub fn top_n(records: &[Employee], n: usize) -> Vec<Employee> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.performance_score.cmp(&a.performance_score));
    ranked.truncate(n);
    ranked
}

/// Aggregates for one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department: String,
    /// Mean score rounded to two decimal places.
    pub average_score: f64,
    pub total_tasks: u64,
    pub count: usize,
}

/// Groups records by department, in first-appearance order.
pub fn by_department(records: &[Employee]) -> Vec<DepartmentStats> {
    struct Accumulator<'a> {
        department: &'a str,
        score_sum: u64,
        total_tasks: u64,
        count: usize,
    }

    let mut index_by_name: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Accumulator<'_>> = Vec::new();

    for employee in records {
        let index = *index_by_name
            .entry(employee.department.as_str())
            .or_insert_with(|| {
                groups.push(Accumulator {
                    department: employee.department.as_str(),
                    score_sum: 0,
                    total_tasks: 0,
                    count: 0,
                });
                groups.len() - 1
            });
        let group = &mut groups[index];
        group.score_sum += u64::from(employee.performance_score);
        group.total_tasks += u64::from(employee.tasks_completed);
        group.count += 1;
    }

    groups
        .into_iter()
        .map(|group| DepartmentStats {
            department: group.department.to_string(),
            average_score: rounded_mean(group.score_sum, group.count as u64, 2),
            total_tasks: group.total_tasks,
            count: group.count,
        })
        .collect()
}

/// Fixed performance score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBucket {
    /// 90..=100
    Excellent,
    /// 80..=89
    Good,
    /// 70..=79
    Average,
    /// Below 70.
    NeedsImprovement,
}

impl ScoreBucket {
    /// Buckets from best to worst.
    pub const ALL: [ScoreBucket; 4] = [
        ScoreBucket::Excellent,
        ScoreBucket::Good,
        ScoreBucket::Average,
        ScoreBucket::NeedsImprovement,
    ];

    /// Returns the bucket containing `score`.
    pub fn for_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            80..=89 => Self::Good,
            70..=79 => Self::Average,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent (90-100)",
            Self::Good => "Good (80-89)",
            Self::Average => "Average (70-79)",
            Self::NeedsImprovement => "Needs Improvement (<70)",
        }
    }
}

/// Record count for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: ScoreBucket,
    pub count: usize,
}

/// Counts records per score bucket, best bucket first.
///
/// All four buckets are always present, including empty ones.
pub fn score_histogram(records: &[Employee]) -> Vec<BucketCount> {
    let mut counts = [0_usize; ScoreBucket::ALL.len()];
    for employee in records {
        let bucket = ScoreBucket::for_score(employee.performance_score);
        // ALL is declared in enum order.
        counts[bucket as usize] += 1;
    }

    ScoreBucket::ALL
        .iter()
        .zip(counts)
        .map(|(&bucket, count)| BucketCount { bucket, count })
        .collect()
}

/// Headline figures for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub total_tasks: u64,
    pub average_score: f64,
    pub top_performer: Option<Employee>,
    /// Leading records of the input, used as the recent activity list.
    pub recent: Vec<Employee>,
    pub histogram: Vec<BucketCount>,
}

/// Builds the dashboard summary; `recent` caps the activity list length.
pub fn dashboard_summary(records: &[Employee], recent: usize) -> DashboardSummary {
    DashboardSummary {
        total_employees: total_count(records),
        total_tasks: total_tasks(records),
        average_score: average_score(records),
        top_performer: top_performer(records).cloned(),
        recent: records.iter().take(recent).cloned().collect(),
        histogram: score_histogram(records),
    }
}

/// Figures for the performance statistics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub departments: Vec<DepartmentStats>,
    pub top_performers: Vec<Employee>,
}

/// Builds the statistics page figures with the `top` best performers.
pub fn performance_stats(records: &[Employee], top: usize) -> PerformanceStats {
    PerformanceStats {
        departments: by_department(records),
        top_performers: top_n(records, top),
    }
}

fn score_sum(records: &[Employee]) -> u64 {
    records
        .iter()
        .map(|employee| u64::from(employee.performance_score))
        .sum()
}

/// `sum / count` rounded half-up to `decimals` places, computed on integers.
fn rounded_mean(sum: u64, count: u64, decimals: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let scale = 10_u64.pow(decimals);
    let scaled = (2 * sum * scale + count) / (2 * count);
    scaled as f64 / scale as f64
}

#[cfg(test)]
mod tests {
    use super::{rounded_mean, ScoreBucket};

    #[test]
    fn rounded_mean_rounds_half_up() {
        assert_eq!(rounded_mean(365, 4, 1), 91.3);
        assert_eq!(rounded_mean(356, 4, 2), 89.0);
        assert_eq!(rounded_mean(2, 3, 2), 0.67);
        assert_eq!(rounded_mean(1, 8, 2), 0.13);
        assert_eq!(rounded_mean(0, 0, 1), 0.0);
    }

    #[test]
    fn bucket_boundaries_are_inclusive() {
        assert_eq!(ScoreBucket::for_score(100), ScoreBucket::Excellent);
        assert_eq!(ScoreBucket::for_score(90), ScoreBucket::Excellent);
        assert_eq!(ScoreBucket::for_score(89), ScoreBucket::Good);
        assert_eq!(ScoreBucket::for_score(80), ScoreBucket::Good);
        assert_eq!(ScoreBucket::for_score(79), ScoreBucket::Average);
        assert_eq!(ScoreBucket::for_score(70), ScoreBucket::Average);
        assert_eq!(ScoreBucket::for_score(69), ScoreBucket::NeedsImprovement);
        assert_eq!(ScoreBucket::for_score(0), ScoreBucket::NeedsImprovement);
    }

    #[test]
    fn bucket_order_matches_enum_discriminants() {
        for (index, bucket) in ScoreBucket::ALL.iter().enumerate() {
            assert_eq!(*bucket as usize, index);
        }
    }
}
