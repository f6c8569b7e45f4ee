//! Aggregate counts shown on the statistics view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Priority, Task};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub name: String,
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    /// Whole percent of completed tasks, truncated. Zero for an empty list.
    pub completion_rate: u8,
    /// One entry per priority, `LOW` first, zero counts included.
    pub by_priority: Vec<PriorityCount>,
    /// Busiest category first, ties broken by name.
    pub by_category: Vec<CategoryStat>,
}

impl TaskStats {
    /// `category_names` are stored categories that should be listed even
    /// when no task uses them.
    pub fn compute(tasks: &[Task], category_names: &[String], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.is_completed).count();
        let overdue = tasks.iter().filter(|task| task.is_overdue(now)).count();

        let completion_rate = if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        };

        let by_priority = Priority::ALL
            .iter()
            .map(|&priority| PriorityCount {
                priority,
                count: tasks.iter().filter(|task| task.priority == priority).count(),
            })
            .collect();

        let names: BTreeSet<&str> = category_names
            .iter()
            .map(String::as_str)
            .chain(tasks.iter().map(|task| task.category.as_str()))
            .collect();

        let mut by_category: Vec<CategoryStat> = names
            .into_iter()
            .map(|name| {
                let in_category = tasks.iter().filter(|task| task.category == name);
                let (total, active) = in_category.fold((0, 0), |(total, active), task| {
                    (total + 1, active + usize::from(!task.is_completed))
                });
                CategoryStat {
                    name: name.to_string(),
                    total,
                    active,
                }
            })
            .collect();
        // Stable sort keeps the alphabetical order from the BTreeSet for ties.
        by_category.sort_by(|a, b| b.total.cmp(&a.total));

        Self {
            total,
            active: total - completed,
            completed,
            overdue,
            completion_rate,
            by_priority,
            by_category,
        }
    }
}
