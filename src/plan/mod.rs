//! Weekly plan built from a goal graph
//!
//! A goal graph lists goals and the projects serving them. Every open
//! project of a known goal becomes a task of the weekly plan; a plan
//! suggested earlier (e.g. by a language model) decides the order and
//! selection where it references known projects.
//!
//! # Example
//! ```
//! use obsidian_journal::plan::{GoalGraph, build_weekly_plan};
//!
//! let graph: GoalGraph = serde_yml::from_str(
//!     r#"
//! goals:
//!   - name: Health
//! projects:
//!   - id: run-10k
//!     name: Run 10k
//!     goal: Health
//!     target: "2026-06"
//!   - name: Old diet
//!     goal: Health
//!     status: Done
//! "#,
//! )
//! .unwrap();
//!
//! let plan = build_weekly_plan(Some(&graph), &[]);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].goal, "Health");
//! assert_eq!(plan[0].tasks, ["#project [[run-10k]] 2026-06"]);
//! ```

mod render;

pub use render::{render_weekly_tasks, strip_legacy_markers, upsert_weekly_tasks};

use crate::note::normalize_tasks;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Project statuses that exclude a project from planning, compared lowercase
pub const DONE_STATUSES: [&str; 4] = ["done", "completed", "finish", "finished"];

/// Goal of the goal graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goal {
    /// Goal name, referenced by [`Project::goal`]
    pub name: String,
}

/// Project serving a goal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Stable id, usually the project note name
    pub id: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Free-form status
    pub status: Option<String>,

    /// Name of the goal this project serves
    pub goal: Option<String>,

    /// Target, e.g. a deadline
    pub target: Option<String>,
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

impl Project {
    /// Whether the status is one of [`DONE_STATUSES`]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| DONE_STATUSES.contains(&status.trim().to_lowercase().as_str()))
    }

    /// `name (target)`, or `name` without a target
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let name = non_empty(self.name.as_deref())?;

        Some(match non_empty(self.target.as_deref()) {
            Some(target) => format!("{name} ({target})"),
            None => name.to_string(),
        })
    }

    /// Task text linking the project note: `#project [[id]] target`
    ///
    /// Falls back to the name when there is no id.
    #[must_use]
    pub fn task_ref(&self) -> Option<String> {
        let link = non_empty(self.id.as_deref()).or_else(|| non_empty(self.name.as_deref()))?;
        let mut text = format!("#project [[{link}]]");

        if let Some(target) = non_empty(self.target.as_deref()) {
            text.push(' ');
            text.push_str(target);
        }

        Some(text)
    }
}

/// Goals and projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalGraph {
    /// All goals
    pub goals: Vec<Goal>,

    /// All projects
    pub projects: Vec<Project>,
}

/// One goal of the weekly plan with its tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyPlanEntry {
    /// Goal name
    pub goal: String,

    /// Task lines, without checkbox
    pub tasks: Vec<String>,
}

impl WeeklyPlanEntry {
    /// Create entry
    pub fn new<I>(goal: impl Into<String>, tasks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            goal: goal.into(),
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }
}

struct PlannedProject<'g> {
    project: &'g Project,
    label: String,
    task: String,
}

impl PlannedProject<'_> {
    /// Whether `text` names this project by name, label or id
    fn is_named(&self, text: &str) -> bool {
        non_empty(self.project.name.as_deref()) == Some(text)
            || self.label == text
            || non_empty(self.project.id.as_deref()) == Some(text)
    }
}

/// Open projects grouped by goal, goals in order of first appearance
fn projects_by_goal(graph: &GoalGraph) -> Vec<(&str, Vec<PlannedProject<'_>>)> {
    let goals = graph
        .goals
        .iter()
        .map(|goal| goal.name.as_str())
        .collect::<HashSet<_>>();

    let mut grouped: Vec<(&str, Vec<PlannedProject<'_>>)> = Vec::new();
    let mut index = HashMap::new();

    for project in &graph.projects {
        if project.is_done() {
            continue;
        }

        let Some(goal) = project.goal.as_deref().filter(|goal| goals.contains(goal)) else {
            continue;
        };

        let (Some(label), Some(task)) = (project.label(), project.task_ref()) else {
            continue;
        };

        let slot = *index.entry(goal).or_insert_with(|| {
            grouped.push((goal, Vec::new()));
            grouped.len() - 1
        });

        grouped[slot].1.push(PlannedProject {
            project,
            label,
            task,
        });
    }

    grouped
}

/// Build the weekly plan from open projects
///
/// Entries of `prior` come first when their goal has open projects; their
/// tasks are kept only if they name such a project (by name, label or id)
/// and are replaced by the project's task reference. Remaining goals follow
/// with all their open projects. Goals without tasks are left out, and a
/// goal appears at most once.
#[must_use]
pub fn build_weekly_plan(graph: Option<&GoalGraph>, prior: &[WeeklyPlanEntry]) -> Vec<WeeklyPlanEntry> {
    let Some(graph) = graph else {
        return Vec::new();
    };

    let grouped = projects_by_goal(graph);
    let mut plan = Vec::new();
    let mut used = HashSet::new();

    for entry in prior {
        let goal = entry.goal.trim();
        let Some((goal, projects)) = grouped.iter().find(|(name, _)| *name == goal) else {
            continue;
        };

        if used.contains(goal) {
            continue;
        }

        let tasks = normalize_tasks(entry.tasks.iter().filter_map(|raw| {
            let raw = raw.trim();
            projects
                .iter()
                .find(|project| project.is_named(raw))
                .map(|project| project.task.as_str())
        }));

        if !tasks.is_empty() {
            used.insert(*goal);
            plan.push(WeeklyPlanEntry::new(*goal, tasks));
        }
    }

    for (goal, projects) in &grouped {
        if used.contains(goal) {
            continue;
        }

        let tasks = normalize_tasks(projects.iter().map(|project| project.task.as_str()));
        if !tasks.is_empty() {
            plan.push(WeeklyPlanEntry::new(*goal, tasks));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(goals = plan.len(), "Weekly plan built");

    plan
}
