use super::WeeklyPlanEntry;
use crate::note::{Sections, normalize_tasks};

const WEEKLY_TASKS: &str = "Weekly Tasks";
const LEGACY_MARKERS: [&str; 2] = [
    "<!-- AUTO:weekly-tasks:start -->",
    "<!-- AUTO:weekly-tasks:end -->",
];

/// Render the plan as a numbered goal list with checkbox tasks
///
/// Entries with an empty goal are skipped and do not consume a number.
///
/// # Example
/// ```
/// use obsidian_journal::plan::{WeeklyPlanEntry, render_weekly_tasks};
///
/// let plan = [WeeklyPlanEntry::new("Health", ["#project [[run-10k]]"])];
/// assert_eq!(
///     render_weekly_tasks(&plan),
///     "1. Goal: Health\n   - [ ] #project [[run-10k]]\n"
/// );
/// ```
#[must_use]
pub fn render_weekly_tasks(plan: &[WeeklyPlanEntry]) -> String {
    let mut lines = Vec::new();

    for (number, entry) in plan
        .iter()
        .filter(|entry| !entry.goal.trim().is_empty())
        .enumerate()
    {
        lines.push(format!("{}. Goal: {}", number + 1, entry.goal));
        lines.extend(
            normalize_tasks(&entry.tasks)
                .into_iter()
                .map(|task| format!("   - [ ] {task}")),
        );
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// Drop the marker comment lines older notes wrapped the task list in
#[must_use]
pub fn strip_legacy_markers(body: &str) -> String {
    body.lines()
        .filter(|line| !LEGACY_MARKERS.contains(&line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Replace the body of the `Weekly Tasks` section with the rendered plan
///
/// The heading level is taken from the note (level 1 if the section is
/// missing). An empty plan keeps the existing tasks, minus legacy markers.
#[must_use]
pub fn upsert_weekly_tasks(sections: &Sections, text: &str, plan: &[WeeklyPlanEntry]) -> String {
    let level = sections.detect_level(text, WEEKLY_TASKS);
    let rendered = render_weekly_tasks(plan);

    let body = if rendered.is_empty() {
        let existing = sections
            .section_body(text, WEEKLY_TASKS, level)
            .unwrap_or_default();

        strip_legacy_markers(existing)
    } else {
        rendered
    };

    sections.replace_or_append_section(text, WEEKLY_TASKS, &body, level)
}
