//! Bullet lists and checklists
//!
//! A task item is a line `- [ ] label` or `- [x] label`; its identity is the
//! trimmed label, compared exactly.

use std::collections::HashSet;

/// Append `- item` lines to a list body
///
/// Blank lines of `existing` are dropped. No de-duplication: use
/// [`merge_task_body`] for checklists.
///
/// # Example
/// ```
/// use obsidian_journal::note::append_list_items;
///
/// assert_eq!(append_list_items("- a\n\n", ["b", "c"]), "- a\n- b\n- c\n");
/// ```
#[must_use]
pub fn append_list_items<I>(existing: &str, items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect();

    lines.extend(items.into_iter().map(|item| format!("- {}", item.as_ref())));

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Label of a `- [ ] label` / `- [x] label` line
fn task_label(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("- [")?;
    let rest = rest.strip_prefix([' ', 'x', 'X'])?.strip_prefix(']')?;

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(rest.trim())
}

/// Labels of all task items in `body`
#[must_use]
pub fn task_labels(body: &str) -> HashSet<&str> {
    body.lines().filter_map(task_label).collect()
}

/// Append unchecked tasks whose labels are not in `existing_body` yet
///
/// Labels are trimmed; empty ones and ones already present (checked or not)
/// are skipped. Returns `existing_body` unchanged when nothing is new, so
/// running the same suggestion twice adds nothing.
///
/// # Example
/// ```
/// use obsidian_journal::note::merge_task_body;
///
/// let body = merge_task_body("- [ ] Buy milk\n", ["Buy milk", "Call dentist"]);
/// assert_eq!(body, "- [ ] Buy milk\n- [ ] Call dentist\n");
/// ```
#[must_use]
pub fn merge_task_body<I>(existing_body: &str, new_labels: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut known = task_labels(existing_body)
        .into_iter()
        .map(ToString::to_string)
        .collect::<HashSet<_>>();

    let new_items: Vec<String> = new_labels
        .into_iter()
        .filter_map(|label| {
            let label = label.as_ref().trim();
            (!label.is_empty() && known.insert(label.to_string())).then(|| format!("[ ] {label}"))
        })
        .collect();

    if new_items.is_empty() {
        return existing_body.to_string();
    }

    let appended = append_list_items("", &new_items);

    if existing_body.trim().is_empty() {
        appended
    } else {
        format!("{}\n{appended}", existing_body.trim_end())
    }
}

/// Clean a list of task labels
///
/// Trims, drops empty entries, strips a leading checkbox (`- [ ] `,
/// `- [x] `) and removes duplicates, keeping the first occurrence.
#[must_use]
pub fn normalize_tasks<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();

    items
        .into_iter()
        .filter_map(|item| {
            let text = item.as_ref().trim();
            let text = if text.starts_with("- [") {
                text.split_once(']').map_or(text, |(_, label)| label.trim())
            } else {
                text
            };

            (!text.is_empty() && seen.insert(text.to_string())).then(|| text.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn append_list_items_drops_blank_lines() {
        assert_eq!(append_list_items("", ["a"]), "- a\n");
        assert_eq!(append_list_items("- x\n\n  \n- y", ["z"]), "- x\n- y\n- z\n");
        assert_eq!(append_list_items("- x\n", Vec::<String>::new()), "- x\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn task_label_forms() {
        assert_eq!(task_label("- [ ] Buy milk"), Some("Buy milk"));
        assert_eq!(task_label("  - [x]   Done thing  "), Some("Done thing"));
        assert_eq!(task_label("- [X] Upper"), Some("Upper"));
        assert_eq!(task_label("- [ ]"), None);
        assert_eq!(task_label("- [-] cancelled"), None);
        assert_eq!(task_label("- plain"), None);
        assert_eq!(task_label("- [ ]no space"), None);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn merge_skips_existing_labels() {
        let body = merge_task_body("- [ ] Buy milk\n", ["Buy milk", "Call dentist"]);

        assert_eq!(body, "- [ ] Buy milk\n- [ ] Call dentist\n");
        assert_eq!(body.matches("Buy milk").count(), 1);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn merge_treats_checked_as_existing() {
        let body = "notes\n- [x] Run\n";

        assert_eq!(merge_task_body(body, [" Run "]), body);
        assert_eq!(merge_task_body(body, ["run"]), "notes\n- [x] Run\n- [ ] run\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn merge_into_empty_body() {
        assert_eq!(merge_task_body("\n\n", ["a", "", "a", "b"]), "- [ ] a\n- [ ] b\n");
        assert_eq!(merge_task_body("keep\n\n", Vec::<&str>::new()), "keep\n\n");
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn merge_is_idempotent() {
        let labels = ["Stretch", "Write report"];
        let once = merge_task_body("- [ ] Stretch\n\n", labels);
        let twice = merge_task_body(&once, labels);

        assert_eq!(once, "- [ ] Stretch\n- [ ] Write report\n");
        assert_eq!(once, twice);
    }

    #[cfg_attr(feature = "tracing", tracing_test::traced_test)]
    #[test]
    fn normalize_tasks_cleans_input() {
        let tasks = normalize_tasks([" a ", "", "- [ ] b", "- [x] a", "  ", "c"]);

        assert_eq!(tasks, ["a", "b", "c"]);
    }
}
