//! All prelude

pub use crate::config::JournalConfig;
pub use crate::error::Error;
pub use crate::note::{
    Frontmatter, FrontmatterUpdate, HeadingLevel, Scalar, Section, SectionMatch, Sections, Value,
    append_list_items, merge_task_body, normalize_tasks, outline, render_template,
    update_frontmatter,
};
pub use crate::plan::{GoalGraph, WeeklyPlanEntry, build_weekly_plan};
pub use crate::vault::{Journal, NormalizeReport, SafeWriter, WeekId, normalize_week_notes};
