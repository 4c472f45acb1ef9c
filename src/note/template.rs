//! Rendering Templater placeholders for a given date
//!
//! Only a fixed table of `<% tp... %>` expressions is understood; anything
//! else is left as written.

use crate::vault::WeekId;
use chrono::NaiveDate;

/// Token table for `date`, in replacement order
fn tokens(date: NaiveDate) -> [(&'static str, String); 12] {
    let week = WeekId::from_date(date);
    let iso = date.format("%Y-%m-%d").to_string();
    let month = date.format("%Y-%m").to_string();
    let week_id = week.to_string();

    [
        (r#"<% tp.date.now("YYYY-MM-DD") %>"#, iso.clone()),
        (r#"<% tp.date.now("YYYY-MM") %>"#, month.clone()),
        ("<% tp.file.title %>", iso),
        ("<% tp.file.title.slice(0, 7) %>", month.clone()),
        (
            r#"<% tp.date.now("YYYY", 0, tp.file.title, "YYYY-MM-DD") %>"#,
            date.format("%Y").to_string(),
        ),
        (
            r#"<% tp.date.now("W", 0, tp.file.title, "YYYY-MM-DD") %>"#,
            week.week().to_string(),
        ),
        (
            r#"<% tp.date.now("YYYY-[W]WW", 0, tp.file.title, "YYYY-MM-DD") %>"#,
            week_id.clone(),
        ),
        (
            r#"<% tp.date.now("YYYY-[W]W", 0, tp.file.title, "YYYY-MM-DD") %>"#,
            week_id.clone(),
        ),
        (r#"<% tp.date.now("YYYY-[W]WW") %>"#, week_id.clone()),
        (r#"<% tp.date.now("YYYY-[W]W") %>"#, week_id),
        (
            r#"<% tp.date.now("YYYY-MM", 0, tp.file.title, "YYYY-[W]WW") %>"#,
            month.clone(),
        ),
        (
            r#"<% tp.date.now("YYYY-MM", 0, tp.file.title, "YYYY-[W]W") %>"#,
            month,
        ),
    ]
}

/// Replace every known placeholder in `text` with its value for `date`
///
/// Week values use the ISO week of `date` and are never zero padded
/// (`2026-W1`); the `YYYY` token is the calendar year.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use obsidian_journal::note::render_template;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
/// let text = "# <% tp.file.title %>\nweek: <% tp.date.now(\"YYYY-[W]WW\") %>\n";
///
/// assert_eq!(render_template(text, date), "# 2026-03-11\nweek: 2026-W11\n");
/// ```
#[must_use]
pub fn render_template(text: &str, date: NaiveDate) -> String {
    tokens(date)
        .iter()
        .fold(text.to_string(), |rendered, (token, value)| {
            if rendered.contains(token) {
                rendered.replace(token, value)
            } else {
                rendered
            }
        })
}
