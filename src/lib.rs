//! `obsidian-journal` - safe structured patching of [Obsidian](https://obsidian.md) daily and weekly notes
//!
//! Notes written by people are also rewritten by scripts: a morning check-in
//! adds tasks, an evening summary fills a section, a weekly job writes the
//! plan. This crate does those edits without touching anything else:
//! - Rewriting frontmatter keys while keeping the others byte for byte
//! - Replacing or appending a heading section, or a subsection inside one
//! - Merging checklists so repeated runs never duplicate a task
//! - Rendering Templater date/week placeholders
//! - Writing only when content changed, with a timestamped backup, and never
//!   outside a configured write root
//!
//! ## Usage
//! Add to `Cargo.toml`:
//! ```toml
//! [dependencies]
//! obsidian-journal = "0.3"
//! ```
//!
//! ## Examples
//!
//! ### Patching text
//! ```
//! use obsidian_journal::prelude::*;
//!
//! let sections = Sections::new();
//! let note = "---\nmood: bad\n---\n\n## Status\nold\n\n## Journal\nkeep-me\n";
//!
//! let note = update_frontmatter(note, &FrontmatterUpdate::new().set("mood", "good"));
//! let note = sections.replace_or_append_section(&note, "Evening Advice", "- rest", HeadingLevel::H2);
//!
//! assert_eq!(
//!     note,
//!     "---\nmood: good\n---\n\n## Status\nold\n\n## Journal\nkeep-me\n\n## Evening Advice\n- rest\n\n"
//! );
//! ```
//!
//! ### Working with the journal
//! ```no_run
//! use chrono::Local;
//! use obsidian_journal::prelude::*;
//!
//! // `LIFE_MENTOR_CONFIG` or `config/config.yaml`
//! let journal = Journal::from_config_file(None).unwrap();
//!
//! let note = journal.ensure_daily_file(Local::now().date_naive()).unwrap();
//! if let Some(backup) = journal.append_gtd_tasks(&note, ["Stretch"]).unwrap() {
//!     println!("Backup: {}", backup.display());
//! }
//! ```
//!
//! ## Features
//! - `tracing` (default): events and spans through [`tracing`](https://docs.rs/tracing)

//#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::as_conversions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod note;
pub mod plan;
pub mod prelude;
pub mod vault;
