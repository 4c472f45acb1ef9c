use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use obsidian_journal::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn parse_level(s: &str) -> Result<HeadingLevel, String> {
    s.parse::<u8>()
        .ok()
        .and_then(HeadingLevel::new)
        .ok_or_else(|| format!("{s} is not a heading level (1-6)"))
}

#[derive(Parser, Debug)]
struct Args {
    /// Config file, defaults to `LIFE_MENTOR_CONFIG` or `config/config.yaml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Day of the note, defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace (or append) a section of the daily note
    Section {
        heading: String,

        body: String,

        #[arg(long, default_value = "2", value_parser = parse_level)]
        level: HeadingLevel,
    },

    /// Add tasks to `# GTD` / `## Today's Tasks`
    Tasks { tasks: Vec<String> },

    /// Add a timestamped entry to `## Journal`
    Entry { subsection: String, text: String },

    /// Set frontmatter `key: value`, or remove `key` without a value
    Set { key: String, value: Option<String> },

    /// Print the heading tree of the daily note
    Outline,

    /// Rename legacy weekly notes and fix their week ids
    NormalizeWeeks {
        #[arg(long)]
        apply: bool,
    },
}

fn report_backup(backup: Option<PathBuf>) {
    match backup {
        Some(backup) => println!("Backup: {}", backup.display()),
        None => println!("Written (no backup needed)"),
    }
}

fn print_outline(sections: &[Section<'_>], depth: usize) {
    for section in sections {
        println!(
            "{}{} {} ({} bytes)",
            "  ".repeat(depth),
            section.level.markers(),
            section.heading_text,
            section.body.len()
        );
        print_outline(&section.children, depth + 1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let journal = Journal::from_config_file(args.config.as_deref())?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    match args.command {
        Command::Section {
            heading,
            body,
            level,
        } => {
            let path = journal.ensure_daily_file(date)?;
            let backup = journal.patch_note(&path, |text| {
                journal
                    .sections()
                    .replace_or_append_section(text, &heading, &body, level)
            })?;
            report_backup(backup);
        }
        Command::Tasks { tasks } => {
            let path = journal.ensure_daily_file(date)?;
            report_backup(journal.append_gtd_tasks(&path, &tasks)?);
        }
        Command::Entry { subsection, text } => {
            let path = journal.ensure_daily_file(date)?;
            let backup =
                journal.append_journal_entry(&path, &subsection, &text, Local::now().naive_local())?;
            report_backup(backup);
        }
        Command::Set { key, value } => {
            let path = journal.ensure_daily_file(date)?;
            let updates = FrontmatterUpdate::new().set(key, value);
            report_backup(journal.patch_note(&path, |text| update_frontmatter(text, &updates))?);
        }
        Command::Outline => {
            let path = journal.daily_note_path(date);
            let text = std::fs::read_to_string(&path)?;
            print_outline(&outline(&text), 0);
        }
        Command::NormalizeWeeks { apply } => {
            let report = normalize_week_notes(&journal, apply)?;

            for (week, duplicates) in &report.duplicates {
                println!("[warn] duplicate week notes for {week}: {duplicates:?}");
            }
            for (from, to) in &report.skipped {
                println!("[skip] {} -> {} (target exists)", from.display(), to.display());
            }
            for (from, to) in &report.renames {
                println!("[rename] {} -> {}", from.display(), to.display());
            }
            for path in &report.updates {
                println!("[update] {}", path.display());
            }

            if !apply {
                println!("Dry run complete. Use --apply to write changes.");
            }
            println!(
                "Renames: {}, Updates: {}",
                report.renames.len(),
                report.updates.len()
            );
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(error) = run(Args::parse()) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
