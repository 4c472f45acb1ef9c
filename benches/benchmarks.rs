use criterion::{Criterion, criterion_group, criterion_main};
use obsidian_journal::prelude::*;
use rand::RngExt;
use std::fmt::Write;
use std::hint::black_box;
use tempfile::TempDir;

fn generate_note(sections: usize) -> String {
    let mut rng = rand::rng();
    let mut note = String::from("---\njournal: day\njournal-date: 2026-03-11\nmood: ok\ntags:\n  - work\n  - health\n---\n\n");

    for section in 0..sections {
        writeln!(note, "## Section {section}").unwrap();

        for line in 0..rng.random_range(5..=20) {
            if rng.random::<bool>() {
                writeln!(note, "- [ ] task {section}.{line}").unwrap();
            } else {
                writeln!(note, "TEST DATA {line}").unwrap();
            }
        }

        if rng.random::<bool>() {
            writeln!(note, "### Nested {section}\n- item").unwrap();
        }

        writeln!(note).unwrap();
    }

    note
}

fn section_benchmark(c: &mut Criterion) {
    let note = generate_note(200);
    let sections = Sections::new();

    c.bench_function("find_last_section", |b| {
        b.iter(|| {
            let found = sections.find(black_box(&note), "Section 199", HeadingLevel::H2);
            black_box(found);
        })
    });

    c.bench_function("replace_or_append_section", |b| {
        b.iter(|| {
            let patched = sections.replace_or_append_section(
                black_box(&note),
                "Section 100",
                "- [ ] fresh",
                HeadingLevel::H2,
            );
            black_box(patched);
        })
    });

    c.bench_function("update_subsection_in_section", |b| {
        b.iter(|| {
            let patched = sections.update_subsection_in_section(
                black_box(&note),
                "Section 150",
                "Nested 150",
                "- nested",
                HeadingLevel::H2,
                HeadingLevel::H3,
            );
            black_box(patched);
        })
    });

    c.bench_function("outline", |b| {
        b.iter(|| {
            let tree = outline(black_box(&note));
            black_box(tree);
        })
    });
}

fn frontmatter_benchmark(c: &mut Criterion) {
    let note = generate_note(50);
    let updates = FrontmatterUpdate::new()
        .set("mood", "good")
        .set("topics", vec!["sleep", "run"])
        .remove("tags");

    c.bench_function("update_frontmatter", |b| {
        b.iter(|| {
            let updated = update_frontmatter(black_box(&note), &updates);
            black_box(updated);
        })
    });
}

fn tasks_benchmark(c: &mut Criterion) {
    let body: String = (0..500).map(|i| format!("- [ ] task {i}\n")).collect();
    let labels: Vec<String> = (250..750).map(|i| format!("task {i}")).collect();

    c.bench_function("merge_task_body", |b| {
        b.iter(|| {
            let merged = merge_task_body(black_box(&body), &labels);
            black_box(merged);
        })
    });
}

fn writer_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let writer = SafeWriter::new(temp_dir.path().join(".backups"), temp_dir.path());
    let path = temp_dir.path().join("note.md");
    let note = generate_note(50);
    writer.write(&path, &note).unwrap();

    c.bench_function("safe_write_unchanged", |b| {
        b.iter(|| {
            let backup = writer.write(black_box(&path), &note).unwrap();
            black_box(backup);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(20)
        .warm_up_time(std::time::Duration::from_secs(1));
    targets = section_benchmark, frontmatter_benchmark, tasks_benchmark, writer_benchmark
}

criterion_main!(benches);
