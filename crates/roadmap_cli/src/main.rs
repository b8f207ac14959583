//! CLI probe over a roadmap database.
//!
//! Usage: `roadmap_cli <db-path> [log-dir]`
//!
//! Opens (or creates) the SQLite blob store, loads the roadmap state and
//! prints the dashboard and the recent-ideas feed.

use chrono::Utc;
use roadmap_core::db::open_db;
use roadmap_core::markup::inline::spans_to_plain_text;
use roadmap_core::{
    default_log_level, init_logging, render_summary, RoadmapStore, SqliteBlobStore,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .ok_or("usage: roadmap_cli <db-path> [log-dir]")?;
    if let Some(log_dir) = args.next() {
        init_logging(default_log_level(), &log_dir)?;
    }

    let conn = open_db(&db_path)?;
    let blobs = SqliteBlobStore::try_new(&conn)?;
    let store = RoadmapStore::open(blobs);
    let today = Utc::now().date_naive();

    println!("roadmap_core version={}", roadmap_core::core_version());
    println!(
        "projects={} roadmap_items={} theme={}",
        store.projects().len(),
        store.roadmap_items().len(),
        store.theme().as_str()
    );

    println!();
    println!("[dashboard]");
    for summary in store.dashboard() {
        match summary.latest_idea {
            Some(idea) => println!(
                "- {} | latest: {} ({}, {})",
                summary.project.title, idea.title, idea.kind, idea.priority
            ),
            None => println!("- {} | no ideas yet", summary.project.title),
        }
        if !summary.project.description.is_empty() {
            println!(
                "    {}",
                spans_to_plain_text(&render_summary(&summary.project.description))
            );
        }
    }

    println!();
    println!("[recent]");
    for entry in store.recent_feed() {
        let item = entry.item;
        let mut flags = Vec::new();
        if item.is_pinned {
            flags.push("pinned");
        }
        if item.is_done {
            flags.push("done");
        }
        if item.is_overdue(today) {
            flags.push("overdue");
        }
        println!(
            "- {} {} ({}, {}) in \"{}\"{}",
            item.created_at.format("%Y-%m-%d"),
            item.title,
            item.kind,
            item.priority,
            entry.project_title(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        );
    }

    Ok(())
}
