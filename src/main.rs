mod apply;
mod audit;
mod batch;
mod classify;
mod codec;
mod config;
mod error;
mod resolve;
mod segments;
mod species;
mod store;
mod tables;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apply::AkaEngine;
use audit::{AuditReport, CHECKS};
use batch::{BatchOptions, Mode};
use config::Tables;

/// Longest value shown in a dry-run preview line.
const PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(
    name = "plant_aka",
    about = "Maintain the \"also known as\" annotation of plant descriptions"
)]
struct Cli {
    /// Directory holding common_plants_language_<code>.json files
    #[arg(long, global = true, default_value = "source")]
    source: PathBuf,

    /// JSON file overriding the curated word lists and phrases
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Annotate each plant that owns its primary species
    Add {
        /// Preview changes without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Ensure every plant shows the complementary formal name or nicknames
    Ensure {
        /// Preview changes without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Check existing annotations for scientific names, type-name repeats and subspecies
    Audit {
        /// Rewrite offending annotations in place
        #[arg(long)]
        fix: bool,
        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => Tables::load(path)
            .with_context(|| format!("loading tables from {}", path.display()))?,
        None => Tables::default(),
    };
    let engine = AkaEngine::new(&tables).context("building name classifier")?;

    match cli.command {
        Some(Command::Add { dry_run }) => run_batch(&cli.source, &engine, Mode::Add, dry_run),
        Some(Command::Ensure { dry_run }) => {
            run_batch(&cli.source, &engine, Mode::Ensure, dry_run)
        }
        Some(Command::Audit { fix, json }) => run_audit(&cli.source, &engine, fix, json),
        // Default: read-only audit
        None => run_audit(&cli.source, &engine, false, false),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  BATCH MODES: add / ensure
// ═══════════════════════════════════════════════════════════════════════

fn run_batch(
    source: &Path,
    engine: &AkaEngine,
    mode: Mode,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let mode_name = if dry_run { "dry-run" } else { "write" };
    println!("Mode: {mode_name}\n");

    let report = batch::run_batch(source, engine, BatchOptions { mode, dry_run });

    for name in &report.missing {
        println!("  ⚠️  Skipping {name} (not found)");
    }
    if dry_run {
        for change in &report.changes {
            println!(
                "  {} [{}] ({}): → {}",
                change.id,
                change.locale,
                change.kind.as_str(),
                preview(&change.value)
            );
        }
    }
    for file in &report.files {
        match &file.error {
            Some(e) => println!("  ⚠️  {}: {e}", file.file),
            None => println!("  {}: {} plants updated", file.file, file.updated),
        }
    }

    println!("\nTotal: {} plants", report.total());
    if dry_run {
        println!("\nRun without --dry-run to apply changes.");
    }
    Ok(ExitCode::SUCCESS)
}

fn preview(value: &str) -> String {
    if value.chars().count() > PREVIEW_CHARS {
        let head: String = value.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  AUDIT MODE
// ═══════════════════════════════════════════════════════════════════════

fn run_audit(
    source: &Path,
    engine: &AkaEngine,
    fix: bool,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let report = audit::run_audit(source, engine, fix);

    if json {
        let out = serde_json::to_string_pretty(&report).context("serializing audit report")?;
        println!("{out}");
    } else if fix {
        print_fixes(&report);
    } else {
        print_findings(&report);
    }

    if !fix && !report.findings.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_fixes(report: &AuditReport) {
    println!("=== FIX: Also known as (all checks) ===\n");
    for f in &report.fixes {
        println!(
            "  {} [{}] {}: {} fixed",
            f.file,
            f.locale,
            f.kind.as_str(),
            f.fixed
        );
    }
    println!("\nTotal: {} plants fixed", report.total_fixed());
}

fn print_findings(report: &AuditReport) {
    for kind in CHECKS {
        let mut findings: Vec<_> = report.of_kind(kind).collect();
        if findings.is_empty() {
            continue;
        }
        findings.sort_by(|a, b| a.id.cmp(&b.id));

        println!("=== {} ===\n", kind.title());
        for f in findings {
            println!("  {} [{}] {}", f.id, f.locale, f.type_name);
            println!("    current aka: {}", f.aka);
            println!("    offending: {:?}", f.offending);
            println!(
                "    → new aka: {}",
                f.replacement.as_deref().unwrap_or("(remove)")
            );
        }
        println!();
    }

    if report.findings.is_empty() {
        println!("✅ All 'also known as' checks pass.");
    } else {
        println!("Run with --fix to apply corrections.");
    }
}
