//! Batch command - check multiple order files at once.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use taxline_core::OrderDraft;

use super::check::{CheckReport, check_order};
use super::{data_dir, load_catalog, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Order files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Tax catalog file (default: the cached catalog)
    #[arg(short = 't', long)]
    catalog: Option<PathBuf>,

    /// Also write a summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write a full JSON report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Continue past malformed order files
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of checking a single order file.
#[derive(Serialize)]
struct FileResult {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<CheckReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchReport {
    generated_at: String,
    checked: usize,
    clean: usize,
    flagged: usize,
    failed: usize,
    results: Vec<FileResult>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| data_dir().join(&config.catalog.cache_file));
    if !catalog_path.exists() {
        anyhow::bail!(
            "No tax catalog at {}. Run 'taxline catalog fetch' first or pass --catalog.",
            catalog_path.display()
        );
    }
    let catalog = load_catalog(&catalog_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching order files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} order files to check",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} orders")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match check_file(&path, &config, &catalog) {
            Ok(report) => {
                debug!(
                    path = %path.display(),
                    issues = report.issues.len(),
                    "checked order"
                );
                results.push(FileResult {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Skipping {}: {}", path.display(), message);
                    results.push(FileResult {
                        path,
                        report: None,
                        error: Some(message),
                    });
                } else {
                    error!("Failed on {}: {}", path.display(), message);
                    anyhow::bail!("Batch check failed: {}", message);
                }
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let clean = results
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|rep| rep.issues.is_empty()))
        .count();
    let flagged = results
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|rep| !rep.issues.is_empty()))
        .count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if let Some(report_path) = &args.report {
        let report = BatchReport {
            generated_at: Local::now().to_rfc3339(),
            checked: results.len(),
            clean,
            flagged,
            failed,
            results,
        };
        fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );

        return finish(start, report.checked, clean, flagged, failed, &report.results);
    }

    finish(start, results.len(), clean, flagged, failed, &results)
}

fn finish(
    start: Instant,
    checked: usize,
    clean: usize,
    flagged: usize,
    failed: usize,
    results: &[FileResult],
) -> anyhow::Result<()> {
    println!();
    println!(
        "{} Checked {} orders in {:?}",
        style("✓").green(),
        checked,
        start.elapsed()
    );
    println!(
        "   {} clean, {} flagged, {} failed",
        style(clean).green(),
        style(flagged).yellow(),
        style(failed).red()
    );

    for result in results {
        if let Some(report) = &result.report {
            for issue in &report.issues {
                println!(
                    "  - {} line {}: {}",
                    result.path.display(),
                    issue.index + 1,
                    issue.message
                );
            }
        }
    }

    if flagged > 0 || failed > 0 {
        anyhow::bail!("{} of {} orders need attention", flagged + failed, checked);
    }
    Ok(())
}

fn check_file(
    path: &PathBuf,
    config: &taxline_core::EngineConfig,
    catalog: &taxline_core::TaxCatalog,
) -> anyhow::Result<CheckReport> {
    let draft: OrderDraft = serde_json::from_str(&fs::read_to_string(path)?)
        .map_err(|e| anyhow::anyhow!("malformed order: {}", e))?;
    Ok(check_order(&draft, config, catalog))
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "reference",
        "interstate",
        "lines",
        "corrected",
        "issues",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        if let Some(report) = &result.report {
            let corrected = report
                .lines
                .iter()
                .filter(|l| l.tax_auto_corrected)
                .count();
            let record = [
                filename,
                if report.issues.is_empty() {
                    "clean".to_string()
                } else {
                    "flagged".to_string()
                },
                report.reference.clone().unwrap_or_default(),
                report.interstate.to_string(),
                report.lines.len().to_string(),
                corrected.to_string(),
                report.issues.len().to_string(),
                String::new(),
            ];
            wtr.write_record(&record)?;
        } else {
            let record = [
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.error.clone().unwrap_or_default(),
            ];
            wtr.write_record(&record)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
