//! Check command - normalize and validate a single order file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use taxline_core::models::codes;
use taxline_core::{
    LineItem, OrderDraft, RateTable, TaxResolver, ValidationIssue, format_inr, round_currency,
    validate_order,
};

use super::{data_dir, load_catalog, load_config};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Order file (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Tax catalog file (default: the cached catalog)
    #[arg(short = 't', long)]
    catalog: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Override the configured home state
    #[arg(long)]
    home_state: Option<String>,

    /// Report validation issues without a failing exit code
    #[arg(long)]
    no_fail: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON report
    Json,
    /// CSV line listing
    Csv,
}

/// Everything the check produced for one order.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub interstate: bool,
    pub lines: Vec<LineItem>,
    pub issues: Vec<ValidationIssue>,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(home) = args.home_state.clone() {
        config.business.home_state = home;
    }

    if !args.input.exists() {
        anyhow::bail!("Order file not found: {}", args.input.display());
    }

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
    debug!(taxes = catalog.len(), "catalog loaded");

    let draft: OrderDraft = serde_json::from_str(&fs::read_to_string(&args.input)?)
        .map_err(|e| anyhow::anyhow!("malformed order {}: {}", args.input.display(), e))?;

    info!("Checking order: {}", args.input.display());
    warn_on_malformed_codes(&draft);

    let report = check_order(&draft, &config, &catalog);

    let output = match args.format {
        OutputFormat::Text => format_text(&report, &config.business.currency),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => format_csv(&report)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !report.issues.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &report.issues {
            eprintln!("  line {}: {}", issue.index + 1, issue.message);
        }
        if !args.no_fail {
            anyhow::bail!("validation failed with {} issue(s)", report.issues.len());
        }
    }

    Ok(())
}

/// Run the full pass over one order: resolve, reconcile, validate.
pub fn check_order(
    draft: &OrderDraft,
    config: &taxline_core::EngineConfig,
    catalog: &taxline_core::TaxCatalog,
) -> CheckReport {
    let resolver = TaxResolver::with_table(RateTable::with_config(&config.rates));
    let ctx = draft.context(&config.business.home_state);
    let lines = resolver.revise_order(&draft.lines, &ctx, catalog);
    let issues = validate_order(&lines, catalog, ctx.is_interstate());

    CheckReport {
        reference: draft.reference.clone(),
        interstate: ctx.is_interstate(),
        lines,
        issues,
    }
}

fn warn_on_malformed_codes(draft: &OrderDraft) {
    for (i, line) in draft.lines.iter().enumerate() {
        if let Some(code) = line.hsn_sac.as_deref() {
            if !codes::is_valid(code) {
                eprintln!(
                    "{} line {}: '{}' does not look like an HSN/SAC code",
                    style("⚠").yellow(),
                    i + 1,
                    code
                );
            }
        }
    }
}

fn format_text(report: &CheckReport, currency: &str) -> String {
    let mut output = String::new();

    if let Some(reference) = &report.reference {
        output.push_str(&format!("Order: {}\n", reference));
    }
    output.push_str(&format!(
        "Type: {}\n\n",
        if report.interstate {
            "interstate (IGST)"
        } else {
            "intrastate (CGST/SGST)"
        }
    ));

    let mut subtotal = 0.0;
    let mut tax_total = 0.0;
    for (i, line) in report.lines.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}. {} x{}\n",
            i + 1,
            if line.description.is_empty() {
                "(no description)"
            } else {
                &line.description
            },
            line.quantity
        ));
        output.push_str(&format!(
            "     rate {} {}  tax {} {}  total {} {}\n",
            format_inr(line.unit_rate.unwrap_or(0.0)),
            currency,
            format_inr(line.tax_amount.unwrap_or(0.0)),
            currency,
            format_inr(line.item_total.unwrap_or(0.0)),
            currency,
        ));
        if let Some(note) = &line.tax_correction_note {
            output.push_str(&format!("     note: {}\n", note));
        }
        subtotal += line.item_total.unwrap_or(0.0);
        tax_total += line.tax_amount.unwrap_or(0.0);
    }

    output.push_str(&format!(
        "\nSubtotal: {} {}\nTax:      {} {}\nTotal:    {} {}\n",
        format_inr(subtotal),
        currency,
        format_inr(tax_total),
        currency,
        format_inr(subtotal + tax_total),
        currency,
    ));

    output
}

fn format_csv(report: &CheckReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "line",
        "description",
        "hsn_sac",
        "quantity",
        "final_price",
        "tax_id",
        "unit_rate",
        "tax_amount",
        "item_total",
        "auto_corrected",
        "note",
    ])?;

    for (i, line) in report.lines.iter().enumerate() {
        let record = [
            (i + 1).to_string(),
            line.description.clone(),
            line.hsn_sac.clone().unwrap_or_default(),
            line.quantity.to_string(),
            line.final_price.map(round_currency).unwrap_or(0.0).to_string(),
            line.tax_id.clone().unwrap_or_default(),
            round_currency(line.unit_rate.unwrap_or(0.0)).to_string(),
            round_currency(line.tax_amount.unwrap_or(0.0)).to_string(),
            round_currency(line.item_total.unwrap_or(0.0)).to_string(),
            line.tax_auto_corrected.to_string(),
            line.tax_correction_note.clone().unwrap_or_default(),
        ];
        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
