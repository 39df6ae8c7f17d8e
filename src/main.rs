mod adapters;
mod canon;
mod compare;
mod csvio;
mod document;
mod fields;
mod select;
mod standardize;
mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use adapters::Vendor;
use compare::{Filters, VendorCell};
use standardize::StandardizedRecord;

const DEFAULT_MASTER: &str = "data_processed/peptide_prices_master.csv";

#[derive(Parser)]
#[command(name = "peptide_compare", about = "Multi-vendor peptide price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse extracted vendor documents into the master price table
    Prepare {
        /// Directory with the extracted vendor documents
        #[arg(long, default_value = "data_raw")]
        raw_dir: PathBuf,
        /// Where to write the master CSV
        #[arg(short, long, default_value = DEFAULT_MASTER)]
        out: PathBuf,
    },
    /// Vendor comparison matrix ranked by price per mg
    Compare {
        #[arg(long, default_value = DEFAULT_MASTER)]
        master: PathBuf,
        /// Extra vendor CSV(s) to merge for this run
        #[arg(long = "add")]
        add: Vec<PathBuf>,
        /// Filter by canonical peptide name (repeatable)
        #[arg(short, long)]
        peptide: Vec<String>,
        /// Filter by vendor (repeatable)
        #[arg(short, long)]
        vendor: Vec<String>,
        /// Only rows with a known price per mg
        #[arg(long)]
        only_priced: bool,
    },
    /// Per-vendor price list with totals for selected rows
    Pricelist {
        #[arg(long, default_value = DEFAULT_MASTER)]
        master: PathBuf,
        /// Extra vendor CSV(s) to merge for this run
        #[arg(long = "add")]
        add: Vec<PathBuf>,
        /// Row key to include, e.g. 'BPC 157|5|50' (repeatable)
        #[arg(short, long = "select")]
        select: Vec<String>,
    },
    /// Master table statistics
    Stats {
        #[arg(long, default_value = DEFAULT_MASTER)]
        master: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Prepare { raw_dir, out } => run_prepare(&raw_dir, &out),
        Commands::Compare {
            master,
            add,
            peptide,
            vendor,
            only_priced,
        } => {
            let filters = Filters {
                peptides: peptide,
                vendors: vendor,
                only_priced,
            };
            run_compare(&master, &add, &filters)
        }
        Commands::Pricelist { master, add, select } => run_pricelist(&master, &add, &select),
        Commands::Stats { master } => run_stats(&master),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_prepare(raw_dir: &Path, out: &Path) -> anyhow::Result<()> {
    let mut tuples = Vec::new();

    for vendor in Vendor::ALL {
        let path = raw_dir.join(vendor.source_file());
        match document::load(&path)? {
            Some(doc) => {
                let parsed = vendor.parse(&doc);
                info!(
                    "{}: {} rows from {}",
                    vendor.label(),
                    parsed.len(),
                    vendor.source_file()
                );
                tuples.extend(parsed);
            }
            None => info!("{}: no source document, skipping", vendor.label()),
        }
    }

    let manual = adapters::manual::parse(&raw_dir.join(adapters::manual::SOURCE_FILE))?;
    if !manual.is_empty() {
        info!(
            "manual: {} rows from {}",
            manual.len(),
            adapters::manual::SOURCE_FILE
        );
    }
    tuples.extend(manual);

    if tuples.is_empty() {
        println!("No vendor documents found in {}.", raw_dir.display());
        return Ok(());
    }

    let records = standardize::build_master(tuples);
    store::save_master(out, &records)?;
    println!("Saved {} rows to {}", records.len(), out.display());
    Ok(())
}

/// Master records plus any supplemental files that pass schema validation.
/// A rejected file is reported and skipped; the run continues without it.
fn load_records(master: &Path, add: &[PathBuf]) -> anyhow::Result<Vec<StandardizedRecord>> {
    let mut records = store::load_master(master)?;
    for path in add {
        match store::load_supplemental(path) {
            Ok(extra) => {
                println!("Added {} rows from {}", extra.len(), path.display());
                records.extend(extra);
            }
            Err(e) => warn!("{e}; file was not added"),
        }
    }
    Ok(records)
}

fn run_compare(master: &Path, add: &[PathBuf], filters: &Filters) -> anyhow::Result<()> {
    let records = compare::canonicalize(load_records(master, add)?);
    if records.is_empty() {
        println!("No records found. Run 'prepare' first.");
        return Ok(());
    }

    let filtered = compare::apply_filters(&records, filters);
    if filtered.is_empty() {
        println!("No rows match the current filters.");
        return Ok(());
    }

    let vendors = compare::vendor_columns(&filtered);
    let rows = compare::pivot(&compare::group(&filtered));
    if rows.is_empty() {
        println!("No comparable rows (dose unknown for every record).");
        return Ok(());
    }

    // Compact, readable matrix
    print!("{:>3} | {:<24} | {:>7} | {:>6}", "#", "Peptide", "mg/vial", "mg/kit");
    for v in &vendors {
        print!(" | {:<22}", truncate(v, 22));
    }
    println!();
    println!("{}", "-".repeat(49 + vendors.len() * 25));

    for (i, row) in rows.iter().enumerate() {
        print!(
            "{:>3} | {:<24} | {:>7} | {:>6}",
            i + 1,
            truncate(&row.canonical_product, 24),
            row.dose_mg_per_vial,
            row.total_mg_per_kit,
        );
        for v in &vendors {
            let cell = row.cells.get(v).map(format_cell).unwrap_or_default();
            print!(" | {:<22}", cell);
        }
        println!();
    }

    // Row keys for --select (separate section to avoid clutter)
    println!("\n--- Row keys ---");
    for (i, row) in rows.iter().enumerate() {
        println!("  {:>3}: {}", i + 1, row.row_key());
    }

    println!("\n* = lowest $/mg, + = second lowest");
    println!("{} rows | pass a row key to 'pricelist --select'", rows.len());
    Ok(())
}

fn format_cell(cell: &VendorCell) -> String {
    let Some(price) = cell.price_usd else {
        return String::new();
    };
    let marker = match cell.rank {
        Some(1) => "* ",
        Some(2) => "+ ",
        _ => "",
    };
    match cell.price_per_mg {
        Some(ppm) => format!("{}${:.2} (${:.2}/mg)", marker, price, ppm),
        None => format!("{}${:.2}", marker, price),
    }
}

fn run_pricelist(master: &Path, add: &[PathBuf], select: &[String]) -> anyhow::Result<()> {
    if select.is_empty() {
        println!("No rows selected. Pass --select '<peptide>|<mg per vial>|<mg per kit>'.");
        return Ok(());
    }

    let records = compare::canonicalize(load_records(master, add)?);
    let grouped = compare::group(&records);
    let selected: Vec<_> = select.iter().map(|k| select::decode_row_key(k)).collect();

    let list = select::price_list(&selected, &grouped);
    if list.vendors.is_empty() {
        println!("No prices available for the selected rows.");
        return Ok(());
    }

    print!("{:<24} | {:>7}", "Peptide", "mg/vial");
    for v in &list.vendors {
        print!(" | {:>10}", truncate(v, 10));
    }
    println!();
    println!("{}", "-".repeat(34 + list.vendors.len() * 13));

    for row in &list.rows {
        let dose = row
            .dose_mg_per_vial
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".into());
        print!("{:<24} | {:>7}", truncate(&row.canonical_product, 24), dose);
        for price in &row.prices {
            match price {
                Some(p) => print!(" | {:>10}", format!("${:.2}", p)),
                None => print!(" | {:>10}", ""),
            }
        }
        println!();
    }

    print!("{:<24} | {:>7}", "TOTAL", "");
    for total in &list.totals {
        print!(" | {:>10}", format!("${:.2}", total));
    }
    println!();
    Ok(())
}

fn run_stats(master: &Path) -> anyhow::Result<()> {
    let records = compare::canonicalize(store::load_master(master)?);

    let priced = records.iter().filter(|r| r.record.price_usd.is_some()).count();
    let dosed = records.iter().filter(|r| r.record.dose_mg_per_vial.is_some()).count();
    let per_mg = records.iter().filter(|r| r.record.price_per_mg.is_some()).count();

    let mut by_vendor: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &records {
        *by_vendor.entry(r.record.vendor.as_str()).or_default() += 1;
    }
    let peptides: std::collections::BTreeSet<&str> = records
        .iter()
        .map(|r| r.canonical_product.as_str())
        .collect();

    println!("Records:    {}", records.len());
    println!("With price: {}", priced);
    println!("With dose:  {}", dosed);
    println!("With $/mg:  {}", per_mg);
    println!("Peptides:   {}", peptides.len());
    println!("Vendors:");
    for (vendor, n) in by_vendor {
        println!("  {:<10} {}", vendor, n);
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
