use anyhow::{Context, Result};
use clap::Parser;
use pgs_dossier::{
    cache::TableCache,
    config::{init_logging, Command, CustomerArgs, Settings},
    dossier::{format_as_on, CustomerDossier},
    query::{self, DuplicatePolicy, RecordFilter},
    server, CanonicalTable,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) settings + logging ───────────────────────────────────────
    let settings = Settings::parse();
    init_logging(&settings.log_level);
    info!(data_file = %settings.data_file.display(), sheet = ?settings.sheet, "startup");

    let cache = Arc::new(TableCache::new(
        settings.data_file.clone(),
        settings.sheet.clone(),
    ));

    // ─── 2) warm the cache so a bad source fails fast ─────────────────
    let table = tokio::task::spawn_blocking({
        let cache = Arc::clone(&cache);
        move || cache.get()
    })
    .await?
    .with_context(|| format!("loading {}", settings.data_file.display()))?;
    if table.is_empty() {
        warn!("No data file found or the file is empty");
    }

    // ─── 3) dispatch ─────────────────────────────────────────────────
    match settings.command() {
        Command::Serve => server::serve(cache, settings.port).await,
        Command::Summary => print_summary(&table),
        Command::Customer(args) => print_customer(&table, &args)?,
    }
    Ok(())
}

fn print_summary(table: &CanonicalTable) {
    println!("Records:     {}", table.len());
    println!("States:      {}", query::distinct_states(table).join(", "));
    println!(
        "Segments:    {}",
        query::distinct_segments_global(table).join(", ")
    );
    let dates: Vec<String> = table.fund_dates.iter().map(|d| format_as_on(*d)).collect();
    println!("Fund dates:  {}", dates.join(", "));
    for skipped in &table.skipped_columns {
        println!("Skipped:     {:?} ({:?})", skipped.header, skipped.reason);
    }
}

fn print_customer(table: &CanonicalTable, args: &CustomerArgs) -> Result<()> {
    let mut filter = RecordFilter::new().customer(args.customer.as_str());
    filter.state = args.state.clone();
    filter.unit = args.unit.clone();
    filter.segment = args.segment.clone();
    let policy = if args.require_unique {
        DuplicatePolicy::RequireUnique
    } else {
        DuplicatePolicy::FirstRow
    };

    match CustomerDossier::lookup(table, &filter, policy) {
        Some(d) => {
            println!("{}", serde_json::to_string_pretty(&d)?);
            if !d.has_fund_data() {
                warn!("No fund size data available for this customer");
            }
        }
        None => warn!(customer = %args.customer, "no single matching customer"),
    }
    Ok(())
}
