use salesdash::{dataset::load_dataset, DashboardConfig};
use std::{env, path::PathBuf, process::exit};

fn main() {
    // Optional single CLI argument: path to a YAML config.
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [CONFIG]", args[0]);
        exit(1);
    }
    let config_path = args.get(1).map(PathBuf::from);
    if let Err(e) = inspect(config_path) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Load the dataset exactly as the dashboard does and print what came out.
fn inspect(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = DashboardConfig::resolve(config_path.as_deref())?;
    let table = load_dataset(&config.sources)?;
    let summary = table.summary()?;

    println!("=== Sources ===");
    println!("Sales:    {}", config.sources.sales_path.display());
    println!("Regions:  {}", config.sources.regions_path.display());
    println!(
        "Join:     {} = {}",
        config.sources.sales_key, config.sources.lookup_key
    );
    println!();

    println!("=== Unified table ===");
    println!("Rows:                   {}", summary.rows);
    println!("Columns:                {}", summary.columns);
    match (summary.first_order_date, summary.last_order_date) {
        (Some(first), Some(last)) => println!("Order dates:            {} .. {}", first, last),
        _ => println!("Order dates:            <none>"),
    }
    println!("Rows without lookup:    {}", summary.rows_without_lookup);
    println!("Rows without LAT/LNG:   {}", summary.rows_without_coordinates);
    println!();

    println!("=== Columns ===");
    for field in table.schema().fields() {
        println!("- {:<24} | {:?}", field.name(), field.data_type());
    }
    Ok(())
}
