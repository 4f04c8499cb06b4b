use anyhow::Result;
use forecast_long::{extract::month::normalize_month_label, load_wide_csv, QuarterColumns};
use std::{env, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to the wide forecast CSV.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <WIDE_CSV>", args[0]);
        exit(1);
    }
    if let Err(e) = list_quarters(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print every quarter triplet in the sheet with its Fcst/Actual markers and month labels.
fn list_quarters(path: &Path) -> Result<()> {
    let table = load_wide_csv(path)?;
    let quarters = QuarterColumns::discover(&table);

    println!("=== {} ===", path.display());
    println!("Body rows:  {}", table.len());
    println!("Quarters:   {}", quarters.len());
    println!();

    for q in &quarters {
        let markers: Vec<&str> = q.indices.iter().map(|&c| table.cell(0, c).trim()).collect();
        let months: Vec<String> = q
            .indices
            .iter()
            .map(|&c| normalize_month_label(table.cell(1, c)))
            .collect();
        println!(
            "- {:<12} | {:<24} | {}",
            q.token,
            markers.join(" / "),
            months.join(" / ")
        );
    }

    if !quarters.is_empty() {
        let tokens: Vec<&str> = quarters.iter().map(|q| q.token.as_str()).collect();
        println!();
        println!("--quarters \"{}\"", tokens.join(","));
    }
    Ok(())
}
