use anyhow::Result;
use clap::Parser;
use forecast_long::{
    mapping::Mappings,
    run::{parse_quarter_list, run, RunConfig},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Turn a wide quarterly forecast sheet (CSV export) into a long table of
/// Date, Target, Channel, Quarter, Fcst_Actual, category.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Wide forecast CSV; the first column holds row labels
    #[arg(long = "in_csv", visible_alias = "in-csv", value_name = "PATH")]
    in_csv: PathBuf,

    /// Comma-separated quarter headers, e.g. "Q3'25,Q4'25"
    #[arg(long, value_name = "LIST")]
    quarters: String,

    /// Where to write the long-form CSV
    #[arg(long = "out_csv", visible_alias = "out-csv", value_name = "PATH")]
    out_csv: PathBuf,

    /// YAML file overriding channel renames, header exceptions,
    /// excluded channels or category aliases
    #[arg(long, value_name = "PATH")]
    mappings: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let args = Args::parse();
    let quarters = parse_quarter_list(&args.quarters);
    if quarters.is_empty() {
        warn!("--quarters names no quarters; output will hold only the header row");
    }
    let mappings = match &args.mappings {
        Some(path) => {
            info!(path = %path.display(), "loading mappings");
            Mappings::from_yaml_file(path)?
        }
        None => Mappings::default(),
    };

    // ─── 3) load, extract, write ─────────────────────────────────────
    let summary = run(&RunConfig {
        in_csv: args.in_csv,
        quarters,
        out_csv: args.out_csv,
        mappings,
    })?;

    println!("{}", summary);
    Ok(())
}
