use anyhow::Result;
use forecast_long::{run, ExtractError, Mappings, RunConfig};
use std::{fs, path::Path};
use tempfile::tempdir;

const WIDE: &str = "\
Channel,Q3'25,Q3'25,Q3'25,Q4'25,Q4'25,Q4'25,Notes
,Fcst,Actual,Fcst,Fcst,Fcst,Fcst,
,Jul-25,Aug-25,Sep-25,Oct-25,Nov-25,Dec-25,
Header note,1,2,3,4,5,6,ignored before first category
MEMBERSHIP SOLD,,,,,,,
Direct,100,-,200,\"1,000\",,-,
Wholesale,-,-,-,-,-,-,
Other Membership Sold Breakout,9,9,9,9,9,9,
TOTAL MEMBERSHIP SOLD,\"$1,234.50\",abc,7,8,9,10,
\"1,234\",1,1,1,1,1,1,stray total
TRIALS BREAKOUT,,,,,,,
Trial Conversions,12%,,,,,,
";

fn config(dir: &Path, quarters: &[&str]) -> Result<RunConfig> {
    let in_csv = dir.join("wide.csv");
    fs::write(&in_csv, WIDE)?;
    Ok(RunConfig {
        in_csv,
        quarters: quarters.iter().map(|q| q.to_string()).collect(),
        out_csv: dir.join("long.csv"),
        mappings: Mappings::default(),
    })
}

#[test]
fn two_quarters_in_request_order() -> Result<()> {
    let dir = tempdir()?;
    let cfg = config(dir.path(), &["Q4'25", "Q3'25"])?;
    let summary = run(&cfg)?;

    let text = fs::read_to_string(&cfg.out_csv)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Date,Target,Channel,Quarter,Fcst_Actual,category",
            "2025-10-01,1000.0,DTC Orders,q4_25,forecast,memberships_sold",
            "2025-10-01,8.0,Gross New Members Added,q4_25,forecast,memberships_sold",
            "2025-11-01,9.0,Gross New Members Added,q4_25,forecast,memberships_sold",
            "2025-12-01,10.0,Gross New Members Added,q4_25,forecast,memberships_sold",
            "2025-07-01,100.0,DTC Orders,q3_25,forecast,memberships_sold",
            "2025-09-01,200.0,DTC Orders,q3_25,forecast,memberships_sold",
            "2025-07-01,1234.5,Gross New Members Added,q3_25,forecast,memberships_sold",
            "2025-09-01,7.0,Gross New Members Added,q3_25,forecast,memberships_sold",
            "2025-07-01,12.0,Trial Conversions,q3_25,forecast,trials_breakout",
        ]
    );
    assert_eq!(summary.rows, 9);
    assert_eq!(
        summary.per_quarter,
        vec![("Q4'25".to_string(), 4), ("Q3'25".to_string(), 5)]
    );
    Ok(())
}

#[test]
fn missing_quarter_aborts_without_output() -> Result<()> {
    let dir = tempdir()?;
    let cfg = config(dir.path(), &["Q3'25", "Q5'25"])?;
    let err = run(&cfg).unwrap_err();

    let extract = err.downcast_ref::<ExtractError>().expect("typed error");
    assert_eq!(
        extract,
        &ExtractError::MissingColumn {
            quarter: "Q5'25".into(),
            column: "Q5'25".into(),
        }
    );
    assert!(!cfg.out_csv.exists());
    Ok(())
}

#[test]
fn no_quarters_writes_header_only() -> Result<()> {
    let dir = tempdir()?;
    let cfg = config(dir.path(), &[])?;
    let summary = run(&cfg)?;
    assert_eq!(summary.rows, 0);
    assert_eq!(
        fs::read_to_string(&cfg.out_csv)?,
        "Date,Target,Channel,Quarter,Fcst_Actual,category\n"
    );
    Ok(())
}

#[test]
fn mappings_file_changes_output() -> Result<()> {
    let dir = tempdir()?;
    let mut cfg = config(dir.path(), &["Q3'25"])?;
    let yaml = dir.path().join("mappings.yaml");
    fs::write(
        &yaml,
        "channel_renames:\n  Direct: Direct Orders\nexcluded_channels: []\n",
    )?;
    cfg.mappings = Mappings::from_yaml_file(&yaml)?;
    run(&cfg)?;

    let text = fs::read_to_string(&cfg.out_csv)?;
    assert!(text.contains("2025-07-01,100.0,Direct Orders,q3_25,forecast,memberships_sold"));
    assert!(text.contains("Other Membership Sold Breakout"));
    assert!(!text.contains("Gross New Members Added"));
    Ok(())
}
