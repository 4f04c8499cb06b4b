// src/write.rs
use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::extract::{LongRecord, LONG_HEADERS};

/// Serialize `records` as the long CSV. The header row is written even when
/// there are no records.
pub fn write_long<W: Write>(out: W, records: &[LongRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(LONG_HEADERS)?;
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the long CSV to `path`.
///
/// Goes through a temp file beside `path` and renames it into place, so a failed
/// write never leaves a half-written output behind.
pub fn write_long_csv<P: AsRef<Path>>(path: P, records: &[LongRecord]) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "out.csv".to_string());
    let tmp_path: PathBuf = path.with_file_name(format!(".{}.tmp", file_name));

    let tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {:?}", tmp_path))?;
    if let Err(e) = write_long(tmp, records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.context(format!("writing {:?}", tmp_path)));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path));
    }

    info!(path = %path.display(), rows = records.len(), "wrote long csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FcstActual;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn rec(target: f64, channel: &str) -> LongRecord {
        LongRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            target,
            channel: channel.into(),
            quarter: "q3_25".into(),
            fcst_actual: FcstActual::Forecast,
            category: "memberships_sold".into(),
        }
    }

    #[test]
    fn header_only_when_empty() -> Result<()> {
        let mut buf = Vec::new();
        write_long(&mut buf, &[])?;
        assert_eq!(
            String::from_utf8(buf)?,
            "Date,Target,Channel,Quarter,Fcst_Actual,category\n"
        );
        Ok(())
    }

    #[test]
    fn rows_are_formatted_and_quoted() -> Result<()> {
        let mut buf = Vec::new();
        write_long(&mut buf, &[rec(100.0, "DTC Orders"), rec(0.5, "Retail, Online")])?;
        let text = String::from_utf8(buf)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "2025-07-01,100.0,DTC Orders,q3_25,forecast,memberships_sold");
        assert_eq!(
            lines[2],
            "2025-07-01,0.5,\"Retail, Online\",q3_25,forecast,memberships_sold"
        );
        Ok(())
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("long.csv");
        // a non-empty directory in the way makes the rename fail
        fs::create_dir(&path)?;
        fs::write(path.join("keep"), "x")?;

        assert!(write_long_csv(&path, &[rec(1.0, "DTC Orders")]).is_err());
        assert!(!dir.path().join(".long.csv.tmp").exists());
        assert!(path.is_dir());
        Ok(())
    }

    #[test]
    fn file_is_renamed_into_place() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("long.csv");
        write_long_csv(&path, &[rec(1.0, "DTC Orders")])?;
        assert!(path.exists());
        assert!(!dir.path().join(".long.csv.tmp").exists());
        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }
}
