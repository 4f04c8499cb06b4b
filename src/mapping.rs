// src/mapping.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

/// Source labels renamed on output so they match the database channel names.
static DEFAULT_CHANNEL_RENAMES: &[(&str, &str)] = &[
    ("TOTAL MEMBERSHIP SOLD", "Gross New Members Added"),
    ("Direct", "DTC Orders"),
    ("Trial Conversions", "Trial Conversions"),
    ("Wholesale", "Wholesale Orders"),
    ("Other", "Other Membership Orders"),
];

/// ALL-CAPS labels that are data rows, not category headers.
static DEFAULT_HEADER_EXCEPTIONS: &[&str] = &["TOTAL MEMBERSHIP SOLD"];

/// Resolved channel names whose rows are dropped entirely.
static DEFAULT_EXCLUDED_CHANNELS: &[&str] = &["Other Membership Sold Breakout"];

/// snake_case category tokens rewritten after derivation.
static DEFAULT_CATEGORY_ALIASES: &[(&str, &str)] = &[("membership_sold", "memberships_sold")];

/// Lookup tables consulted by the quarter extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Mappings {
    pub channel_renames: BTreeMap<String, String>,
    pub header_exceptions: BTreeSet<String>,
    pub excluded_channels: BTreeSet<String>,
    pub category_aliases: BTreeMap<String, String>,
}

impl Default for Mappings {
    fn default() -> Self {
        Mappings {
            channel_renames: to_map(DEFAULT_CHANNEL_RENAMES),
            header_exceptions: to_set(DEFAULT_HEADER_EXCEPTIONS),
            excluded_channels: to_set(DEFAULT_EXCLUDED_CHANNELS),
            category_aliases: to_map(DEFAULT_CATEGORY_ALIASES),
        }
    }
}

impl Mappings {
    /// Load overrides from a YAML file. Sections the file leaves out keep their built-in values.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading mappings file {:?}", path.as_ref()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing mappings file {:?}", path.as_ref()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Output channel for a row label; labels without a rename pass through.
    pub fn channel_for<'a>(&'a self, label: &'a str) -> &'a str {
        self.channel_renames
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }

    pub fn is_header_exception(&self, label: &str) -> bool {
        self.header_exceptions.contains(label)
    }

    pub fn is_excluded_channel(&self, channel: &str) -> bool {
        self.excluded_channels.contains(channel)
    }

    /// Apply the category alias table to an already snake_cased token.
    pub fn category_alias(&self, token: String) -> String {
        match self.category_aliases.get(&token) {
            Some(alias) => alias.clone(),
            None => token,
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables() {
        let m = Mappings::default();
        assert_eq!(m.channel_for("Direct"), "DTC Orders");
        assert_eq!(m.channel_for("TOTAL MEMBERSHIP SOLD"), "Gross New Members Added");
        assert_eq!(m.channel_for("Retail"), "Retail");
        assert!(m.is_header_exception("TOTAL MEMBERSHIP SOLD"));
        assert!(!m.is_header_exception("MEMBERSHIP TOTALS"));
        assert!(m.is_excluded_channel("Other Membership Sold Breakout"));
        assert_eq!(m.category_alias("membership_sold".into()), "memberships_sold");
        assert_eq!(m.category_alias("trials_breakout".into()), "trials_breakout");
    }

    #[test]
    fn yaml_overrides_only_given_sections() -> Result<()> {
        let m = Mappings::from_yaml_str(
            "channel_renames:\n  Retail: Retail Orders\nheader_exceptions:\n  - TOTAL TRIALS\n",
        )?;
        assert_eq!(m.channel_for("Retail"), "Retail Orders");
        assert_eq!(m.channel_for("Direct"), "Direct");
        assert!(m.is_header_exception("TOTAL TRIALS"));
        assert!(!m.is_header_exception("TOTAL MEMBERSHIP SOLD"));
        assert_eq!(m.excluded_channels, Mappings::default().excluded_channels);
        Ok(())
    }

    #[test]
    fn empty_yaml_is_defaults() -> Result<()> {
        assert_eq!(Mappings::from_yaml_str("  \n")?, Mappings::default());
        Ok(())
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(Mappings::from_yaml_str("channel_rename: {}\n").is_err());
    }
}
