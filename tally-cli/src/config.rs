use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{CategoryRule, Labels, LocaleTable, RuleTable, DEFAULT_LOCALE};
use tally_finance::TOP_EXPENSES;
use tally_ingest::LoadOptions;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSection,
    pub report: ReportSection,
    /// Classification order is the order listed here
    pub categories: Vec<CategoryRule>,
    /// Extra or replacement label sets, keyed by locale code
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub locales: BTreeMap<String, Labels>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Ledger CSV read by `tally report`
    pub path: PathBuf,
    /// Drop unparseable rows instead of failing
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub top: usize,
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataSection::default(),
            report: ReportSection::default(),
            categories: RuleTable::default().rules().to_vec(),
            locales: BTreeMap::new(),
        }
    }
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("finance_data.csv"),
            skip_invalid: false,
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top: TOP_EXPENSES,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Config {
    /// Validated rule table; an empty `categories` list means the built-in table
    pub fn rule_table(&self) -> Result<RuleTable> {
        if self.categories.is_empty() {
            return Ok(RuleTable::default());
        }
        RuleTable::new(self.categories.clone()).context("invalid [[categories]] in config")
    }

    /// Built-in locales with any configured ones layered on top
    pub fn locale_table(&self) -> LocaleTable {
        let mut table = LocaleTable::default();
        for (code, labels) in &self.locales {
            table.insert(code.clone(), labels.clone());
        }
        table
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip_invalid: self.data.skip_invalid,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

/// Load from `path`, or the default location; a missing file means defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
