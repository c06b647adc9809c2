//! Caller-owned ledger snapshot with explicit reload.
//!
//! The snapshot is keyed by the file's modification time and size: asking for
//! the ledger again returns the cached copy until the file changes on disk.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use tally_core::{Ledger, RuleTable};

use crate::error::{LoadError, Result};
use crate::parsers::load_ledger;
use crate::types::LoadOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

#[derive(Debug)]
pub struct LedgerSource {
    path: PathBuf,
    rules: RuleTable,
    options: LoadOptions,
    cached: Option<(Fingerprint, Ledger)>,
    generation: u64,
}

impl LedgerSource {
    pub fn new(path: impl Into<PathBuf>, rules: RuleTable, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            rules,
            options,
            cached: None,
            generation: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the ledger has been built from disk
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current snapshot, rebuilt only if the file changed since the last load
    pub fn ledger(&mut self) -> Result<&Ledger> {
        let current = self.fingerprint()?;
        let stale = match &self.cached {
            Some((seen, _)) => *seen != current,
            None => true,
        };
        if stale {
            self.rebuild(current)?;
        } else {
            debug!("ledger cache hit for {}", self.path.display());
        }
        self.snapshot()
    }

    /// Rebuild the snapshot from disk regardless of the cache
    pub fn reload(&mut self) -> Result<&Ledger> {
        let current = self.fingerprint()?;
        self.rebuild(current)?;
        self.snapshot()
    }

    /// Swap the rule table; the next `ledger()` call reclassifies
    pub fn set_rules(&mut self, rules: RuleTable) {
        self.rules = rules;
        self.invalidate();
    }

    /// Drop the cached snapshot
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    fn rebuild(&mut self, fingerprint: Fingerprint) -> Result<()> {
        let ledger = load_ledger(&self.path, self.rules.clone(), self.options)?;
        self.generation += 1;
        info!(
            "loaded {} transactions from {}",
            ledger.len(),
            self.path.display()
        );
        self.cached = Some((fingerprint, ledger));
        Ok(())
    }

    /// Last loaded snapshot without checking the file
    pub fn current(&self) -> Option<&Ledger> {
        self.cached.as_ref().map(|(_, ledger)| ledger)
    }

    fn snapshot(&self) -> Result<&Ledger> {
        self.current()
            .ok_or_else(|| LoadError::NotFound(self.path.clone()))
    }

    fn fingerprint(&self) -> Result<Fingerprint> {
        let meta = std::fs::metadata(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(self.path.clone())
            } else {
                LoadError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let modified = meta.modified().map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(Fingerprint {
            modified,
            len: meta.len(),
        })
    }
}
