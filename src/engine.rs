//! Engine: loads directory exports into an in-memory directory and answers
//! catalog and membership queries against it.
//!
//! Typical usage:
//!
//! ```no_run
//! use roster::engine::Engine;
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = Engine::new();
//! engine.load_from_file_paths(&["/path/to/export.csv"])?;
//! for name in engine.resolve_members("Finance")? {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::catalog::list_all_groups;
use crate::directory::{DirectoryError, InMemoryDirectory};
use crate::dump::{ParsedDump, parse_dump_contents, parse_dump_reader};
use crate::principal::{GroupName, PrincipalName};
use crate::resolver::{Resolution, resolve};

/// Per-load counters reported with `--log-parse-stats`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub records: usize,
    pub malformed: usize,
}

#[derive(Debug, Default)]
pub struct Engine {
    pub directory: InMemoryDirectory,
    pub parse_stats: Option<ParseStats>,
}

fn parse_dump_file(path: &Path) -> Result<ParsedDump> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let parsed = parse_dump_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parse {}", path.display()))?;
    log::info!(
        "{}: {} records, {} malformed rows skipped",
        path.display(),
        parsed.records.len(),
        parsed.malformed
    );
    Ok(parsed)
}

impl Engine {
    pub fn new() -> Self {
        Self {
            directory: InMemoryDirectory::new(),
            parse_stats: None,
        }
    }

    fn absorb(&mut self, parsed: Vec<ParsedDump>) {
        let mut stats = ParseStats::default();
        let mut directory = InMemoryDirectory::new();
        for dump in parsed {
            stats.records += dump.records.len();
            stats.malformed += dump.malformed;
            directory.extend(dump.records);
        }
        self.directory = directory;
        self.parse_stats = Some(stats);
    }

    /// Load exports already in memory. Intended for tests and small
    /// programmatic integrations.
    pub fn load_from_strings(&mut self, dumps: &[&str]) -> Result<()> {
        let parsed = dumps
            .iter()
            .map(|d| parse_dump_contents(d))
            .collect::<Result<Vec<_>, _>>()?;
        self.absorb(parsed);
        Ok(())
    }

    /// Load export files one after another. Any unreadable file fails the
    /// whole load.
    pub fn load_from_file_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        let parsed = paths
            .iter()
            .map(|p| parse_dump_file(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.absorb(parsed);
        Ok(())
    }

    /// Parse export files in parallel; records are merged in input order so
    /// the result matches [`Engine::load_from_file_paths`].
    pub fn load_from_file_paths_parallel<P: AsRef<Path> + Sync>(
        &mut self,
        paths: &[P],
    ) -> Result<()> {
        let parsed = paths
            .par_iter()
            .map(|p| parse_dump_file(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.absorb(parsed);
        Ok(())
    }

    pub fn list_all_groups(&self) -> Result<Vec<GroupName>, DirectoryError> {
        list_all_groups(&self.directory)
    }

    pub fn resolve(&self, group: &str) -> Result<Resolution, DirectoryError> {
        resolve(&self.directory, group)
    }

    pub fn resolve_members(&self, group: &str) -> Result<Vec<PrincipalName>, DirectoryError> {
        self.resolve(group).map(|r| r.members)
    }
}
