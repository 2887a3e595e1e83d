//! Directory export parsing.
//!
//! An export is a CSV file with the header `object_class,display_name,member_of`.
//! Every row is one principal; a non-empty `member_of` records a direct
//! membership of that principal in the named group. Lines starting with `#`
//! are comments and surrounding whitespace is ignored.
//!
//! ```text
//! object_class,display_name,member_of
//! group,Finance,
//! user,Bob Smith,Finance
//! group,FinanceLeads,Finance
//! user,Carl Jones,FinanceLeads
//! ```
use std::io::Read;

use serde::Deserialize;

use crate::principal::{GroupName, Principal};

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("missing object class for entry {0:?}")]
    MissingClass(String),
    #[error("malformed row: {0}")]
    Row(csv::Error),
    #[error("export header lacks the `{0}` column")]
    MissingColumn(&'static str),
    #[error("unreadable export: {0}")]
    Read(csv::Error),
}

/// Column every export must carry.
const REQUIRED_COLUMN: &str = "object_class";

#[derive(Debug, Deserialize)]
struct DumpRow {
    object_class: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    member_of: String,
}

/// One parsed export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRecord {
    pub principal: Principal,
    pub member_of: Option<GroupName>,
}

/// Records from one export plus the number of rows that were skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedDump {
    pub records: Vec<DumpRecord>,
    pub malformed: usize,
}

fn parse_dump_row(row: DumpRow) -> Result<DumpRecord, DumpError> {
    if row.object_class.trim().is_empty() {
        return Err(DumpError::MissingClass(row.display_name));
    }
    let member_of = row.member_of.trim();
    Ok(DumpRecord {
        principal: Principal::from_export(&row.object_class, &row.display_name),
        member_of: if member_of.is_empty() {
            None
        } else {
            Some(member_of.to_string())
        },
    })
}

/// Parse an export from any reader. Malformed rows are skipped and counted;
/// an unreadable source or a header without `object_class` fails the parse.
pub fn parse_dump_reader<R: Read>(reader: R) -> Result<ParsedDump, DumpError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(DumpError::Read)?;
    if !headers.iter().any(|h| h == REQUIRED_COLUMN) {
        return Err(DumpError::MissingColumn(REQUIRED_COLUMN));
    }
    let mut parsed = ParsedDump::default();
    for result in rdr.deserialize::<DumpRow>() {
        let row = match result {
            Ok(row) => Ok(row),
            Err(e) if e.is_io_error() => return Err(DumpError::Read(e)),
            Err(e) => Err(DumpError::Row(e)),
        };
        match row.and_then(parse_dump_row) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                log::debug!("skipping export row: {}", e);
                parsed.malformed += 1;
            }
        }
    }
    Ok(parsed)
}

pub fn parse_dump_contents(contents: &str) -> Result<ParsedDump, DumpError> {
    parse_dump_reader(contents.as_bytes())
}
