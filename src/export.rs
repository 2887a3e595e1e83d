//! Export helpers for the selected group's member list.
//!
//! - `save_print_document` writes a plain-text document ready to print.
//! - `save_spreadsheet_csv` writes a two-column (first name, last name) sheet.
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::principal::PrincipalName;

/// Split a display name on its first space. Names without a space have an
/// empty last name.
pub fn split_display_name(name: &str) -> (&str, &str) {
    name.split_once(' ').unwrap_or((name, ""))
}

/// File-name friendly form of a group name. Characters other than letters
/// and digits become `_`; when that changes the name, a hash of the original
/// is appended so "A B" and "A_B" do not share a file name.
pub fn export_file_stem(group: &str) -> String {
    let stem: String = group
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if stem == group {
        return stem;
    }
    let mut hasher = DefaultHasher::new();
    group.hash(&mut hasher);
    format!("{}-{:08x}", stem, hasher.finish() as u32)
}

pub fn render_print_document(group: &str, members: &[PrincipalName]) -> String {
    let mut out = format!("Users in Group {}:\n  \n", group);
    for m in members {
        out.push_str(m);
        out.push('\n');
    }
    out
}

pub fn save_print_document<P: AsRef<Path>>(
    group: &str,
    members: &[PrincipalName],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    f.write_all(render_print_document(group, members).as_bytes())?;
    Ok(())
}

pub fn save_spreadsheet_csv<P: AsRef<Path>>(
    group: &str,
    members: &[PrincipalName],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    let title = format!("{} Group Members", group);
    wtr.write_record([title.as_str(), ""])?;
    wtr.write_record(["First Name", "Last Name"])?;
    for m in members {
        let (first, last) = split_display_name(m);
        wtr.write_record([first, last])?;
    }
    wtr.flush()?;
    Ok(())
}
