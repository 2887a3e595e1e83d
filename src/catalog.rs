//! Group catalog: the sorted list of selectable group names.
use crate::directory::{Directory, DirectoryError};
use crate::principal::GroupName;

/// Every named group in the directory, sorted ascending by ordinal string
/// comparison. Unnamed and blank entries are dropped.
pub fn list_all_groups<D: Directory + ?Sized>(
    directory: &D,
) -> Result<Vec<GroupName>, DirectoryError> {
    let mut names: Vec<GroupName> = directory
        .find_all_groups()?
        .into_iter()
        .flatten()
        .filter(|name| !name.trim().is_empty())
        .collect();
    names.sort();
    log::debug!("catalog holds {} named groups", names.len());
    Ok(names)
}
