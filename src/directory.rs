//! Read-only view of a directory service.
//!
//! The resolver and catalog only ever talk to a [`Directory`]; the crate ships
//! [`InMemoryDirectory`], populated from directory export records.
use std::collections::{HashMap, HashSet};

use crate::dump::DumpRecord;
use crate::principal::{GroupName, Principal};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unreachable: {0}")]
    Connectivity(String),
}

/// Opaque reference to a group returned by [`Directory::find_group_by_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHandle {
    name: GroupName,
}

impl GroupHandle {
    pub fn new(name: impl Into<GroupName>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub trait Directory {
    /// Display names of every group entry. Groups without a display name are
    /// reported as `None`.
    fn find_all_groups(&self) -> Result<Vec<Option<GroupName>>, DirectoryError>;

    /// Look a group up by display name. `Ok(None)` means the group does not
    /// exist.
    fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, DirectoryError>;

    /// Direct (non-transitive) members of a group.
    fn direct_members(&self, group: &GroupHandle) -> Result<Vec<Principal>, DirectoryError>;
}

#[derive(Debug, Default, Clone)]
struct GroupMembers {
    list: Vec<Principal>,
    seen: HashSet<Principal>,
}

/// Directory held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    /// Group entries in first-seen order; `None` for unnamed groups.
    groups: Vec<Option<GroupName>>,
    members: HashMap<GroupName, GroupMembers>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I: IntoIterator<Item = DumpRecord>>(records: I) -> Self {
        let mut dir = Self::new();
        dir.extend(records);
        dir
    }

    /// Register a group entry. Named groups are registered once.
    pub fn add_group(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                if !self.members.contains_key(name) {
                    self.members.insert(name.to_string(), GroupMembers::default());
                    self.groups.push(Some(name.to_string()));
                }
            }
            None => self.groups.push(None),
        }
    }

    /// Record `member` as a direct member of `group`, registering the group if
    /// it was not seen yet. Repeated memberships are stored once.
    pub fn add_member(&mut self, group: &str, member: Principal) {
        self.add_group(Some(group));
        if let Some(entry) = self.members.get_mut(group) {
            if entry.seen.insert(member.clone()) {
                entry.list.push(member);
            }
        }
    }

    /// Group entries registered so far, unnamed ones included.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Extend<DumpRecord> for InMemoryDirectory {
    fn extend<I: IntoIterator<Item = DumpRecord>>(&mut self, records: I) {
        for record in records {
            if record.principal.is_group() {
                self.add_group(record.principal.name());
            }
            if let Some(parent) = record.member_of {
                self.add_member(&parent, record.principal);
            }
        }
    }
}

impl Directory for InMemoryDirectory {
    fn find_all_groups(&self) -> Result<Vec<Option<GroupName>>, DirectoryError> {
        Ok(self.groups.clone())
    }

    fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, DirectoryError> {
        Ok(self
            .members
            .contains_key(name)
            .then(|| GroupHandle::new(name)))
    }

    fn direct_members(&self, group: &GroupHandle) -> Result<Vec<Principal>, DirectoryError> {
        Ok(self
            .members
            .get(group.name())
            .map(|entry| entry.list.clone())
            .unwrap_or_default())
    }
}
