//! Membership resolution: flatten a group's nested membership into the set of
//! leaf principals reachable from it.
//!
//! The walk is a depth-first expansion keyed by display name, driven by an
//! explicit stack so nesting depth is bounded only by memory. Every call owns
//! its own [`MemberSet`] and visited-group set, so nothing leaks between two
//! resolutions and cyclic or diamond-shaped group graphs terminate after each
//! group has been expanded once.
//!
//! ```
//! use roster::directory::InMemoryDirectory;
//! use roster::principal::Principal;
//! use roster::resolver::resolve_members;
//!
//! let mut dir = InMemoryDirectory::new();
//! dir.add_member("Finance", Principal::user("Bob Smith"));
//! dir.add_member("Finance", Principal::group("FinanceLeads"));
//! dir.add_member("FinanceLeads", Principal::user("Amy Lee"));
//! assert_eq!(
//!     resolve_members(&dir, "Finance").unwrap(),
//!     vec!["Amy Lee", "Bob Smith"]
//! );
//! ```
use std::collections::HashSet;

use crate::directory::{Directory, DirectoryError};
use crate::principal::{GroupName, PrincipalName};

/// De-duplicated leaf names collected during one resolution. Unordered until
/// [`MemberSet::into_sorted`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemberSet {
    names: HashSet<PrincipalName>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: PrincipalName) -> bool {
        self.names.insert(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_sorted(self) -> Vec<PrincipalName> {
        let mut names: Vec<PrincipalName> = self.names.into_iter().collect();
        names.sort();
        names
    }
}

/// Counters describing one resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    pub groups_expanded: usize,
    /// Expansions skipped because the group was already visited (cycles and
    /// diamonds).
    pub groups_revisited: usize,
    pub groups_not_found: usize,
    pub unnamed_members: usize,
    pub duplicate_members: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub members: Vec<PrincipalName>,
    pub stats: ResolveStats,
}

struct Walk<'a, D: ?Sized> {
    directory: &'a D,
    members: MemberSet,
    visited: HashSet<GroupName>,
    /// Groups still to expand. Nested groups are pushed in reverse so they
    /// are popped in directory order.
    pending: Vec<GroupName>,
    stats: ResolveStats,
}

impl<D: Directory + ?Sized> Walk<'_, D> {
    fn run(&mut self, root: &str) -> Result<(), DirectoryError> {
        self.pending.push(root.to_string());
        while let Some(group) = self.pending.pop() {
            self.expand(group)?;
        }
        Ok(())
    }

    fn expand(&mut self, group: GroupName) -> Result<(), DirectoryError> {
        if !self.visited.insert(group.clone()) {
            log::debug!("group {:?} already expanded, skipping", group);
            self.stats.groups_revisited += 1;
            return Ok(());
        }
        let Some(handle) = self.directory.find_group_by_name(&group)? else {
            log::debug!("group {:?} not found, contributes no members", group);
            self.stats.groups_not_found += 1;
            return Ok(());
        };
        self.stats.groups_expanded += 1;
        let mut nested = Vec::new();
        for member in self.directory.direct_members(&handle)? {
            let is_group = member.is_group();
            let Some(name) = member.display_name else {
                log::debug!(
                    "skipping unnamed {} in group {:?}",
                    member.structural_class,
                    group
                );
                self.stats.unnamed_members += 1;
                continue;
            };
            if is_group {
                nested.push(name);
            } else if !self.members.insert(name) {
                self.stats.duplicate_members += 1;
            }
        }
        self.pending.extend(nested.into_iter().rev());
        Ok(())
    }
}

/// Resolve the full leaf membership of `root` along with traversal counters.
///
/// A root or nested group that does not exist contributes nothing. A
/// connectivity failure on any lookup aborts the whole call.
pub fn resolve<D: Directory + ?Sized>(
    directory: &D,
    root: &str,
) -> Result<Resolution, DirectoryError> {
    let mut walk = Walk {
        directory,
        members: MemberSet::new(),
        visited: HashSet::new(),
        pending: Vec::new(),
        stats: ResolveStats::default(),
    };
    walk.run(root)?;
    if walk.members.is_empty() {
        log::debug!("group {:?} has no leaf members", root);
    }
    log::info!(
        "resolved {:?}: {} members from {} groups ({} revisits skipped, {} not found)",
        root,
        walk.members.len(),
        walk.stats.groups_expanded,
        walk.stats.groups_revisited,
        walk.stats.groups_not_found
    );
    Ok(Resolution {
        members: walk.members.into_sorted(),
        stats: walk.stats,
    })
}

/// Sorted, de-duplicated leaf members of `root`, unfiltered.
pub fn resolve_members<D: Directory + ?Sized>(
    directory: &D,
    root: &str,
) -> Result<Vec<PrincipalName>, DirectoryError> {
    resolve(directory, root).map(|r| r.members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{GroupHandle, InMemoryDirectory};
    use crate::principal::Principal;

    fn finance() -> InMemoryDirectory {
        let mut dir = InMemoryDirectory::new();
        dir.add_member("Finance", Principal::user("Bob Smith"));
        dir.add_member("Finance", Principal::user("Amy Lee"));
        dir.add_member("Finance", Principal::group("FinanceLeads"));
        dir.add_member("FinanceLeads", Principal::user("Amy Lee"));
        dir.add_member("FinanceLeads", Principal::user("Carl Jones"));
        dir
    }

    #[test]
    fn flattens_nested_groups_sorted_and_deduplicated() {
        let r = resolve(&finance(), "Finance").unwrap();
        assert_eq!(r.members, vec!["Amy Lee", "Bob Smith", "Carl Jones"]);
        assert_eq!(r.stats.groups_expanded, 2);
        assert_eq!(r.stats.duplicate_members, 1);
    }

    #[test]
    fn repeated_calls_do_not_accumulate() {
        let dir = finance();
        let first = resolve_members(&dir, "Finance").unwrap();
        let leads = resolve_members(&dir, "FinanceLeads").unwrap();
        let second = resolve_members(&dir, "Finance").unwrap();
        assert_eq!(first, second);
        assert_eq!(leads, vec!["Amy Lee", "Carl Jones"]);
    }

    #[test]
    fn mutual_cycle_terminates() {
        let mut dir = InMemoryDirectory::new();
        dir.add_member("A", Principal::group("B"));
        dir.add_member("B", Principal::group("A"));
        dir.add_member("B", Principal::user("U"));
        let r = resolve(&dir, "A").unwrap();
        assert_eq!(r.members, vec!["U"]);
        assert_eq!(r.stats.groups_revisited, 1);
    }

    #[test]
    fn self_membership_terminates() {
        let mut dir = InMemoryDirectory::new();
        dir.add_member("Loop", Principal::group("Loop"));
        dir.add_member("Loop", Principal::user("U"));
        assert_eq!(resolve_members(&dir, "Loop").unwrap(), vec!["U"]);
    }

    #[test]
    fn diamond_yields_member_once() {
        let mut dir = InMemoryDirectory::new();
        dir.add_member("Root", Principal::group("B"));
        dir.add_member("Root", Principal::group("C"));
        dir.add_member("B", Principal::user("U"));
        dir.add_member("C", Principal::user("U"));
        dir.add_member("C", Principal::group("B"));
        let r = resolve(&dir, "Root").unwrap();
        assert_eq!(r.members, vec!["U"]);
        assert_eq!(r.stats.groups_expanded, 3);
    }

    #[test]
    fn unknown_root_and_nested_groups_contribute_nothing() {
        let mut dir = finance();
        assert!(resolve_members(&dir, "NoSuchGroup").unwrap().is_empty());

        dir.add_member("Finance", Principal::group("Deleted Group"));
        let r = resolve(&dir, "Finance").unwrap();
        assert_eq!(r.members, vec!["Amy Lee", "Bob Smith", "Carl Jones"]);
        assert_eq!(r.stats.groups_not_found, 1);
    }

    #[test]
    fn reaches_leaves_at_any_depth() {
        let mut dir = InMemoryDirectory::new();
        for depth in 0..50 {
            let group = format!("Level{:02}", depth);
            dir.add_member(&group, Principal::group(&format!("Level{:02}", depth + 1)));
            dir.add_member(&group, Principal::user(&format!("User{:02}", depth)));
        }
        let members = resolve_members(&dir, "Level00").unwrap();
        assert_eq!(members.len(), 50);
        assert_eq!(members.first().map(String::as_str), Some("User00"));
        assert_eq!(members.last().map(String::as_str), Some("User49"));
    }

    #[test]
    fn very_deep_chain_does_not_exhaust_the_stack() {
        let depth = 100_000;
        let mut dir = InMemoryDirectory::new();
        for i in 0..depth {
            let group = format!("G{}", i);
            dir.add_member(&group, Principal::group(&format!("G{}", i + 1)));
            dir.add_member(&group, Principal::user(&format!("U{}", i)));
        }
        let r = resolve(&dir, "G0").unwrap();
        assert_eq!(r.members.len(), depth);
        assert_eq!(r.stats.groups_expanded, depth);
        assert_eq!(r.stats.groups_not_found, 1);
        assert!(r.members.binary_search(&"U99999".to_string()).is_ok());
    }

    #[test]
    fn keeps_every_leaf_class_and_skips_unnamed_entries() {
        let mut dir = InMemoryDirectory::new();
        dir.add_member("Printers", Principal::user("Dana Likely"));
        dir.add_member("Printers", Principal::from_export("computer", "PRN-01$"));
        dir.add_member("Printers", Principal::from_export("user", ""));
        dir.add_member("Printers", Principal::from_export("group", ""));
        let r = resolve(&dir, "Printers").unwrap();
        assert_eq!(r.members, vec!["Dana Likely", "PRN-01$"]);
        assert_eq!(r.stats.unnamed_members, 2);
    }

    #[derive(Clone, Copy)]
    enum Outage {
        Lookup,
        Members,
    }

    struct FailsOn(InMemoryDirectory, &'static str, Outage);

    impl Directory for FailsOn {
        fn find_all_groups(&self) -> Result<Vec<Option<GroupName>>, DirectoryError> {
            self.0.find_all_groups()
        }
        fn find_group_by_name(&self, name: &str) -> Result<Option<GroupHandle>, DirectoryError> {
            if name == self.1 && matches!(self.2, Outage::Lookup) {
                return Err(DirectoryError::Connectivity(format!("lookup of {} timed out", name)));
            }
            self.0.find_group_by_name(name)
        }
        fn direct_members(&self, group: &GroupHandle) -> Result<Vec<Principal>, DirectoryError> {
            if group.name() == self.1 && matches!(self.2, Outage::Members) {
                return Err(DirectoryError::Connectivity(format!(
                    "member query for {} reset by peer",
                    group.name()
                )));
            }
            self.0.direct_members(group)
        }
    }

    #[test]
    fn connectivity_failure_in_nested_lookup_aborts() {
        let dir = FailsOn(finance(), "FinanceLeads", Outage::Lookup);
        let err = resolve_members(&dir, "Finance").unwrap_err();
        assert!(err.to_string().contains("lookup of FinanceLeads"));
    }

    #[test]
    fn connectivity_failure_in_nested_member_query_aborts() {
        let dir = FailsOn(finance(), "FinanceLeads", Outage::Members);
        let err = resolve(&dir, "Finance").unwrap_err();
        assert!(matches!(err, DirectoryError::Connectivity(_)));
        assert!(err.to_string().contains("member query for FinanceLeads"));
        assert!(resolve_members(&dir, "Payroll").unwrap().is_empty());
    }

    #[test]
    fn member_set_reports_duplicates() {
        let mut set = MemberSet::new();
        assert!(set.is_empty());
        assert!(set.insert("Bob Smith".to_string()));
        assert!(!set.insert("Bob Smith".to_string()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.into_sorted(), vec!["Bob Smith"]);
    }
}
