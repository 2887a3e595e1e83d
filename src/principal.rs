//! Principal data model: directory entries (users, groups, anything else) as
//! seen through their display name and structural class.
//!
//! Display names double as the join key between a group and its members, so
//! `GroupName` and `PrincipalName` are plain strings rather than newtypes.
//!
//! Use [`Principal::from_export`] to build a principal from the raw columns of
//! a directory export and [`Principal::is_group`] to decide whether it should
//! be expanded or collected as a leaf.
use std::fmt;

/// Display name of a directory group.
pub type GroupName = String;
/// Display name of any directory entry.
pub type PrincipalName = String;

/// The directory's type tag for an entry. Only `group` is meaningful to the
/// resolver; every other class is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructuralClass {
    Group,
    Other(String),
}

impl StructuralClass {
    /// Class tag used by the directory for group entries.
    pub const GROUP: &'static str = "group";

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == Self::GROUP {
            StructuralClass::Group
        } else {
            StructuralClass::Other(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StructuralClass::Group => Self::GROUP,
            StructuralClass::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for StructuralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single directory entry as returned by a membership query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub display_name: Option<PrincipalName>,
    pub structural_class: StructuralClass,
}

impl Principal {
    /// Build a principal from raw export columns. Blank display names are
    /// treated as absent.
    pub fn from_export(object_class: &str, display_name: &str) -> Self {
        let display_name = display_name.trim();
        Self {
            display_name: if display_name.is_empty() {
                None
            } else {
                Some(display_name.to_string())
            },
            structural_class: StructuralClass::parse(object_class),
        }
    }

    pub fn user(display_name: &str) -> Self {
        Self::from_export("user", display_name)
    }

    pub fn group(display_name: &str) -> Self {
        Self::from_export(StructuralClass::GROUP, display_name)
    }

    pub fn is_group(&self) -> bool {
        self.structural_class == StructuralClass::Group
    }

    pub fn name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}
