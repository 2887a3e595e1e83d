//! Presentation-side exclusion of member names.
//!
//! The resolver always returns complete membership; callers that want to hide
//! entries from the visible list run it through a [`MemberFilter`] first.
use regex::Regex;

use crate::principal::PrincipalName;

/// Names containing this literal are hidden by the default filter.
pub const DEFAULT_EXCLUDED_SUBSTRING: &str = "Like";

#[derive(Debug, Clone)]
enum Exclusion {
    Substring(String),
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct MemberFilter {
    exclude: Option<Exclusion>,
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self::excluding_substring(DEFAULT_EXCLUDED_SUBSTRING)
    }
}

impl MemberFilter {
    /// Keep every name.
    pub fn none() -> Self {
        Self { exclude: None }
    }

    /// Hide names containing `needle` (case-sensitive, literal).
    pub fn excluding_substring(needle: &str) -> Self {
        Self {
            exclude: Some(Exclusion::Substring(needle.to_string())),
        }
    }

    /// Hide names matching `pattern` anywhere.
    pub fn from_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            exclude: Some(Exclusion::Pattern(Regex::new(pattern)?)),
        })
    }

    pub fn keeps(&self, name: &str) -> bool {
        match &self.exclude {
            Some(Exclusion::Substring(needle)) => !name.contains(needle.as_str()),
            Some(Exclusion::Pattern(re)) => !re.is_match(name),
            None => true,
        }
    }

    /// Filtered copy of `names`, order preserved.
    pub fn apply(&self, names: &[PrincipalName]) -> Vec<PrincipalName> {
        names.iter().filter(|n| self.keeps(n)).cloned().collect()
    }
}
