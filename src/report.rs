//! Human-readable report rendering for terminal output.
//!
//! Produces the group catalog listing and the member list for a selected
//! group, with a short summary of how many names the presentation filter hid.
use colored::*;

use crate::principal::{GroupName, PrincipalName};

const TITLE: &str = "Roster: Directory Group Membership";

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

pub fn render_catalog(groups: &[GroupName]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", TITLE.bold().cyan()));
    out.push_str(&section_header(
        &format!("Groups ({})", groups.len()).bold().yellow().to_string(),
    ));
    if groups.is_empty() {
        out.push_str("(No groups found)\n");
    }
    for g in groups {
        out.push_str(&format!("  {}\n", g));
    }
    out
}

/// Render the visible members of `group`. `hidden` is the number of resolved
/// members removed by the presentation filter.
pub fn render_members(group: &str, members: &[PrincipalName], hidden: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", TITLE.bold().cyan()));
    out.push_str(&section_header(
        &format!("Users in Group {}", group).bold().yellow().to_string(),
    ));
    if members.is_empty() {
        out.push_str(&format!("{}\n", "(No members)".dimmed()));
    }
    for m in members {
        out.push_str(&format!("  {}\n", m));
    }
    out.push_str(&section_header(&"Summary".bold().blue().to_string()));
    out.push_str(&format!("Shown: {}\n", members.len()));
    out.push_str(&format!("Hidden by filter: {}\n", hidden));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::filter::MemberFilter;

    #[test]
    fn snapshot_member_report() {
        colored::control::set_override(false);
        let mut e = Engine::new();
        e.load_from_strings(&["object_class,display_name,member_of\n\
             user,Bob Smith,Finance\n\
             user,Amy Lee,Finance\n\
             user,Printer Likeness,Finance\n\
             group,FinanceLeads,Finance\n\
             user,Amy Lee,FinanceLeads\n\
             user,Carl Jones,FinanceLeads\n"])
            .unwrap();
        let all = e.resolve_members("Finance").unwrap();
        let shown = MemberFilter::default().apply(&all);
        let s = render_members("Finance", &shown, all.len() - shown.len());
        insta::assert_snapshot!("member_report", s);
    }

    #[test]
    fn catalog_lists_groups_in_given_order() {
        let groups: Vec<GroupName> = vec!["Admins".into(), "Finance".into()];
        let s = render_catalog(&groups);
        assert!(s.contains("Groups (2)"));
        let admins = s.find("  Admins").unwrap();
        let finance = s.find("  Finance").unwrap();
        assert!(admins < finance);
        assert!(render_catalog(&[]).contains("(No groups found)"));
    }

    #[test]
    fn empty_member_list_has_placeholder() {
        let s = render_members("Empty", &[], 2);
        assert!(s.contains("(No members)"));
        assert!(s.contains("Hidden by filter: 2"));
    }

    #[test]
    fn header_underline_ignores_ansi_codes() {
        assert_eq!(visible_len("\u{1b}[1;33mSummary\u{1b}[0m"), 7);
    }
}
