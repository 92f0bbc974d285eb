//! Sheet-name resolution.
//!
//! Maps a (category, month, year, sub-tab) selection to a concrete
//! remote sheet name as an ordered chain of candidate rules evaluated
//! in sequence, stopping at the first match. Resolution is pure: for a
//! fixed known-name list the same selection always resolves the same
//! way.

use super::category::{Category, Selection};

/// Candidate month suffixes in priority order: year-qualified before
/// year-less, padded before unpadded. Suffix priority beats list
/// order.
pub fn candidate_suffixes(month: u32, year: i32) -> [String; 4] {
    [
        format!("-T{:02}-{}", month, year),
        format!("-T{}-{}", month, year),
        format!("-T{:02}", month),
        format!("-T{}", month),
    ]
}

fn find_containing(known: &[String], needles: &[&str]) -> Option<String> {
    known
        .iter()
        .find(|name| {
            let upper = name.to_uppercase();
            needles.iter().all(|needle| upper.contains(&needle.to_uppercase()))
        })
        .cloned()
}

/// Resolve the selection to a sheet name.
///
/// Returns an empty string when nothing can be resolved: an
/// operations sub-tab whose sheet was never created, or yearly
/// aggregate mode (the loader switches to a multi-sheet rollup).
/// Otherwise a canonical name is synthesized even though it is not
/// confirmed to exist remotely; a fetch failure for a synthesized name
/// means "not yet created", not an error to surface loudly.
pub fn resolve(selection: &Selection, known: &[String]) -> String {
    if selection.category == Category::Operations {
        let keyword = selection.operations_tab.keyword();
        return find_containing(known, &[keyword]).unwrap_or_default();
    }

    let keyword = selection.category.resolve_as().keyword();
    for suffix in candidate_suffixes(selection.month, selection.year) {
        if let Some(found) = find_containing(known, &[keyword, &suffix]) {
            return found;
        }
    }

    if selection.yearly {
        return String::new();
    }
    format!("{}-T{:02}-{}", keyword, selection.month, selection.year)
}

/// Resolve the leave sheet consulted by the plan fallbacks: the `BF`
/// naming first, then the alternate `BU` naming some workbooks use.
/// Only confirmed names qualify; nothing is synthesized here.
pub fn resolve_leave_sheet(month: u32, year: i32, known: &[String]) -> Option<String> {
    for keyword in ["BF", "BU"] {
        for suffix in candidate_suffixes(month, year) {
            if let Some(found) = find_containing(known, &[keyword, &suffix]) {
                return Some(found);
            }
        }
    }
    None
}

/// Resolve the report sheet of one month for the yearly rollup:
/// year-qualified forms first, then year-less.
pub fn resolve_report_for_month(month: u32, year: i32, known: &[String]) -> Option<String> {
    let keyword = Category::Report.keyword();
    let padded = format!("-T{:02}", month);
    let unpadded = format!("-T{}", month);
    let year_suffix = format!("-{}", year);
    known
        .iter()
        .find(|name| {
            let upper = name.to_uppercase();
            upper.contains(keyword)
                && upper.contains(&year_suffix)
                && (upper.contains(&padded) || upper.contains(&unpadded))
        })
        .or_else(|| {
            known.iter().find(|name| {
                let upper = name.to_uppercase();
                upper.contains(keyword)
                    && (upper.contains(&padded) || upper.contains(&unpadded))
            })
        })
        .cloned()
}

/// Month and optional year encoded in a sheet name
/// (`BC-T09-2025` -> (9, Some(2025)), `BF-T9` -> (9, None)).
pub fn parse_period(name: &str) -> Option<(u32, Option<i32>)> {
    let upper = name.to_uppercase();
    let start = upper.find("-T")? + 2;
    let rest = &upper[start..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let month: u32 = digits.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let tail = &rest[digits.len()..];
    let year = tail.strip_prefix('-').and_then(|t| {
        let year_digits: String = t.chars().take_while(|c| c.is_ascii_digit()).collect();
        if year_digits.len() == 4 {
            year_digits.parse::<i32>().ok()
        } else {
            None
        }
    });
    Some((month, year))
}

/// Sibling sheets of a target: every other known name sharing the
/// target's time period. Cross-category data for the same month is
/// pulled in through these.
pub fn related_names(target: &str, known: &[String]) -> Vec<String> {
    let Some((month, year)) = parse_period(target) else {
        return Vec::new();
    };
    known
        .iter()
        .filter(|name| name.as_str() != target)
        .filter(|name| match parse_period(name) {
            Some((m, y)) => {
                m == month
                    && match (year, y) {
                        (Some(a), Some(b)) => a == b,
                        _ => true,
                    }
            }
            None => false,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::category::OperationsTab;

    fn known(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn selection(category: Category, month: u32, year: i32) -> Selection {
        Selection::new(category, month, year)
    }

    #[test]
    fn resolve_is_deterministic() {
        let names = known(&["BC-T09-2025", "BF-T09-2025", "KH-T9"]);
        let sel = selection(Category::Report, 9, 2025);
        assert_eq!(resolve(&sel, &names), resolve(&sel, &names));
    }

    #[test]
    fn year_qualified_beats_year_less_even_when_less_padded() {
        let names = known(&["BC-T9-2025", "BC-T09"]);
        let sel = selection(Category::Report, 9, 2025);
        assert_eq!(resolve(&sel, &names), "BC-T9-2025");
    }

    #[test]
    fn suffix_priority_beats_list_order() {
        let names = known(&["BC-T9", "BC-T09-2025"]);
        let sel = selection(Category::Report, 9, 2025);
        assert_eq!(resolve(&sel, &names), "BC-T09-2025");
    }

    #[test]
    fn synthesizes_canonical_name_when_nothing_matches() {
        let sel = selection(Category::LeaveComp, 3, 2024);
        assert_eq!(resolve(&sel, &[]), "BF-T03-2024");
    }

    #[test]
    fn yearly_mode_resolves_to_empty() {
        let mut sel = selection(Category::Statistics, 3, 2024);
        sel.yearly = true;
        assert_eq!(resolve(&sel, &[]), "");
    }

    #[test]
    fn statistics_resolves_as_report() {
        let names = known(&["BC-T05-2025", "TH-T05-2025"]);
        let sel = selection(Category::Statistics, 5, 2025);
        assert_eq!(resolve(&sel, &names), "BC-T05-2025");
    }

    #[test]
    fn operations_matches_sub_tab_keyword_or_returns_empty() {
        let names = known(&["Sheet NV_CNTT 2025", "NV_DIDONG"]);
        let mut sel = selection(Category::Operations, 1, 2025);
        sel.operations_tab = OperationsTab::It;
        assert_eq!(resolve(&sel, &names), "Sheet NV_CNTT 2025");
        sel.operations_tab = OperationsTab::Online;
        assert_eq!(resolve(&sel, &names), "");
    }

    #[test]
    fn leave_sheet_falls_back_to_alternate_naming() {
        let names = known(&["BU-T09-2025", "BC-T09-2025"]);
        assert_eq!(
            resolve_leave_sheet(9, 2025, &names),
            Some("BU-T09-2025".to_string())
        );
        let names = known(&["BU-T09-2025", "BF-T09-2025"]);
        assert_eq!(
            resolve_leave_sheet(9, 2025, &names),
            Some("BF-T09-2025".to_string())
        );
        assert_eq!(resolve_leave_sheet(9, 2025, &[]), None);
    }

    #[test]
    fn parse_period_reads_month_and_year() {
        assert_eq!(parse_period("BC-T09-2025"), Some((9, Some(2025))));
        assert_eq!(parse_period("bf-t9"), Some((9, None)));
        assert_eq!(parse_period("NV_DIDONG"), None);
        assert_eq!(parse_period("BC-T13-2025"), None);
    }

    #[test]
    fn related_names_share_the_month() {
        let names = known(&[
            "BC-T09-2025",
            "BF-T09-2025",
            "KH-T9",
            "BC-T08-2025",
            "NV_DIDONG",
        ]);
        let related = related_names("BC-T09-2025", &names);
        assert_eq!(related, known(&["BF-T09-2025", "KH-T9"]));
    }

    #[test]
    fn yearly_rollup_prefers_year_qualified_report() {
        let names = known(&["BC-T03", "BC-T03-2024"]);
        assert_eq!(
            resolve_report_for_month(3, 2024, &names),
            Some("BC-T03-2024".to_string())
        );
        let names = known(&["BC-T03"]);
        assert_eq!(
            resolve_report_for_month(3, 2025, &names),
            Some("BC-T03".to_string())
        );
        assert_eq!(resolve_report_for_month(4, 2025, &names), None);
    }
}
