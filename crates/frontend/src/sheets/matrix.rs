//! Calendar-matrix synthesis for the leave/plan day-grid views.
//!
//! These views do not exist as single remote sheets: one row per known
//! person is synthesized by merging same-person rows from the primary
//! sheet, the companion leave sheet and, for the plan view, entries
//! derived from date-matching report rows.

use std::collections::HashMap;

use contracts::sheets::fields::{person_key, person_name, row_value, PERSON_COLUMN};
use contracts::sheets::{SheetData, SheetRow};

use super::category::Category;
use super::dates;

/// Columns that identify the row rather than carry day content.
fn is_identity_column(key: &str) -> bool {
    key == "STT" || key == PERSON_COLUMN || key == "GV" || key == "Họ và tên"
}

fn rows_of_person<'a>(rows: &'a [SheetRow], key: &str) -> impl Iterator<Item = &'a SheetRow> {
    let key = key.to_string();
    rows.iter()
        .filter(move |row| person_name(row).map(person_key).as_deref() == Some(key.as_str()))
}

/// Build one matrix row per known person.
///
/// The person universe is the union of the configured roster and every
/// distinct name in the primary rows, sorted for stable output and
/// renumbered 1..N. Values from the primary sheet overwrite blanks;
/// for the plan category, days still blank fall back to the leave
/// sheet and then to report rows whose date matches the calendar day.
pub fn build_matrix(
    category: Category,
    month: u32,
    year: i32,
    primary_rows: &[SheetRow],
    roster: &[String],
    leave: Option<&SheetData>,
    report: Option<&SheetData>,
) -> Vec<SheetRow> {
    // Distinct person names, first spelling seen wins.
    let mut by_key: HashMap<String, String> = HashMap::new();
    for name in roster {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            by_key.entry(person_key(trimmed)).or_insert_with(|| trimmed.to_string());
        }
    }
    for row in primary_rows {
        if let Some(name) = person_name(row) {
            by_key
                .entry(person_key(name))
                .or_insert_with(|| name.trim().to_string());
        }
    }
    let mut persons: Vec<String> = by_key.into_values().collect();
    persons.sort();

    let day_keys = dates::day_keys(month, year);

    persons
        .into_iter()
        .enumerate()
        .map(|(index, person)| {
            let key = person_key(&person);
            let mut out = SheetRow::new();
            out.insert("STT".to_string(), (index + 1).to_string());
            out.insert(PERSON_COLUMN.to_string(), person.clone());

            for row in rows_of_person(primary_rows, &key) {
                for (column, value) in row {
                    if !is_identity_column(column) && !value.is_empty() {
                        out.insert(column.clone(), value.clone());
                    }
                }
            }

            if category == Category::Plan {
                for day_key in &day_keys {
                    let unpadded = day_key.trim_start_matches('0');
                    if out.contains_key(day_key) || out.contains_key(unpadded) {
                        continue;
                    }
                    let content = leave
                        .and_then(|data| leave_cell(data, &key, day_key))
                        .or_else(|| {
                            report.and_then(|data| {
                                report_cell(data, &key, day_key, month)
                            })
                        });
                    if let Some(content) = content {
                        out.insert(day_key.clone(), content);
                    }
                }
            }
            out
        })
        .collect()
}

fn leave_cell(leave: &SheetData, key: &str, day_key: &str) -> Option<String> {
    rows_of_person(&leave.rows, key)
        .find_map(|row| row_value(row, day_key))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Derive a plan cell from report rows dated on this calendar day:
/// `{class code or content}-{session}` lines, one per matching class.
fn report_cell(report: &SheetData, key: &str, day_key: &str, month: u32) -> Option<String> {
    let day: u32 = day_key.parse().ok()?;
    let lines: Vec<String> = rows_of_person(&report.rows, key)
        .filter(|row| {
            row_value(row, "Ngày")
                .map(|raw| dates::date_matches_day(raw, day, month))
                .unwrap_or(false)
        })
        .map(|row| {
            let code = row_value(row, "Mã Lớp")
                .filter(|v| !v.is_empty())
                .or_else(|| row_value(row, "Nội dung").filter(|v| !v.is_empty()))
                .unwrap_or("?");
            let session = row_value(row, "Buổi").unwrap_or("");
            format!("{}-{}", code, session)
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn person_universe_is_roster_union_primary_sorted_and_numbered() {
        let roster = names(&["Cúc", "An", "Bình"]);
        let primary = vec![
            row(&[("Giảng Viên", "an"), ("03", "P")]),
            row(&[("Giảng Viên", "Dũng")]),
        ];
        let rows = build_matrix(Category::LeaveComp, 3, 2025, &primary, &roster, None, None);
        assert_eq!(rows.len(), 4);
        let people: Vec<&str> = rows
            .iter()
            .map(|r| r.get(PERSON_COLUMN).unwrap().as_str())
            .collect();
        assert_eq!(people, vec!["An", "Bình", "Cúc", "Dũng"]);
        let stts: Vec<&str> = rows.iter().map(|r| r.get("STT").unwrap().as_str()).collect();
        assert_eq!(stts, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn primary_values_are_merged_and_blanks_ignored() {
        let primary = vec![
            row(&[("Giảng Viên", "An"), ("03", "P"), ("05", "")]),
            row(&[("GV", " an "), ("07", "B")]),
        ];
        let rows = build_matrix(Category::LeaveComp, 3, 2025, &primary, &[], None, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("03").map(String::as_str), Some("P"));
        assert_eq!(rows[0].get("07").map(String::as_str), Some("B"));
        assert!(!rows[0].contains_key("05"));
    }

    #[test]
    fn plan_fills_blank_days_from_leave_sheet_first() {
        let leave = SheetData::new(
            vec![],
            vec![row(&[("Giảng Viên", "An"), ("04", "P")])],
        );
        let report = SheetData::new(
            vec![],
            vec![row(&[
                ("Giảng Viên", "An"),
                ("Ngày", "04-03"),
                ("Mã Lớp", "L01"),
                ("Buổi", "Sáng"),
            ])],
        );
        let rows = build_matrix(
            Category::Plan,
            3,
            2025,
            &[row(&[("Giảng Viên", "An")])],
            &[],
            Some(&leave),
            Some(&report),
        );
        assert_eq!(rows[0].get("04").map(String::as_str), Some("P"));
    }

    #[test]
    fn plan_derives_day_cells_from_report_dates() {
        let report = SheetData::new(
            vec![],
            vec![
                row(&[
                    ("Giảng Viên", "X"),
                    ("Ngày", "12-03"),
                    ("Mã Lớp", "L01"),
                    ("Buổi", "Sáng"),
                ]),
                row(&[
                    ("Giảng Viên", "X"),
                    ("Ngày", "2025-03-12"),
                    ("Nội dung", "Coaching"),
                    ("Buổi", "Chiều"),
                ]),
                row(&[
                    ("Giảng Viên", "X"),
                    ("Ngày", "13-03"),
                    ("Mã Lớp", "L02"),
                    ("Buổi", "Sáng"),
                ]),
            ],
        );
        let rows = build_matrix(
            Category::Plan,
            3,
            2025,
            &[row(&[("Giảng Viên", "X")])],
            &[],
            None,
            Some(&report),
        );
        // Both same-day classes are joined; the content column stands
        // in when there is no class code.
        assert_eq!(
            rows[0].get("12").map(String::as_str),
            Some("L01-Sáng\nCoaching-Chiều")
        );
        assert_eq!(rows[0].get("13").map(String::as_str), Some("L02-Sáng"));
        for day in ["01", "02", "03", "11", "14"] {
            assert!(!rows[0].contains_key(day), "day {} must stay blank", day);
        }
    }

    #[test]
    fn primary_day_value_is_not_overwritten_by_fallbacks() {
        let leave = SheetData::new(
            vec![],
            vec![row(&[("Giảng Viên", "An"), ("04", "P")])],
        );
        let rows = build_matrix(
            Category::Plan,
            3,
            2025,
            &[row(&[("Giảng Viên", "An"), ("4", "KP")])],
            &[],
            Some(&leave),
            None,
        );
        // Stored unpadded by the primary sheet; still counts as filled.
        assert_eq!(rows[0].get("4").map(String::as_str), Some("KP"));
        assert!(!rows[0].contains_key("04"));
    }

    #[test]
    fn leave_category_does_not_consult_fallbacks() {
        let leave = SheetData::new(
            vec![],
            vec![row(&[("Giảng Viên", "An"), ("04", "P")])],
        );
        let rows = build_matrix(
            Category::LeaveComp,
            3,
            2025,
            &[row(&[("Giảng Viên", "An")])],
            &[],
            Some(&leave),
            None,
        );
        assert!(!rows[0].contains_key("04"));
    }
}
