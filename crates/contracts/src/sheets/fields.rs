//! Alias-aware access to string-keyed sheet rows.
//!
//! Sheets are filled in by hand, so the same logical column shows up
//! under several spellings ("Giảng Viên" vs "GV" vs "Họ và tên") and
//! day columns are stored padded or unpadded ("03" vs "3"). All cell
//! lookups go through [`row_value`]; call sites never match keys
//! directly.

use super::SheetRow;

/// Column holding the person name in every category of sheet.
pub const PERSON_COLUMN: &str = "Giảng Viên";

/// Header spellings accepted for each canonical column, checked in
/// order. Entries are one-directional: "Nội dung" may fall back to
/// "Mã Lớp", but not the other way around.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("Giảng Viên", &["Giảng Viên", "GV", "Họ và tên"]),
    ("GV", &["GV", "Giảng Viên", "Họ và tên"]),
    ("Mã Lớp", &["Mã Lớp", "Đài"]),
    ("Nội dung", &["Nội dung", "Mã Lớp"]),
];

/// Look up a cell by header, tolerating known aliases, case
/// differences and padded/unpadded numeric day headers.
pub fn row_value<'a>(row: &'a SheetRow, header: &str) -> Option<&'a str> {
    if let Some(v) = row.get(header) {
        return Some(v.as_str());
    }
    if let Some((_, aliases)) = FIELD_ALIASES.iter().find(|(canon, _)| *canon == header) {
        for alias in *aliases {
            if let Some(v) = row.get(*alias) {
                return Some(v.as_str());
            }
        }
    }
    let lower = header.to_lowercase();
    if let Some((_, v)) = row.iter().find(|(k, _)| k.to_lowercase() == lower) {
        return Some(v.as_str());
    }
    if let Ok(n) = header.trim().parse::<u32>() {
        if let Some(v) = row.get(&n.to_string()) {
            return Some(v.as_str());
        }
        if let Some(v) = row.get(&format!("{:02}", n)) {
            return Some(v.as_str());
        }
    }
    None
}

/// Person name of a row, or None when the row carries no recognizable
/// name value.
pub fn person_name(row: &SheetRow) -> Option<&str> {
    row_value(row, PERSON_COLUMN).filter(|v| !v.trim().is_empty())
}

/// Identity key for merge/statistics purposes: different raw strings
/// that normalize equal are the same person.
pub fn person_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Coerce a cell value to a number. Decimal commas are accepted;
/// empty, missing or unparseable values contribute zero. Never errors.
pub fn parse_number(value: &str) -> f64 {
    let normalized = value.trim().replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Numeric value of a column, via the alias-aware lookup.
pub fn numeric_value(row: &SheetRow, header: &str) -> f64 {
    parse_number(row_value(row, header).unwrap_or(""))
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

    #[test]
    fn exact_key_wins() {
        let r = row(&[("Giảng Viên", "An"), ("GV", "Bình")]);
        assert_eq!(row_value(&r, "Giảng Viên"), Some("An"));
    }

    #[test]
    fn alias_lookup_both_directions_for_person() {
        let r = row(&[("GV", "An")]);
        assert_eq!(row_value(&r, "Giảng Viên"), Some("An"));
        let r = row(&[("Giảng Viên", "An")]);
        assert_eq!(row_value(&r, "GV"), Some("An"));
        let r = row(&[("Họ và tên", "An")]);
        assert_eq!(person_name(&r), Some("An"));
    }

    #[test]
    fn content_falls_back_to_class_code_but_not_reverse() {
        let r = row(&[("Mã Lớp", "L01")]);
        assert_eq!(row_value(&r, "Nội dung"), Some("L01"));
        let r = row(&[("Nội dung", "Đào tạo")]);
        assert_eq!(row_value(&r, "Mã Lớp"), None);
    }

    #[test]
    fn case_insensitive_scan() {
        let r = row(&[("NGÀY", "2025-09-12")]);
        assert_eq!(row_value(&r, "Ngày"), Some("2025-09-12"));
    }

    #[test]
    fn day_headers_tolerate_padding() {
        let r = row(&[("3", "P")]);
        assert_eq!(row_value(&r, "03"), Some("P"));
        let r = row(&[("03", "P")]);
        assert_eq!(row_value(&r, "3"), Some("P"));
    }

    #[test]
    fn parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number("5,5"), 5.5);
        assert_eq!(parse_number(" 2.25 "), 2.25);
    }

    #[test]
    fn parse_number_degrades_to_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        let r = row(&[]);
        assert_eq!(numeric_value(&r, "DĐ"), 0.0);
    }

    #[test]
    fn person_key_normalizes() {
        assert_eq!(person_key("  Trần An "), person_key("trần an"));
    }
}
