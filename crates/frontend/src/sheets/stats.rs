//! Per-person statistics rollup over report rows.
//!
//! Every row is attributed to overlapping buckets based on its `ĐTV`
//! tag: `M` rows feed the M group, `HH` rows (and the `CD` alias,
//! which collapses into HH) feed the HH group, and every row feeds the
//! all-encompassing ALL group. Each group keeps one running sum per
//! shared metric plus a running total; ALL additionally accumulates
//! extra columns and the derived `Hop = OKR + STL`.
//!
//! Pure and deterministic: output order is the order of first
//! appearance of each distinct normalized person name.

use std::collections::HashMap;

use contracts::sheets::fields::{numeric_value, person_key, person_name, row_value};
use contracts::sheets::SheetRow;

/// Shared metric columns and the key suffix they aggregate under.
const SHARED_METRICS: &[(&str, &str)] = &[
    ("DĐ", "DD"),
    ("BRCĐ", "BRCD"),
    ("CNTT", "CNTT"),
    ("OL", "OL"),
    ("KN", "KN"),
    ("Coach", "Coach"),
    ("AI Mentor", "AIMentor"),
];

/// Columns only the ALL group accumulates, besides the shared metrics.
const ALL_EXTRAS: &[(&str, &str)] = &[
    ("TTKD", "TTKD"),
    ("OKR", "OKR"),
    ("STL", "STL"),
    ("OS", "OS"),
    ("CT", "CT"),
    ("HOC", "Hoc"),
];

/// Column grouping of the statistics table, in display order.
pub struct StatGroup {
    pub title: &'static str,
    /// Column captions shown in the second header row.
    pub columns: &'static [&'static str],
    /// Counter keys backing each column, same order.
    pub keys: &'static [&'static str],
}

pub const STAT_GROUPS: [StatGroup; 3] = [
    StatGroup {
        title: "ĐTV-M",
        columns: &["DĐ", "BRCĐ", "CNTT", "OL", "KN", "Coach", "AI Mentor", "Tổng"],
        keys: &[
            "M_DD", "M_BRCD", "M_CNTT", "M_OL", "M_KN", "M_Coach", "M_AIMentor", "M_Tong",
        ],
    },
    StatGroup {
        title: "ĐTV-HH",
        columns: &["DĐ", "BRCĐ", "CNTT", "OL", "KN", "Coach", "AI Mentor", "Tổng"],
        keys: &[
            "HH_DD", "HH_BRCD", "HH_CNTT", "HH_OL", "HH_KN", "HH_Coach", "HH_AIMentor", "HH_Tong",
        ],
    },
    StatGroup {
        title: "ALL",
        columns: &[
            "DĐ", "BRCĐ", "CNTT", "OL", "KN", "Coach", "AI Mentor", "TTKD", "OKR", "STL", "OS",
            "CT", "Họp", "Học", "Tổng",
        ],
        keys: &[
            "ALL_DD",
            "ALL_BRCD",
            "ALL_CNTT",
            "ALL_OL",
            "ALL_KN",
            "ALL_Coach",
            "ALL_AIMentor",
            "ALL_TTKD",
            "ALL_OKR",
            "ALL_STL",
            "ALL_OS",
            "ALL_CT",
            "ALL_Hop",
            "ALL_Hoc",
            "ALL_Tong",
        ],
    },
];

/// Aggregate record of one person. Every counter key of every group
/// always exists (zero when nothing was accumulated), so consumers
/// never special-case missing keys.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonStats {
    /// 1-based sequence number in order of first appearance.
    pub stt: usize,
    pub person: String,
    /// Display color carried over from the source rows, when present.
    pub color: String,
    counters: HashMap<String, f64>,
}

impl PersonStats {
    fn new(person: &str) -> Self {
        let mut counters = HashMap::new();
        for group in &STAT_GROUPS {
            for key in group.keys {
                counters.insert(key.to_string(), 0.0);
            }
        }
        Self {
            stt: 0,
            person: person.trim().to_string(),
            color: String::new(),
            counters,
        }
    }

    pub fn counter(&self, key: &str) -> f64 {
        self.counters.get(key).copied().unwrap_or(0.0)
    }

    fn add(&mut self, key: &str, value: f64) {
        *self.counters.entry(key.to_string()).or_insert(0.0) += value;
    }

    /// A counter is displayable (non-dash) only when strictly
    /// positive; zero-vs-absent stays a display concern.
    pub fn displayable(&self, key: &str) -> bool {
        self.counter(key) > 0.0
    }
}

/// Reduce raw report rows into per-person statistics. Rows without a
/// recognizable person name are skipped; unparseable cells contribute
/// zero. Never errors.
pub fn aggregate(rows: &[SheetRow]) -> Vec<PersonStats> {
    let mut order: Vec<String> = Vec::new();
    let mut by_person: HashMap<String, PersonStats> = HashMap::new();

    for row in rows {
        let Some(name) = person_name(row) else {
            continue;
        };
        let key = person_key(name);
        let entry = by_person.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            PersonStats::new(name)
        });
        if entry.color.is_empty() {
            if let Some(color) = row_value(row, "Màu") {
                entry.color = color.to_string();
            }
        }

        let tag = row_value(row, "ĐTV").unwrap_or("").to_uppercase();
        let in_m = tag.contains('M');
        let in_hh = tag.contains("HH") || tag.contains("CD");

        let mut row_sum_m = 0.0;
        let mut row_sum_hh = 0.0;
        let mut row_sum_all = 0.0;
        for (column, suffix) in SHARED_METRICS {
            let value = numeric_value(row, column);
            if in_m {
                entry.add(&format!("M_{}", suffix), value);
                row_sum_m += value;
            }
            if in_hh {
                entry.add(&format!("HH_{}", suffix), value);
                row_sum_hh += value;
            }
            entry.add(&format!("ALL_{}", suffix), value);
            row_sum_all += value;
        }
        if in_m {
            entry.add("M_Tong", row_sum_m);
        }
        if in_hh {
            entry.add("HH_Tong", row_sum_hh);
        }

        for (column, suffix) in ALL_EXTRAS {
            let value = numeric_value(row, column);
            entry.add(&format!("ALL_{}", suffix), value);
            row_sum_all += value;
        }
        // Họp is derived from its two source columns, which are
        // already part of the running total above.
        let hop = numeric_value(row, "OKR") + numeric_value(row, "STL");
        entry.add("ALL_Hop", hop);

        entry.add("ALL_Tong", row_sum_all);
    }

    order
        .into_iter()
        .enumerate()
        .filter_map(|(index, key)| {
            by_person.remove(&key).map(|mut stats| {
                stats.stt = index + 1;
                stats
            })
        })
        .collect()
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
    fn output_order_is_first_appearance_renumbered() {
        let rows = vec![
            row(&[("Giảng Viên", "Bình"), ("ĐTV", "M")]),
            row(&[("Giảng Viên", "An"), ("ĐTV", "M")]),
            row(&[("Giảng Viên", " bình "), ("ĐTV", "HH")]),
        ];
        let people = aggregate(&rows);
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].person, "Bình");
        assert_eq!(people[0].stt, 1);
        assert_eq!(people[1].person, "An");
        assert_eq!(people[1].stt, 2);
    }

    #[test]
    fn rows_without_a_person_are_skipped() {
        let rows = vec![
            row(&[("ĐTV", "M"), ("DĐ", "4")]),
            row(&[("Giảng Viên", ""), ("DĐ", "4")]),
        ];
        assert!(aggregate(&rows).is_empty());
    }

    #[test]
    fn cd_alias_counts_as_hh_not_m_metrics() {
        let rows = vec![row(&[("Giảng Viên", "An"), ("ĐTV", "CD"), ("CNTT", "2")])];
        let people = aggregate(&rows);
        assert_eq!(people[0].counter("HH_CNTT"), 2.0);
        assert_eq!(people[0].counter("HH_Tong"), 2.0);
        assert_eq!(people[0].counter("ALL_CNTT"), 2.0);
        // "CD" does not contain an M tag.
        assert_eq!(people[0].counter("M_CNTT"), 0.0);
        assert_eq!(people[0].counter("M_Tong"), 0.0);
    }

    #[test]
    fn every_counter_key_exists_even_for_empty_rows() {
        let rows = vec![row(&[("Giảng Viên", "An")])];
        let people = aggregate(&rows);
        for group in &STAT_GROUPS {
            for key in group.keys {
                assert_eq!(people[0].counter(key), 0.0, "missing key {}", key);
                assert!(!people[0].displayable(key));
            }
        }
    }

    #[test]
    fn all_total_is_metrics_plus_extras_with_hop_derived() {
        let rows = vec![row(&[
            ("Giảng Viên", "An"),
            ("ĐTV", "M"),
            ("DĐ", "1"),
            ("KN", "2"),
            ("TTKD", "3"),
            ("OKR", "1,5"),
            ("STL", "0,5"),
            ("OS", "1"),
            ("CT", "1"),
            ("HOC", "2"),
        ])];
        let people = aggregate(&rows);
        let p = &people[0];
        assert_eq!(p.counter("ALL_Hop"), 2.0);
        // Metrics (1 + 2) + extras (3 + 1.5 + 0.5 + 1 + 1 + 2).
        assert_eq!(p.counter("ALL_Tong"), 12.0);
        assert_eq!(p.counter("M_Tong"), 3.0);
    }

    #[test]
    fn totals_hold_for_zero_valued_and_column_less_rows() {
        let rows = vec![
            row(&[("Giảng Viên", "An"), ("ĐTV", "M"), ("DĐ", "0")]),
            row(&[("Giảng Viên", "An"), ("ĐTV", "HH")]),
            row(&[("Giảng Viên", "An"), ("DĐ", "abc")]),
        ];
        let people = aggregate(&rows);
        let p = &people[0];
        for group in &STAT_GROUPS {
            for key in group.keys {
                assert_eq!(p.counter(key), 0.0);
            }
        }
    }

    #[test]
    fn sums_accumulate_across_rows_and_alias_person_column() {
        let rows = vec![
            row(&[("Giảng Viên", "An"), ("ĐTV", "M"), ("DĐ", "2")]),
            row(&[("GV", "an"), ("ĐTV", "M"), ("DĐ", "3,5")]),
        ];
        let people = aggregate(&rows);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].counter("M_DD"), 5.5);
        assert_eq!(people[0].counter("ALL_Tong"), 5.5);
    }

    #[test]
    fn color_is_carried_from_the_first_row_that_has_one() {
        let rows = vec![
            row(&[("Giảng Viên", "An"), ("ĐTV", "M")]),
            row(&[("Giảng Viên", "An"), ("Màu", "#ff0000")]),
        ];
        let people = aggregate(&rows);
        assert_eq!(people[0].color, "#ff0000");
    }
}
