//! Multi-sheet aggregation on top of the cache.
//!
//! Loading a target sheet pulls in its siblings (other categories of
//! the same month) so cross-sheet views have their data at hand:
//! synchronously when the target itself is a cache miss, in the
//! background when the target is already cached. Sibling failures are
//! logged and swallowed; only the target's own failure reaches the
//! caller.

use contracts::sheets::fields::{person_key, person_name, PERSON_COLUMN};
use contracts::sheets::{SheetData, SheetRow};
use futures::future::{join, join_all};

use super::cache::{FetchTicket, SheetCache};
use super::resolver;
use crate::gateway::{api, GatewayError};

/// Port to the remote gateway. Production talks HTTP; tests substitute
/// a local stub.
pub trait SheetSource: Clone + 'static {
    async fn fetch(&self, name: &str) -> Result<SheetData, GatewayError>;
    async fn save(
        &self,
        name: &str,
        row: SheetRow,
        match_column: Option<String>,
    ) -> Result<(), GatewayError>;
}

/// Gateway-backed source bound to a script URL.
#[derive(Clone)]
pub struct GatewaySource {
    pub script_url: String,
}

impl SheetSource for GatewaySource {
    async fn fetch(&self, name: &str) -> Result<SheetData, GatewayError> {
        api::get_data(&self.script_url, name).await
    }

    async fn save(
        &self,
        name: &str,
        row: SheetRow,
        match_column: Option<String>,
    ) -> Result<(), GatewayError> {
        api::save_row(&self.script_url, name, row, match_column).await
    }
}

#[derive(Clone)]
pub struct SheetLoader<S: SheetSource> {
    source: S,
    cache: SheetCache,
}

impl<S: SheetSource> SheetLoader<S> {
    pub fn new(source: S, cache: SheetCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &SheetCache {
        &self.cache
    }

    /// Load the target sheet, populating the cache for it and for
    /// every not-yet-cached related name.
    ///
    /// Cache hit without `force_refresh`: returns immediately; missing
    /// siblings are topped up in the background without blocking.
    /// Cache miss (or forced): target and missing siblings are fetched
    /// concurrently and all awaited; the version is bumped once after
    /// the batch settles. A failure of a synthesized target name means
    /// "not yet created" to the caller, not a hard error here.
    pub async fn load(
        &self,
        target: &str,
        related: &[String],
        force_refresh: bool,
    ) -> Result<SheetData, GatewayError> {
        if !force_refresh {
            if let Some(data) = self.cache.get(target) {
                self.top_up_in_background(related);
                return Ok(data);
            }
        }

        let missing: Vec<String> = related
            .iter()
            .filter(|name| name.as_str() != target && !self.cache.contains(name))
            .cloned()
            .collect();
        let target_ticket = self.cache.begin_fetch(target);
        let sibling_tickets: Vec<FetchTicket> =
            missing.iter().map(|name| self.cache.begin_fetch(name)).collect();

        // All requests go out before any of them is awaited.
        let (target_result, sibling_results) = join(
            self.source.fetch(target),
            join_all(missing.iter().map(|name| self.source.fetch(name))),
        )
        .await;

        for (ticket, result) in sibling_tickets.iter().zip(sibling_results) {
            match result {
                Ok(data) => {
                    if !self.cache.put_fetched(ticket, data) {
                        log::warn!("discarding superseded fetch of {}", ticket.name());
                    }
                }
                Err(err) => log::warn!("sibling fetch of {} failed: {}", ticket.name(), err),
            }
        }

        let outcome = match target_result {
            Ok(data) => {
                if !self.cache.put_fetched(&target_ticket, data.clone()) {
                    log::warn!("discarding superseded fetch of {}", target);
                }
                Ok(data)
            }
            Err(err) => Err(err),
        };
        self.cache.bump_version();
        outcome
    }

    /// Fire-and-forget top-up of sheets missing from the cache.
    fn top_up_in_background(&self, names: &[String]) {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.cache.contains(name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return;
        }
        let loader = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            loader.fetch_missing(&missing).await;
        });
    }

    /// Fetch the given sheets concurrently and store whatever
    /// succeeds. Failures are logged and swallowed; the version is
    /// bumped once if anything was stored.
    pub async fn fetch_missing(&self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        let tickets: Vec<FetchTicket> =
            names.iter().map(|name| self.cache.begin_fetch(name)).collect();
        let results = join_all(names.iter().map(|name| self.source.fetch(name))).await;
        let mut stored = false;
        for (ticket, result) in tickets.iter().zip(results) {
            match result {
                Ok(data) => {
                    if self.cache.put_fetched(ticket, data) {
                        stored = true;
                    } else {
                        log::warn!("discarding superseded fetch of {}", ticket.name());
                    }
                }
                Err(err) => log::warn!("background fetch of {} failed: {}", ticket.name(), err),
            }
        }
        if stored {
            self.cache.bump_version();
        }
    }

    /// Twelve-month rollup for yearly statistics: resolve the report
    /// sheet of every month of the year, fetch the uncached ones
    /// concurrently and concatenate all rows. The combined list is
    /// derived data and never stored as a sheet of its own.
    pub async fn load_year(&self, year: i32, known: &[String]) -> Vec<SheetRow> {
        let mut names: Vec<String> = Vec::new();
        for month in 1..=12 {
            if let Some(name) = resolver::resolve_report_for_month(month, year, known) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.cache.contains(name))
            .cloned()
            .collect();
        self.fetch_missing(&missing).await;

        let mut rows = Vec::new();
        for name in &names {
            if let Some(data) = self.cache.get(name) {
                rows.extend(data.rows);
            }
        }
        rows
    }

    /// Append a report row. The cache is only touched after the
    /// gateway acknowledged the write, so a failed save cannot leave a
    /// drifted local copy behind.
    pub async fn append_row(&self, sheet: &str, row: SheetRow) -> Result<(), GatewayError> {
        self.source.save(sheet, row.clone(), None).await?;
        if let Some(mut data) = self.cache.get(sheet) {
            data.rows.push(row);
            self.cache.put(sheet, data);
        }
        Ok(())
    }

    /// Upsert one day cell of a matrix sheet, keyed by person name.
    /// Commits to the cache only after acknowledgment.
    pub async fn upsert_matrix_cell(
        &self,
        sheet: &str,
        person: &str,
        day_key: &str,
        content: &str,
    ) -> Result<(), GatewayError> {
        let mut row = SheetRow::new();
        row.insert(PERSON_COLUMN.to_string(), person.to_string());
        row.insert(day_key.to_string(), content.to_string());
        self.source
            .save(sheet, row.clone(), Some(PERSON_COLUMN.to_string()))
            .await?;

        if let Some(mut data) = self.cache.get(sheet) {
            let key = person_key(person);
            match data
                .rows
                .iter_mut()
                .find(|r| person_name(r).map(person_key).as_deref() == Some(key.as_str()))
            {
                Some(existing) => {
                    existing.insert(day_key.to_string(), content.to_string());
                }
                None => data.rows.push(row),
            }
            self.cache.put(sheet, data);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::category::{Category, Selection};
    use crate::sheets::{resolver, stats};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct StubSource {
        sheets: Rc<RefCell<HashMap<String, SheetData>>>,
        failing: Rc<RefCell<HashSet<String>>>,
        fetch_counts: Rc<RefCell<HashMap<String, u32>>>,
        save_fails: Rc<RefCell<bool>>,
        saved: Rc<RefCell<Vec<(String, SheetRow, Option<String>)>>>,
    }

    impl StubSource {
        fn with_sheet(self, name: &str, data: SheetData) -> Self {
            self.sheets.borrow_mut().insert(name.to_string(), data);
            self
        }

        fn failing_on(self, name: &str) -> Self {
            self.failing.borrow_mut().insert(name.to_string());
            self
        }

        fn fetches_of(&self, name: &str) -> u32 {
            self.fetch_counts.borrow().get(name).copied().unwrap_or(0)
        }
    }

    impl SheetSource for StubSource {
        async fn fetch(&self, name: &str) -> Result<SheetData, GatewayError> {
            *self
                .fetch_counts
                .borrow_mut()
                .entry(name.to_string())
                .or_insert(0) += 1;
            if self.failing.borrow().contains(name) {
                return Err(GatewayError::Application("Sheet not found".into()));
            }
            self.sheets
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| GatewayError::Application("Sheet not found".into()))
        }

        async fn save(
            &self,
            name: &str,
            row: SheetRow,
            match_column: Option<String>,
        ) -> Result<(), GatewayError> {
            if *self.save_fails.borrow() {
                return Err(GatewayError::Network("offline".into()));
            }
            self.saved
                .borrow_mut()
                .push((name.to_string(), row, match_column));
            Ok(())
        }
    }

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sheet_with_rows(rows: Vec<SheetRow>) -> SheetData {
        SheetData::new(vec!["Giảng Viên".to_string()], rows)
    }

    #[test]
    fn second_load_is_a_pure_cache_hit() {
        let source = StubSource::default()
            .with_sheet("BC-T05-2025", sheet_with_rows(vec![row(&[("Giảng Viên", "A")])]));
        let loader = SheetLoader::new(source.clone(), SheetCache::new());

        let first = block_on(loader.load("BC-T05-2025", &[], false)).unwrap();
        let second = block_on(loader.load("BC-T05-2025", &[], false)).unwrap();
        assert_eq!(first, second);
        assert_eq!(source.fetches_of("BC-T05-2025"), 1);
    }

    #[test]
    fn force_refresh_refetches_the_target() {
        let source = StubSource::default().with_sheet("BC-T05-2025", sheet_with_rows(vec![]));
        let loader = SheetLoader::new(source.clone(), SheetCache::new());

        block_on(loader.load("BC-T05-2025", &[], false)).unwrap();
        block_on(loader.load("BC-T05-2025", &[], true)).unwrap();
        assert_eq!(source.fetches_of("BC-T05-2025"), 2);
    }

    #[test]
    fn sibling_failure_does_not_touch_the_target() {
        let source = StubSource::default()
            .with_sheet("BC-T05-2025", sheet_with_rows(vec![row(&[("Giảng Viên", "A")])]))
            .failing_on("BF-T05-2025");
        let loader = SheetLoader::new(source, SheetCache::new());

        let related = vec!["BF-T05-2025".to_string()];
        let data = block_on(loader.load("BC-T05-2025", &related, false)).unwrap();
        assert_eq!(data.rows.len(), 1);
        assert!(loader.cache().contains("BC-T05-2025"));
        assert!(!loader.cache().contains("BF-T05-2025"));
    }

    #[test]
    fn target_failure_propagates_and_siblings_still_land() {
        let source = StubSource::default()
            .with_sheet("BF-T05-2025", sheet_with_rows(vec![]))
            .failing_on("BC-T05-2025");
        let loader = SheetLoader::new(source, SheetCache::new());

        let related = vec!["BF-T05-2025".to_string()];
        let err = block_on(loader.load("BC-T05-2025", &related, false)).unwrap_err();
        assert_eq!(err, GatewayError::Application("Sheet not found".into()));
        assert!(!loader.cache().contains("BC-T05-2025"));
        assert!(loader.cache().contains("BF-T05-2025"));
    }

    #[test]
    fn cache_miss_batch_bumps_version_once() {
        let source = StubSource::default()
            .with_sheet("BC-T05-2025", sheet_with_rows(vec![]))
            .with_sheet("BF-T05-2025", sheet_with_rows(vec![]));
        let loader = SheetLoader::new(source, SheetCache::new());

        let before = loader.cache().version();
        let related = vec!["BF-T05-2025".to_string()];
        block_on(loader.load("BC-T05-2025", &related, false)).unwrap();
        assert_eq!(loader.cache().version(), before + 1);
    }

    #[test]
    fn fetch_missing_swallows_failures_and_bumps_on_success() {
        let source = StubSource::default()
            .with_sheet("KH-T05-2025", sheet_with_rows(vec![]))
            .failing_on("TH-T05-2025");
        let loader = SheetLoader::new(source, SheetCache::new());

        let before = loader.cache().version();
        block_on(loader.fetch_missing(&[
            "KH-T05-2025".to_string(),
            "TH-T05-2025".to_string(),
        ]));
        assert!(loader.cache().contains("KH-T05-2025"));
        assert!(!loader.cache().contains("TH-T05-2025"));
        assert_eq!(loader.cache().version(), before + 1);
    }

    #[test]
    fn load_year_concatenates_resolved_months() {
        let source = StubSource::default()
            .with_sheet(
                "BC-T01-2025",
                sheet_with_rows(vec![row(&[("Giảng Viên", "A")])]),
            )
            .with_sheet(
                "BC-T9-2025",
                sheet_with_rows(vec![
                    row(&[("Giảng Viên", "B")]),
                    row(&[("Giảng Viên", "C")]),
                ]),
            );
        let loader = SheetLoader::new(source, SheetCache::new());

        let known = vec!["BC-T01-2025".to_string(), "BC-T9-2025".to_string()];
        let rows = block_on(loader.load_year(2025, &known));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn append_row_commits_only_after_acknowledgment() {
        let source =
            StubSource::default().with_sheet("BC-T05-2025", sheet_with_rows(vec![]));
        let loader = SheetLoader::new(source.clone(), SheetCache::new());
        block_on(loader.load("BC-T05-2025", &[], false)).unwrap();

        *source.save_fails.borrow_mut() = true;
        let err = block_on(loader.append_row("BC-T05-2025", row(&[("Giảng Viên", "A")])));
        assert!(err.is_err());
        assert!(loader.cache().get("BC-T05-2025").unwrap().rows.is_empty());

        *source.save_fails.borrow_mut() = false;
        block_on(loader.append_row("BC-T05-2025", row(&[("Giảng Viên", "A")]))).unwrap();
        assert_eq!(loader.cache().get("BC-T05-2025").unwrap().rows.len(), 1);
    }

    #[test]
    fn upsert_matrix_cell_merges_into_existing_person_row() {
        let source = StubSource::default().with_sheet(
            "BF-T05-2025",
            sheet_with_rows(vec![row(&[("Giảng Viên", "Trần An"), ("03", "P")])]),
        );
        let loader = SheetLoader::new(source.clone(), SheetCache::new());
        block_on(loader.load("BF-T05-2025", &[], false)).unwrap();

        block_on(loader.upsert_matrix_cell("BF-T05-2025", "trần an", "07", "B")).unwrap();
        let data = loader.cache().get("BF-T05-2025").unwrap();
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.rows[0].get("07").map(String::as_str), Some("B"));
        // Upserts go out keyed by the person column.
        let saved = source.saved.borrow();
        assert_eq!(saved[0].2.as_deref(), Some(PERSON_COLUMN));
    }

    // Full path: resolve -> load with sibling -> aggregate statistics.
    #[test]
    fn resolve_load_aggregate_end_to_end() {
        let known = vec!["BC-T05-2025".to_string(), "BF-T05-2025".to_string()];
        let selection = Selection::new(Category::Report, 5, 2025);
        let target = resolver::resolve(&selection, &known);
        assert_eq!(target, "BC-T05-2025");

        let source = StubSource::default()
            .with_sheet(
                "BC-T05-2025",
                sheet_with_rows(vec![row(&[
                    ("Giảng Viên", "A"),
                    ("ĐTV", "M"),
                    ("DĐ", "5"),
                ])]),
            )
            .with_sheet("BF-T05-2025", sheet_with_rows(vec![]));
        let loader = SheetLoader::new(source, SheetCache::new());

        let related = resolver::related_names(&target, &known);
        assert_eq!(related, vec!["BF-T05-2025".to_string()]);
        let data = block_on(loader.load(&target, &related, false)).unwrap();
        assert!(loader.cache().contains("BF-T05-2025"));

        let people = stats::aggregate(&data.rows);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].stt, 1);
        assert_eq!(people[0].person, "A");
        assert_eq!(people[0].counter("M_DD"), 5.0);
        assert_eq!(people[0].counter("M_Tong"), 5.0);
        assert_eq!(people[0].counter("ALL_DD"), 5.0);
        assert_eq!(people[0].counter("ALL_Tong"), 5.0);
        assert_eq!(people[0].counter("HH_DD"), 0.0);
        assert_eq!(people[0].counter("HH_Tong"), 0.0);
    }
}
