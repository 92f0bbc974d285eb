//! Reporting dashboard: category/month/year selection, table views,
//! row entry and per-month table settings.

pub mod entry_form;
pub mod matrix_table;
pub mod report_table;
pub mod settings;
pub mod stats_table;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::config::{month_config_key, TableConfig};
use contracts::sheets::SheetRow;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::gateway::api;
use crate::layout::use_app_context;
use crate::sheets::category::{Category, OperationsTab, Selection};
use crate::sheets::{matrix, resolver, stats};
use crate::system::auth::use_auth;

use entry_form::EntryForm;
use matrix_table::MatrixTable;
use report_table::ReportTable;
use settings::SettingsPanel;
use stats_table::StatsTable;

/// Auto refresh period of the visible selection, in milliseconds.
const REFRESH_INTERVAL_MS: u32 = 300_000;

/// Everything one table render needs, derived from the cache.
#[derive(Clone, Default, PartialEq)]
struct ViewData {
    target: String,
    headers: Vec<String>,
    rows: Vec<SheetRow>,
    people: Vec<stats::PersonStats>,
    /// The target was synthesized: the sheet does not exist remotely.
    missing: bool,
}

/// A resolved name absent from the remote listing was synthesized by
/// the resolver; the sheet is not yet created and there is nothing to
/// fetch.
fn sheet_missing(target: &str, known: &[String]) -> bool {
    target.is_empty() || !known.iter().any(|name| name == target)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    let now = chrono::Local::now().date_naive();
    use chrono::Datelike;
    let selection = RwSignal::new(Selection::new(Category::Report, now.month(), now.year()));
    let (search, set_search) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (year_rows, set_year_rows) = signal(Vec::<SheetRow>::new());
    let (show_entry, set_show_entry) = signal(false);
    let (show_settings, set_show_settings) = signal(false);

    let cache_version = ctx.cache_version;
    let sheet_names = ctx.sheet_names;
    let app_config = ctx.app_config;

    // One reload of whatever the current selection points at.
    let reload = {
        let ctx = ctx.clone();
        move |force: bool| {
            let ctx = ctx.clone();
            let sel = selection.get_untracked();
            set_is_loading.set(true);
            set_error_message.set(None);
            spawn_local(async move {
                if ctx.sheet_names.get_untracked().is_empty() || force {
                    if let Err(e) = ctx.refresh_sheet_names().await {
                        set_error_message.set(Some(e.user_message()));
                        set_is_loading.set(false);
                        return;
                    }
                }
                let known = ctx.sheet_names.get_untracked();
                let loader = ctx.loader();

                if sel.yearly && sel.category == Category::Statistics {
                    let rows = loader.load_year(sel.year, &known).await;
                    set_year_rows.set(rows);
                } else {
                    let target = resolver::resolve(&sel, &known);
                    if !sheet_missing(&target, &known) {
                        let related = resolver::related_names(&target, &known);
                        if let Err(e) = loader.load(&target, &related, force).await {
                            set_error_message.set(Some(e.user_message()));
                        }
                    }
                }

                // Month-scoped table settings ride along with the data.
                let config_key = month_config_key(sel.month, sel.year);
                if ctx.cache.get_config(&config_key).is_none() {
                    let script_url = ctx.script_url.get_untracked();
                    match api::get_table_config(&script_url, &config_key).await {
                        Ok(config) => {
                            ctx.cache
                                .put_config(&config_key, config.unwrap_or_default());
                            ctx.persist_configs();
                        }
                        Err(e) => log::warn!("table config fetch failed: {}", e),
                    }
                }

                ctx.sync_version();
                set_is_loading.set(false);
            });
        }
    };

    // Initial load plus the category config, then reload on every
    // selection change.
    {
        let ctx = ctx.clone();
        spawn_local(async move {
            if let Err(e) = ctx.load_app_config().await {
                log::warn!("app config fetch failed: {}", e);
            }
        });
    }
    Effect::new({
        let reload = reload.clone();
        move |_| {
            selection.track();
            reload(false);
        }
    });

    // Background auto refresh while this screen stays mounted.
    {
        let alive = Arc::new(AtomicBool::new(true));
        on_cleanup({
            let alive = alive.clone();
            move || alive.store(false, Ordering::Relaxed)
        });
        let reload = reload.clone();
        spawn_local(async move {
            loop {
                TimeoutFuture::new(REFRESH_INTERVAL_MS).await;
                if !alive.load(Ordering::Relaxed) {
                    break;
                }
                reload(true);
            }
        });
    }

    // Derived table data. Recomputes when the cache version moves,
    // the selection changes or the roster config arrives.
    let view_data = Memo::new({
        let ctx = ctx.clone();
        move |_| {
            cache_version.track();
            let sel = selection.get();
            let known = sheet_names.get();
            let config = app_config.get();

            if sel.yearly && sel.category == Category::Statistics {
                let rows = year_rows.get();
                return ViewData {
                    target: format!("TH-{}", sel.year),
                    people: stats::aggregate(&rows),
                    rows,
                    ..Default::default()
                };
            }

            let target = resolver::resolve(&sel, &known);
            let missing = sheet_missing(&target, &known);
            let data = ctx.cache.get(&target).unwrap_or_default();

            if sel.category == Category::Statistics {
                return ViewData {
                    target,
                    people: stats::aggregate(&data.rows),
                    rows: data.rows,
                    missing,
                    ..Default::default()
                };
            }

            if sel.category.is_matrix() {
                let leave_name = resolver::resolve_leave_sheet(sel.month, sel.year, &known)
                    .unwrap_or_default();
                let report_name = resolver::resolve(
                    &Selection::new(Category::Report, sel.month, sel.year),
                    &known,
                );
                let leave = ctx.cache.get(&leave_name);
                let report = ctx.cache.get(&report_name);
                let rows = matrix::build_matrix(
                    sel.category,
                    sel.month,
                    sel.year,
                    &data.rows,
                    &config.instructors,
                    leave.as_ref(),
                    report.as_ref(),
                );
                return ViewData {
                    target,
                    headers: data.headers,
                    rows,
                    missing,
                    ..Default::default()
                };
            }

            ViewData {
                target,
                headers: data.headers,
                rows: data.rows,
                missing,
                ..Default::default()
            }
        }
    });

    // Case-insensitive substring filter over every cell.
    let filtered_rows = Memo::new(move |_| {
        let data = view_data.get();
        let query = search.get().trim().to_lowercase();
        if query.is_empty() {
            return data.rows;
        }
        data.rows
            .into_iter()
            .filter(|row| {
                row.values()
                    .any(|value| value.to_lowercase().contains(&query))
            })
            .collect()
    });

    let table_config = Memo::new({
        let ctx = ctx.clone();
        move |_| {
            cache_version.track();
            let sel = selection.get();
            ctx.cache
                .get_config(&month_config_key(sel.month, sel.year))
                .unwrap_or_default()
        }
    });

    let set_category = move |category: Category| {
        selection.update(|sel| {
            sel.category = category;
            if category != Category::Statistics {
                sel.yearly = false;
            }
        });
    };

    let on_create_month = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            let sel = selection.get_untracked();
            set_is_loading.set(true);
            spawn_local(async move {
                let script_url = ctx.script_url.get_untracked();
                match api::create_month_sheets(&script_url, sel.month, sel.year).await {
                    Ok(url) => {
                        if let Some(url) = url {
                            ctx.spreadsheet_url.set(Some(url));
                        }
                        if let Err(e) = ctx.refresh_sheet_names().await {
                            set_error_message.set(Some(e.user_message()));
                        }
                    }
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
                set_is_loading.set(false);
            });
        }
    };

    let on_create_nv = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            set_is_loading.set(true);
            spawn_local(async move {
                let script_url = ctx.script_url.get_untracked();
                match api::create_nv_sheets(&script_url).await {
                    Ok(()) => {
                        if let Err(e) = ctx.refresh_sheet_names().await {
                            set_error_message.set(Some(e.user_message()));
                        }
                    }
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
                set_is_loading.set(false);
            });
        }
    };

    let reload_click = reload.clone();
    let can_edit = move || auth_state.get().can_edit_reports();
    let create_month_panel = on_create_month.clone();
    let create_nv_panel = on_create_nv.clone();

    view! {
        <div class="dashboard-page">
            <div class="dashboard-toolbar">
                <div class="category-tabs">
                    {Category::TABS
                        .into_iter()
                        .map(|category| {
                            view! {
                                <button
                                    class=move || {
                                        if selection.get().category == category {
                                            "tab-btn active"
                                        } else {
                                            "tab-btn"
                                        }
                                    }
                                    on:click=move |_| set_category(category)
                                >
                                    {category.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                    <button
                        class=move || {
                            if selection.get().category == Category::Operations {
                                "tab-btn active"
                            } else {
                                "tab-btn"
                            }
                        }
                        on:click=move |_| set_category(Category::Operations)
                    >
                        {Category::Operations.label()}
                    </button>
                </div>

                <Show when=move || selection.get().category == Category::Operations>
                    <div class="operations-tabs">
                        {OperationsTab::ALL
                            .into_iter()
                            .map(|tab| {
                                view! {
                                    <button
                                        class=move || {
                                            if selection.get().operations_tab == tab {
                                                "subtab-btn active"
                                            } else {
                                                "subtab-btn"
                                            }
                                        }
                                        on:click=move |_| {
                                            selection.update(|sel| sel.operations_tab = tab)
                                        }
                                    >
                                        {tab.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </Show>

                <div class="period-controls">
                    <select
                        on:change=move |ev| {
                            if let Ok(month) = event_target_value(&ev).parse::<u32>() {
                                selection.update(|sel| sel.month = month);
                            }
                        }
                    >
                        {(1..=12u32)
                            .map(|month| {
                                view! {
                                    <option
                                        value=month.to_string()
                                        selected=move || selection.get().month == month
                                    >
                                        {format!("Tháng {:02}", month)}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <select
                        on:change=move |ev| {
                            if let Ok(year) = event_target_value(&ev).parse::<i32>() {
                                selection.update(|sel| sel.year = year);
                            }
                        }
                    >
                        {(now.year() - 2..=now.year() + 1)
                            .map(|year| {
                                view! {
                                    <option
                                        value=year.to_string()
                                        selected=move || selection.get().year == year
                                    >
                                        {year.to_string()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <Show when=move || selection.get().category == Category::Statistics>
                        <label class="yearly-toggle">
                            <input
                                type="checkbox"
                                prop:checked=move || selection.get().yearly
                                on:change=move |ev| {
                                    selection.update(|sel| sel.yearly = event_target_checked(&ev))
                                }
                            />
                            "Cả năm"
                        </label>
                    </Show>
                </div>

                <div class="toolbar-actions">
                    <input
                        type="search"
                        placeholder="Tìm kiếm..."
                        value=move || search.get()
                        on:input=move |ev| set_search.set(event_target_value(&ev))
                    />
                    <button class="refresh-btn" on:click=move |_| reload_click(true)>
                        "Làm mới"
                    </button>
                    <Show when=can_edit>
                        <button
                            class="entry-btn"
                            on:click=move |_| set_show_entry.update(|v| *v = !*v)
                        >
                            "Nhập liệu"
                        </button>
                        <button
                            class="settings-btn"
                            on:click=move |_| set_show_settings.update(|v| *v = !*v)
                        >
                            "Cài đặt bảng"
                        </button>
                        <button class="create-btn" on:click=on_create_month.clone()>
                            "Tạo sheet tháng"
                        </button>
                        <button class="create-btn" on:click=on_create_nv.clone()>
                            "Tạo sheet NV"
                        </button>
                    </Show>
                </div>
            </div>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>
            <Show when=move || is_loading.get()>
                <div class="loading-indicator">"Đang tải..."</div>
            </Show>

            <Show when=move || show_entry.get() && can_edit()>
                <EntryForm selection=selection />
            </Show>
            <Show when=move || show_settings.get() && can_edit()>
                <SettingsPanel selection=selection />
            </Show>

            {move || {
                let sel = selection.get();
                let data = view_data.get();
                if data.missing {
                    return view! {
                        <div class="missing-sheet">
                            <p>"Sheet của kỳ này chưa được tạo."</p>
                            {if can_edit() {
                                if sel.category == Category::Operations {
                                    view! {
                                        <button
                                            class="create-btn"
                                            on:click=create_nv_panel.clone()
                                        >
                                            "Tạo sheet NV"
                                        </button>
                                    }
                                        .into_any()
                                } else {
                                    view! {
                                        <button
                                            class="create-btn"
                                            on:click=create_month_panel.clone()
                                        >
                                            "Tạo sheet tháng"
                                        </button>
                                    }
                                        .into_any()
                                }
                            } else {
                                view! {
                                    <p>"Vui lòng liên hệ quản trị viên để tạo sheet."</p>
                                }
                                    .into_any()
                            }}
                        </div>
                    }
                        .into_any();
                }
                match sel.category {
                    Category::Statistics => {
                        view! {
                            <StatsTable
                                people=data.people
                                config=table_config.get()
                            />
                        }
                            .into_any()
                    }
                    Category::LeaveComp | Category::Plan => {
                        view! {
                            <MatrixTable
                                selection=selection
                                rows=filtered_rows.get()
                                config=table_config.get()
                            />
                        }
                            .into_any()
                    }
                    _ => {
                        view! {
                            <ReportTable
                                headers=data.headers
                                rows=filtered_rows.get()
                                config=table_config.get()
                            />
                        }
                            .into_any()
                    }
                }
            }}
        </div>
    }
}

/// Shared helper: look up the config of the selected month and hand a
/// modified copy back to the cache and the gateway.
pub(crate) fn save_month_config(
    ctx: &crate::layout::AppGlobalContext,
    month: u32,
    year: i32,
    config: TableConfig,
    on_error: WriteSignal<Option<String>>,
) {
    let ctx = ctx.clone();
    let key = month_config_key(month, year);
    ctx.cache.put_config(&key, config.clone());
    ctx.persist_configs();
    ctx.sync_version();
    spawn_local(async move {
        let script_url = ctx.script_url.get_untracked();
        if let Err(e) = api::save_table_config(&script_url, &key, &config).await {
            on_error.set(Some(e.user_message()));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // A month nobody created yet resolves to a synthesized name; that
    // must read as "not yet created", never as a fetch error.
    #[test]
    fn synthesized_names_count_as_not_yet_created() {
        let known = vec!["BC-T09-2025".to_string()];
        let sel = Selection::new(Category::Report, 3, 2024);
        let target = resolver::resolve(&sel, &known);
        assert_eq!(target, "BC-T03-2024");
        assert!(sheet_missing(&target, &known));
    }

    #[test]
    fn listed_names_are_created_and_empty_targets_are_not() {
        let known = vec!["BC-T09-2025".to_string()];
        assert!(!sheet_missing("BC-T09-2025", &known));
        // An unresolved operations sub-tab resolves to empty.
        assert!(sheet_missing("", &known));
    }
}
