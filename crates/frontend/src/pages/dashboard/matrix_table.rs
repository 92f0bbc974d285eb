use contracts::config::TableConfig;
use contracts::sheets::fields::{person_key, row_value, PERSON_COLUMN};
use contracts::sheets::SheetRow;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::use_app_context;
use crate::sheets::category::Selection;
use crate::sheets::{dates, resolver};
use crate::system::auth::use_auth;

/// Day-grid view for the leave and plan categories: one row per
/// person, one column per calendar day. Cells are edited in place;
/// the write goes out keyed by the person column and the cache is
/// committed only after the gateway acknowledged it.
#[component]
pub fn MatrixTable(
    selection: RwSignal<Selection>,
    rows: Vec<SheetRow>,
    config: TableConfig,
) -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    // (person, day key) of the cell being edited.
    let editing = RwSignal::new(Option::<(String, String)>::None);
    let draft = RwSignal::new(String::new());
    let (save_error, set_save_error) = signal(Option::<String>::None);

    let sel = selection.get_untracked();
    let day_keys = dates::day_keys(sel.month, sel.year);
    let day_labels: Vec<(String, &'static str)> = day_keys
        .iter()
        .enumerate()
        .map(|(i, key)| (key.clone(), dates::day_label(i as u32 + 1, sel.month, sel.year)))
        .collect();

    let header_style = format!(
        "background-color:{};color:{}",
        config.alternating_color.header_bg, config.alternating_color.header_text
    );

    let commit = {
        let ctx = ctx.clone();
        move |person: String, day_key: String, content: String| {
            let ctx = ctx.clone();
            let sel = selection.get_untracked();
            let known = ctx.sheet_names.get_untracked();
            let target = resolver::resolve(&sel, &known);
            if target.is_empty() {
                return;
            }
            spawn_local(async move {
                let loader = ctx.loader();
                match loader
                    .upsert_matrix_cell(&target, &person, &day_key, &content)
                    .await
                {
                    Ok(()) => {
                        set_save_error.set(None);
                        ctx.sync_version();
                    }
                    Err(e) => set_save_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let can_edit = move || auth_state.get().can_edit_reports();

    view! {
        <div class="table-wrap">
            <Show when=move || save_error.get().is_some()>
                <div class="error-message">{move || save_error.get().unwrap_or_default()}</div>
            </Show>
            <table class="matrix-table">
                <thead>
                    <tr>
                        <th rowspan="2" style=header_style.clone()>"STT"</th>
                        <th rowspan="2" style=header_style.clone()>{PERSON_COLUMN}</th>
                        {day_labels
                            .iter()
                            .map(|(key, _)| {
                                view! {
                                    <th style=header_style.clone()>
                                        {key.trim_start_matches('0').to_string()}
                                    </th>
                                }
                            })
                            .collect_view()}
                    </tr>
                    <tr>
                        {day_labels
                            .iter()
                            .map(|(_, label)| {
                                let class = if dates::is_weekend_label(label) {
                                    "weekend-label"
                                } else {
                                    ""
                                };
                                view! {
                                    <th class=class style=header_style.clone()>{*label}</th>
                                }
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .iter()
                        .map(|row| {
                            let person = row_value(row, PERSON_COLUMN)
                                .unwrap_or_default()
                                .to_string();
                            let stt = row_value(row, "STT").unwrap_or_default().to_string();
                            let name_style = config
                                .instructor_colors
                                .get(&person_key(&person))
                                .map(|color| format!("background-color:{}", color))
                                .unwrap_or_default();
                            view! {
                                <tr>
                                    <td>{stt}</td>
                                    <td class="person-cell" style=name_style>
                                        {person.clone()}
                                    </td>
                                    {day_labels
                                        .iter()
                                        .map(|(key, label)| {
                                            let value = row_value(row, key)
                                                .unwrap_or_default()
                                                .to_string();
                                            matrix_cell(
                                                person.clone(),
                                                key.clone(),
                                                value,
                                                dates::is_weekend_label(label),
                                                &config,
                                                editing,
                                                draft,
                                                can_edit,
                                                commit.clone(),
                                            )
                                        })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            <Show when={
                let empty = rows.is_empty();
                move || empty
            }>
                <div class="empty-state">"Chưa có dữ liệu"</div>
            </Show>
        </div>
    }
}

#[allow(clippy::too_many_arguments)]
fn matrix_cell(
    person: String,
    day_key: String,
    value: String,
    weekend: bool,
    config: &TableConfig,
    editing: RwSignal<Option<(String, String)>>,
    draft: RwSignal<String>,
    can_edit: impl Fn() -> bool + Copy + Send + Sync + 'static,
    commit: impl Fn(String, String, String) + Clone + Send + Sync + 'static,
) -> impl IntoView {
    let style = match config.matching_rule(&value) {
        Some(rule) => {
            let weight = if rule.bold { "bold" } else { "normal" };
            format!(
                "background-color:{};color:{};font-weight:{}",
                rule.background_color, rule.text_color, weight
            )
        }
        None if weekend => "background-color:#f9fafb".to_string(),
        None => String::new(),
    };

    let cell_id = (person.clone(), day_key.clone());
    let is_editing = {
        let cell_id = cell_id.clone();
        move || editing.get().as_ref() == Some(&cell_id)
    };

    let start_edit = {
        let cell_id = cell_id.clone();
        let value = value.clone();
        move |_| {
            if can_edit() && editing.get_untracked().as_ref() != Some(&cell_id) {
                draft.set(value.clone());
                editing.set(Some(cell_id.clone()));
            }
        }
    };

    let finish = {
        let commit = commit.clone();
        move || {
            if let Some((person, day_key)) = editing.get_untracked() {
                editing.set(None);
                commit(person, day_key, draft.get_untracked());
            }
        }
    };

    view! {
        <td class="matrix-cell" style=style on:click=start_edit>
            <Show
                when=is_editing
                fallback={
                    let value = value.clone();
                    move || value.clone()
                }
            >
                <input
                    type="text"
                    class="cell-input"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                    on:keydown={
                        let finish = finish.clone();
                        move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                finish();
                            } else if ev.key() == "Escape" {
                                editing.set(None);
                            }
                        }
                    }
                    on:blur={
                        let finish = finish.clone();
                        move |_| finish()
                    }
                />
            </Show>
        </td>
    }
}
