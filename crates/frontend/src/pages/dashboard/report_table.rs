use contracts::config::TableConfig;
use contracts::sheets::fields::{person_key, row_value, PERSON_COLUMN};
use contracts::sheets::SheetRow;
use leptos::prelude::*;

use crate::sheets::category::REPORT_COLUMNS;

/// Inline style of one data cell under the month's table config:
/// conditional rules first, then the instructor color on the person
/// column, then row alternation.
fn cell_style(
    config: &TableConfig,
    column: &str,
    value: &str,
    person: Option<&str>,
    row_index: usize,
) -> String {
    if let Some(rule) = config.matching_rule(value) {
        let weight = if rule.bold { "bold" } else { "normal" };
        return format!(
            "background-color:{};color:{};font-weight:{}",
            rule.background_color, rule.text_color, weight
        );
    }
    if column == PERSON_COLUMN {
        if let Some(person) = person {
            if let Some(color) = config.instructor_colors.get(&person_key(person)) {
                return format!("background-color:{}", color);
            }
        }
    }
    if config.is_enabled_alternating {
        let bg = if row_index % 2 == 0 {
            &config.alternating_color.even_row_bg
        } else {
            &config.alternating_color.odd_row_bg
        };
        return format!("background-color:{}", bg);
    }
    String::new()
}

fn column_style(config: &TableConfig, column: &str) -> String {
    match config.column_widths.get(column) {
        Some(width) => format!("width:{}px;min-width:{}px", width, width),
        None => String::new(),
    }
}

#[component]
pub fn ReportTable(
    headers: Vec<String>,
    rows: Vec<SheetRow>,
    config: TableConfig,
) -> impl IntoView {
    let columns: Vec<String> = if headers.is_empty() {
        REPORT_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        headers
    };

    let header_style = format!(
        "background-color:{};color:{}",
        config.alternating_color.header_bg, config.alternating_color.header_text
    );

    view! {
        <div class="table-wrap">
            <table class="report-table">
                <thead>
                    <tr>
                        {columns
                            .iter()
                            .map(|column| {
                                let style =
                                    format!("{};{}", header_style, column_style(&config, column));
                                view! { <th style=style>{column.clone()}</th> }
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .iter()
                        .enumerate()
                        .map(|(row_index, row)| {
                            let person = row_value(row, PERSON_COLUMN).map(str::to_string);
                            view! {
                                <tr>
                                    {columns
                                        .iter()
                                        .map(|column| {
                                            let value = row_value(row, column)
                                                .unwrap_or_default()
                                                .to_string();
                                            let style = cell_style(
                                                &config,
                                                column,
                                                &value,
                                                person.as_deref(),
                                                row_index,
                                            );
                                            view! { <td style=style>{value}</td> }
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
