use contracts::config::TableConfig;
use contracts::sheets::fields::person_key;
use leptos::prelude::*;

use crate::sheets::stats::{PersonStats, STAT_GROUPS};

/// Counters are entered as halves at most, so one decimal is enough.
fn format_counter(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[component]
pub fn StatsTable(people: Vec<PersonStats>, config: TableConfig) -> impl IntoView {
    let header_style = format!(
        "background-color:{};color:{}",
        config.alternating_color.header_bg, config.alternating_color.header_text
    );

    view! {
        <div class="table-wrap">
            <table class="stats-table">
                <thead>
                    <tr>
                        <th rowspan="2" style=header_style.clone()>"STT"</th>
                        <th rowspan="2" style=header_style.clone()>"Giảng Viên"</th>
                        {STAT_GROUPS
                            .iter()
                            .map(|group| {
                                view! {
                                    <th
                                        colspan=group.columns.len().to_string()
                                        style=header_style.clone()
                                    >
                                        {group.title}
                                    </th>
                                }
                            })
                            .collect_view()}
                    </tr>
                    <tr>
                        {STAT_GROUPS
                            .iter()
                            .flat_map(|group| group.columns.iter())
                            .map(|column| {
                                view! { <th style=header_style.clone()>{*column}</th> }
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {people
                        .iter()
                        .map(|person| {
                            let name_style = {
                                let configured = config
                                    .instructor_colors
                                    .get(&person_key(&person.person))
                                    .cloned();
                                match configured.or_else(|| {
                                    (!person.color.is_empty()).then(|| person.color.clone())
                                }) {
                                    Some(color) => format!("background-color:{}", color),
                                    None => String::new(),
                                }
                            };
                            view! {
                                <tr>
                                    <td>{person.stt}</td>
                                    <td class="person-cell" style=name_style>
                                        {person.person.clone()}
                                    </td>
                                    {STAT_GROUPS
                                        .iter()
                                        .flat_map(|group| group.keys.iter())
                                        .map(|key| {
                                            let text = if person.displayable(key) {
                                                format_counter(person.counter(key))
                                            } else {
                                                "-".to_string()
                                            };
                                            view! { <td class="num-cell">{text}</td> }
                                        })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            <Show when={
                let empty = people.is_empty();
                move || empty
            }>
                <div class="empty-state">"Chưa có dữ liệu thống kê"</div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render_without_spurious_decimals() {
        assert_eq!(format_counter(2.0), "2");
        assert_eq!(format_counter(2.5), "2.5");
        assert_eq!(format_counter(0.5), "0.5");
    }
}
