use contracts::config::{month_config_key, ConditionalRule, RuleCondition};
use contracts::sheets::fields::person_key;
use leptos::prelude::*;

use crate::layout::use_app_context;
use crate::sheets::category::{Selection, REPORT_COLUMNS};

use super::save_month_config;

const CONDITIONS: &[(RuleCondition, &str)] = &[
    (RuleCondition::Equals, "Bằng"),
    (RuleCondition::Contains, "Chứa"),
    (RuleCondition::StartsWith, "Bắt đầu bằng"),
    (RuleCondition::GreaterThan, "Lớn hơn"),
    (RuleCondition::LessThan, "Nhỏ hơn"),
];

fn condition_of(value: &str) -> RuleCondition {
    match value {
        "contains" => RuleCondition::Contains,
        "starts_with" => RuleCondition::StartsWith,
        "greater_than" => RuleCondition::GreaterThan,
        "less_than" => RuleCondition::LessThan,
        _ => RuleCondition::Equals,
    }
}

fn condition_key(condition: RuleCondition) -> &'static str {
    match condition {
        RuleCondition::Equals => "equals",
        RuleCondition::Contains => "contains",
        RuleCondition::StartsWith => "starts_with",
        RuleCondition::GreaterThan => "greater_than",
        RuleCondition::LessThan => "less_than",
    }
}

/// Editor of the selected month's table appearance: row alternation,
/// conditional cell rules, instructor colors and column widths. All
/// edits stay local until saved; saving commits to the cache, the
/// session snapshot and the gateway.
#[component]
pub fn SettingsPanel(selection: RwSignal<Selection>) -> impl IntoView {
    let ctx = use_app_context();
    let app_config = ctx.app_config;

    let sel = selection.get_untracked();
    let initial = ctx
        .cache
        .get_config(&month_config_key(sel.month, sel.year))
        .unwrap_or_default();
    let config = RwSignal::new(initial);
    let (error_message, set_error_message) = signal(Option::<String>::None);

    let new_rule_value = RwSignal::new(String::new());
    let new_rule_condition = RwSignal::new(RuleCondition::Equals);
    let new_rule_bg = RwSignal::new("#fef3c7".to_string());
    let new_rule_text = RwSignal::new("#92400e".to_string());

    let width_column = RwSignal::new(String::new());
    let width_value = RwSignal::new(String::new());

    let add_rule = move |_| {
        let value = new_rule_value.get_untracked().trim().to_string();
        if value.is_empty() {
            return;
        }
        config.update(|c| {
            c.conditional_rules.push(ConditionalRule {
                condition: new_rule_condition.get_untracked(),
                value,
                background_color: new_rule_bg.get_untracked(),
                text_color: new_rule_text.get_untracked(),
                bold: false,
            });
        });
        new_rule_value.set(String::new());
    };

    let add_width = move |_| {
        let column = width_column.get_untracked();
        if let Ok(width) = width_value.get_untracked().trim().parse::<f64>() {
            if !column.is_empty() && width > 0.0 {
                config.update(|c| {
                    c.column_widths.insert(column, width);
                });
                width_value.set(String::new());
            }
        }
    };

    let on_save = {
        let ctx = ctx.clone();
        move |_| {
            let sel = selection.get_untracked();
            save_month_config(
                &ctx,
                sel.month,
                sel.year,
                config.get_untracked(),
                set_error_message,
            );
        }
    };

    view! {
        <div class="settings-panel">
            <h3>{move || {
                let sel = selection.get();
                format!("Cài đặt bảng tháng {:02}/{}", sel.month, sel.year)
            }}</h3>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">{move || error_message.get().unwrap_or_default()}</div>
            </Show>

            <fieldset>
                <legend>"Màu xen kẽ"</legend>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || config.get().is_enabled_alternating
                        on:change=move |ev| {
                            config.update(|c| c.is_enabled_alternating = event_target_checked(&ev))
                        }
                    />
                    "Bật màu xen kẽ"
                </label>
                <label>
                    "Nền tiêu đề"
                    <input
                        type="color"
                        value=move || config.get().alternating_color.header_bg
                        on:input=move |ev| {
                            config.update(|c| {
                                c.alternating_color.header_bg = event_target_value(&ev)
                            })
                        }
                    />
                </label>
                <label>
                    "Chữ tiêu đề"
                    <input
                        type="color"
                        value=move || config.get().alternating_color.header_text
                        on:input=move |ev| {
                            config.update(|c| {
                                c.alternating_color.header_text = event_target_value(&ev)
                            })
                        }
                    />
                </label>
                <label>
                    "Dòng lẻ"
                    <input
                        type="color"
                        value=move || config.get().alternating_color.odd_row_bg
                        on:input=move |ev| {
                            config.update(|c| {
                                c.alternating_color.odd_row_bg = event_target_value(&ev)
                            })
                        }
                    />
                </label>
                <label>
                    "Dòng chẵn"
                    <input
                        type="color"
                        value=move || config.get().alternating_color.even_row_bg
                        on:input=move |ev| {
                            config.update(|c| {
                                c.alternating_color.even_row_bg = event_target_value(&ev)
                            })
                        }
                    />
                </label>
            </fieldset>

            <fieldset>
                <legend>"Quy tắc tô màu theo giá trị"</legend>
                <ul class="rule-list">
                    {move || {
                        config
                            .get()
                            .conditional_rules
                            .into_iter()
                            .enumerate()
                            .map(|(index, rule)| {
                                let caption = CONDITIONS
                                    .iter()
                                    .find(|(c, _)| *c == rule.condition)
                                    .map(|(_, label)| *label)
                                    .unwrap_or_default();
                                let swatch = format!(
                                    "background-color:{};color:{}",
                                    rule.background_color, rule.text_color
                                );
                                view! {
                                    <li>
                                        <span style=swatch>{format!("{} \"{}\"", caption, rule.value)}</span>
                                        <button on:click=move |_| {
                                            config.update(|c| {
                                                c.conditional_rules.remove(index);
                                            })
                                        }>
                                            "Xóa"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
                <div class="rule-editor">
                    <select on:change=move |ev| {
                        new_rule_condition.set(condition_of(&event_target_value(&ev)))
                    }>
                        {CONDITIONS
                            .iter()
                            .map(|(condition, label)| {
                                view! {
                                    <option value=condition_key(*condition)>{*label}</option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <input
                        type="text"
                        placeholder="Giá trị"
                        value=move || new_rule_value.get()
                        on:input=move |ev| new_rule_value.set(event_target_value(&ev))
                    />
                    <input
                        type="color"
                        value=move || new_rule_bg.get()
                        on:input=move |ev| new_rule_bg.set(event_target_value(&ev))
                    />
                    <input
                        type="color"
                        value=move || new_rule_text.get()
                        on:input=move |ev| new_rule_text.set(event_target_value(&ev))
                    />
                    <button on:click=add_rule>"Thêm quy tắc"</button>
                </div>
            </fieldset>

            <fieldset>
                <legend>"Màu giảng viên"</legend>
                {move || {
                    app_config
                        .get()
                        .instructors
                        .into_iter()
                        .map(|name| {
                            let key = person_key(&name);
                            let color_key = key.clone();
                            let current = move || {
                                config
                                    .get()
                                    .instructor_colors
                                    .get(&color_key)
                                    .cloned()
                                    .unwrap_or_else(|| "#ffffff".to_string())
                            };
                            view! {
                                <label class="instructor-color">
                                    {name.clone()}
                                    <input
                                        type="color"
                                        value=current
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            let key = key.clone();
                                            config.update(|c| {
                                                c.instructor_colors.insert(key, value);
                                            });
                                        }
                                    />
                                </label>
                            }
                        })
                        .collect_view()
                }}
            </fieldset>

            <fieldset>
                <legend>"Độ rộng cột"</legend>
                <ul class="width-list">
                    {move || {
                        let mut widths: Vec<(String, f64)> =
                            config.get().column_widths.into_iter().collect();
                        widths.sort_by(|a, b| a.0.cmp(&b.0));
                        widths
                            .into_iter()
                            .map(|(column, width)| {
                                let remove_key = column.clone();
                                view! {
                                    <li>
                                        {format!("{}: {}px", column, width)}
                                        <button on:click=move |_| {
                                            let remove_key = remove_key.clone();
                                            config.update(|c| {
                                                c.column_widths.remove(&remove_key);
                                            })
                                        }>
                                            "Xóa"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
                <div class="width-editor">
                    <select on:change=move |ev| width_column.set(event_target_value(&ev))>
                        <option value="">""</option>
                        {REPORT_COLUMNS
                            .iter()
                            .map(|column| view! { <option value=*column>{*column}</option> })
                            .collect_view()}
                    </select>
                    <input
                        type="number"
                        min="20"
                        placeholder="px"
                        value=move || width_value.get()
                        on:input=move |ev| width_value.set(event_target_value(&ev))
                    />
                    <button on:click=add_width>"Thêm"</button>
                </div>
            </fieldset>

            <button class="btn-primary" on:click=on_save>"Lưu cài đặt"</button>
        </div>
    }
}
