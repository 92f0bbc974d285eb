use contracts::sheets::SheetRow;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::use_app_context;
use crate::sheets::category::Selection;
use crate::sheets::{dates, resolver};

/// Numeric session counters enterable on a report row.
const METRIC_COLUMNS: &[&str] = &[
    "DĐ", "BRCĐ", "CNTT", "OL", "KN", "Coach", "AI Mentor", "TTKD", "OKR", "STL", "OS", "CT",
    "HOC",
];

fn field(form: RwSignal<SheetRow>, column: &str) -> String {
    form.with(|f| f.get(column).cloned().unwrap_or_default())
}

fn set_field(form: RwSignal<SheetRow>, column: &str, value: String) {
    let column = column.to_string();
    form.update(|f| {
        f.insert(column, value);
    });
}

/// "yyyy-mm-dd" from the date input, "dd-mm-yyyy" on the sheet.
fn to_sheet_date(input: &str) -> String {
    let parts: Vec<&str> = input.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{}-{}-{}", day, month, year),
        _ => input.to_string(),
    }
}

fn weekday_of(input: &str) -> String {
    let parts: Vec<&str> = input.split('-').collect();
    if let [year, month, day] = parts.as_slice() {
        if let (Ok(year), Ok(month), Ok(day)) =
            (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>())
        {
            return dates::day_label(day, month, year).to_string();
        }
    }
    String::new()
}

/// Row entry form for the report and operations categories. The row
/// is appended remotely first; the local cache is only updated after
/// the gateway acknowledged the write.
#[component]
pub fn EntryForm(selection: RwSignal<Selection>) -> impl IntoView {
    let ctx = use_app_context();
    let app_config = ctx.app_config;

    let form = RwSignal::new(SheetRow::new());
    let (date_input, set_date_input) = signal(String::new());
    let (message, set_message) = signal(Option::<Result<String, String>>::None);
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let ctx = ctx.clone();
            let sel = selection.get_untracked();
            let known = ctx.sheet_names.get_untracked();
            let target = resolver::resolve(&sel, &known);
            if target.is_empty() {
                set_message.set(Some(Err("Chưa chọn được sheet để ghi".to_string())));
                return;
            }

            let mut row = form.get_untracked();
            let date = date_input.get_untracked();
            if !date.is_empty() {
                row.insert("Ngày".to_string(), to_sheet_date(&date));
                row.insert("Thứ".to_string(), weekday_of(&date));
            }
            row.retain(|_, value| !value.trim().is_empty());
            let next_stt = ctx
                .cache
                .get(&target)
                .map(|data| data.rows.len() + 1)
                .unwrap_or(1);
            row.insert("STT".to_string(), next_stt.to_string());

            set_is_saving.set(true);
            set_message.set(None);
            spawn_local(async move {
                let loader = ctx.loader();
                match loader.append_row(&target, row).await {
                    Ok(()) => {
                        ctx.sync_version();
                        form.set(SheetRow::new());
                        set_date_input.set(String::new());
                        set_message.set(Some(Ok("Đã lưu báo cáo".to_string())));
                    }
                    Err(e) => set_message.set(Some(Err(e.user_message()))),
                }
                set_is_saving.set(false);
            });
        }
    };

    let text_input = move |column: &'static str, list: Option<&'static str>| {
        view! {
            <div class="form-group">
                <label>{column}</label>
                <input
                    type="text"
                    list=list.unwrap_or_default()
                    value=move || field(form, column)
                    on:input=move |ev| set_field(form, column, event_target_value(&ev))
                />
            </div>
        }
    };

    view! {
        <form class="entry-form" on:submit=on_submit>
            <h3>"Nhập báo cáo"</h3>

            {move || match message.get() {
                Some(Ok(text)) => view! { <div class="info-message">{text}</div> }.into_any(),
                Some(Err(text)) => view! { <div class="error-message">{text}</div> }.into_any(),
                None => ().into_any(),
            }}

            <div class="form-row">
                {text_input("Mã Lớp", Some("class-codes"))}
                <datalist id="class-codes">
                    {move || {
                        app_config
                            .get()
                            .class_codes
                            .into_iter()
                            .map(|code| view! { <option value=code /> })
                            .collect_view()
                    }}
                </datalist>
                {text_input("Nội dung", None)}
                <div class="form-group">
                    <label>"Buổi"</label>
                    <select
                        prop:value=move || field(form, "Buổi")
                        on:change=move |ev| set_field(form, "Buổi", event_target_value(&ev))
                    >
                        <option value="">""</option>
                        <option value="Sáng">"Sáng"</option>
                        <option value="Chiều">"Chiều"</option>
                        <option value="Tối">"Tối"</option>
                    </select>
                </div>
                <div class="form-group">
                    <label>"Ngày"</label>
                    <input
                        type="date"
                        value=move || date_input.get()
                        on:input=move |ev| set_date_input.set(event_target_value(&ev))
                        required
                    />
                </div>
            </div>

            <div class="form-row">
                <div class="form-group">
                    <label>"Giảng Viên"</label>
                    <select
                        prop:value=move || field(form, "Giảng Viên")
                        on:change=move |ev| set_field(form, "Giảng Viên", event_target_value(&ev))
                        required
                    >
                        <option value="">""</option>
                        {move || {
                            app_config
                                .get()
                                .instructors
                                .into_iter()
                                .map(|name| {
                                    let label = name.clone();
                                    view! { <option value=name>{label}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="form-group">
                    <label>"Đơn vị"</label>
                    <select
                        prop:value=move || field(form, "Đơn vị")
                        on:change=move |ev| set_field(form, "Đơn vị", event_target_value(&ev))
                    >
                        <option value="">""</option>
                        {move || {
                            app_config
                                .get()
                                .units
                                .into_iter()
                                .map(|unit| {
                                    let label = unit.clone();
                                    view! { <option value=unit>{label}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                </div>
                {text_input("SL HV", None)}
                <div class="form-group">
                    <label>"Hình Thức"</label>
                    <select
                        prop:value=move || field(form, "Hình Thức")
                        on:change=move |ev| set_field(form, "Hình Thức", event_target_value(&ev))
                    >
                        <option value="">""</option>
                        <option value="Offline">"Offline"</option>
                        <option value="Online">"Online"</option>
                    </select>
                </div>
                <div class="form-group">
                    <label>"ĐTV"</label>
                    <select
                        prop:value=move || field(form, "ĐTV")
                        on:change=move |ev| set_field(form, "ĐTV", event_target_value(&ev))
                    >
                        <option value="">""</option>
                        <option value="M">"M"</option>
                        <option value="HH">"HH"</option>
                        <option value="CD">"CD"</option>
                    </select>
                </div>
            </div>

            <div class="form-row metrics-row">
                {METRIC_COLUMNS
                    .iter()
                    .map(|column| {
                        view! {
                            <div class="form-group metric">
                                <label>{*column}</label>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="0"
                                    value=move || field(form, column)
                                    on:input=move |ev| {
                                        set_field(form, column, event_target_value(&ev))
                                    }
                                />
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <button type="submit" class="btn-primary" disabled=move || is_saving.get()>
                {move || if is_saving.get() { "Đang lưu..." } else { "Lưu báo cáo" }}
            </button>
        </form>
    }
}
