use contracts::config::AppConfig;
use contracts::users::{AdminUpdateKind, User, UserRole, UserStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::gateway::api;
use crate::layout::use_app_context;
use crate::system::auth::use_auth;

fn lines_of(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn role_of(value: &str) -> UserRole {
    match value {
        "ADMIN" => UserRole::Admin,
        "LEADER" => UserRole::Leader,
        _ => UserRole::Instructor,
    }
}

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Quản trị",
        UserRole::Leader => "Trưởng nhóm",
        UserRole::Instructor => "Giảng viên",
    }
}

/// Administration screen: account management and the category
/// configuration (class codes, instructor roster, units).
#[component]
pub fn AdminPage() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    let (users, set_users) = signal(Vec::<User>::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (info_message, set_info_message) = signal(Option::<String>::None);

    let (new_username, set_new_username) = signal(String::new());
    let (new_full_name, set_new_full_name) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (new_role, set_new_role) = signal(UserRole::Instructor);

    let (class_codes_text, set_class_codes_text) = signal(String::new());
    let (instructors_text, set_instructors_text) = signal(String::new());
    let (units_text, set_units_text) = signal(String::new());

    let refresh_users = {
        let ctx = ctx.clone();
        move || {
            let ctx = ctx.clone();
            spawn_local(async move {
                let script_url = ctx.script_url.get_untracked();
                match api::get_all_users(&script_url).await {
                    Ok(list) => set_users.set(list),
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
            });
        }
    };

    // Load users and prefill the category config editors.
    refresh_users();
    {
        let ctx = ctx.clone();
        spawn_local(async move {
            if let Err(e) = ctx.load_app_config().await {
                set_error_message.set(Some(e.user_message()));
                return;
            }
            let config = ctx.app_config.get_untracked();
            set_class_codes_text.set(config.class_codes.join("\n"));
            set_instructors_text.set(config.instructors.join("\n"));
            set_units_text.set(config.units.join("\n"));
        });
    }

    let update_user = {
        let ctx = ctx.clone();
        let refresh_users = refresh_users.clone();
        move |kind: AdminUpdateKind, user: User, success: &'static str| {
            let ctx = ctx.clone();
            let refresh_users = refresh_users.clone();
            set_error_message.set(None);
            set_info_message.set(None);
            spawn_local(async move {
                let script_url = ctx.script_url.get_untracked();
                match api::admin_update_user(&script_url, kind, user).await {
                    Ok(()) => {
                        set_info_message.set(Some(success.to_string()));
                        refresh_users();
                    }
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
            });
        }
    };

    let on_add_user = {
        let update_user = update_user.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let user = User {
                username: new_username.get_untracked().trim().to_string(),
                role: new_role.get_untracked(),
                full_name: new_full_name.get_untracked().trim().to_string(),
                email: None,
                phone: None,
                address: None,
                status: Some(UserStatus::Active),
                password: Some(new_password.get_untracked()),
            };
            if user.username.is_empty() || user.password.as_deref() == Some("") {
                set_error_message
                    .set(Some("Cần tên đăng nhập và mật khẩu".to_string()));
                return;
            }
            update_user(AdminUpdateKind::Add, user, "Đã thêm tài khoản");
            set_new_username.set(String::new());
            set_new_full_name.set(String::new());
            set_new_password.set(String::new());
        }
    };

    let on_save_config = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            let Some(user) = auth_state.get_untracked().user else {
                return;
            };
            let config = AppConfig {
                class_codes: lines_of(&class_codes_text.get_untracked()),
                instructors: lines_of(&instructors_text.get_untracked()),
                units: lines_of(&units_text.get_untracked()),
            };
            set_error_message.set(None);
            set_info_message.set(None);
            spawn_local(async move {
                let script_url = ctx.script_url.get_untracked();
                match api::save_app_config(&script_url, &user, &config).await {
                    Ok(()) => {
                        ctx.app_config.set(config);
                        set_info_message.set(Some("Đã lưu danh mục".to_string()));
                    }
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
            });
        }
    };

    view! {
        <div class="admin-page">
            <h1>"Quản trị hệ thống"</h1>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">{move || error_message.get().unwrap_or_default()}</div>
            </Show>
            <Show when=move || info_message.get().is_some()>
                <div class="info-message">{move || info_message.get().unwrap_or_default()}</div>
            </Show>

            <section class="admin-users">
                <h2>
                    "Tài khoản"
                    {move || {
                        let blocked = users.get().iter().filter(|u| u.is_blocked()).count();
                        if blocked > 0 {
                            view! {
                                <span class="pending-badge">
                                    {format!("{} chờ duyệt", blocked)}
                                </span>
                            }
                                .into_any()
                        } else {
                            ().into_any()
                        }
                    }}
                </h2>
                <table class="user-table">
                    <thead>
                        <tr>
                            <th>"Tên đăng nhập"</th>
                            <th>"Họ và tên"</th>
                            <th>"Vai trò"</th>
                            <th>"Trạng thái"</th>
                            <th>"Thao tác"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let update_user = update_user.clone();
                            users
                                .get()
                                .into_iter()
                                .map(|user| {
                                    let blocked = user.is_blocked();
                                    let toggle_user = User {
                                        status: Some(if blocked {
                                            UserStatus::Active
                                        } else {
                                            UserStatus::Blocked
                                        }),
                                        password: None,
                                        ..user.clone()
                                    };
                                    let reset_user = User {
                                        password: Some("123456".to_string()),
                                        ..user.clone()
                                    };
                                    let toggle = update_user.clone();
                                    let reset = update_user.clone();
                                    view! {
                                        <tr>
                                            <td>{user.username.clone()}</td>
                                            <td>{user.full_name.clone()}</td>
                                            <td>{role_label(user.role)}</td>
                                            <td>
                                                {if blocked { "Đã khóa" } else { "Hoạt động" }}
                                            </td>
                                            <td>
                                                <button on:click=move |_| {
                                                    toggle(
                                                        AdminUpdateKind::UpdateStatus,
                                                        toggle_user.clone(),
                                                        "Đã cập nhật trạng thái",
                                                    )
                                                }>
                                                    {if blocked { "Mở khóa" } else { "Khóa" }}
                                                </button>
                                                <button on:click=move |_| {
                                                    reset(
                                                        AdminUpdateKind::ResetPass,
                                                        reset_user.clone(),
                                                        "Đã đặt lại mật khẩu",
                                                    )
                                                }>
                                                    "Đặt lại mật khẩu"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>

                <form class="add-user-form" on:submit=on_add_user>
                    <h3>"Thêm tài khoản"</h3>
                    <input
                        type="text"
                        placeholder="Tên đăng nhập"
                        value=move || new_username.get()
                        on:input=move |ev| set_new_username.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Họ và tên"
                        value=move || new_full_name.get()
                        on:input=move |ev| set_new_full_name.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="Mật khẩu"
                        value=move || new_password.get()
                        on:input=move |ev| set_new_password.set(event_target_value(&ev))
                    />
                    <select on:change=move |ev| set_new_role.set(role_of(&event_target_value(&ev)))>
                        <option value="INSTRUCTOR">"Giảng viên"</option>
                        <option value="LEADER">"Trưởng nhóm"</option>
                        <option value="ADMIN">"Quản trị"</option>
                    </select>
                    <button type="submit" class="btn-primary">"Thêm"</button>
                </form>
            </section>

            <section class="admin-config">
                <h2>"Danh mục"</h2>
                <div class="config-editors">
                    <div class="form-group">
                        <label>"Mã lớp (mỗi dòng một mã)"</label>
                        <textarea
                            prop:value=move || class_codes_text.get()
                            on:input=move |ev| set_class_codes_text.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label>"Giảng viên (mỗi dòng một người)"</label>
                        <textarea
                            prop:value=move || instructors_text.get()
                            on:input=move |ev| set_instructors_text.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label>"Đơn vị (mỗi dòng một đơn vị)"</label>
                        <textarea
                            prop:value=move || units_text.get()
                            on:input=move |ev| set_units_text.set(event_target_value(&ev))
                        />
                    </div>
                </div>
                <button class="btn-primary" on:click=on_save_config>"Lưu danh mục"</button>
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_trimmed_and_blank_lines_dropped() {
        assert_eq!(
            lines_of("  L01 \n\n L02\n"),
            vec!["L01".to_string(), "L02".to_string()]
        );
    }

    #[test]
    fn unknown_role_defaults_to_instructor() {
        assert_eq!(role_of("ADMIN"), UserRole::Admin);
        assert_eq!(role_of("garbage"), UserRole::Instructor);
    }
}
