use leptos::prelude::*;
use leptos::task::spawn_local;

use contracts::users::{User, UserRole};

use crate::gateway::api;
use crate::layout::use_app_context;
use crate::system::auth::{context, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let (_, set_auth_state) = use_auth();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let script_url = ctx.script_url;
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (info_message, set_info_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);
    let (registering, set_registering) = signal(false);
    let (full_name, set_full_name) = signal(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let url = script_url.get().trim().to_string();
        if url.is_empty() {
            set_error_message.set(Some("Vui lòng nhập địa chỉ Web App".to_string()));
            return;
        }
        let username_val = username.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);
        set_info_message.set(None);

        if registering.get() {
            let full_name_val = full_name.get();
            spawn_local(async move {
                let user = User {
                    username: username_val.trim().to_string(),
                    role: UserRole::Instructor,
                    full_name: full_name_val.trim().to_string(),
                    email: None,
                    phone: None,
                    address: None,
                    status: None,
                    password: Some(password_val),
                };
                match api::register(&url, user).await {
                    Ok(()) => {
                        set_info_message.set(Some(
                            "Đăng ký thành công. Vui lòng chờ quản trị viên phê duyệt.".to_string(),
                        ));
                        set_registering.set(false);
                    }
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
                set_is_loading.set(false);
            });
        } else {
            spawn_local(async move {
                match context::do_login(set_auth_state, &url, &username_val, &password_val).await {
                    Ok(_) => {}
                    Err(e) => set_error_message.set(Some(e.user_message())),
                }
                set_is_loading.set(false);
            });
        }
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Báo Cáo Đào Tạo"</h1>
                <h2>{move || if registering.get() { "Đăng ký tài khoản" } else { "Đăng nhập" }}</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>
                <Show when=move || info_message.get().is_some()>
                    <div class="info-message">
                        {move || info_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="script-url">"Địa chỉ Web App"</label>
                        <input
                            type="url"
                            id="script-url"
                            placeholder="https://script.google.com/macros/s/.../exec"
                            value=move || script_url.get()
                            on:input=move |ev| script_url.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <Show when=move || registering.get()>
                        <div class="form-group">
                            <label for="full-name">"Họ và tên"</label>
                            <input
                                type="text"
                                id="full-name"
                                value=move || full_name.get()
                                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>
                    </Show>

                    <div class="form-group">
                        <label for="username">"Tên đăng nhập"</label>
                        <input
                            type="text"
                            id="username"
                            value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Mật khẩu"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || {
                            if is_loading.get() {
                                "Đang xử lý..."
                            } else if registering.get() {
                                "Đăng ký"
                            } else {
                                "Đăng nhập"
                            }
                        }}
                    </button>
                </form>

                <button
                    class="btn-link"
                    on:click=move |_| {
                        set_error_message.set(None);
                        set_info_message.set(None);
                        set_registering.update(|v| *v = !*v);
                    }
                >
                    {move || {
                        if registering.get() {
                            "Đã có tài khoản? Đăng nhập"
                        } else {
                            "Chưa có tài khoản? Đăng ký"
                        }
                    }}
                </button>
            </div>
        </div>
    }
}
