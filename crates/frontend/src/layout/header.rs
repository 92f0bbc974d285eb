use leptos::prelude::*;

use crate::system::auth::{context, use_auth};

use super::global_context::{use_app_context, Screen};

#[component]
pub fn AppHeader() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, set_auth_state) = use_auth();

    let screen = ctx.screen;
    let spreadsheet_url = ctx.spreadsheet_url;

    let nav_class = move |target: Screen| {
        if screen.get() == target {
            "nav-btn active"
        } else {
            "nav-btn"
        }
    };

    view! {
        <header class="app-header">
            <div class="header-left">
                <span class="app-title">"Báo Cáo Đào Tạo"</span>
                <nav class="header-nav">
                    <button class=move || nav_class(Screen::Home) on:click=move |_| screen.set(Screen::Home)>
                        "Trang chủ"
                    </button>
                    <button class=move || nav_class(Screen::Dashboard) on:click=move |_| screen.set(Screen::Dashboard)>
                        "Báo cáo"
                    </button>
                    <Show when=move || auth_state.get().is_admin()>
                        <button class=move || nav_class(Screen::Admin) on:click=move |_| screen.set(Screen::Admin)>
                            "Quản trị"
                        </button>
                    </Show>
                </nav>
            </div>
            <div class="header-right">
                <Show when=move || spreadsheet_url.get().is_some()>
                    <a
                        class="sheet-link"
                        href=move || spreadsheet_url.get().unwrap_or_default()
                        target="_blank"
                    >
                        "Mở Google Sheet"
                    </a>
                </Show>
                <span class="user-name">{move || auth_state.get().display_name()}</span>
                <button
                    class="logout-btn"
                    on:click=move |_| context::do_logout(set_auth_state)
                >
                    "Đăng xuất"
                </button>
            </div>
        </header>
    }
}
