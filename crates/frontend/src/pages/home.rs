use chrono::{Datelike, Local};
use leptos::prelude::*;

use crate::layout::{use_app_context, Screen};
use crate::system::auth::use_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let screen = ctx.screen;

    let today = Local::now().date_naive();
    let period = format!("Tháng {:02}/{}", today.month(), today.year());

    view! {
        <div class="home-page">
            <h1>
                {move || format!("Xin chào, {}!", auth_state.get().display_name())}
            </h1>
            <p class="home-period">{period}</p>

            <div class="home-actions">
                <button
                    class="home-card"
                    on:click=move |_| screen.set(Screen::Dashboard)
                >
                    <span class="home-card-title">"Báo cáo & Thống kê"</span>
                    <span class="home-card-desc">
                        "Báo cáo đào tạo, nghiệp vụ, bù phép, kế hoạch"
                    </span>
                </button>
                <Show when=move || auth_state.get().is_admin()>
                    <button
                        class="home-card"
                        on:click=move |_| screen.set(Screen::Admin)
                    >
                        <span class="home-card-title">"Quản trị"</span>
                        <span class="home-card-desc">
                            "Tài khoản, danh mục, cấu hình hệ thống"
                        </span>
                    </button>
                </Show>
            </div>
        </div>
    }
}
