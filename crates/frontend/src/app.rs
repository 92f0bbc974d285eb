use leptos::prelude::*;

use crate::layout::{use_app_context, AppGlobalContext, AppHeader, Screen};
use crate::pages::{AdminPage, DashboardPage, HomePage, LoginPage};
use crate::system::auth::{use_auth, AuthProvider};

#[component]
pub fn App() -> impl IntoView {
    // Shared cache and session state for the whole app.
    provide_context(AppGlobalContext::new());

    view! {
        <AuthProvider>
            <AppShell />
        </AuthProvider>
    }
}

#[component]
fn AppShell() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let screen = ctx.screen;

    view! {
        <Show
            when=move || auth_state.get().is_authenticated()
            fallback=|| view! { <LoginPage /> }
        >
            <AppHeader />
            <main class="app-main">
                {move || match screen.get() {
                    Screen::Home => view! { <HomePage /> }.into_any(),
                    Screen::Dashboard => view! { <DashboardPage /> }.into_any(),
                    Screen::Admin => view! { <AdminPage /> }.into_any(),
                }}
            </main>
        </Show>
    }
}
