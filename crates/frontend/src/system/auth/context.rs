use contracts::users::User;
use leptos::prelude::*;

use crate::gateway::{api, GatewayError};

use super::storage;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin()).unwrap_or(false)
    }

    pub fn can_edit_reports(&self) -> bool {
        self.user
            .as_ref()
            .map(|u| u.can_edit_reports())
            .unwrap_or(false)
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| {
                if u.full_name.is_empty() {
                    u.username.clone()
                } else {
                    u.full_name.clone()
                }
            })
            .unwrap_or_default()
    }
}

/// Auth context provider component. Restores the previous session
/// from localStorage on mount; the gateway has no session endpoint to
/// re-validate against, so a stored user is trusted until sign-out.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    if let Some(user) = storage::load_current_user() {
        set_auth_state.set(AuthState { user: Some(user) });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Helper: Perform login against the gateway and persist the session
pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    script_url: &str,
    username: &str,
    password: &str,
) -> Result<User, GatewayError> {
    let user = api::login(script_url, username, password).await?;

    storage::save_script_url(script_url);
    storage::save_current_user(&user);

    set_auth_state.set(AuthState {
        user: Some(user.clone()),
    });

    Ok(user)
}

/// Helper: Perform logout
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_session();
    set_auth_state.set(AuthState::default());
}
