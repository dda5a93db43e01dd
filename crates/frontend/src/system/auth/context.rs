use contracts::system::auth::{check_password_strength, Session, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user: Option<UserInfo>,
    /// A stored token is being checked against the backend
    pub is_restoring: bool,
}

/// Session facade shared through context.
///
/// Every action returns `None` on success or the message to show.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: RwSignal<AuthState>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.access_token.is_some() && s.user.is_some())
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.with(|s| s.user.clone())
    }

    /// Id of the signed-in user, for `created_by` attribution
    pub fn user_id(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.as_ref().map(|u| u.id.clone())))
    }

    fn establish(&self, session: Session) {
        storage::save_session(&session);
        self.state.set(AuthState {
            access_token: Some(session.access_token),
            user: Some(session.user),
            is_restoring: false,
        });
    }

    pub async fn sign_in(&self, email: String, password: String) -> Option<String> {
        match api::sign_in(email, password).await {
            Ok(session) => {
                self.establish(session);
                None
            }
            Err(e) => Some(e),
        }
    }

    pub async fn sign_up(&self, email: String, password: String, full_name: String) -> Option<String> {
        if let Err(e) = check_password_strength(&password) {
            return Some(e);
        }
        match api::sign_up(email, password, full_name).await {
            Ok(session) => {
                self.establish(session);
                None
            }
            Err(e) => Some(e),
        }
    }

    /// Local state is cleared even when the backend call fails
    pub async fn sign_out(&self) -> Option<String> {
        let result = match storage::get_refresh_token() {
            Some(refresh_token) => api::sign_out(refresh_token).await.err(),
            None => None,
        };
        storage::clear_tokens();
        self.state.set(AuthState::default());
        if let Some(e) = &result {
            log::warn!("sign_out failed: {}", e);
        }
        result
    }

    pub async fn reset_password(&self, email: String) -> Option<String> {
        api::reset_password(email).await.err()
    }

    /// Sets a new password with a recovery token and signs in
    pub async fn recover(&self, token: String, password: String) -> Option<String> {
        if let Err(e) = check_password_strength(&password) {
            return Some(e);
        }
        match api::recover(token, password).await {
            Ok(session) => {
                self.establish(session);
                None
            }
            Err(e) => Some(e),
        }
    }

    pub async fn update_password(&self, password: String) -> Option<String> {
        if let Err(e) = check_password_strength(&password) {
            return Some(e);
        }
        let Some(access_token) = self.state.with_untracked(|s| s.access_token.clone()) else {
            return Some("You must be signed in".to_string());
        };
        api::update_password(&access_token, password).await.err()
    }

    /// Validate the stored token, falling back to the refresh token
    async fn restore(&self) {
        let Some(access_token) = storage::get_access_token() else {
            self.state.set(AuthState::default());
            return;
        };

        if let Ok(user) = api::current_user(&access_token).await {
            self.state.set(AuthState {
                access_token: Some(access_token),
                user: Some(user),
                is_restoring: false,
            });
            return;
        }

        if let Some(refresh_token) = storage::get_refresh_token() {
            if let Ok(response) = api::refresh(refresh_token).await {
                storage::save_access_token(&response.access_token);
                if let Ok(user) = api::current_user(&response.access_token).await {
                    self.state.set(AuthState {
                        access_token: Some(response.access_token),
                        user: Some(user),
                        is_restoring: false,
                    });
                    return;
                }
            }
        }

        log::info!("Stored session expired");
        storage::clear_tokens();
        self.state.set(AuthState::default());
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let session = SessionContext {
        state: RwSignal::new(AuthState {
            is_restoring: storage::get_access_token().is_some(),
            ..Default::default()
        }),
    };

    spawn_local(async move {
        session.restore().await;
    });

    provide_context(session);

    children()
}

pub fn use_auth() -> SessionContext {
    use_context::<SessionContext>().expect("AuthProvider not found in component tree")
}
