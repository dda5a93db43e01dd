use leptos::prelude::*;

use super::context::use_auth;
use crate::system::pages::login::LoginPage;

/// Renders children only for a signed-in user, the login page otherwise
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = use_auth();
    let children = StoredValue::new(children);

    move || {
        if session.state.with(|s| s.is_restoring) {
            view! { <div class="page page--loading">"Loading..."</div> }.into_any()
        } else if session.is_authenticated() {
            children.with_value(|children| children()).into_any()
        } else {
            view! { <LoginPage /> }.into_any()
        }
    }
}
