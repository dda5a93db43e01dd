use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::use_auth;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
    Forgot,
    Recover,
}

impl Mode {
    fn title(self) -> &'static str {
        match self {
            Mode::SignIn => "Sign in",
            Mode::SignUp => "Create account",
            Mode::Forgot => "Reset password",
            Mode::Recover => "Choose a new password",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Mode::SignIn => "Sign in",
            Mode::SignUp => "Sign up",
            Mode::Forgot => "Send instructions",
            Mode::Recover => "Set password",
        }
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_auth();

    let mode = RwSignal::new(Mode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let token = RwSignal::new(String::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let info_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let switch_to = move |next: Mode| {
        mode.set(next);
        error_message.set(None);
        info_message.set(None);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let current = mode.get_untracked();
        let email_val = email.get_untracked().trim().to_string();
        let password_val = password.get_untracked();

        is_loading.set(true);
        error_message.set(None);
        info_message.set(None);

        spawn_local(async move {
            let error = match current {
                Mode::SignIn => session.sign_in(email_val, password_val).await,
                Mode::SignUp => {
                    session
                        .sign_up(email_val, password_val, full_name.get_untracked())
                        .await
                }
                Mode::Forgot => {
                    let error = session.reset_password(email_val).await;
                    if error.is_none() {
                        info_message.set(Some(
                            "If the address is registered, a recovery token has been issued."
                                .to_string(),
                        ));
                        mode.set(Mode::Recover);
                    }
                    error
                }
                Mode::Recover => session.recover(token.get_untracked(), password_val).await,
            };
            error_message.set(error);
            is_loading.set(false);
        });
    };

    let needs_email = move || matches!(mode.get(), Mode::SignIn | Mode::SignUp | Mode::Forgot);
    let needs_password = move || mode.get() != Mode::Forgot;

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"CRM Admin"</h1>
                <h2>{move || mode.get().title()}</h2>

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
                    <Show when=move || mode.get() == Mode::SignUp>
                        <div class="form-group">
                            <label for="full_name">"Full name"</label>
                            <input
                                type="text"
                                id="full_name"
                                prop:value=move || full_name.get()
                                on:input=move |ev| full_name.set(event_target_value(&ev))
                                disabled=move || is_loading.get()
                            />
                        </div>
                    </Show>

                    <Show when=needs_email>
                        <div class="form-group">
                            <label for="email">"Email"</label>
                            <input
                                type="email"
                                id="email"
                                placeholder="you@company.com"
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>
                    </Show>

                    <Show when=move || mode.get() == Mode::Recover>
                        <div class="form-group">
                            <label for="token">"Recovery token"</label>
                            <input
                                type="text"
                                id="token"
                                prop:value=move || token.get()
                                on:input=move |ev| token.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>
                    </Show>

                    <Show when=needs_password>
                        <div class="form-group">
                            <label for="password">
                                {move || if mode.get() == Mode::Recover { "New password" } else { "Password" }}
                            </label>
                            <input
                                type="password"
                                id="password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>
                    </Show>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Please wait..." } else { mode.get().submit_label() }}
                    </button>
                </form>

                <div class="login-info">
                    {move || match mode.get() {
                        Mode::SignIn => view! {
                            <p>
                                <a href="#" on:click=move |ev| { ev.prevent_default(); switch_to(Mode::SignUp); }>
                                    "Create an account"
                                </a>
                                " | "
                                <a href="#" on:click=move |ev| { ev.prevent_default(); switch_to(Mode::Forgot); }>
                                    "Forgot password?"
                                </a>
                            </p>
                        }.into_any(),
                        _ => view! {
                            <p>
                                <a href="#" on:click=move |ev| { ev.prevent_default(); switch_to(Mode::SignIn); }>
                                    "Back to sign in"
                                </a>
                            </p>
                        }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
