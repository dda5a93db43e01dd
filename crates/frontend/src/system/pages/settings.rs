//! `/settings`: entry points of the metadata administration and the
//! signed-in account

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::shared::components::PageHeader;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_SETTINGS};
use crate::shared::state::MetadataStore;
use crate::system::auth::use_auth;

#[component]
fn AccountPanel() -> impl IntoView {
    let session = use_auth();
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let message = RwSignal::new(None::<(bool, String)>);
    let busy = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let new_password = password.get_untracked();
        if new_password != confirmation.get_untracked() {
            message.set(Some((false, "Passwords do not match".to_string())));
            return;
        }
        busy.set(true);
        spawn_local(async move {
            match session.update_password(new_password).await {
                None => {
                    password.set(String::new());
                    confirmation.set(String::new());
                    message.set(Some((true, "Password updated".to_string())));
                }
                Some(error) => message.set(Some((false, error))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="details-section">
            <h3 class="details-section__title">"Account"</h3>
            <div class="details-grid">
                <div class="details-field">
                    <span class="details-field__label">"Email"</span>
                    <span class="details-field__value">
                        {move || session.user().map(|u| u.email).unwrap_or_default()}
                    </span>
                </div>
                <div class="details-field">
                    <span class="details-field__label">"Full Name"</span>
                    <span class="details-field__value">
                        {move || session.user().and_then(|u| u.full_name).unwrap_or_else(|| "-".to_string())}
                    </span>
                </div>
            </div>

            <form class="form__grid" on:submit=submit>
                <div class="form__group">
                    <label class="form__label">"New Password"</label>
                    <input
                        class="form__input"
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Confirm Password"</label>
                    <input
                        class="form__input"
                        type="password"
                        prop:value=move || confirmation.get()
                        on:input=move |ev| confirmation.set(event_target_value(&ev))
                    />
                </div>
                <div class="details-actions">
                    <button type="submit" class="button button--primary" disabled=move || busy.get()>
                        {icon("save")}
                        "Update Password"
                    </button>
                </div>
            </form>

            {move || message.get().map(|(ok, text)| view! {
                <div class="warning-box" class:warning-box--error={!ok}>
                    <span class="warning-box__text">{text}</span>
                </div>
            })}
        </div>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn SettingsPage() -> impl IntoView {
    let store = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let navigate = StoredValue::new_local(use_navigate());
    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    view! {
        <PageFrame page_id="settings--overview" category=PAGE_CAT_SETTINGS>
            <PageHeader title="Settings".to_string() subtitle="Configure your CRM".to_string() />

            <div class="settings-cards">
                <button class="settings-card" on:click=move |_| go("/settings/entities".to_string())>
                    <div class="settings-card__icon">{icon("database")}</div>
                    <div class="settings-card__body">
                        <div class="settings-card__title">"Entity Management"</div>
                        <div class="settings-card__description">"Configure record types and fields"</div>
                    </div>
                    {icon("chevron-right")}
                </button>
            </div>

            <div class="details-section">
                <h3 class="details-section__title">"Layout Settings"</h3>
                <p class="details-section__hint">"Customize how records of an entity are displayed"</p>
                <div class="settings-cards">
                    <For
                        each=move || store.entities.get()
                        key=|entity| entity.id.clone()
                        children=move |entity| {
                            let path = format!("/settings/layouts/{}", entity.id);
                            view! {
                                <button class="settings-card" on:click=move |_| go(path.clone())>
                                    <div class="settings-card__icon">{icon("layers")}</div>
                                    <div class="settings-card__body">
                                        <div class="settings-card__title">{entity.label.clone()}</div>
                                        <div class="settings-card__description">{entity.name.clone()}</div>
                                    </div>
                                    {icon("chevron-right")}
                                </button>
                            }
                        }
                    />
                </div>
            </div>

            <AccountPanel />
        </PageFrame>
    }
}
