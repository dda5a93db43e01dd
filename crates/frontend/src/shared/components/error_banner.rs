use leptos::prelude::*;

use crate::shared::icons::icon;

/// Store error slot rendered as a dismissible warning box
#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="warning-box warning-box--error" role="alert">
                    <span class="warning-box__icon">{icon("alert")}</span>
                    <span class="warning-box__text">{text}</span>
                    {on_dismiss.map(|dismiss| view! {
                        <button
                            class="warning-box__close"
                            title="Dismiss"
                            on:click=move |_| dismiss.run(())
                        >
                            {icon("x")}
                        </button>
                    })}
                </div>
            }
        })
    }
}
