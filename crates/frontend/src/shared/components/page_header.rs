use leptos::prelude::*;

/// Page title bar with an optional subtitle and action buttons
#[component]
pub fn PageHeader(
    /// Entity labels change with the route, so the title is reactive
    #[prop(into)]
    title: Signal<String>,
    #[prop(optional, into)] subtitle: MaybeProp<String>,
    /// Action buttons
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <div class="page-header__content">
                <div class="page-header__text">
                    <h1 class="page-header__title">{move || title.get()}</h1>
                    {move || subtitle.get().map(|s| view! {
                        <div class="page-header__subtitle">{s}</div>
                    })}
                </div>
            </div>
            <div class="page-header__actions">
                {children.map(|children| children())}
            </div>
        </div>
    }
}
