use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    Primary,
    Warning,
    Error,
    #[default]
    Neutral,
}

impl BadgeVariant {
    fn class(self) -> &'static str {
        match self {
            BadgeVariant::Primary => "badge badge--primary",
            BadgeVariant::Warning => "badge badge--warning",
            BadgeVariant::Error => "badge badge--error",
            BadgeVariant::Neutral => "badge badge--neutral",
        }
    }
}

/// Short status label, e.g. "System" or "Required"
#[component]
pub fn Badge(#[prop(optional)] variant: BadgeVariant, children: Children) -> impl IntoView {
    view! {
        <span class=variant.class()>{children()}</span>
    }
}
