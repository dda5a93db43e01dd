//! PageFrame: root wrapper of every routed page.
//!
//! Sets two attributes on the root element:
//!   - `id` as `"{subject}--{category}"`, e.g. `"deals--list"`
//!   - `data-page-category`, one of the `PAGE_CAT_*` constants

use leptos::prelude::*;

/// Table of records
pub const PAGE_CAT_LIST: &str = "list";
/// Single record or definition form
pub const PAGE_CAT_DETAIL: &str = "detail";
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
/// Metadata administration
pub const PAGE_CAT_SETTINGS: &str = "settings";

#[component]
pub fn PageFrame(
    #[prop(into)] page_id: String,
    category: &'static str,
    children: Children,
) -> impl IntoView {
    let class = match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        PAGE_CAT_SETTINGS => "page page--settings",
        _ => "page",
    };

    view! {
        <div id=page_id class=class data-page-category=category>
            {children()}
        </div>
    }
}
