use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::dashboards::overview::OverviewDashboard;
use crate::domain::entities::ui::list::EntitySettings;
use crate::domain::fields::ui::list::FieldSettings;
use crate::domain::layouts::ui::editor::LayoutSettings;
use crate::domain::records::ui::details::RecordDetails;
use crate::domain::records::ui::list::RecordList;
use crate::layout::Shell;
use crate::system::auth::RequireAuth;
use crate::system::pages::settings::SettingsPage;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page">
            <div class="warning-box">
                <span class="warning-box__text">"Page not found"</span>
            </div>
        </div>
    }
}

/// Settings routes come first so `/settings` is never read as an entity name
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <RequireAuth>
                <Shell>
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=OverviewDashboard />
                        <Route path=path!("/settings") view=SettingsPage />
                        <Route path=path!("/settings/entities") view=EntitySettings />
                        <Route path=path!("/settings/entities/:entityId") view=FieldSettings />
                        <Route path=path!("/settings/layouts/:entityId") view=LayoutSettings />
                        <Route path=path!("/:entityType") view=RecordList />
                        <Route path=path!("/:entityType/:id") view=|| view! { <RecordDetails /> } />
                        <Route
                            path=path!("/:entityType/:id/edit")
                            view=|| view! { <RecordDetails edit=true /> }
                        />
                    </Routes>
                </Shell>
            </RequireAuth>
        </Router>
    }
}
