use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::data::{HttpBackend, HttpProvisioner};
use crate::shared::state::{MetadataStore, RecordStore};
use crate::system::auth::{use_auth, AuthProvider};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Creates both stores against the HTTP backend and keeps the entity
/// cache in step with the session
#[component]
fn StoreProvider(children: Children) -> impl IntoView {
    let session = use_auth();
    let metadata = MetadataStore::new(Arc::new(HttpBackend), Arc::new(HttpProvisioner));
    let records = RecordStore::new(Arc::new(HttpBackend), session.user_id());
    provide_context(metadata);
    provide_context(records);

    Effect::new(move |_| {
        if session.is_authenticated() {
            spawn_local(async move {
                metadata.fetch_entities().await;
            });
        } else {
            metadata.entities.set(Vec::new());
            metadata.fields.set(HashMap::new());
            metadata.layouts.set(HashMap::new());
            records.records.set(HashMap::new());
            records.current.set(None);
        }
    });

    children()
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());

    view! {
        <AuthProvider>
            <StoreProvider>
                <AppRoutes />
            </StoreProvider>
        </AuthProvider>
    }
}
