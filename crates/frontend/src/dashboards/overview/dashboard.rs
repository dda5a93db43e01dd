//! Landing page: record count per entity and quick links

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::shared::components::{ErrorBanner, PageHeader};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DASHBOARD};
use crate::shared::state::{MetadataStore, RecordStore};

#[component]
#[allow(non_snake_case)]
pub fn OverviewDashboard() -> impl IntoView {
    let metadata = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let records = use_context::<RecordStore>().expect("RecordStore not found in context");
    let navigate = StoredValue::new_local(use_navigate());

    // Counts follow the entity list; each entity is fetched once per change
    Effect::new(move |_| {
        let names: Vec<String> = metadata
            .entities
            .with(|entities| entities.iter().map(|e| e.name.clone()).collect());
        for name in names {
            spawn_local(async move {
                records.fetch_records(&name).await;
            });
        }
    });

    let refresh = move |_| {
        spawn_local(async move {
            metadata.fetch_entities().await;
        });
    };

    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    view! {
        <PageFrame page_id="overview--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Dashboard".to_string() subtitle="Overview of your CRM system".to_string()>
                <button class="button button--secondary" on:click=refresh>
                    {icon("refresh")}
                    "Refresh"
                </button>
            </PageHeader>

            <ErrorBanner message=records.error on_dismiss=Callback::new(move |_| records.clear_error()) />

            <div class="dashboard-cards">
                <For
                    each=move || metadata.entities.get()
                    key=|entity| entity.id.clone()
                    children=move |entity| {
                        let name = entity.name.clone();
                        let count_name = entity.name.clone();
                        let new_path = format!("/{}/new", entity.name);
                        let count = move || records.records.with(|all| {
                            all.get(&count_name).map(|rows| rows.len()).unwrap_or(0)
                        });
                        view! {
                            <div class="dashboard-card">
                                <div class="dashboard-card__icon">{icon("database")}</div>
                                <div class="dashboard-card__body">
                                    <div class="dashboard-card__label">"Total " {entity.label.clone()}</div>
                                    <div class="dashboard-card__value">{count}</div>
                                </div>
                                <div class="dashboard-card__actions">
                                    <button class="button button--ghost" on:click=move |_| go(format!("/{}", name))>
                                        "View"
                                        {icon("chevron-right")}
                                    </button>
                                    <button class="button button--ghost" on:click=move |_| go(new_path.clone())>
                                        {icon("plus")}
                                        "Add"
                                    </button>
                                </div>
                            </div>
                        }
                    }
                />
            </div>

            <Show when=move || metadata.entities.with(|e| e.is_empty()) && !metadata.is_loading.get()>
                <div class="empty-state">
                    <p>"No entities yet."</p>
                    <button class="button button--primary" on:click=move |_| go("/settings/entities".to_string())>
                        {icon("settings")}
                        "Configure entities"
                    </button>
                </div>
            </Show>
        </PageFrame>
    }
}
