use contracts::shared::list_view::{filter_records, SortState};
use contracts::shared::record::Record;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::shared::components::{ErrorBanner, PageHeader, RecordTable};
use crate::shared::icons::icon;
use crate::shared::list_utils::SearchInput;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::state::{MetadataStore, RecordStore};

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `/:entityType`: every record of one entity
#[component]
#[allow(non_snake_case)]
pub fn RecordList() -> impl IntoView {
    let metadata = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let records = use_context::<RecordStore>().expect("RecordStore not found in context");
    let params = use_params_map();
    let navigate = StoredValue::new_local(use_navigate());

    let entity_name = Memo::new(move |_| params.with(|p| p.get("entityType").unwrap_or_default()));
    let entity = Memo::new(move |_| metadata.entity_by_name(&entity_name.get()));
    let fields = Memo::new(move |_| {
        entity
            .get()
            .map(|e| metadata.fields_for(&e.id))
            .unwrap_or_default()
    });

    let search = RwSignal::new(String::new());
    let sort = RwSignal::new(SortState::default());

    let load = move || {
        let Some(entity) = entity.get_untracked() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            metadata.fetch_fields(&entity.id).await;
            records.fetch_records(&entity.name).await;
        });
    };

    Effect::new(move |_| {
        // Re-run whenever the route points at another entity
        entity.track();
        search.set(String::new());
        load();
    });

    let rows = Signal::derive(move || {
        let name = entity_name.get();
        let defs = fields.get();
        let typed: Vec<Record> = records.records.with(|all| {
            all.get(&name)
                .map(|rows| rows.iter().map(|row| Record::from_row(row, &defs)).collect())
                .unwrap_or_default()
        });
        filter_records(typed, &search.get())
    });

    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    let on_view = Callback::new(move |id: String| go(format!("/{}/{}", entity_name.get_untracked(), id)));
    let on_edit =
        Callback::new(move |id: String| go(format!("/{}/{}/edit", entity_name.get_untracked(), id)));
    let on_delete = Callback::new(move |id: String| {
        if !confirm("Are you sure you want to delete this record?") {
            return;
        }
        let name = entity_name.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            records.delete_record(&name, &id).await;
        });
    });

    let title = Signal::derive(move || {
        entity
            .get()
            .map(|e| e.label)
            .unwrap_or_else(|| entity_name.get())
    });
    let subtitle = Signal::derive(move || {
        entity
            .get()
            .and_then(|e| e.description)
            .filter(|d| !d.is_empty())
    });

    view! {
        <PageFrame page_id=format!("{}--list", entity_name.get_untracked()) category=PAGE_CAT_LIST>
            <PageHeader title=title subtitle=subtitle>
                <button
                    class="button button--primary"
                    on:click=move |_| go(format!("/{}/new", entity_name.get_untracked()))
                    disabled=move || entity.get().is_none()
                >
                    {icon("plus")}
                    "New"
                </button>
                <button class="button button--secondary" on:click=move |_| load()>
                    {icon("refresh")}
                    "Refresh"
                </button>
            </PageHeader>

            <ErrorBanner message=records.error on_dismiss=Callback::new(move |_| records.clear_error()) />

            <Show
                when=move || entity.get().is_some()
                fallback=move || view! {
                    <div class="warning-box">
                        <span class="warning-box__text">
                            {move || format!("Unknown entity '{}'", entity_name.get())}
                        </span>
                    </div>
                }
            >
                <div class="filter-panel">
                    <SearchInput
                        value=search
                        on_change=Callback::new(move |text: String| search.set(text))
                        placeholder="Search records..."
                    />
                    <span class="filter-panel__count">
                        {move || format!("{} records", rows.with(Vec::len))}
                    </span>
                </div>

                {move || {
                    let defs = fields.get();
                    view! {
                        <RecordTable
                            fields=defs
                            records=rows
                            sort=sort
                            on_view=on_view
                            on_edit=on_edit
                            on_delete=on_delete
                        />
                    }
                }}
            </Show>
        </PageFrame>
    }
}
