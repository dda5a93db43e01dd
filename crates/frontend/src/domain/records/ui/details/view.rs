use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use super::view_model::{RecordDetailsViewModel, NEW_RECORD_ID};
use crate::shared::components::{DynamicForm, ErrorBanner, PageHeader, RecordDetailsView};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_DETAIL};
use crate::shared::state::{MetadataStore, RecordStore};

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `/:entityType/:id`, `/:entityType/:id/edit` and `/:entityType/new`
#[component]
#[allow(non_snake_case)]
pub fn RecordDetails(
    /// Open an existing record directly in the form
    #[prop(optional)]
    edit: bool,
) -> impl IntoView {
    let metadata = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let records = use_context::<RecordStore>().expect("RecordStore not found in context");
    let params = use_params_map();
    let navigate = StoredValue::new_local(use_navigate());

    let entity_name = Memo::new(move |_| params.with(|p| p.get("entityType").unwrap_or_default()));
    let record_id = Memo::new(move |_| {
        params.with(|p| p.get("id").unwrap_or_else(|| NEW_RECORD_ID.to_string()))
    });
    let vm = RecordDetailsViewModel::new(metadata, records, entity_name, record_id, edit);

    Effect::new(move |_| {
        vm.entity.track();
        let id = record_id.get();
        vm.editing.set(edit || id == NEW_RECORD_ID);
        vm.load();
    });

    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));
    let list_path = move || format!("/{}", entity_name.get_untracked());

    let on_saved = Callback::new(move |id: String| {
        go(format!("/{}/{}", entity_name.get_untracked(), id));
    });
    let on_cancel = Callback::new(move |_| {
        if vm.is_new() {
            go(list_path());
        } else {
            vm.editing.set(false);
        }
    });
    let on_submit = Callback::new(move |values| vm.save(values, on_saved));
    let on_delete = move |_| {
        if confirm("Are you sure you want to delete this record?") {
            vm.delete(Callback::new(move |_| go(list_path())));
        }
    };

    let subtitle = Signal::derive(move || {
        let label = vm
            .entity
            .get()
            .map(|e| e.label.to_lowercase())
            .unwrap_or_default();
        Some(if vm.is_new() {
            format!("Create a new {}", label)
        } else {
            format!("View or edit this {}", label)
        })
    });

    view! {
        <PageFrame page_id=format!("{}--detail", entity_name.get_untracked()) category=PAGE_CAT_DETAIL>
            <PageHeader title=Signal::derive(move || vm.title()) subtitle=subtitle>
                <button class="button button--ghost" on:click=move |_| go(list_path())>
                    "Back"
                </button>
                <Show when=move || !vm.is_new() && !vm.editing.get()>
                    <button class="button button--secondary" on:click=move |_| vm.editing.set(true)>
                        {icon("edit")}
                        "Edit"
                    </button>
                    <button class="button button--danger" on:click=on_delete>
                        {icon("delete")}
                        "Delete"
                    </button>
                </Show>
            </PageHeader>

            <ErrorBanner message=vm.error() on_dismiss=Callback::new(move |_| vm.clear_error()) />

            {move || {
                let fields = vm.fields.get();
                if vm.entity.get().is_none() {
                    return view! {
                        <div class="warning-box">
                            <span class="warning-box__text">
                                {format!("Unknown entity '{}'", entity_name.get())}
                            </span>
                        </div>
                    }
                    .into_any();
                }

                let layout = vm.layout();
                if vm.editing.get() {
                    let record = vm.record();
                    if !vm.is_new() && record.is_none() {
                        return view! { <div class="details-loading">"Loading..."</div> }.into_any();
                    }
                    let initial = record.map(|r| r.values).unwrap_or_default();
                    let submit_label = if vm.is_new() { "Create" } else { "Save" };
                    view! {
                        <DynamicForm
                            fields=fields
                            layout=layout
                            initial=initial
                            submit_label=submit_label
                            on_submit=on_submit
                            on_cancel=on_cancel
                            busy=Signal::derive(move || vm.is_busy())
                        />
                    }
                    .into_any()
                } else {
                    match vm.record() {
                        Some(record) => view! {
                            <RecordDetailsView fields=fields layout=layout record=record />
                        }
                        .into_any(),
                        None => view! { <div class="details-loading">"Loading..."</div> }.into_any(),
                    }
                }
            }}
        </PageFrame>
    }
}
