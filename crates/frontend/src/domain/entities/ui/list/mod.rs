//! `/settings/entities`: entity definitions
//!
//! Creating an entity runs the two-step creation of the metadata store
//! (definition row, then table). A creation whose table step failed leaves
//! a definition behind, which is listed with a "Needs cleanup" badge.
//! Entities cannot be deleted from here.

use contracts::shared::metadata::{
    normalize_field_name, EntityDefinition, EntityPatch, NewEntityDefinition,
};
use contracts::shared::provisioning::EntityCreation;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::shared::components::{Badge, BadgeVariant, ErrorBanner, PageHeader};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_SETTINGS};
use crate::shared::state::MetadataStore;

/// Text inputs of the create and edit forms
#[derive(Clone, Debug, Default, PartialEq)]
struct EntityForm {
    name: String,
    label: String,
    description: String,
    icon: String,
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl EntityForm {
    fn from_entity(entity: &EntityDefinition) -> Self {
        Self {
            name: entity.name.clone(),
            label: entity.label.clone(),
            description: entity.description.clone().unwrap_or_default(),
            icon: entity.icon.clone().unwrap_or_default(),
        }
    }

    /// "Sales Deals" becomes the table name "sales_deals"
    fn table_name(&self) -> String {
        normalize_field_name(self.name.trim())
    }

    fn missing_input(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("API name is required")
        } else if self.label.trim().is_empty() {
            Some("Display label is required")
        } else {
            None
        }
    }

    fn to_new(&self) -> NewEntityDefinition {
        NewEntityDefinition {
            name: self.table_name(),
            label: self.label.trim().to_string(),
            description: non_empty(&self.description),
            is_system: false,
            icon: non_empty(&self.icon),
        }
    }

    fn to_patch(&self, original: &EntityDefinition) -> EntityPatch {
        EntityPatch {
            name: Some(self.table_name()),
            label: Some(self.label.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            icon: Some(self.icon.trim().to_string()),
        }
        .pinned_to(original)
    }
}

/// Label / API name / description / icon inputs bound to one form signal
#[component]
fn EntityFormFields(form: RwSignal<EntityForm>, #[prop(optional)] lock_name: bool) -> impl IntoView {
    view! {
        <div class="form__grid">
            <div class="form__group">
                <label class="form__label">"API Name"</label>
                <input
                    class="form__input"
                    type="text"
                    placeholder="e.g. opportunities (lowercase, no spaces)"
                    disabled=lock_name
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                />
                <Show when=move || lock_name>
                    <div class="form__hint">"System entities keep their API name"</div>
                </Show>
            </div>
            <div class="form__group">
                <label class="form__label">"Display Label"</label>
                <input
                    class="form__input"
                    type="text"
                    placeholder="e.g. Opportunities"
                    prop:value=move || form.with(|f| f.label.clone())
                    on:input=move |ev| form.update(|f| f.label = event_target_value(&ev))
                />
            </div>
            <div class="form__group">
                <label class="form__label">"Icon Name"</label>
                <input
                    class="form__input"
                    type="text"
                    placeholder="e.g. users or building"
                    prop:value=move || form.with(|f| f.icon.clone())
                    on:input=move |ev| form.update(|f| f.icon = event_target_value(&ev))
                />
            </div>
            <div class="form__group form__group--wide">
                <label class="form__label">"Description"</label>
                <textarea
                    class="form__textarea"
                    rows="2"
                    placeholder="Describe the purpose of this entity"
                    prop:value=move || form.with(|f| f.description.clone())
                    on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                ></textarea>
            </div>
        </div>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn EntitySettings() -> impl IntoView {
    let store = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let navigate = StoredValue::new_local(use_navigate());
    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    let show_create = RwSignal::new(false);
    let create_form = RwSignal::new(EntityForm::default());
    let editing_id = RwSignal::new(None::<String>);
    let edit_form = RwSignal::new(EntityForm::default());
    let form_error = RwSignal::new(None::<String>);

    let refresh = move || {
        wasm_bindgen_futures::spawn_local(async move {
            store.fetch_entities().await;
        });
    };
    refresh();

    let handle_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = create_form.get_untracked();
        if let Some(message) = form.missing_input() {
            form_error.set(Some(message.to_string()));
            return;
        }
        form_error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            if store.create_entity(form.to_new()).await.is_some() {
                show_create.set(false);
                create_form.set(EntityForm::default());
            }
        });
    };

    let start_edit = move |entity: &EntityDefinition| {
        edit_form.set(EntityForm::from_entity(entity));
        editing_id.set(Some(entity.id.clone()));
    };

    let save_edit = move |original: EntityDefinition| {
        let form = edit_form.get_untracked();
        if let Some(message) = form.missing_input() {
            form_error.set(Some(message.to_string()));
            return;
        }
        form_error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            let patch = form.to_patch(&original);
            if store.update_entity(&original.id, patch).await.is_some() {
                editing_id.set(None);
            }
        });
    };

    let creation_notice = move || {
        store.last_creation.get().and_then(|creation| match creation {
            EntityCreation::ProvisioningFailed { entity, error } => Some(format!(
                "Entity '{}' was saved but its table could not be created ({}). The definition needs manual cleanup.",
                entity.name, error
            )),
            _ => None,
        })
    };

    view! {
        <PageFrame page_id="entities--settings" category=PAGE_CAT_SETTINGS>
            <PageHeader title="Entity Management".to_string() subtitle="Configure record types and their fields".to_string()>
                <button class="button button--ghost" on:click=move |_| go("/settings".to_string())>
                    "Back"
                </button>
                <button
                    class="button button--primary"
                    disabled=move || show_create.get()
                    on:click=move |_| {
                        create_form.set(EntityForm::default());
                        show_create.set(true);
                    }
                >
                    {icon("plus")}
                    "New Entity"
                </button>
            </PageHeader>

            <ErrorBanner message=store.error on_dismiss=Callback::new(move |_| store.clear_error()) />
            <ErrorBanner message=form_error on_dismiss=Callback::new(move |_| form_error.set(None)) />
            {move || creation_notice().map(|text| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">{icon("alert")}</span>
                    <span class="warning-box__text">{text}</span>
                </div>
            })}

            <Show when=move || show_create.get()>
                <form class="details-section" on:submit=handle_create>
                    <h3 class="details-section__title">"Create New Entity"</h3>
                    <EntityFormFields form=create_form />
                    <div class="details-actions">
                        <button type="submit" class="button button--primary" disabled=move || store.is_loading.get()>
                            {icon("save")}
                            "Create Entity"
                        </button>
                        <button type="button" class="button button--secondary" on:click=move |_| show_create.set(false)>
                            {icon("cancel")}
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>

            <div class="table-container">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Entity"</th>
                            <th class="table__header-cell">"API Name"</th>
                            <th class="table__header-cell">"Type"</th>
                            <th class="table__header-cell">"Configuration"</th>
                            <th class="table__header-cell table__header-cell--actions">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=move || store.entities.with(|e| e.is_empty()) && !store.is_loading.get()>
                            <tr>
                                <td class="table__cell table__cell--empty" colspan="5">
                                    "No entities found. Create your first entity to get started."
                                </td>
                            </tr>
                        </Show>
                        <For
                            each=move || store.entities.get()
                            key=|entity| (entity.id.clone(), entity.name.clone(), entity.label.clone(), entity.description.clone())
                            children=move |entity| {
                                let row_id = entity.id.clone();
                                let is_editing = move || editing_id.with(|id| id.as_deref() == Some(row_id.as_str()));
                                let entity = StoredValue::new(entity);
                                view! {
                                    <Show
                                        when=is_editing
                                        fallback=move || {
                                            let e = entity.get_value();
                                            let fields_path = format!("/settings/entities/{}", e.id);
                                            let layouts_path = format!("/settings/layouts/{}", e.id);
                                            let entity_id = e.id.clone();
                                            view! {
                                                <tr class="table__row">
                                                    <td class="table__cell">
                                                        <div class="entity-cell">
                                                            <div class="entity-cell__icon">{icon("database")}</div>
                                                            <div>
                                                                <div class="entity-cell__label">{e.label.clone()}</div>
                                                                <div class="entity-cell__description">
                                                                    {e.description.clone().filter(|d| !d.is_empty()).unwrap_or_else(|| "No description".to_string())}
                                                                </div>
                                                            </div>
                                                        </div>
                                                    </td>
                                                    <td class="table__cell">{e.name.clone()}</td>
                                                    <td class="table__cell">
                                                        {if e.is_system {
                                                            view! { <Badge variant=BadgeVariant::Primary>"System"</Badge> }.into_any()
                                                        } else {
                                                            view! { <Badge>"Custom"</Badge> }.into_any()
                                                        }}
                                                        <Show when=move || store.needs_cleanup(&entity_id)>
                                                            <Badge variant=BadgeVariant::Error>"Needs cleanup"</Badge>
                                                        </Show>
                                                    </td>
                                                    <td class="table__cell">
                                                        <button class="button button--ghost" on:click=move |_| go(fields_path.clone())>
                                                            {icon("database")}
                                                            "Manage Fields"
                                                        </button>
                                                        <button class="button button--ghost" on:click=move |_| go(layouts_path.clone())>
                                                            {icon("layers")}
                                                            "Layouts"
                                                        </button>
                                                    </td>
                                                    <td class="table__cell table__cell--actions">
                                                        <button
                                                            class="button button--ghost"
                                                            title="Edit"
                                                            on:click=move |_| entity.with_value(|e| start_edit(e))
                                                        >
                                                            {icon("edit")}
                                                        </button>
                                                        <button
                                                            class="button button--ghost"
                                                            title="Entity deletion is not available"
                                                            disabled=true
                                                        >
                                                            {icon("delete")}
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    >
                                        <tr class="table__row table__row--editing">
                                            <td class="table__cell" colspan="5">
                                                <form on:submit=move |ev: leptos::ev::SubmitEvent| {
                                                    ev.prevent_default();
                                                    save_edit(entity.get_value());
                                                }>
                                                    <EntityFormFields form=edit_form lock_name=entity.with_value(|e| e.is_system) />
                                                    <div class="details-actions">
                                                        <button type="submit" class="button button--primary" disabled=move || store.is_loading.get()>
                                                            {icon("save")}
                                                            "Save Changes"
                                                        </button>
                                                        <button type="button" class="button button--secondary" on:click=move |_| editing_id.set(None)>
                                                            {icon("cancel")}
                                                            "Cancel"
                                                        </button>
                                                    </div>
                                                </form>
                                            </td>
                                        </tr>
                                    </Show>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </PageFrame>
    }
}
