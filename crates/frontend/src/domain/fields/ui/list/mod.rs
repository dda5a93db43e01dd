//! `/settings/entities/:entityId`: field definitions of one entity
//!
//! Adding, renaming and deleting a field changes the entity's table too:
//! a deleted field takes its column data with it.

use contracts::shared::metadata::{FieldDefinition, FieldDraft, FieldType};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::shared::components::{Badge, BadgeVariant, ErrorBanner, PageHeader};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_SETTINGS};
use crate::shared::state::MetadataStore;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Which field the form is bound to
#[derive(Clone, Debug, PartialEq)]
enum FormMode {
    Closed,
    Create,
    Edit(String),
}

fn options_hint(field: &FieldDefinition) -> String {
    if !field.field_type.requires_options() {
        return String::new();
    }
    format!("{} options", field.options().len())
}

#[component]
fn FieldDraftForm(
    draft: RwSignal<FieldDraft>,
    #[prop(into)] submit_label: String,
    on_submit: Callback<()>,
    on_cancel: Callback<()>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let field_type = move || draft.with(|d| d.field_type);

    view! {
        <form
            class="details-section"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                on_submit.run(());
            }
        >
            <div class="form__grid">
                <div class="form__group">
                    <label class="form__label">"Display Label"</label>
                    <input
                        class="form__input"
                        type="text"
                        placeholder="e.g. Phone Number"
                        prop:value=move || draft.with(|d| d.label.clone())
                        on:input=move |ev| draft.update(|d| d.label = event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"API Name"</label>
                    <input
                        class="form__input"
                        type="text"
                        placeholder="e.g. phone_number (lowercase, no spaces)"
                        prop:value=move || draft.with(|d| d.name.clone())
                        on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Field Type"</label>
                    <select
                        class="form__select"
                        on:change=move |ev| {
                            if let Ok(parsed) = event_target_value(&ev).parse::<FieldType>() {
                                draft.update(|d| d.field_type = parsed);
                            }
                        }
                    >
                        {FieldType::ALL.into_iter().map(|t| view! {
                            <option value=t.as_str() selected=move || field_type() == t>
                                {t.label()}
                            </option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form__group form__group--checks">
                    <label class="form__checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|d| d.is_required)
                            on:change=move |ev| draft.update(|d| d.is_required = event_target_checked(&ev))
                        />
                        "Required"
                    </label>
                    <label class="form__checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|d| d.is_unique)
                            on:change=move |ev| draft.update(|d| d.is_unique = event_target_checked(&ev))
                        />
                        "Unique"
                    </label>
                </div>

                <Show when=move || field_type().requires_options()>
                    <div class="form__group form__group--wide">
                        <label class="form__label">"Options"</label>
                        <input
                            class="form__input"
                            type="text"
                            placeholder="Comma separated, e.g. Prospect, Qualified, Won"
                            prop:value=move || draft.with(|d| d.options.clone())
                            on:input=move |ev| draft.update(|d| d.options = event_target_value(&ev))
                        />
                    </div>
                </Show>

                <Show when=move || field_type().accepts_default()>
                    <div class="form__group">
                        <label class="form__label">"Default Value"</label>
                        <input
                            class="form__input"
                            type="text"
                            prop:value=move || draft.with(|d| d.default_value.clone())
                            on:input=move |ev| draft.update(|d| d.default_value = event_target_value(&ev))
                        />
                    </div>
                </Show>
            </div>

            <div class="details-actions">
                <button type="submit" class="button button--primary" disabled=move || busy.get()>
                    {icon("save")}
                    {submit_label}
                </button>
                <button type="button" class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    {icon("cancel")}
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn FieldSettings() -> impl IntoView {
    let store = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let params = use_params_map();
    let navigate = StoredValue::new_local(use_navigate());
    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    let entity_id = Memo::new(move |_| params.with(|p| p.get("entityId").unwrap_or_default()));
    let entity = Memo::new(move |_| store.entity_by_id(&entity_id.get()));
    let fields = Memo::new(move |_| store.fields_for(&entity_id.get()));

    let mode = RwSignal::new(FormMode::Closed);
    let draft = RwSignal::new(FieldDraft::default());

    Effect::new(move |_| {
        let id = entity_id.get();
        mode.set(FormMode::Closed);
        wasm_bindgen_futures::spawn_local(async move {
            if store.entities.with_untracked(|e| e.is_empty()) {
                store.fetch_entities().await;
            }
            store.fetch_fields(&id).await;
        });
    });

    let open_create = move || {
        draft.set(FieldDraft::default());
        mode.set(FormMode::Create);
    };
    let open_edit = move |field: &FieldDefinition| {
        draft.set(FieldDraft::from_definition(field));
        mode.set(FormMode::Edit(field.id.clone()));
    };

    let submit = Callback::new(move |_| {
        let id = entity_id.get_untracked();
        let current = draft.get_untracked();
        let target = mode.get_untracked();
        wasm_bindgen_futures::spawn_local(async move {
            let saved = match target {
                FormMode::Create => store.create_field_from_draft(&id, current).await,
                FormMode::Edit(field_id) => {
                    store.update_field_from_draft(&field_id, &id, current).await
                }
                FormMode::Closed => None,
            };
            if saved.is_some() {
                mode.set(FormMode::Closed);
            }
        });
    });
    let cancel = Callback::new(move |_| mode.set(FormMode::Closed));

    let delete = move |field_id: String, label: String| {
        let message = format!(
            "Delete the field '{}'? Its data will be removed from every record.",
            label
        );
        if !confirm(&message) {
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            if store.delete_field(&field_id).await
                && mode.with_untracked(|m| *m == FormMode::Edit(field_id.clone()))
            {
                mode.set(FormMode::Closed);
            }
        });
    };

    let title = Signal::derive(move || {
        entity
            .get()
            .map(|e| format!("{} Fields", e.label))
            .unwrap_or_else(|| "Fields".to_string())
    });

    view! {
        <PageFrame page_id="fields--settings" category=PAGE_CAT_SETTINGS>
            <PageHeader title=title subtitle="Define the fields records of this entity carry".to_string()>
                <button class="button button--ghost" on:click=move |_| go("/settings/entities".to_string())>
                    "Back"
                </button>
                <button
                    class="button button--secondary"
                    on:click=move |_| go(format!("/settings/layouts/{}", entity_id.get_untracked()))
                >
                    {icon("layers")}
                    "Layouts"
                </button>
                <button
                    class="button button--primary"
                    disabled=move || mode.get() != FormMode::Closed
                    on:click=move |_| open_create()
                >
                    {icon("plus")}
                    "New Field"
                </button>
            </PageHeader>

            <ErrorBanner message=store.error on_dismiss=Callback::new(move |_| store.clear_error()) />

            <Show when=move || entity.get().map(|e| e.is_system).unwrap_or(false)>
                <div class="warning-box">
                    <span class="warning-box__icon">{icon("alert")}</span>
                    <span class="warning-box__text">
                        "This is a system entity. Changing its fields affects built-in records."
                    </span>
                </div>
            </Show>

            {move || match mode.get() {
                FormMode::Closed => ().into_any(),
                FormMode::Create => view! {
                    <h3 class="details-section__title">"Create New Field"</h3>
                    <FieldDraftForm
                        draft=draft
                        submit_label="Create Field"
                        on_submit=submit
                        on_cancel=cancel
                        busy=store.is_loading
                    />
                }
                .into_any(),
                FormMode::Edit(_) => view! {
                    <h3 class="details-section__title">"Edit Field"</h3>
                    <FieldDraftForm
                        draft=draft
                        submit_label="Save Changes"
                        on_submit=submit
                        on_cancel=cancel
                        busy=store.is_loading
                    />
                }
                .into_any(),
            }}

            <div class="table-container">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"#"</th>
                            <th class="table__header-cell">"Label"</th>
                            <th class="table__header-cell">"API Name"</th>
                            <th class="table__header-cell">"Type"</th>
                            <th class="table__header-cell">"Flags"</th>
                            <th class="table__header-cell table__header-cell--actions">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=move || fields.with(|f| f.is_empty())>
                            <tr>
                                <td class="table__cell table__cell--empty" colspan="6">
                                    "No fields defined yet"
                                </td>
                            </tr>
                        </Show>
                        {move || fields.get().into_iter().map(|field| {
                            let stored = StoredValue::new(field.clone());
                            let field_id = field.id.clone();
                            let label = field.label.clone();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{field.display_order}</td>
                                    <td class="table__cell">{field.label.clone()}</td>
                                    <td class="table__cell">{field.name.clone()}</td>
                                    <td class="table__cell">
                                        {field.field_type.label()}
                                        <span class="table__cell-hint">{options_hint(&field)}</span>
                                    </td>
                                    <td class="table__cell">
                                        {field.is_required.then(|| view! { <Badge variant=BadgeVariant::Warning>"Required"</Badge> })}
                                        {field.is_unique.then(|| view! { <Badge variant=BadgeVariant::Primary>"Unique"</Badge> })}
                                        {field.is_system_column().then(|| view! { <Badge>"System"</Badge> })}
                                    </td>
                                    <td class="table__cell table__cell--actions">
                                        <button
                                            class="button button--ghost"
                                            title="Edit"
                                            on:click=move |_| stored.with_value(|f| open_edit(f))
                                        >
                                            {icon("edit")}
                                        </button>
                                        <button
                                            class="button button--ghost"
                                            title="Delete"
                                            on:click=move |_| delete(field_id.clone(), label.clone())
                                        >
                                            {icon("delete")}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_count_only_for_choice_fields() {
        let mut field = FieldDefinition {
            id: "f1".into(),
            entity_id: "e1".into(),
            name: "stage".into(),
            label: "Stage".into(),
            field_type: FieldType::Select,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: Some(contracts::shared::metadata::parse_options("Prospect, Won")),
            display_order: 0,
        };
        assert_eq!(options_hint(&field), "2 options");

        field.field_type = FieldType::Text;
        assert_eq!(options_hint(&field), "");
    }
}
