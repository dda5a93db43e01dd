//! Forms and detail views generated from field definitions
//!
//! Fields are grouped by the entity's layout when one exists, otherwise by
//! the default single-section layout. System columns never get an input.

use std::collections::HashMap;

use contracts::shared::list_view::{format_cell, format_created_at};
use contracts::shared::metadata::{
    summarize, validate_record, FieldDefinition, LayoutDocument, RenderMode,
};
use contracts::shared::record::{values_from_inputs, FieldValue, Record, RecordValues};
use leptos::prelude::*;

use super::error_banner::ErrorBanner;
use super::field_input::FieldInput;
use crate::shared::icons::icon;

/// Section of a rendered form, owning its fields
#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    pub title: String,
    pub columns: u8,
    pub fields: Vec<FieldDefinition>,
}

/// Sections to render for `fields`; a missing layout, or one that leaves
/// nothing to render, falls back to the default single section
pub fn resolve_sections(
    fields: &[FieldDefinition],
    layout: Option<&LayoutDocument>,
    mode: RenderMode,
) -> Vec<FormSection> {
    let own_sections = |document: &LayoutDocument| -> Vec<FormSection> {
        document
            .resolve(fields, mode)
            .into_iter()
            .filter(|section| !section.fields.is_empty())
            .map(|section| FormSection {
                title: section.title.to_string(),
                columns: section.columns.get(),
                fields: section.fields.into_iter().cloned().collect(),
            })
            .collect()
    };

    let from_layout = layout.map(own_sections).unwrap_or_default();
    if from_layout.is_empty() {
        own_sections(&LayoutDocument::default_for(fields))
    } else {
        from_layout
    }
}

/// Every field that gets an input, in rendering order
fn rendered_fields(sections: &[FormSection]) -> Vec<FieldDefinition> {
    sections
        .iter()
        .flat_map(|section| section.fields.iter().cloned())
        .collect()
}

fn initial_text(field: &FieldDefinition, initial: &RecordValues) -> String {
    match initial.get(&field.name) {
        Some(value) => value.to_input_text(),
        None => field
            .default_value
            .as_ref()
            .map(|v| FieldValue::from_json(field.field_type, v).to_input_text())
            .unwrap_or_default(),
    }
}

fn grid_style(columns: u8) -> String {
    format!(
        "display: grid; gap: 12px 16px; grid-template-columns: repeat({}, minmax(0, 1fr));",
        columns
    )
}

#[component]
pub fn DynamicForm(
    /// Every field of the entity, system columns included
    fields: Vec<FieldDefinition>,
    /// `None` renders the default single section
    layout: Option<LayoutDocument>,
    /// Values of the record being edited; empty for a new one
    #[prop(optional)]
    initial: RecordValues,
    #[prop(into)] submit_label: String,
    on_submit: Callback<RecordValues>,
    on_cancel: Callback<()>,
    #[prop(optional, into)] busy: Signal<bool>,
) -> impl IntoView {
    let sections = resolve_sections(&fields, layout.as_ref(), RenderMode::Input);
    // Hidden optional fields are neither sent nor validated
    let editable = rendered_fields(&sections);

    let inputs: HashMap<String, RwSignal<String>> = editable
        .iter()
        .map(|f| (f.name.clone(), RwSignal::new(initial_text(f, &initial))))
        .collect();
    let errors = RwSignal::new(HashMap::<String, String>::new());
    let form_error = RwSignal::new(Option::<String>::None);

    let submit_inputs = inputs.clone();
    let handle_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let snapshot: HashMap<String, String> = submit_inputs
            .iter()
            .map(|(name, text)| (name.clone(), text.get_untracked()))
            .collect();
        let values = values_from_inputs(&editable, |name| snapshot.get(name).map(String::as_str));

        match validate_record(&editable, &values) {
            Ok(()) => {
                errors.set(HashMap::new());
                form_error.set(None);
                on_submit.run(values);
            }
            Err(list) => {
                errors.set(
                    list.iter()
                        .map(|e| (e.field().to_string(), e.to_string()))
                        .collect(),
                );
                form_error.set(Some(summarize(&list)));
            }
        }
    };

    view! {
        <form class="details-form dynamic-form" on:submit=handle_submit>
            <ErrorBanner message=form_error />

            {sections.into_iter().map(|section| {
                let inputs = inputs.clone();
                view! {
                    <fieldset class="form__section">
                        <legend class="form__section-title">{section.title}</legend>
                        <div style=grid_style(section.columns)>
                            {section.fields.into_iter().filter_map(|field| {
                                let value = inputs.get(&field.name).copied()?;
                                let name = field.name.clone();
                                let error = Signal::derive(move || errors.with(|e| e.get(&name).cloned()));
                                Some(view! {
                                    <FieldInput field=field value=value error=error disabled=busy.get_untracked() />
                                })
                            }).collect_view()}
                        </div>
                    </fieldset>
                }
            }).collect_view()}

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

/// Read-only rendering of a record
#[component]
pub fn RecordDetailsView(
    fields: Vec<FieldDefinition>,
    /// `None` renders the default single section
    layout: Option<LayoutDocument>,
    record: Record,
) -> impl IntoView {
    let sections = resolve_sections(&fields, layout.as_ref(), RenderMode::Display);
    let created = format_created_at(&record);
    let owner = record.created_by.clone().unwrap_or_else(|| "-".to_string());

    view! {
        <div class="details-view">
            {sections.into_iter().map(|section| {
                let record = record.clone();
                view! {
                    <section class="details-section">
                        <h3 class="details-section__title">{section.title}</h3>
                        <dl style=grid_style(section.columns)>
                            {section.fields.into_iter().map(|field| {
                                let text = format_cell(&field, record.get(&field.name));
                                view! {
                                    <div class="details-field">
                                        <dt class="details-field__label">{field.label}</dt>
                                        <dd class="details-field__value">{text}</dd>
                                    </div>
                                }
                            }).collect_view()}
                        </dl>
                    </section>
                }
            }).collect_view()}

            <div class="details-meta">
                <span>"Created: " {created}</span>
                <span>"Owner: " {owner}</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metadata::{FieldType, LayoutFieldRef, LayoutSection, SectionColumns};
    use pretty_assertions::assert_eq;

    fn field(id: &str, name: &str, order: i32) -> FieldDefinition {
        FieldDefinition {
            id: id.into(),
            entity_id: "e1".into(),
            name: name.into(),
            label: name.to_uppercase(),
            field_type: FieldType::Text,
            is_required: false,
            is_unique: false,
            default_value: None,
            options: None,
            display_order: order,
        }
    }

    #[test]
    fn default_section_skips_system_columns() {
        let fields = vec![
            field("f1", "title", 0),
            field("f2", "created_by", 1),
            field("f3", "notes", 2),
        ];

        let sections = resolve_sections(&fields, None, RenderMode::Input);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Information");
        assert_eq!(sections[0].columns, 2);
        let names: Vec<&str> = sections[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "notes"]);
    }

    #[test]
    fn layout_hides_invisible_and_deleted_fields() {
        let fields = vec![field("f1", "title", 0), field("f3", "notes", 1)];
        let mut hidden = LayoutFieldRef::snapshot(&fields[1]);
        hidden.is_visible = false;
        let deleted = LayoutFieldRef::snapshot(&field("gone", "gone", 2));
        let layout = LayoutDocument {
            sections: vec![LayoutSection {
                title: "Main".into(),
                columns: SectionColumns::new(1).unwrap(),
                fields: vec![LayoutFieldRef::snapshot(&fields[0]), hidden, deleted],
            }],
        };

        let sections = resolve_sections(&fields, Some(&layout), RenderMode::Input);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Main");
        assert_eq!(sections[0].columns, 1);
        assert_eq!(sections[0].fields, vec![fields[0].clone()]);
    }

    #[test]
    fn empty_layout_falls_back_to_default() {
        let fields = vec![field("f1", "title", 0)];
        let layout = LayoutDocument::default();

        let sections = resolve_sections(&fields, Some(&layout), RenderMode::Input);

        assert_eq!(sections[0].fields, fields);
    }

    #[test]
    fn field_added_after_layout_gets_an_input() {
        let mut fields = vec![field("f1", "title", 0)];
        let layout = LayoutDocument::default_for(&fields);
        let mut amount = field("f2", "amount", 1);
        amount.field_type = FieldType::Number;
        amount.is_required = true;
        fields.push(amount);

        let sections = resolve_sections(&fields, Some(&layout), RenderMode::Input);
        let rendered = rendered_fields(&sections);
        let names: Vec<&str> = rendered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "amount"]);

        let inputs: HashMap<&str, &str> = [("title", "Big deal"), ("amount", "500")].into();
        let values = values_from_inputs(&rendered, |name| inputs.get(name).copied());
        assert_eq!(validate_record(&rendered, &values), Ok(()));
    }

    #[test]
    fn hidden_required_field_is_still_rendered_for_input() {
        let mut fields = vec![field("f1", "title", 0), field("f2", "stage", 1)];
        fields[1].is_required = true;
        let mut layout = LayoutDocument::default_for(&fields);
        layout.sections[0].fields[1].is_visible = false;

        let input = rendered_fields(&resolve_sections(&fields, Some(&layout), RenderMode::Input));
        let display =
            rendered_fields(&resolve_sections(&fields, Some(&layout), RenderMode::Display));
        assert_eq!(input, fields);
        assert_eq!(display, vec![fields[0].clone()]);
    }

    #[test]
    fn initial_text_prefers_record_values_over_defaults() {
        let mut with_default = field("f1", "stage", 0);
        with_default.default_value = Some(serde_json::json!("lead"));

        assert_eq!(initial_text(&with_default, &RecordValues::new()), "lead");

        let mut values = RecordValues::new();
        values.insert("stage".into(), FieldValue::Text("won".into()));
        assert_eq!(initial_text(&with_default, &values), "won");
    }
}
