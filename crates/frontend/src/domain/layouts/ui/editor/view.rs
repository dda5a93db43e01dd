use contracts::shared::metadata::{LayoutSection, LayoutType, SectionColumns};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use super::view_model::{LayoutEditorViewModel, NewLayoutForm};
use crate::shared::components::{Badge, BadgeVariant, ErrorBanner, PageHeader};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_SETTINGS};
use crate::shared::state::MetadataStore;
use crate::system::auth::use_auth;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
fn SectionCard(vm: LayoutEditorViewModel, index: usize, section: LayoutSection) -> impl IntoView {
    let columns = section.columns.get();

    view! {
        <div class="layout-section">
            <div class="layout-section__header">
                <input
                    class="form__input layout-section__title"
                    type="text"
                    prop:value=section.title.clone()
                    on:change=move |ev| vm.rename_section(index, event_target_value(&ev))
                />
                <label class="layout-section__columns">
                    "Columns"
                    <select
                        class="form__select"
                        on:change=move |ev| {
                            if let Ok(n) = event_target_value(&ev).parse::<u8>() {
                                vm.set_columns(index, n);
                            }
                        }
                    >
                        {(SectionColumns::MIN..=SectionColumns::MAX).map(|n| view! {
                            <option value=n.to_string() selected={n == columns}>{n}</option>
                        }).collect_view()}
                    </select>
                </label>
                <button
                    class="button button--ghost"
                    title="Remove section"
                    on:click=move |_| vm.remove_section(index)
                >
                    {icon("delete")}
                </button>
            </div>

            <div class="layout-section__fields">
                {section.fields.is_empty().then(|| view! {
                    <div class="layout-section__empty">"No fields in this section"</div>
                })}
                {section.fields.into_iter().enumerate().map(|(position, field)| {
                    let visible = field.is_visible;
                    view! {
                        <div class="layout-field" class:layout-field--hidden={!visible}>
                            <div class="layout-field__info">
                                <span class="layout-field__label">{field.label}</span>
                                <span class="layout-field__name">{field.name}</span>
                                <span class="layout-field__type">{field.field_type.label()}</span>
                                {field.is_required.then(|| view! {
                                    <Badge variant=BadgeVariant::Warning>"Required"</Badge>
                                })}
                            </div>
                            <div class="layout-field__actions">
                                <button
                                    class="button button--ghost"
                                    title={if visible { "Hide" } else { "Show" }}
                                    on:click=move |_| vm.toggle_visibility(index, position)
                                >
                                    {if visible { icon("eye") } else { icon("eye-off") }}
                                </button>
                                <button
                                    class="button button--ghost"
                                    title="Remove from section"
                                    on:click=move |_| vm.remove_field(index, position)
                                >
                                    {icon("x")}
                                </button>
                            </div>
                        </div>
                    }
                }).collect_view()}
            </div>

            <button class="button button--secondary" on:click=move |_| vm.add_next_field(index)>
                {icon("plus")}
                "Add Field"
            </button>
        </div>
    }
}

#[component]
fn NewLayoutPanel(vm: LayoutEditorViewModel) -> impl IntoView {
    let update = move |apply: &dyn Fn(&mut NewLayoutForm)| {
        vm.new_form.update(|form| {
            if let Some(form) = form.as_mut() {
                apply(form);
            }
        });
    };
    let read = move |get: fn(&NewLayoutForm) -> String| {
        vm.new_form
            .with(|form| form.as_ref().map(get).unwrap_or_default())
    };

    view! {
        <form
            class="details-section"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                vm.create_layout();
            }
        >
            <h3 class="details-section__title">"Create New Layout"</h3>
            <div class="form__grid">
                <div class="form__group">
                    <label class="form__label">"Layout Name"</label>
                    <input
                        class="form__input"
                        type="text"
                        placeholder="e.g. Default Layout"
                        prop:value=move || read(|f| f.name.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            update(&|f: &mut NewLayoutForm| f.name = text.clone());
                        }
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Layout Type"</label>
                    <select
                        class="form__select"
                        on:change=move |ev| {
                            if let Some(layout_type) = LayoutType::from_code(&event_target_value(&ev)) {
                                update(&|f: &mut NewLayoutForm| f.layout_type = layout_type);
                            }
                        }
                    >
                        {LayoutType::ALL.into_iter().map(|t| view! {
                            <option
                                value=t.as_str()
                                selected={move || vm.new_form.with(|f| f.as_ref().map(|f| f.layout_type) == Some(t))}
                            >
                                {t.label()}
                            </option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form__group form__group--checks">
                    <label class="form__checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || vm.new_form.with(|f| f.as_ref().is_some_and(|f| f.is_default))
                            on:change=move |ev| {
                                let checked = event_target_checked(&ev);
                                update(&|f: &mut NewLayoutForm| f.is_default = checked);
                            }
                        />
                        "Default layout for its type"
                    </label>
                </div>
            </div>
            <div class="details-actions">
                <button type="submit" class="button button--primary">
                    {icon("save")}
                    "Create Layout"
                </button>
                <button type="button" class="button button--secondary" on:click=move |_| vm.new_form.set(None)>
                    {icon("cancel")}
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

/// `/settings/layouts/:entityId`
#[component]
#[allow(non_snake_case)]
pub fn LayoutSettings() -> impl IntoView {
    let store = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let session = use_auth();
    let params = use_params_map();
    let navigate = StoredValue::new_local(use_navigate());
    let go = move |path: String| navigate.with_value(|nav| nav(&path, Default::default()));

    let entity_id = Memo::new(move |_| params.with(|p| p.get("entityId").unwrap_or_default()));
    let vm = LayoutEditorViewModel::new(store, session.user_id(), entity_id);

    Effect::new(move |_| {
        entity_id.track();
        vm.load();
    });

    let title = Signal::derive(move || {
        store
            .entity_by_id(&entity_id.get())
            .map(|e| format!("Layout for {}", e.label))
            .unwrap_or_else(|| "Layout".to_string())
    });

    let on_delete_selected = move |_| {
        let Some(id) = vm.selected.get_untracked() else {
            return;
        };
        if confirm("Delete this layout?") {
            vm.delete_layout(id);
        }
    };

    view! {
        <PageFrame page_id="layouts--settings" category=PAGE_CAT_SETTINGS>
            <PageHeader title=title subtitle="Customize how records are displayed".to_string()>
                <button
                    class="button button--ghost"
                    on:click=move |_| go(format!("/settings/entities/{}", entity_id.get_untracked()))
                >
                    "Back"
                </button>
                <button
                    class="button button--secondary"
                    disabled=move || vm.new_form.with(Option::is_some)
                    on:click=move |_| vm.new_form.set(Some(NewLayoutForm::default()))
                >
                    {icon("plus")}
                    "New Layout"
                </button>
            </PageHeader>

            <ErrorBanner message=store.error on_dismiss=Callback::new(move |_| store.clear_error()) />
            {move || vm.notice.get().map(|text| view! {
                <div class="warning-box warning-box--info">
                    <span class="warning-box__text">{text}</span>
                    <button class="warning-box__close" title="Dismiss" on:click=move |_| vm.notice.set(None)>
                        {icon("x")}
                    </button>
                </div>
            })}

            <Show when=move || vm.new_form.with(Option::is_some)>
                <NewLayoutPanel vm=vm />
            </Show>

            <div class="layout-toolbar">
                <label class="layout-toolbar__picker">
                    "Layout"
                    <select
                        class="form__select"
                        on:change=move |ev| vm.select(&event_target_value(&ev))
                    >
                        <Show when=move || vm.selected.with(Option::is_none)>
                            <option value="" selected=true>"Unsaved layout"</option>
                        </Show>
                        {move || vm.layouts.get().into_iter().map(|layout| {
                            let id = layout.id.clone();
                            let is_selected = move || vm.selected.with(|s| s.as_deref() == Some(id.as_str()));
                            view! {
                                <option value=layout.id.clone() selected=is_selected>
                                    {format!(
                                        "{} ({}){}",
                                        layout.name,
                                        layout.layout_type.label(),
                                        if layout.is_default { " - Default" } else { "" }
                                    )}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </label>

                <div class="layout-toolbar__actions">
                    <button class="button button--secondary" on:click=move |_| vm.add_section()>
                        {icon("plus")}
                        "Add Section"
                    </button>
                    <button class="button button--secondary" on:click=move |_| vm.sync_with_fields()>
                        {icon("refresh")}
                        "Sync with fields"
                    </button>
                    <button
                        class="button button--secondary"
                        disabled=move || !vm.is_dirty()
                        on:click=move |_| vm.discard()
                    >
                        {icon("cancel")}
                        "Discard"
                    </button>
                    <button
                        class="button button--ghost"
                        disabled=move || vm.selected.with(Option::is_none)
                        on:click=on_delete_selected
                    >
                        {icon("delete")}
                        "Delete Layout"
                    </button>
                    <button
                        class="button button--primary"
                        disabled=move || !vm.is_dirty() || vm.store().is_loading.get()
                        on:click=move |_| vm.save()
                    >
                        {icon("save")}
                        "Save Layout"
                    </button>
                </div>
            </div>

            <div class="layout-sections">
                {move || {
                    let sections = vm.editor.with(|e| e.document().sections.clone());
                    if sections.is_empty() {
                        return view! {
                            <div class="empty-state">"This layout has no sections. Add one to start."</div>
                        }
                        .into_any();
                    }
                    sections
                        .into_iter()
                        .enumerate()
                        .map(|(index, section)| view! { <SectionCard vm=vm index=index section=section /> })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </PageFrame>
    }
}
