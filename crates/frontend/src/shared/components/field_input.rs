//! One labeled input for a field definition
//!
//! The widget is chosen by [`FieldType::widget`]; every widget edits the
//! raw input text, which is typed later by `values_from_inputs`.

use contracts::shared::metadata::{FieldDefinition, WidgetKind};
use leptos::prelude::*;

#[component]
pub fn FieldInput(
    field: FieldDefinition,
    /// Raw text of the input; checkboxes use "true" / "false"
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let input_id = format!("field-{}", field.name);
    let required = field.is_required;

    let label = view! {
        <label class="form__label" for=input_id.clone()>
            {field.label.clone()}
            {required.then(|| view! { <span class="form__required">" *"</span> })}
        </label>
    };

    let widget = match field.field_type.widget() {
        WidgetKind::SingleLine(input_type) => view! {
            <input
                id=input_id.clone()
                class="form__input"
                type=input_type
                step=(input_type == "number").then_some("any")
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                disabled=disabled
            />
        }
        .into_any(),
        WidgetKind::MultiLine => view! {
            <textarea
                id=input_id.clone()
                class="form__textarea"
                rows=4
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                disabled=disabled
            />
        }
        .into_any(),
        WidgetKind::Toggle => view! {
            <div class="form__checkbox-wrapper">
                <input
                    id=input_id.clone()
                    type="checkbox"
                    class="form__checkbox"
                    prop:checked=move || value.get() == "true"
                    on:change=move |ev| value.set(event_target_checked(&ev).to_string())
                    disabled=disabled
                />
            </div>
        }
        .into_any(),
        WidgetKind::Dropdown => {
            let options = field.options().to_vec();
            view! {
                <select
                    id=input_id.clone()
                    class="form__select"
                    prop:value=move || value.get()
                    on:change=move |ev| value.set(event_target_value(&ev))
                    disabled=disabled
                >
                    <option value="">"Select..."</option>
                    {options.into_iter().map(|option| {
                        let option_value = option.value.clone();
                        view! {
                            <option
                                value=option.value
                                selected=move || value.get() == option_value
                            >
                                {option.label}
                            </option>
                        }
                    }).collect_view()}
                </select>
            }
            .into_any()
        }
        WidgetKind::RadioGroup => {
            let group_name = input_id.clone();
            let options = field.options().to_vec();
            view! {
                <div class="form__radio-group" id=input_id.clone()>
                    {options.into_iter().map(|option| {
                        let radio_id = format!("{}-{}", group_name, option.value);
                        let option_value = option.value.clone();
                        let on_pick = option.value.clone();
                        view! {
                            <div class="form__radio-wrapper">
                                <input
                                    id=radio_id.clone()
                                    type="radio"
                                    class="form__radio"
                                    name=group_name.clone()
                                    value=option.value
                                    prop:checked=move || value.get() == option_value
                                    on:change=move |_| value.set(on_pick.clone())
                                    disabled=disabled
                                />
                                <label class="form__radio-label" for=radio_id>
                                    {option.label}
                                </label>
                            </div>
                        }
                    }).collect_view()}
                </div>
            }
            .into_any()
        }
    };

    view! {
        <div class="form__group" class:form__group--invalid=move || error.get().is_some()>
            {label}
            {widget}
            {move || error.get().map(|message| view! {
                <div class="form__error">{message}</div>
            })}
        </div>
    }
}
