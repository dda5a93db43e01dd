//! Search box and sort helpers shared by list pages
use contracts::shared::list_view::SortState;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const DEBOUNCE_MS: u32 = 300;

/// Search input with debounce and a clear button
#[component]
pub fn SearchInput(
    /// Current filter value, used to highlight an active filter
    #[prop(into)]
    value: Signal<String>,
    /// Receives the text once typing pauses
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    let input_value = RwSignal::new(value.get_untracked());
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        input_value.set(new_value.clone());
        // Dropping the previous timeout cancels it
        let timeout = Timeout::new(DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    let clear_filter = move |_| {
        pending.set_value(None);
        input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="search-input__field"
                class:search-input__field--active=move || !value.get().trim().is_empty()
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Clear">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Indicator for a column header
pub fn get_sort_indicator(sort: &SortState, key: &str) -> &'static str {
    if sort.key == key {
        if sort.is_ascending() {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(sort: &SortState, key: &str) -> &'static str {
    if sort.key == key {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_follows_sort_state() {
        let mut sort = SortState::default();
        assert_eq!(get_sort_indicator(&sort, "created_at"), " ▼");
        assert_eq!(get_sort_indicator(&sort, "amount"), " ⇅");

        sort.toggle("amount");
        assert_eq!(get_sort_indicator(&sort, "amount"), " ▲");
        assert_eq!(
            get_sort_class(&sort, "amount"),
            "table__sort-indicator table__sort-indicator--active"
        );
    }
}
