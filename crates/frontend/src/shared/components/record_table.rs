use contracts::shared::list_view::{
    format_cell, format_created_at, list_columns, sort_records, ListColumn, SortState,
};
use contracts::shared::metadata::FieldDefinition;
use contracts::shared::record::Record;
use leptos::prelude::*;

use crate::shared::icons::icon;
use crate::shared::list_utils::{get_sort_class, get_sort_indicator};

#[derive(Clone, Debug, PartialEq)]
enum Column {
    Field(FieldDefinition),
    CreatedAt,
    Actions,
}

impl Column {
    fn from_list(column: ListColumn<'_>) -> Self {
        match column {
            ListColumn::Field(field) => Column::Field(field.clone()),
            ListColumn::CreatedAt => Column::CreatedAt,
            ListColumn::Actions => Column::Actions,
        }
    }

    fn as_list(&self) -> ListColumn<'_> {
        match self {
            Column::Field(field) => ListColumn::Field(field),
            Column::CreatedAt => ListColumn::CreatedAt,
            Column::Actions => ListColumn::Actions,
        }
    }
}

/// Record list with the first five fields, created-at and row actions.
/// Sorting is applied here; filtering is up to the caller.
#[component]
pub fn RecordTable(
    fields: Vec<FieldDefinition>,
    #[prop(into)] records: Signal<Vec<Record>>,
    sort: RwSignal<SortState>,
    on_view: Callback<String>,
    on_edit: Callback<String>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let columns: Vec<Column> = list_columns(&fields)
        .into_iter()
        .map(Column::from_list)
        .collect();
    let body_columns = StoredValue::new(columns.clone());

    let sorted = move || {
        let mut rows = records.get();
        sort.with(|state| sort_records(&mut rows, state));
        rows
    };

    view! {
        <div class="table">
            <table class="table__data table--striped">
                <thead class="table__head">
                    <tr>
                        {columns.into_iter().map(|column| {
                            let header = column.as_list().header().to_string();
                            match column.as_list().sort_key().map(str::to_string) {
                                Some(key) => {
                                    let key_for_click = key.clone();
                                    let key_for_class = key.clone();
                                    view! {
                                        <th
                                            class="table__header-cell table__header-cell--sortable"
                                            on:click=move |_| sort.update(|s| s.toggle(&key_for_click))
                                        >
                                            {header}
                                            <span class=move || sort.with(|s| get_sort_class(s, &key_for_class))>
                                                {move || sort.with(|s| get_sort_indicator(s, &key))}
                                            </span>
                                        </th>
                                    }.into_any()
                                }
                                None => view! {
                                    <th class="table__header-cell table__header-cell--actions">{header}</th>
                                }.into_any(),
                            }
                        }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = sorted();
                        if rows.is_empty() {
                            let span = body_columns.with_value(Vec::len);
                            return view! {
                                <tr class="table__row table__row--empty">
                                    <td class="table__cell" colspan=span>"No records yet"</td>
                                </tr>
                            }.into_any();
                        }
                        rows.into_iter().map(|record| {
                            let id = record.id.clone();
                            let cells = body_columns.with_value(|columns| {
                                columns.iter().map(|column| {
                                    let id_view = id.clone();
                                    let id_edit = id.clone();
                                    let id_delete = id.clone();
                                    match column {
                                        Column::Field(field) => view! {
                                            <td class="table__cell">{format_cell(field, record.get(&field.name))}</td>
                                        }.into_any(),
                                        Column::CreatedAt => view! {
                                            <td class="table__cell">{format_created_at(&record)}</td>
                                        }.into_any(),
                                        Column::Actions => view! {
                                            <td class="table__cell table__cell--actions">
                                                <button class="button button--ghost" title="View" on:click=move |_| on_view.run(id_view.clone())>
                                                    {icon("eye")}
                                                </button>
                                                <button class="button button--ghost" title="Edit" on:click=move |_| on_edit.run(id_edit.clone())>
                                                    {icon("edit")}
                                                </button>
                                                <button class="button button--ghost" title="Delete" on:click=move |_| on_delete.run(id_delete.clone())>
                                                    {icon("delete")}
                                                </button>
                                            </td>
                                        }.into_any(),
                                    }
                                }).collect_view()
                            });
                            view! { <tr class="table__row">{cells}</tr> }
                        }).collect_view().into_any()
                    }}
                </tbody>
            </table>
        </div>
    }
}
