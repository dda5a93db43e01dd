//! Navigation: dashboard, one entry per entity, and the settings pages

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::shared::icons::icon;
use crate::shared::state::MetadataStore;

#[derive(Clone, Debug, PartialEq)]
struct MenuItem {
    href: String,
    label: String,
    icon: &'static str,
}

fn settings_items() -> Vec<MenuItem> {
    vec![
        MenuItem {
            href: "/settings".to_string(),
            label: "Overview".to_string(),
            icon: "settings",
        },
        MenuItem {
            href: "/settings/entities".to_string(),
            label: "Entities".to_string(),
            icon: "layers",
        },
    ]
}

/// `/deals` is active for `/deals/...` too, `/` only for itself
fn is_active(pathname: &str, href: &str) -> bool {
    if href == "/" || href == "/settings" {
        pathname == href
    } else {
        pathname == href || pathname.starts_with(&format!("{}/", href))
    }
}

#[component]
fn SidebarItem(item: MenuItem) -> impl IntoView {
    let location = use_location();
    let href = item.href.clone();

    view! {
        <A href=item.href>
            <div
                class="app-sidebar__item"
                class:app-sidebar__item--active=move || location.pathname.with(|path| is_active(path, &href))
                style:padding-left="10px"
            >
                <div class="app-sidebar__item-content">
                    {icon(item.icon)}
                    <span>{item.label}</span>
                </div>
            </div>
        </A>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let store = use_context::<MetadataStore>().expect("MetadataStore not found in context");
    let expanded_groups = RwSignal::new(vec!["records".to_string(), "settings".to_string()]);

    let entity_items = move || {
        store.entities.with(|entities| {
            entities
                .iter()
                .map(|entity| MenuItem {
                    href: format!("/{}", entity.name),
                    label: entity.label.clone(),
                    icon: "database",
                })
                .collect::<Vec<_>>()
        })
    };

    let group = move |id: &'static str, label: &'static str, group_icon: &'static str| {
        view! {
            <div
                class="app-sidebar__item"
                style:padding-left="12px"
                on:click=move |_| {
                    expanded_groups.update(|items| {
                        if let Some(pos) = items.iter().position(|x| x == id) {
                            items.remove(pos);
                        } else {
                            items.push(id.to_string());
                        }
                    });
                }
            >
                <div class="app-sidebar__item-content">
                    {icon(group_icon)}
                    <span>{label}</span>
                </div>
                <div
                    class="app-sidebar__chevron"
                    class:app-sidebar__chevron--expanded=move || expanded_groups.with(|g| g.iter().any(|x| x == id))
                >
                    {icon("chevron-right")}
                </div>
            </div>
        }
    };

    view! {
        <div class="app-sidebar__content">
            <SidebarItem item=MenuItem {
                href: "/".to_string(),
                label: "Dashboard".to_string(),
                icon: "layout-dashboard",
            } />

            <div>
                {group("records", "Records", "database")}
                <Show when=move || expanded_groups.with(|g| g.iter().any(|x| x == "records"))>
                    <div class="app-sidebar__children">
                        <For
                            each=entity_items
                            key=|item| item.href.clone()
                            children=|item| view! { <SidebarItem item=item /> }
                        />
                    </div>
                </Show>
            </div>

            <div>
                {group("settings", "Settings", "settings")}
                <Show when=move || expanded_groups.with(|g| g.iter().any(|x| x == "settings"))>
                    <div class="app-sidebar__children">
                        {settings_items().into_iter().map(|item| view! { <SidebarItem item=item /> }).collect_view()}
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_links_stay_active_on_record_pages() {
        assert!(is_active("/deals", "/deals"));
        assert!(is_active("/deals/row-1", "/deals"));
        assert!(!is_active("/dealsx", "/deals"));
        assert!(is_active("/", "/"));
        assert!(!is_active("/deals", "/"));
        assert!(!is_active("/settings/entities", "/settings"));
        assert!(is_active("/settings/entities/e1", "/settings/entities"));
    }
}
