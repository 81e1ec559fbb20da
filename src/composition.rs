use crate::consts::{CONTEXT_PROVIDER_TYPE, LAYOUT_TYPE, ROUTE_TYPE, SIDEBAR_ITEM_TYPE};
use crate::index::ActiveModuleIndex;
use crate::models::{AppLayout, ContextProvider, RoutePage, SidebarItem};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::warn;

/// What the UI layer needs to render the chat application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppShell {
    pub layout: AppLayout,
    pub routes: Vec<RoutePage>,
    pub sidebar: Vec<SidebarItem>,
    /// Outermost provider first.
    pub providers: Vec<ContextProvider>,
}

pub fn compose(index: &ActiveModuleIndex) -> AppShell {
    let layout = index
        .get_one::<AppLayout>(LAYOUT_TYPE)
        .map(|l| (*l).clone())
        .unwrap_or_default();

    let routes: Vec<RoutePage> = index
        .get_all::<RoutePage>(ROUTE_TYPE)
        .iter()
        .map(|r| (**r).clone())
        .collect();

    let mut sidebar: Vec<SidebarItem> = Vec::new();
    for item in index.get_all::<SidebarItem>(SIDEBAR_ITEM_TYPE) {
        if routes.iter().any(|r| r.route == item.route) {
            sidebar.push((*item).clone());
        } else {
            warn!(
                label = %item.label,
                route = %item.route,
                "Sidebar item '{}' points at inactive route {}, hiding it",
                item.label,
                item.route
            );
        }
    }
    sidebar.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));

    let providers = index
        .get_all::<ContextProvider>(CONTEXT_PROVIDER_TYPE)
        .iter()
        .map(|p| (**p).clone())
        .collect();

    AppShell {
        layout,
        routes,
        sidebar,
        providers,
    }
}

impl AppShell {
    /// Indented provider nesting with the layout at the centre.
    pub fn provider_tree(&self) -> String {
        let mut out = String::new();
        for (depth, provider) in self.providers.iter().enumerate() {
            let _ = writeln!(out, "{}<{}>", "  ".repeat(depth), provider.name);
        }
        let _ = writeln!(
            out,
            "{}[{} layout]",
            "  ".repeat(self.providers.len()),
            self.layout.name
        );
        out
    }
}
