use crate::exceptions::ModaiError;
use crate::models::{
    AppLayout, Component, ComponentConfig, ContextProvider, RoutePage, SidebarItem,
};
use std::collections::HashMap;
use std::sync::Arc;

pub type ComponentFactory = fn(&ComponentConfig) -> Result<Component, ModaiError>;

/// Static lookup from manifest `path` to the code that builds the component.
#[derive(Debug, Clone, Default)]
pub struct ComponentTable {
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, factory: ComponentFactory) -> Self {
        self.insert(path, factory);
        self
    }

    pub fn insert(&mut self, path: &str, factory: ComponentFactory) {
        self.factories.insert(path.to_string(), factory);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(path)
    }

    pub fn resolve(&self, path: &str, config: &ComponentConfig) -> Result<Component, ModaiError> {
        let factory = self.factories.get(path).ok_or_else(|| {
            ModaiError::Component(format!("No component registered for path '{}'", path))
        })?;
        factory(config)
    }

    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Components shipped with the chat frontend.
    pub fn builtin() -> Self {
        let entries: [(&str, ComponentFactory); 12] = [
            ("@modai/chat/ChatPage", |c| route_page(c, "/chat", "Chat")),
            ("@modai/settings/SettingsPage", |c| {
                route_page(c, "/settings", "Settings")
            }),
            ("@modai/llm-providers/ProvidersPage", |c| {
                route_page(c, "/providers", "LLM Providers")
            }),
            ("@modai/auth/LoginPage", |c| route_page(c, "/login", "Login")),
            ("@modai/chat/ChatSidebarItem", |c| {
                sidebar_item(c, "Chat", "/chat", 10)
            }),
            ("@modai/llm-providers/ProvidersSidebarItem", |c| {
                sidebar_item(c, "LLM Providers", "/providers", 50)
            }),
            ("@modai/settings/SettingsSidebarItem", |c| {
                sidebar_item(c, "Settings", "/settings", 90)
            }),
            ("@modai/session/SessionProvider", |c| {
                context_provider(c, "session")
            }),
            ("@modai/theme/ThemeProvider", |c| context_provider(c, "theme")),
            ("@modai/settings/UserSettingsProvider", |c| {
                context_provider(c, "user-settings")
            }),
            ("@modai/llm-providers/ProviderStoreProvider", |c| {
                context_provider(c, "provider-store")
            }),
            ("@modai/layout/AppLayout", app_layout),
        ];

        let mut table = Self::new();
        for (path, factory) in entries {
            table.insert(path, factory);
        }
        table
    }
}

fn string_setting<'a>(
    config: &'a ComponentConfig,
    key: &str,
) -> Result<Option<&'a str>, ModaiError> {
    match config.get(key) {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ModaiError::Component(format!(
            "Setting '{}' must be a string, got {}",
            key, other
        ))),
    }
}

fn int_setting(config: &ComponentConfig, key: &str) -> Result<Option<i64>, ModaiError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            ModaiError::Component(format!("Setting '{}' must be an integer, got {}", key, value))
        }),
    }
}

fn route_page(config: &ComponentConfig, route: &str, title: &str) -> Result<Component, ModaiError> {
    Ok(Arc::new(RoutePage {
        route: string_setting(config, "route")?.unwrap_or(route).to_string(),
        title: string_setting(config, "title")?.unwrap_or(title).to_string(),
    }))
}

fn sidebar_item(
    config: &ComponentConfig,
    label: &str,
    route: &str,
    order: i64,
) -> Result<Component, ModaiError> {
    Ok(Arc::new(SidebarItem {
        label: string_setting(config, "label")?.unwrap_or(label).to_string(),
        route: string_setting(config, "route")?.unwrap_or(route).to_string(),
        order: int_setting(config, "order")?.unwrap_or(order),
    }))
}

fn context_provider(config: &ComponentConfig, name: &str) -> Result<Component, ModaiError> {
    Ok(Arc::new(ContextProvider {
        name: string_setting(config, "name")?.unwrap_or(name).to_string(),
    }))
}

fn app_layout(config: &ComponentConfig) -> Result<Component, ModaiError> {
    let default = AppLayout::default();
    Ok(Arc::new(AppLayout {
        name: string_setting(config, "name")?
            .unwrap_or("sidebar")
            .to_string(),
        home_route: string_setting(config, "home_route")?
            .map(str::to_string)
            .unwrap_or(default.home_route),
    }))
}

/// Short human-readable summary of a built-in component handle.
pub fn describe_component(component: &Component) -> String {
    if let Some(page) = component.downcast_ref::<RoutePage>() {
        format!("route {} \"{}\"", page.route, page.title)
    } else if let Some(item) = component.downcast_ref::<SidebarItem>() {
        format!("sidebar \"{}\" -> {} (order {})", item.label, item.route, item.order)
    } else if let Some(provider) = component.downcast_ref::<ContextProvider>() {
        format!("provider <{}>", provider.name)
    } else if let Some(layout) = component.downcast_ref::<AppLayout>() {
        format!("layout {} (home {})", layout.name, layout.home_route)
    } else {
        "opaque component".to_string()
    }
}
