use crate::commands::load_host;
use crate::config::ShellConfig;
use crate::console::{new_table, print_heading};
use crate::exceptions::ModaiError;
use crate::models::{Dependency, UnresolvedModule, format_tokens};
use comfy_table::{Cell, Color};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Serialize)]
struct ModuleRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    module_type: &'a str,
    path: &'a str,
    dependencies: &'a [Dependency],
}

#[derive(Serialize)]
struct ActivationOutput<'a> {
    manifest: String,
    flags: &'a [String],
    #[serde(with = "time::serde::rfc3339")]
    activated_at: OffsetDateTime,
    active: Vec<ModuleRow<'a>>,
    excluded: &'a [UnresolvedModule],
    dropped: &'a [(String, String)],
    disabled: &'a [String],
}

pub async fn run(config: &ShellConfig, json_output: bool) -> Result<(), ModaiError> {
    let (host, index) = load_host(config).await?;
    let registration = host.registration();

    if json_output {
        let output = ActivationOutput {
            manifest: config.manifest.to_string(),
            flags: index.flags(),
            activated_at: index.activated_at(),
            active: index
                .modules()
                .iter()
                .map(|m| ModuleRow {
                    id: &m.id,
                    module_type: &m.module_type,
                    path: &m.path,
                    dependencies: &m.dependencies,
                })
                .collect(),
            excluded: index.unresolved(),
            dropped: &registration.unresolved_paths,
            disabled: &registration.skipped_disabled,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("No modules are active.");
    } else {
        print_heading("Active modules");
        let mut table = new_table(&["ID", "Type", "Path", "Dependencies"]);
        for module in index.modules() {
            table.add_row(vec![
                Cell::new(&module.id).fg(Color::Green),
                Cell::new(&module.module_type),
                Cell::new(&module.path),
                Cell::new(format_tokens(&module.dependencies)),
            ]);
        }
        println!("{}", table);
    }

    if !index.unresolved().is_empty() {
        println!();
        print_heading("Excluded modules");
        let mut table = new_table(&["ID", "Unmet dependencies"]);
        for module in index.unresolved() {
            table.add_row(vec![
                Cell::new(&module.id).fg(Color::Yellow),
                Cell::new(format_tokens(&module.unmet)),
            ]);
        }
        println!("{}", table);
    }

    if !registration.unresolved_paths.is_empty() {
        println!();
        print_heading("Dropped modules (unresolvable path)");
        for (id, path) in &registration.unresolved_paths {
            println!("  - {} ({})", id, path);
        }
    }

    let flags = if index.flags().is_empty() {
        "none".to_string()
    } else {
        index.flags().join(", ")
    };
    println!(
        "\n{} active, {} excluded, {} dropped, {} disabled. Flags: {}",
        index.len(),
        index.unresolved().len(),
        registration.unresolved_paths.len(),
        registration.skipped_disabled.len(),
        flags
    );

    Ok(())
}
