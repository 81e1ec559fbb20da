use crate::commands::load_host;
use crate::composition::compose;
use crate::config::ShellConfig;
use crate::console::{new_table, print_heading};
use crate::exceptions::ModaiError;

pub async fn run(config: &ShellConfig, json_output: bool) -> Result<(), ModaiError> {
    let (_host, index) = load_host(config).await?;
    let shell = compose(&index);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&shell)?);
        return Ok(());
    }

    print_heading("Routes");
    if shell.routes.is_empty() {
        println!("  (none)");
    } else {
        let mut table = new_table(&["Route", "Title"]);
        for page in &shell.routes {
            table.add_row(vec![page.route.as_str(), page.title.as_str()]);
        }
        println!("{}", table);
    }

    println!();
    print_heading("Sidebar");
    if shell.sidebar.is_empty() {
        println!("  (none)");
    } else {
        let mut table = new_table(&["Order", "Label", "Route"]);
        for item in &shell.sidebar {
            table.add_row(vec![item.order.to_string(), item.label.clone(), item.route.clone()]);
        }
        println!("{}", table);
    }

    println!();
    print_heading("Providers");
    print!("{}", shell.provider_tree());

    Ok(())
}
