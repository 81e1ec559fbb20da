use crate::commands::load_host;
use crate::components::describe_component;
use crate::config::ShellConfig;
use crate::console::new_table;
use crate::exceptions::ModaiError;
use crate::models::LoadedModule;

pub async fn run(config: &ShellConfig, module_type: &str, one: bool) -> Result<(), ModaiError> {
    let (_host, index) = load_host(config).await?;

    let matches: Vec<&LoadedModule> = if one {
        index.single(module_type).into_iter().collect()
    } else {
        index.modules_of_type(module_type)
    };

    if matches.is_empty() {
        println!("none");
        return Ok(());
    }

    let mut table = new_table(&["ID", "Path", "Component"]);
    for module in matches {
        table.add_row(vec![
            module.id.clone(),
            module.path.clone(),
            describe_component(&module.component),
        ]);
    }
    println!("{}", table);

    Ok(())
}
