use crate::components::{ComponentTable, describe_component};
use crate::exceptions::ModaiError;
use crate::models::ComponentConfig;

pub fn run() -> Result<(), ModaiError> {
    let table = ComponentTable::builtin();
    let defaults = ComponentConfig::new();

    for path in table.paths() {
        let summary = table
            .resolve(path, &defaults)
            .map(|component| describe_component(&component))?;
        println!("{:<45} {}", path, summary);
    }

    Ok(())
}
