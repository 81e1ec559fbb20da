use crate::commands::load_host;
use crate::config::ShellConfig;
use crate::exceptions::ModaiError;
use crate::models::format_tokens;

pub async fn run(config: &ShellConfig) -> Result<(), ModaiError> {
    let (host, index) = load_host(config).await?;
    let registration = host.registration();

    let mut problems = Vec::new();
    for (id, path) in &registration.unresolved_paths {
        problems.push(format!("{}: unresolvable path '{}'", id, path));
    }
    for (id, token) in &registration.unrecognized_tokens {
        problems.push(format!("{}: unrecognized dependency '{}'", id, token));
    }
    for module in index.unresolved() {
        problems.push(format!(
            "{}: unmet dependencies [{}]",
            module.id,
            format_tokens(&module.unmet)
        ));
    }

    if problems.is_empty() {
        println!(
            "OK: {} modules registered, {} active.",
            host.registered_count(),
            index.len()
        );
        return Ok(());
    }

    println!("Problems in {}:", config.manifest);
    for problem in &problems {
        println!("  - {}", problem);
    }

    Err(ModaiError::InvalidInput(format!(
        "Manifest check found {} problem(s)",
        problems.len()
    )))
}
