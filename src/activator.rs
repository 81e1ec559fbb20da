use crate::models::{ActivationReport, Dependency, LoadedModule, UnresolvedModule};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Computes the largest subset of `registered` whose dependencies all hold.
///
/// Works in rounds: a module becomes active once every token it declares is
/// satisfied by the active set as it stood at the start of the round. Modules
/// activated in a round only become visible to the next one, so every round
/// either makes progress or ends the pass, bounding the work to one round per
/// module. Whatever is still pending at that point is reported (and logged
/// once, as a batch) instead of failing the pass.
///
/// The result depends only on the inputs. When `registered` repeats an id the
/// later module replaces the earlier one, matching registry semantics.
pub fn activate(registered: &[LoadedModule], active_flags: &[String]) -> ActivationReport {
    let flags: HashSet<&str> = active_flags.iter().map(String::as_str).collect();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut pending: Vec<&LoadedModule> = Vec::with_capacity(registered.len());
    for module in registered {
        match positions.get(module.id.as_str()) {
            Some(&pos) => pending[pos] = module,
            None => {
                positions.insert(module.id.as_str(), pending.len());
                pending.push(module);
            }
        }
    }

    let mut active_ids: HashSet<&str> = HashSet::with_capacity(pending.len());
    let mut active: Vec<LoadedModule> = Vec::with_capacity(pending.len());
    let mut rounds = 0;

    while !pending.is_empty() {
        let (ready, blocked): (Vec<&LoadedModule>, Vec<&LoadedModule>) = pending
            .into_iter()
            .partition(|m| unmet_dependencies(m, &active_ids, &flags).is_empty());
        pending = blocked;

        if ready.is_empty() {
            break;
        }

        rounds += 1;
        let ids: Vec<&str> = ready.iter().map(|m| m.id.as_str()).collect();
        debug!(round = rounds, modules = ?ids, "Activated modules");
        for module in ready {
            active_ids.insert(module.id.as_str());
            active.push(module.clone());
        }
    }

    let unresolved: Vec<UnresolvedModule> = pending
        .iter()
        .map(|m| UnresolvedModule {
            id: m.id.clone(),
            dependencies: m.dependencies.clone(),
            unmet: unmet_dependencies(m, &active_ids, &flags),
        })
        .collect();

    if !unresolved.is_empty() {
        let ids: Vec<&str> = unresolved.iter().map(|u| u.id.as_str()).collect();
        let details = unresolved
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(
            count = unresolved.len(),
            modules = ?ids,
            "Unresolvable module dependencies for {} module(s): {}",
            unresolved.len(),
            details
        );
    }

    ActivationReport {
        active,
        unresolved,
        rounds,
    }
}

fn unmet_dependencies(
    module: &LoadedModule,
    active: &HashSet<&str>,
    flags: &HashSet<&str>,
) -> Vec<Dependency> {
    module
        .dependencies
        .iter()
        .filter(|dep| !is_satisfied(dep, active, flags))
        .cloned()
        .collect()
}

fn is_satisfied(dep: &Dependency, active: &HashSet<&str>, flags: &HashSet<&str>) -> bool {
    match dep {
        Dependency::Module(id) => active.contains(id.as_str()),
        Dependency::Flag(name) => flags.contains(name.as_str()),
        Dependency::NotFlag(name) => !flags.contains(name.as_str()),
        Dependency::Unrecognized(_) => false,
    }
}
