use indexmap::IndexMap;
use std::sync::Arc;

use crate::modules::{Module, PermissionCheck};

/// All loaded modules, plus the lookup from top-level command name to its owner and permission check
pub struct ModuleCache {
    pub module_cache: IndexMap<&'static str, Arc<dyn Module>>,
    pub command_id_permission_check_map: IndexMap<String, (&'static str, PermissionCheck)>,
}

impl ModuleCache {
    /// Registers modules in order, rejecting duplicate module ids and commands claimed by two modules
    pub fn new(modules: Vec<Box<dyn Module>>) -> Result<Self, crate::Error> {
        let mut module_cache: IndexMap<&'static str, Arc<dyn Module>> = IndexMap::new();
        let mut command_id_permission_check_map = IndexMap::new();

        for module in modules {
            let id = module.id();

            if module_cache.contains_key(id) {
                return Err(format!("Duplicate module id: {}", id).into());
            }

            for (command, check) in module.raw_commands() {
                if let Some((owner, _)) = command_id_permission_check_map.get(&command.name) {
                    return Err(format!(
                        "Command {} is defined by both {} and {}",
                        command.name, owner, id
                    )
                    .into());
                }

                command_id_permission_check_map.insert(command.name, (id, check));
            }

            module_cache.insert(id, Arc::from(module));
        }

        Ok(Self {
            module_cache,
            command_id_permission_check_map,
        })
    }

    /// Runs every module's own validation against the loaded config
    pub fn validate(&self, config: &config::Config) -> Result<(), crate::Error> {
        for module in self.modules() {
            module
                .validate(config)
                .map_err(|e| format!("Module {} failed validation: {}", module.id(), e))?;
        }

        Ok(())
    }

    pub fn modules(&self) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.module_cache.values()
    }

    /// Every command of every module, for registering with the framework
    pub fn commands(&self) -> Vec<crate::Command> {
        self.modules()
            .flat_map(|module| module.raw_commands())
            .map(|(command, _)| command)
            .collect()
    }
}
