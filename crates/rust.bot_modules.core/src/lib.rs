mod commands;
mod help;
mod modules;
mod ping;

use ::modules::modules::{permission_check_none, CommandObj, PermissionCheck};

pub struct Module;

impl ::modules::Module for Module {
    fn id(&self) -> &'static str {
        "core"
    }

    fn name(&self) -> &'static str {
        "Core"
    }

    fn description(&self) -> &'static str {
        "Core module handling help, latency and module introspection"
    }

    fn raw_commands(&self) -> Vec<CommandObj> {
        vec![
            (help::help(), permission_check_none as PermissionCheck),
            (ping::ping(), permission_check_none as PermissionCheck),
            (modules::modules(), permission_check_none as PermissionCheck),
            (commands::commands(), permission_check_none as PermissionCheck),
        ]
    }
}
