//! What the bot tells users and the `modules` subcommand about its loaded modules

use serde::Serialize;

use crate::modules::Module;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ModuleSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub commands: Vec<CommandSummary>,
}

/// A slash command or subcommand. Groups keep their children in registration order.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CommandSummary {
    pub qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSummary>,
}

impl CommandSummary {
    pub fn of(command: &crate::Command) -> Self {
        Self {
            qualified_name: command.qualified_name.clone(),
            description: command.description.clone(),
            subcommands: command.subcommands.iter().map(Self::of).collect(),
        }
    }

    /// The names a user can actually invoke, so `autoroles list` rather than `autoroles`
    pub fn invocable(&self) -> Vec<&str> {
        if self.subcommands.is_empty() {
            return vec![self.qualified_name.as_str()];
        }

        self.subcommands.iter().flat_map(Self::invocable).collect()
    }
}

impl ModuleSummary {
    pub fn of(module: &dyn Module) -> Self {
        Self {
            id: module.id(),
            name: module.name(),
            description: module.description(),
            commands: module
                .raw_commands()
                .iter()
                .map(|(command, _)| CommandSummary::of(command))
                .collect(),
        }
    }

    pub fn invocable(&self) -> Vec<&str> {
        self.commands
            .iter()
            .flat_map(CommandSummary::invocable)
            .collect()
    }
}
