pub mod backend;
mod cmds;
mod events;
pub mod reactions;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

use ::modules::modules::{validate_module, CommandObj, PermissionCheck};
use ::modules::permission_checks::permission_check_admin;
use ::modules::{Error, EventHandlerContext};

pub struct Module;

#[async_trait::async_trait]
impl ::modules::Module for Module {
    fn id(&self) -> &'static str {
        "autoroles"
    }

    fn name(&self) -> &'static str {
        "Autoroles"
    }

    fn description(&self) -> &'static str {
        "Grants and revokes roles from reactions on the autorole messages"
    }

    fn raw_commands(&self) -> Vec<CommandObj> {
        vec![(cmds::autoroles(), permission_check_admin as PermissionCheck)]
    }

    async fn event_listener(&self, ectx: &EventHandlerContext<'_>) -> Result<(), Error> {
        events::event_listener(ectx).await
    }

    fn validate(&self, config: &config::Config) -> Result<(), Error> {
        validate_module(self)?;

        if config.autoroles.is_empty() {
            return Err("No autorole messages are configured".into());
        }

        if let Some((message_id, _)) = config
            .autoroles
            .messages()
            .find(|(_, roles)| roles.is_empty())
        {
            return Err(format!("Autorole message {} has no emoji mapped", message_id).into());
        }

        Ok(())
    }
}
