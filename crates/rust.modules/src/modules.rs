use crate::EventHandlerContext;

pub type PermissionCheck = fn(
    &str,
    serenity::all::UserId,
    serenity::all::Permissions,
) -> Result<(), crate::Error>;

pub type CommandObj = (crate::Command, PermissionCheck);

pub fn permission_check_none(
    _command: &str,
    _user_id: serenity::all::UserId,
    _native_perms: serenity::all::Permissions,
) -> Result<(), crate::Error> {
    Ok(())
}

/// The `Module` trait is how functionality gets registered with the bot
///
/// Modules are listed explicitly in `bot_modules_default` and loaded once at startup
#[async_trait::async_trait]
pub trait Module: Send + Sync {
    /// The ID of the module
    fn id(&self) -> &'static str;

    /// The name of the module
    fn name(&self) -> &'static str;

    /// The description of the module
    fn description(&self) -> &'static str;

    /// The commands in the module
    fn raw_commands(&self) -> Vec<CommandObj> {
        Vec::new()
    }

    /// Called for every gateway event once the framework is set up.
    ///
    /// An error here is logged by the dispatcher; other modules still see the event.
    async fn event_listener(&self, _ectx: &EventHandlerContext<'_>) -> Result<(), crate::Error> {
        Ok(())
    }

    /// Performs any sanity/validation checks on the module
    ///
    /// Modules with configuration needs may extend this, but should still call [`validate_module`]
    fn validate(&self, _config: &config::Config) -> Result<(), crate::Error> {
        validate_module(self)
    }
}

/// Validates a module to ensure it is set up correctly
pub fn validate_module<T: Module + ?Sized>(module: &T) -> Result<(), crate::Error> {
    if module.id().is_empty() || module.id().contains(char::is_whitespace) {
        return Err(format!("Module `{}` has an invalid id", module.id()).into());
    }

    // Check that all commands have unique names
    let mut names = Vec::new();

    for (command, _) in module.raw_commands() {
        if names.contains(&command.name) {
            return Err(format!(
                "Module {} has a duplicate command: {}",
                module.id(),
                command.name
            )
            .into());
        }

        names.push(command.name);
    }

    Ok(())
}
