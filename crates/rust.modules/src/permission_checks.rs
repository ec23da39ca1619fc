use serenity::all::{Permissions, UserId};

use crate::cache::ModuleCache;
use crate::Context;

/// Permission check for commands restricted to server administrators
pub fn permission_check_admin(
    command: &str,
    _user_id: UserId,
    native_perms: Permissions,
) -> Result<(), crate::Error> {
    if native_perms.administrator() {
        return Ok(());
    }

    Err(format!("You need the Administrator permission to use `{}`", command).into())
}

/// Whether the invocation came from a direct message rather than a server
pub fn is_from_dm(ctx: Context<'_>) -> bool {
    ctx.guild_id().is_none()
}

/// Resolves the invoking member's server-wide permissions
pub async fn member_permissions(ctx: Context<'_>) -> Result<Permissions, crate::Error> {
    // Application commands ship the resolved permissions with the interaction
    if let poise::Context::Application(a) = ctx {
        if let Some(perms) = a.interaction.member.as_ref().and_then(|m| m.permissions) {
            return Ok(perms);
        }
    }

    let member = ctx
        .author_member()
        .await
        .ok_or("Could not fetch your member information")?;

    let guild = ctx.guild().ok_or("This server is not cached yet")?;

    Ok(guild.member_permissions(&member))
}

/// Poise check allowing only server administrators
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, crate::Error> {
    if is_from_dm(ctx) {
        return Ok(false);
    }

    Ok(member_permissions(ctx).await?.administrator())
}

/// Check command checks whether or not a user has permission to run a command
pub fn check_command(
    module_cache: &ModuleCache,
    command: &str,
    user_id: UserId,
    member_perms: Permissions,
) -> Result<(), crate::Error> {
    let base_command = command.split(' ').next().unwrap_or_default();

    let Some((_, check_ptr)) = module_cache.command_id_permission_check_map.get(base_command)
    else {
        return Err(format!("Command `{}` not found", base_command).into());
    };

    (check_ptr)(command, user_id, member_perms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{permission_check_none, CommandObj, Module, PermissionCheck};

    struct Guarded;

    impl Module for Guarded {
        fn id(&self) -> &'static str {
            "guarded"
        }

        fn name(&self) -> &'static str {
            "Guarded"
        }

        fn description(&self) -> &'static str {
            "Module with one open and one admin command"
        }

        fn raw_commands(&self) -> Vec<CommandObj> {
            let open = crate::Command {
                name: "open".to_string(),
                ..Default::default()
            };
            let admin = crate::Command {
                name: "admin".to_string(),
                ..Default::default()
            };

            vec![
                (open, permission_check_none as PermissionCheck),
                (admin, permission_check_admin as PermissionCheck),
            ]
        }
    }

    #[test]
    fn admin_commands_need_administrator() {
        let cache = ModuleCache::new(vec![Box::new(Guarded)]).unwrap();
        let user = UserId::new(1);

        assert!(check_command(&cache, "open", user, Permissions::empty()).is_ok());
        assert!(check_command(&cache, "admin sync", user, Permissions::MANAGE_ROLES).is_err());
        assert!(check_command(&cache, "admin sync", user, Permissions::ADMINISTRATOR).is_ok());
        assert!(check_command(&cache, "missing", user, Permissions::all()).is_err());
    }
}
