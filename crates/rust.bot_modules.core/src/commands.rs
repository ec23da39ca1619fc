use modules::{Context, Error};

/// Commands related to commands
#[poise::command(
    slash_command,
    user_cooldown = 1,
    guild_cooldown = 1,
    subcommands("commands_check")
)]
pub async fn commands(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Checks if a command is usable
#[poise::command(slash_command, user_cooldown = 1, guild_cooldown = 1, rename = "check")]
pub async fn commands_check(
    ctx: Context<'_>,
    #[description = "The command to check"] command: String,
) -> Result<(), Error> {
    if modules::permission_checks::is_from_dm(ctx) {
        return Err("This command must be run in a guild".into());
    }

    let member_perms = modules::permission_checks::member_permissions(ctx).await?;

    // Check if the user has permission to use the command
    if let Err(e) = modules::permission_checks::check_command(
        &ctx.data().modules,
        command.trim(),
        ctx.author().id,
        member_perms,
    ) {
        return Err(format!("You do NOT have permission to use this command?\n{}", e).into());
    }

    ctx.say("You have permission to use this command").await?;

    Ok(())
}
