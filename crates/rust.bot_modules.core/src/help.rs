use modules::{Context, Error};

/// Shows help for all commands, or a single command
#[poise::command(slash_command, user_cooldown = 1)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help for"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "React on the autorole messages to pick up roles",
            ephemeral: true,
            ..Default::default()
        },
    )
    .await?;

    Ok(())
}
