use modules::summary::ModuleSummary;
use modules::{Context, Error};
use poise::{serenity_prelude::CreateEmbed, CreateReply};

/// Lists the modules loaded into the bot
#[poise::command(slash_command, user_cooldown = 1, guild_cooldown = 1)]
pub async fn modules(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let mut embed = CreateEmbed::default().title("Loaded Modules");

    for module in data.modules.modules() {
        let summary = ModuleSummary::of(module.as_ref());

        let commands = summary
            .invocable()
            .into_iter()
            .map(|name| format!("`/{}`", name))
            .collect::<Vec<_>>();

        embed = embed.field(
            format!("{} ({})", summary.name, summary.id),
            format!(
                "{}\n{}",
                summary.description,
                if commands.is_empty() {
                    "*No commands*".to_string()
                } else {
                    commands.join(", ")
                }
            ),
            false,
        );
    }

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}
