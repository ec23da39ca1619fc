use modules::permission_checks::is_admin;
use modules::{Context, Error};
use poise::serenity_prelude::{Color, CreateEmbed};
use poise::CreateReply;

use crate::backend::SerenityBackend;
use crate::reconcile::reconcile_guild;

/// Autorole management
#[poise::command(
    slash_command,
    guild_only,
    check = "is_admin",
    subcommands("autoroles_list", "autoroles_sync")
)]
pub async fn autoroles(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Shows which emoji grants which role on each autorole message
#[poise::command(
    slash_command,
    guild_only,
    check = "is_admin",
    user_cooldown = 1,
    rename = "list"
)]
pub async fn autoroles_list(ctx: Context<'_>) -> Result<(), Error> {
    let config = &ctx.data().config;

    let mut embed = CreateEmbed::default()
        .title("Autorole Messages")
        .description(format!("In <#{}>", config.autoroles_channel_id))
        .color(Color::BLURPLE);

    for (slot, message_id) in config.autorole_messages.iter() {
        let rows = config
            .autoroles
            .roles_for(*message_id)
            .map(|roles| {
                roles
                    .iter()
                    .map(|(emoji, entry)| match entry.label {
                        Some(ref label) => {
                            format!("{} <@&{}> ({})", emoji.mention(), entry.role_id, label)
                        }
                        None => format!("{} <@&{}>", emoji.mention(), entry.role_id),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        embed = embed.field(
            format!("{} ({})", slot, message_id),
            if rows.is_empty() {
                "*No roles*".to_string()
            } else {
                rows.join("\n")
            },
            false,
        );
    }

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

/// Adds any missing bot reactions to the autorole messages of this server
#[poise::command(
    slash_command,
    guild_only,
    check = "is_admin",
    guild_cooldown = 30,
    rename = "sync"
)]
pub async fn autoroles_sync(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Err("This command can only be used in servers".into());
    };

    ctx.defer_ephemeral().await?;

    let config = &ctx.data().config;
    let backend = SerenityBackend::new(ctx.serenity_context());

    let report = reconcile_guild(
        &backend,
        &config.autoroles,
        guild_id,
        config.autoroles_channel_id,
    )
    .await;

    log::info!("Manual autorole sync in {}: {}", guild_id, report);

    ctx.send(
        CreateReply::default()
            .embed(
                CreateEmbed::default()
                    .title("Autoroles synced")
                    .description(report.to_string())
                    .color(if report.skipped == 0 {
                        Color::DARK_GREEN
                    } else {
                        Color::ORANGE
                    }),
            )
            .ephemeral(true),
    )
    .await?;

    Ok(())
}
