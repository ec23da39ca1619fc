use poise::{serenity_prelude::CreateEmbed, CreateReply};

use modules::{Context, Error};

#[poise::command(category = "Stats", slash_command, user_cooldown = 1)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let msg = CreateReply::default().embed(
        CreateEmbed::default()
            .title("Pong")
            .field(
                "Local WS Ping",
                format!("{}μs", ctx.ping().await.as_micros()),
                true,
            )
            .field("Edit Latency", "Calculating...", true),
    );

    let st = std::time::Instant::now();

    let handle = ctx.send(msg).await?;

    let edit_latency = st.elapsed();

    handle
        .edit(
            ctx,
            CreateReply::default().embed(
                CreateEmbed::default()
                    .title("Pong")
                    .field(
                        "Local WS Ping",
                        format!("{}μs", ctx.ping().await.as_micros()),
                        true,
                    )
                    .field(
                        "Edit Latency",
                        format!("{}ms", edit_latency.as_millis()),
                        true,
                    ),
            ),
        )
        .await?;

    Ok(())
}
