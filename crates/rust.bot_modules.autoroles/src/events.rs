use log::{debug, info};
use modules::{EventHandlerContext, Error};
use serenity::all::{FullEvent, GuildId};

use crate::backend::SerenityBackend;
use crate::reactions::{handle_reaction, ReactionAction, ReactionEvent};
use crate::reconcile::reconcile_guilds;

/// Autoroles event listener
pub(crate) async fn event_listener(ectx: &EventHandlerContext<'_>) -> Result<(), Error> {
    let config = &ectx.data.config;
    let backend = SerenityBackend::new(ectx.serenity_context);

    match ectx.event {
        FullEvent::Ready { data_about_bot } => {
            let guild_ids = data_about_bot
                .guilds
                .iter()
                .map(|guild| guild.id)
                .collect::<Vec<GuildId>>();

            info!(
                "Reconciling autorole reactions in {} guild(s)",
                guild_ids.len()
            );

            let report = reconcile_guilds(
                &backend,
                &config.autoroles,
                &guild_ids,
                config.autoroles_channel_id,
            )
            .await;

            info!("Autorole reconciliation finished: {}", report);
        }
        FullEvent::ReactionAdd { add_reaction } => {
            let event = ReactionEvent::from_reaction(add_reaction, ReactionAction::Add);
            let outcome = handle_reaction(&backend, &config.autoroles, &event).await;
            debug!("Reaction add on {}: {:?}", event.message_id, outcome);
        }
        FullEvent::ReactionRemove { removed_reaction } => {
            let event = ReactionEvent::from_reaction(removed_reaction, ReactionAction::Remove);
            let outcome = handle_reaction(&backend, &config.autoroles, &event).await;
            debug!("Reaction remove on {}: {:?}", event.message_id, outcome);
        }
        _ => {}
    }

    Ok(())
}
