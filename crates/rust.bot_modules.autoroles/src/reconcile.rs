use config::{EmojiKey, RoleMapping};
use futures_util::future::join_all;
use log::{error, info, warn};
use serenity::all::{ChannelId, GuildId, ReactionType};

use crate::backend::AutoroleBackend;

/// What a reconciliation pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Reactions the bot added
    pub added: usize,

    /// Reactions the bot had already placed
    pub present: usize,

    /// Emojis that could not be checked or added
    pub skipped: usize,
}

impl ReconcileReport {
    pub fn merge(self, other: Self) -> Self {
        Self {
            added: self.added + other.added,
            present: self.present + other.present,
            skipped: self.skipped + other.skipped,
        }
    }
}

impl std::fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} added, {} already present, {} skipped",
            self.added, self.present, self.skipped
        )
    }
}

/// Makes sure the bot has reacted with every mapped emoji on every autorole message of a guild
///
/// Nothing here is fatal: unreachable channels, messages and emojis are logged and skipped.
pub async fn reconcile_guild(
    backend: &dyn AutoroleBackend,
    mapping: &RoleMapping,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let guild_name = backend
        .guild_name(guild_id)
        .await
        .unwrap_or_else(|| guild_id.to_string());

    match backend.channel_in_guild(guild_id, channel_id).await {
        Ok(true) => {}
        Ok(false) => {
            error!("Channel {} not found in guild {}", channel_id, guild_name);
            return report;
        }
        Err(e) => {
            error!(
                "Could not look up channel {} in guild {}: {}",
                channel_id, guild_name, e
            );
            return report;
        }
    }

    for (message_id, roles) in mapping.messages() {
        let reactions = match backend.message_reactions(channel_id, message_id).await {
            Ok(reactions) => reactions,
            Err(e) => {
                warn!(
                    "Could not fetch message {} in channel {}: {}",
                    message_id, channel_id, e
                );
                report.skipped += roles.len();
                continue;
            }
        };

        for emoji in roles.keys() {
            if reactions.iter().any(|r| r.me && &r.emoji == emoji) {
                report.present += 1;
                continue;
            }

            let reaction = match emoji {
                EmojiKey::Unicode(text) => ReactionType::Unicode(text.clone()),
                EmojiKey::Custom(emoji_id) => match backend.guild_emoji(guild_id, *emoji_id).await
                {
                    Ok(Some(reaction)) => reaction,
                    Ok(None) => {
                        warn!(
                            "Emoji ID {} not found in guild {}, skipping...",
                            emoji_id, guild_name
                        );
                        report.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            "Could not look up emoji {} in guild {}: {}",
                            emoji_id, guild_name, e
                        );
                        report.skipped += 1;
                        continue;
                    }
                },
            };

            match backend.add_reaction(channel_id, message_id, &reaction).await {
                Ok(()) => {
                    info!("Added missing reaction {} to message {}", emoji, message_id);
                    report.added += 1;
                }
                Err(e) => {
                    warn!(
                        "Could not add reaction {} to message {}: {}",
                        emoji, message_id, e
                    );
                    report.skipped += 1;
                }
            }
        }
    }

    report
}

/// Reconciles several guilds concurrently
pub async fn reconcile_guilds(
    backend: &dyn AutoroleBackend,
    mapping: &RoleMapping,
    guild_ids: &[GuildId],
    channel_id: ChannelId,
) -> ReconcileReport {
    join_all(
        guild_ids
            .iter()
            .map(|guild_id| reconcile_guild(backend, mapping, *guild_id, channel_id)),
    )
    .await
    .into_iter()
    .fold(ReconcileReport::default(), ReconcileReport::merge)
}
