use config::{EmojiKey, RoleMapping};
use log::{debug, error, info, warn};
use serenity::all::{ChannelId, GuildId, MessageId, Reaction, ReactionType, RoleId, UserId};

use crate::backend::AutoroleBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Add,
    Remove,
}

/// A reaction being added to or removed from a message
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub user_id: Option<UserId>,
    pub emoji: ReactionType,
    pub action: ReactionAction,
}

impl ReactionEvent {
    pub fn from_reaction(reaction: &Reaction, action: ReactionAction) -> Self {
        Self {
            message_id: reaction.message_id,
            channel_id: reaction.channel_id,
            guild_id: reaction.guild_id,
            user_id: reaction.user_id,
            emoji: reaction.emoji.clone(),
            action,
        }
    }
}

/// How a reaction event was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The message is not an autorole message
    Untracked,
    /// The bot's own reaction
    OwnReaction,
    GuildNotFound,
    MemberNotFound,
    /// An unmapped emoji was added and the bot removed it again
    ReactionRemoved,
    /// An unmapped emoji was removed
    Ignored,
    RoleGranted(RoleId),
    RoleRevoked(RoleId),
    /// The mapped role no longer exists in the guild
    RoleNotFound(RoleId),
    /// A call to Discord failed; the error has been logged
    Failed,
}

/// Applies the autorole rules to one reaction event. Failures are logged, never returned.
pub async fn handle_reaction(
    backend: &dyn AutoroleBackend,
    mapping: &RoleMapping,
    event: &ReactionEvent,
) -> Outcome {
    if !mapping.is_tracked(event.message_id) {
        return Outcome::Untracked;
    }

    let bot_id = backend.current_user_id();
    if event.user_id == Some(bot_id) {
        return Outcome::OwnReaction;
    }

    let Some(guild_id) = event.guild_id else {
        error!(
            "Reaction on autorole message {} arrived without a guild",
            event.message_id
        );
        return Outcome::GuildNotFound;
    };

    let Some(guild_name) = backend.guild_name(guild_id).await else {
        error!("Guild with ID {} could not be found!", guild_id);
        return Outcome::GuildNotFound;
    };

    let Some(user_id) = event.user_id else {
        error!(
            "Reaction on autorole message {} arrived without a user",
            event.message_id
        );
        return Outcome::MemberNotFound;
    };

    let member = match backend.member(guild_id, user_id).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            error!(
                "User {} could not be retrieved from autoroles listener",
                user_id
            );
            return Outcome::MemberNotFound;
        }
        Err(e) => {
            error!(
                "User {} could not be retrieved from autoroles listener: {}",
                user_id, e
            );
            return Outcome::MemberNotFound;
        }
    };

    let entry = EmojiKey::from_reaction(&event.emoji)
        .and_then(|emoji| mapping.role_for(event.message_id, &emoji));

    let Some(entry) = entry else {
        if event.action == ReactionAction::Remove {
            return Outcome::Ignored;
        }

        // Keep the autorole message limited to the configured reactions
        return match backend
            .remove_reaction(event.channel_id, event.message_id, user_id, &event.emoji)
            .await
        {
            Ok(()) => {
                debug!(
                    "Removed unmapped reaction {} by {} from message {}",
                    event.emoji, member.name, event.message_id
                );
                Outcome::ReactionRemoved
            }
            Err(e) => {
                warn!(
                    "Could not remove unmapped reaction {} from message {}: {}",
                    event.emoji, event.message_id, e
                );
                Outcome::Failed
            }
        };
    };

    let role_id = entry.role_id;

    let role_name = match backend.role_name(guild_id, role_id).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            error!(
                "The role with ID {} ({}) was not found in guild {}",
                role_id, event.emoji, guild_name
            );
            return Outcome::RoleNotFound(role_id);
        }
        Err(e) => {
            error!(
                "Could not look up role {} in guild {}: {}",
                role_id, guild_name, e
            );
            return Outcome::Failed;
        }
    };

    // Role PUT/DELETE are idempotent, and the cached member may lag behind a quick toggle
    match event.action {
        ReactionAction::Add => {
            match backend
                .add_member_role(guild_id, user_id, role_id, "Autorole reaction added")
                .await
            {
                Ok(()) => {
                    info!("Added role {} to {}", role_name, member.name);
                    Outcome::RoleGranted(role_id)
                }
                Err(e) => {
                    error!(
                        "Could not add role {} to {}: {}",
                        role_name, member.name, e
                    );
                    Outcome::Failed
                }
            }
        }
        ReactionAction::Remove => {
            match backend
                .remove_member_role(guild_id, user_id, role_id, "Autorole reaction removed")
                .await
            {
                Ok(()) => {
                    info!("Removed role {} from {}", role_name, member.name);
                    Outcome::RoleRevoked(role_id)
                }
                Err(e) => {
                    error!(
                        "Could not remove role {} from {}: {}",
                        role_name, member.name, e
                    );
                    Outcome::Failed
                }
            }
        }
    }
}
