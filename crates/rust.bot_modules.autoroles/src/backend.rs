use config::EmojiKey;
use serenity::all::{ChannelId, EmojiId, GuildId, MessageId, ReactionType, RoleId, UserId};
use serenity::http::StatusCode;

use modules::Error;

/// A reaction currently on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSnapshot {
    pub emoji: EmojiKey,

    /// Whether the bot itself is one of the reactors
    pub me: bool,
}

/// The parts of a guild member the handler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub name: String,
    pub roles: Vec<RoleId>,
}

/// Discord operations used by the reconciler and the reaction handler
///
/// `Ok(None)` means the platform answered that the thing does not exist. `Err` is any other failure.
#[async_trait::async_trait]
pub trait AutoroleBackend: Send + Sync {
    fn current_user_id(&self) -> UserId;

    /// Name of a guild the bot can see
    async fn guild_name(&self, guild_id: GuildId) -> Option<String>;

    async fn channel_in_guild(&self, guild_id: GuildId, channel_id: ChannelId)
        -> Result<bool, Error>;

    async fn message_reactions(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Vec<ReactionSnapshot>, Error>;

    /// Looks up a custom emoji of the guild, returning it in a form that can be reacted with
    async fn guild_emoji(
        &self,
        guild_id: GuildId,
        emoji_id: EmojiId,
    ) -> Result<Option<ReactionType>, Error>;

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: &ReactionType,
    ) -> Result<(), Error>;

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        reaction: &ReactionType,
    ) -> Result<(), Error>;

    async fn member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<MemberSnapshot>, Error>;

    async fn role_name(&self, guild_id: GuildId, role_id: RoleId)
        -> Result<Option<String>, Error>;

    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), Error>;

    async fn remove_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), Error>;
}

/// [`AutoroleBackend`] over the live serenity client, preferring the cache where it has the data
pub struct SerenityBackend<'a> {
    ctx: &'a serenity::all::Context,
}

impl<'a> SerenityBackend<'a> {
    pub fn new(ctx: &'a serenity::all::Context) -> Self {
        Self { ctx }
    }
}

fn is_not_found(e: &serenity::Error) -> bool {
    match e {
        serenity::Error::Http(http_err) => [StatusCode::NOT_FOUND, StatusCode::FORBIDDEN]
            .contains(&http_err.status_code().unwrap_or(StatusCode::NOT_ACCEPTABLE)),
        _ => false,
    }
}

#[async_trait::async_trait]
impl AutoroleBackend for SerenityBackend<'_> {
    fn current_user_id(&self) -> UserId {
        self.ctx.cache.current_user().id
    }

    async fn guild_name(&self, guild_id: GuildId) -> Option<String> {
        let cached = self.ctx.cache.guild(guild_id).map(|guild| guild.name.clone());

        if cached.is_some() {
            return cached;
        }

        match self.ctx.http.get_guild(guild_id).await {
            Ok(guild) => Some(guild.name),
            Err(e) => {
                log::debug!("Guild {} could not be fetched: {}", guild_id, e);
                None
            }
        }
    }

    async fn channel_in_guild(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool, Error> {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.contains_key(&channel_id));

        if cached == Some(true) {
            return Ok(true);
        }

        match self.ctx.http.get_channel(channel_id).await {
            Ok(channel) => Ok(channel
                .guild()
                .is_some_and(|channel| channel.guild_id == guild_id)),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn message_reactions(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Vec<ReactionSnapshot>, Error> {
        let message = self.ctx.http.get_message(channel_id, message_id).await?;

        Ok(message
            .reactions
            .iter()
            .filter_map(|reaction| {
                EmojiKey::from_reaction(&reaction.reaction_type).map(|emoji| ReactionSnapshot {
                    emoji,
                    me: reaction.me,
                })
            })
            .collect())
    }

    async fn guild_emoji(
        &self,
        guild_id: GuildId,
        emoji_id: EmojiId,
    ) -> Result<Option<ReactionType>, Error> {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.emojis.get(&emoji_id).cloned());

        if let Some(emoji) = cached {
            return Ok(Some(ReactionType::from(emoji)));
        }

        match self.ctx.http.get_emoji(guild_id, emoji_id).await {
            Ok(emoji) => Ok(Some(ReactionType::from(emoji))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reaction: &ReactionType,
    ) -> Result<(), Error> {
        self.ctx
            .http
            .create_reaction(channel_id, message_id, reaction)
            .await?;

        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        reaction: &ReactionType,
    ) -> Result<(), Error> {
        self.ctx
            .http
            .delete_reaction(channel_id, message_id, user_id, reaction)
            .await?;

        Ok(())
    }

    async fn member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<MemberSnapshot>, Error> {
        match guild_id.member(self.ctx, user_id).await {
            Ok(member) => Ok(Some(MemberSnapshot {
                name: member.display_name().to_string(),
                roles: member.roles.clone(),
            })),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn role_name(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<Option<String>, Error> {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.roles.get(&role_id).map(|role| role.name.clone()));

        if cached.is_some() {
            return Ok(cached);
        }

        let roles = self.ctx.http.get_guild_roles(guild_id).await?;

        Ok(roles
            .into_iter()
            .find(|role| role.id == role_id)
            .map(|role| role.name))
    }

    async fn add_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        self.ctx
            .http
            .add_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;

        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), Error> {
        self.ctx
            .http
            .remove_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;

        Ok(())
    }
}

