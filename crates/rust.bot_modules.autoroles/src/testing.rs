//! In-memory [`AutoroleBackend`] for exercising the reconciler and the reaction handler

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use config::{AutoroleEntry, EmojiKey, RoleMapping};
use indexmap::IndexMap;
use serenity::all::{ChannelId, EmojiId, GuildId, MessageId, ReactionType, RoleId, UserId};

use crate::backend::{AutoroleBackend, MemberSnapshot, ReactionSnapshot};
use modules::Error;

pub const GUILD: GuildId = GuildId::new(10);
pub const CHANNEL: ChannelId = ChannelId::new(20);
pub const MESSAGE: MessageId = MessageId::new(30);
pub const BOT: UserId = UserId::new(1);
pub const USER: UserId = UserId::new(2);
pub const CUSTOM_EMOJI: EmojiId = EmojiId::new(40);
pub const ROLE_CUSTOM: RoleId = RoleId::new(50);
pub const ROLE_BRAIN: RoleId = RoleId::new(51);
pub const ROLE_TOOLS: RoleId = RoleId::new(52);

fn entry(role: u64) -> AutoroleEntry {
    AutoroleEntry {
        role_id: RoleId::new(role),
        label: None,
    }
}

fn base_roles() -> IndexMap<EmojiKey, AutoroleEntry> {
    IndexMap::from([
        (EmojiKey::Custom(CUSTOM_EMOJI), entry(ROLE_CUSTOM.get())),
        (EmojiKey::Unicode("🧠".to_string()), entry(ROLE_BRAIN.get())),
        (EmojiKey::Unicode("🛠️".to_string()), entry(ROLE_TOOLS.get())),
    ])
}

/// One tracked message with a custom emoji and two unicode emojis
pub fn mapping() -> RoleMapping {
    RoleMapping::new(IndexMap::from([(MESSAGE, base_roles())]))
}

/// [`mapping`] plus a second tracked message
pub fn mapping_with_extra_message(message_id: MessageId, emoji_id: EmojiId) -> RoleMapping {
    RoleMapping::new(IndexMap::from([
        (MESSAGE, base_roles()),
        (
            message_id,
            IndexMap::from([
                (EmojiKey::Custom(emoji_id), entry(53)),
                (EmojiKey::Unicode("🚪".to_string()), entry(54)),
            ]),
        ),
    ]))
}

/// A side effect the backend was asked to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddReaction(MessageId, EmojiKey),
    RemoveReaction(MessageId, UserId, EmojiKey),
    AddRole(UserId, RoleId),
    RemoveRole(UserId, RoleId),
}

/// A backend operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ChannelLookup,
    RoleLookup,
    AddReaction,
    RemoveReaction,
    AddRole,
    RemoveRole,
}

pub struct FakeBackend {
    guilds: HashMap<GuildId, String>,
    channels: HashMap<ChannelId, GuildId>,
    emojis: HashSet<EmojiId>,
    roles: HashMap<RoleId, String>,
    messages: Mutex<HashMap<MessageId, Vec<ReactionSnapshot>>>,
    members: Mutex<HashMap<UserId, MemberSnapshot>>,
    calls: Mutex<Vec<Call>>,
    failing: HashSet<Op>,
    /// Member lookups keep returning the initial snapshot, like a cache that missed the update
    stale_members: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            guilds: HashMap::from([(GUILD, "Community".to_string())]),
            channels: HashMap::from([(CHANNEL, GUILD)]),
            emojis: HashSet::from([CUSTOM_EMOJI]),
            roles: HashMap::from([
                (ROLE_CUSTOM, "Awper".to_string()),
                (ROLE_BRAIN, "IGL".to_string()),
                (ROLE_TOOLS, "Support".to_string()),
                (RoleId::new(53), "Extra".to_string()),
                (RoleId::new(54), "Entry Fragger".to_string()),
            ]),
            messages: Mutex::new(HashMap::from([(MESSAGE, Vec::new())])),
            members: Mutex::new(HashMap::from([(
                USER,
                MemberSnapshot {
                    name: "player".to_string(),
                    roles: Vec::new(),
                },
            )])),
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            stale_members: false,
        }
    }

    pub fn with_reaction(self, message_id: MessageId, emoji: EmojiKey, me: bool) -> Self {
        self.messages
            .lock()
            .unwrap()
            .entry(message_id)
            .or_default()
            .push(ReactionSnapshot { emoji, me });
        self
    }

    pub fn without_emoji(mut self, emoji_id: EmojiId) -> Self {
        self.emojis.remove(&emoji_id);
        self
    }

    pub fn without_role(mut self, role_id: RoleId) -> Self {
        self.roles.remove(&role_id);
        self
    }

    pub fn without_member(self, user_id: UserId) -> Self {
        self.members.lock().unwrap().remove(&user_id);
        self
    }

    pub fn with_member_role(self, user_id: UserId, role_id: RoleId) -> Self {
        if let Some(member) = self.members.lock().unwrap().get_mut(&user_id) {
            member.roles.push(role_id);
        }
        self
    }

    /// Makes every call of `op` return an error. Failed calls are not recorded.
    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_stale_members(mut self) -> Self {
        self.stale_members = true;
        self
    }

    fn check(&self, op: Op) -> Result<(), Error> {
        if self.failing.contains(&op) {
            return Err(format!("{:?} failed", op).into());
        }

        Ok(())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn key(reaction: &ReactionType) -> Result<EmojiKey, Error> {
    EmojiKey::from_reaction(reaction).ok_or_else(|| "unsupported reaction".into())
}

#[async_trait::async_trait]
impl AutoroleBackend for FakeBackend {
    fn current_user_id(&self) -> UserId {
        BOT
    }

    async fn guild_name(&self, guild_id: GuildId) -> Option<String> {
        self.guilds.get(&guild_id).cloned()
    }

    async fn channel_in_guild(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<bool, Error> {
        self.check(Op::ChannelLookup)?;
        Ok(self.channels.get(&channel_id) == Some(&guild_id))
    }

    async fn message_reactions(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Vec<ReactionSnapshot>, Error> {
        self.messages
            .lock()
            .unwrap()
            .get(&message_id)
            .cloned()
            .ok_or_else(|| format!("Unknown Message {}", message_id).into())
    }

    async fn guild_emoji(
        &self,
        _guild_id: GuildId,
        emoji_id: EmojiId,
    ) -> Result<Option<ReactionType>, Error> {
        Ok(self
            .emojis
            .contains(&emoji_id)
            .then(|| ReactionType::Custom {
                animated: false,
                id: emoji_id,
                name: Some("awp".to_string()),
            }))
    }

    async fn add_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        reaction: &ReactionType,
    ) -> Result<(), Error> {
        self.check(Op::AddReaction)?;
        let emoji = key(reaction)?;

        self.messages
            .lock()
            .unwrap()
            .get_mut(&message_id)
            .ok_or("Unknown Message")?
            .push(ReactionSnapshot {
                emoji: emoji.clone(),
                me: true,
            });

        self.record(Call::AddReaction(message_id, emoji));
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        reaction: &ReactionType,
    ) -> Result<(), Error> {
        self.check(Op::RemoveReaction)?;
        self.record(Call::RemoveReaction(message_id, user_id, key(reaction)?));
        Ok(())
    }

    async fn member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<MemberSnapshot>, Error> {
        Ok(self.members.lock().unwrap().get(&user_id).cloned())
    }

    async fn role_name(
        &self,
        _guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<Option<String>, Error> {
        self.check(Op::RoleLookup)?;
        Ok(self.roles.get(&role_id).cloned())
    }

    async fn add_member_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> Result<(), Error> {
        self.check(Op::AddRole)?;

        if !self.stale_members {
            if let Some(member) = self.members.lock().unwrap().get_mut(&user_id) {
                member.roles.push(role_id);
            }
        }

        self.record(Call::AddRole(user_id, role_id));
        Ok(())
    }

    async fn remove_member_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> Result<(), Error> {
        self.check(Op::RemoveRole)?;

        if !self.stale_members {
            if let Some(member) = self.members.lock().unwrap().get_mut(&user_id) {
                member.roles.retain(|r| *r != role_id);
            }
        }

        self.record(Call::RemoveRole(user_id, role_id));
        Ok(())
    }
}
