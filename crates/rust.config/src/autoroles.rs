use std::hash::{Hash, Hasher};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serenity::all::{EmojiId, MessageId, ReactionType, RoleId};

use crate::ConfigError;

/// Emoji presentation selector, which clients add or drop inconsistently
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Identifies an emoji in a reaction: a custom guild emoji by ID or a unicode emoji by its text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawEmoji", into = "RawEmoji")]
pub enum EmojiKey {
    Custom(EmojiId),
    Unicode(String),
}

impl EmojiKey {
    /// Returns the key for a reaction, or `None` for reaction kinds that carry neither an ID nor text
    pub fn from_reaction(reaction: &ReactionType) -> Option<Self> {
        match reaction {
            ReactionType::Custom { id, .. } => Some(Self::Custom(*id)),
            ReactionType::Unicode(text) => Some(Self::Unicode(text.clone())),
            _ => None,
        }
    }

    /// Parses a key from text. Purely numeric text is a custom emoji ID.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.is_empty() {
            return None;
        }

        if text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .map(|id| Self::Custom(EmojiId::new(id)));
        }

        Some(Self::Unicode(text.to_string()))
    }

    /// Chat markup rendering this emoji
    pub fn mention(&self) -> String {
        match self {
            Self::Custom(id) => format!("<:emoji:{}>", id),
            Self::Unicode(text) => text.clone(),
        }
    }

    fn normalized(text: &str) -> impl Iterator<Item = char> + '_ {
        text.chars().filter(|c| *c != VARIATION_SELECTOR_16)
    }
}

impl PartialEq for EmojiKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a == b,
            (Self::Unicode(a), Self::Unicode(b)) => Self::normalized(a).eq(Self::normalized(b)),
            _ => false,
        }
    }
}

impl Eq for EmojiKey {}

impl Hash for EmojiKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Custom(id) => {
                0u8.hash(state);
                id.hash(state);
            }
            Self::Unicode(text) => {
                1u8.hash(state);
                for c in Self::normalized(text) {
                    c.hash(state);
                }
            }
        }
    }
}

impl std::fmt::Display for EmojiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(id) => write!(f, "{}", id),
            Self::Unicode(text) => write!(f, "{}", text),
        }
    }
}

/// Wire form of an [`EmojiKey`] in mapping files: an integer ID or a string
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawEmoji {
    Id(u64),
    Text(String),
}

impl TryFrom<RawEmoji> for EmojiKey {
    type Error = String;

    fn try_from(raw: RawEmoji) -> Result<Self, Self::Error> {
        match raw {
            RawEmoji::Id(0) => Err("emoji ID must be non-zero".to_string()),
            RawEmoji::Id(id) => Ok(Self::Custom(EmojiId::new(id))),
            RawEmoji::Text(text) => {
                Self::parse(&text).ok_or_else(|| format!("invalid emoji `{}`", text))
            }
        }
    }
}

impl From<EmojiKey> for RawEmoji {
    fn from(key: EmojiKey) -> Self {
        match key {
            EmojiKey::Custom(id) => RawEmoji::Id(id.get()),
            EmojiKey::Unicode(text) => RawEmoji::Text(text),
        }
    }
}

/// One row of a mapping file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    pub emoji: EmojiKey,
    pub role: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl MappingEntry {
    fn new(emoji: EmojiKey, role: u64, label: &str) -> Self {
        Self {
            emoji,
            role,
            label: Some(label.to_string()),
        }
    }
}

/// Autorole table keyed by message slot name (`roles`, `premier`, `faceit`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable(pub IndexMap<String, Vec<MappingEntry>>);

impl MappingTable {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::MappingFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&yaml)
    }

    /// The table the community server runs with
    pub fn builtin() -> Self {
        let custom = |id: u64| EmojiKey::Custom(EmojiId::new(id));
        let unicode = |text: &str| EmojiKey::Unicode(text.to_string());

        let roles = vec![
            MappingEntry::new(custom(1462761771076030475), 1462259164381450411, "Awper"),
            MappingEntry::new(unicode("🧠"), 1462258609885941863, "IGL"),
            MappingEntry::new(unicode("🚪"), 1462259199315808562, "Entry Fragger"),
            MappingEntry::new(unicode("🛠️"), 1462259261785640960, "Support"),
            MappingEntry::new(unicode("🕶️"), 1462259288272670862, "Lurker"),
        ];

        let faceit = [
            (1462765370380128337, 1462763603013668874, "Level 1"),
            (1462765387547541515, 1462763764439978065, "Level 2"),
            (1462765402277941320, 1462763782907629568, "Level 3"),
            (1462765416584712360, 1462763816243826709, "Level 4"),
            (1462765429469610165, 1462763837374595132, "Level 5"),
            (1462765446242500671, 1462763972838293602, "Level 6"),
            (1462765462176796736, 1462763993449107489, "Level 7"),
            (1462765479792869438, 1462764008967897181, "Level 8"),
            (1462765494229667872, 1462764025858494607, "Level 9"),
            (1462765510713278587, 1462764048390291516, "Level 10"),
            (1462765566736728218, 1462764068694790149, "Challenger"),
        ]
        .into_iter()
        .map(|(emoji, role, label)| MappingEntry::new(custom(emoji), role, label))
        .collect();

        let premier = [
            (1462734115060187200, 1462259803597308078, "0 to 5k premier"),
            (1462734228876951586, 1462259916176625938, "5k to 10k premier"),
            (1462734277623156860, 1462259974175457454, "10k to 15k premier"),
            (1462734308090450113, 1462260073442312467, "15k to 20k premier"),
            (1462734344006275094, 1462260101271388353, "20k to 25k premier"),
            (1462734374125572179, 1462260159064576153, "25k to 30k premier"),
            (1462734416328786023, 1462260187099562267, "30k premier"),
        ]
        .into_iter()
        .map(|(emoji, role, label)| MappingEntry::new(custom(emoji), role, label))
        .collect();

        Self(IndexMap::from([
            ("roles".to_string(), roles),
            ("faceit".to_string(), faceit),
            ("premier".to_string(), premier),
        ]))
    }
}

/// A role granted by reacting with an emoji
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoroleEntry {
    pub role_id: RoleId,
    pub label: Option<String>,
}

/// Message ID to emoji to role. Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct RoleMapping {
    messages: IndexMap<MessageId, IndexMap<EmojiKey, AutoroleEntry>>,
}

impl RoleMapping {
    pub fn new(messages: IndexMap<MessageId, IndexMap<EmojiKey, AutoroleEntry>>) -> Self {
        Self { messages }
    }

    /// Resolves a mapping table against the configured message slots.
    ///
    /// Every slot becomes a tracked message, even one the table has no rows for.
    pub fn build(
        table: &MappingTable,
        slots: &IndexMap<String, MessageId>,
    ) -> Result<Self, ConfigError> {
        if let Some(unknown) = table.0.keys().find(|slot| !slots.contains_key(*slot)) {
            return Err(ConfigError::UnknownMessageSlot(unknown.clone()));
        }

        let mut messages = IndexMap::new();

        for (slot, message_id) in slots {
            let mut roles = IndexMap::new();

            for entry in table.0.get(slot).into_iter().flatten() {
                if entry.role == 0 {
                    return Err(ConfigError::InvalidRoleId {
                        slot: slot.clone(),
                        emoji: entry.emoji.clone(),
                    });
                }

                let previous = roles.insert(
                    entry.emoji.clone(),
                    AutoroleEntry {
                        role_id: RoleId::new(entry.role),
                        label: entry.label.clone(),
                    },
                );

                if previous.is_some() {
                    return Err(ConfigError::DuplicateEmoji {
                        slot: slot.clone(),
                        emoji: entry.emoji.clone(),
                    });
                }
            }

            messages.insert(*message_id, roles);
        }

        Ok(Self { messages })
    }

    pub fn is_tracked(&self, message_id: MessageId) -> bool {
        self.messages.contains_key(&message_id)
    }

    pub fn roles_for(&self, message_id: MessageId) -> Option<&IndexMap<EmojiKey, AutoroleEntry>> {
        self.messages.get(&message_id)
    }

    pub fn role_for(&self, message_id: MessageId, emoji: &EmojiKey) -> Option<&AutoroleEntry> {
        self.messages.get(&message_id)?.get(emoji)
    }

    pub fn messages(&self) -> impl Iterator<Item = (MessageId, &IndexMap<EmojiKey, AutoroleEntry>)> {
        self.messages.iter().map(|(id, roles)| (*id, roles))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> IndexMap<String, MessageId> {
        IndexMap::from([
            ("roles".to_string(), MessageId::new(1)),
            ("premier".to_string(), MessageId::new(2)),
            ("faceit".to_string(), MessageId::new(3)),
        ])
    }

    #[test]
    fn unicode_keys_ignore_variation_selector() {
        let mapping = RoleMapping::build(&MappingTable::builtin(), &slots()).unwrap();

        let bare = EmojiKey::Unicode("🛠".to_string());
        let entry = mapping.role_for(MessageId::new(1), &bare).unwrap();

        assert_eq!(entry.role_id, RoleId::new(1462259261785640960));
        assert_eq!(entry.label.as_deref(), Some("Support"));
        assert_ne!(bare, EmojiKey::Unicode("🕶".to_string()));
    }

    #[test]
    fn reaction_types_map_to_keys() {
        let custom = ReactionType::Custom {
            animated: false,
            id: EmojiId::new(1462761771076030475),
            name: Some("awp".to_string()),
        };

        assert_eq!(
            EmojiKey::from_reaction(&custom),
            Some(EmojiKey::Custom(EmojiId::new(1462761771076030475)))
        );
        assert_eq!(
            EmojiKey::from_reaction(&ReactionType::Unicode("🧠".to_string())),
            Some(EmojiKey::Unicode("🧠".to_string()))
        );
    }

    #[test]
    fn parses_yaml_tables() {
        let table = MappingTable::from_yaml(
            r#"
roles:
  - emoji: 42
    role: 7
    label: Awper
  - emoji: "🧠"
    role: 8
faceit:
  - emoji: "43"
    role: 9
"#,
        )
        .unwrap();

        let mapping = RoleMapping::build(&table, &slots()).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(
            mapping
                .role_for(MessageId::new(3), &EmojiKey::Custom(EmojiId::new(43)))
                .map(|e| e.role_id),
            Some(RoleId::new(9))
        );
        // premier has no rows but is still tracked
        assert!(mapping.roles_for(MessageId::new(2)).is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn rejects_bad_tables() {
        let unknown = MappingTable::from_yaml("events:\n  - emoji: 1\n    role: 2\n").unwrap();
        assert!(matches!(
            RoleMapping::build(&unknown, &slots()),
            Err(ConfigError::UnknownMessageSlot(slot)) if slot == "events"
        ));

        let duplicate = MappingTable::from_yaml(
            "roles:\n  - emoji: \"🛠️\"\n    role: 2\n  - emoji: \"🛠\"\n    role: 3\n",
        )
        .unwrap();
        assert!(matches!(
            RoleMapping::build(&duplicate, &slots()),
            Err(ConfigError::DuplicateEmoji { .. })
        ));

        assert!(MappingTable::from_yaml("roles:\n  - emoji: 0\n    role: 2\n").is_err());
    }
}
