//! Inventory items and story artifacts.

use serde::{Deserialize, Serialize};

/// Item category. Quest, key and artifact items are story props: they can
/// never be used directly, in or out of combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Heal,
    Mana,
    Damage,
    Quest,
    Key,
    Artifact,
    Misc,
}

/// A consumable or story item carried in an actor's inventory.
///
/// A nonzero `damage` means the item targets the opponent; otherwise it is
/// self-targeted. `consumable` items are removed from the inventory after
/// one use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub hp_restore: u32,
    #[serde(default)]
    pub mp_restore: u32,
    #[serde(default)]
    pub damage: u32,
    pub usable: bool,
    pub consumable: bool,
}

impl Item {
    pub fn new(name: &str, description: &str, kind: ItemKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            hp_restore: 0,
            mp_restore: 0,
            damage: 0,
            usable: true,
            consumable: true,
        }
    }

    pub fn with_hp_restore(mut self, amount: u32) -> Self {
        self.hp_restore = amount;
        self
    }

    pub fn with_mp_restore(mut self, amount: u32) -> Self {
        self.mp_restore = amount;
        self
    }

    pub fn with_damage(mut self, amount: u32) -> Self {
        self.damage = amount;
        self
    }

    pub fn not_usable(mut self) -> Self {
        self.usable = false;
        self
    }

    /// Whether this item can be activated at all. Story-typed items are
    /// never usable regardless of their flag.
    pub fn can_use(&self) -> bool {
        if !self.usable {
            return false;
        }
        !matches!(self.kind, ItemKind::Quest | ItemKind::Key | ItemKind::Artifact)
    }

    /// Short display summary of what the item does, e.g. `+40 HP, 10 damage`.
    pub fn effect_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.hp_restore > 0 {
            parts.push(format!("+{} HP", self.hp_restore));
        }
        if self.mp_restore > 0 {
            parts.push(format!("+{} MP", self.mp_restore));
        }
        if self.damage > 0 {
            parts.push(format!("{} damage", self.damage));
        }
        parts.join(", ")
    }
}

/// A unique story artifact. Artifacts have no duration and no direct use in
/// combat; the engine only tracks possession by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Artifact {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}
