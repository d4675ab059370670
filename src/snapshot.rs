//! The persistence boundary.
//!
//! A hero is saved as a flat record and restored through validation: a
//! record that fails any check is rejected as a whole and nothing is
//! applied. Artifacts are persisted by id and re-resolved against the
//! catalog, so their text always matches the running version.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Gender};
use crate::constants::{FOOL_ABILITY_USES, SERVANT_ABILITY_USES};
use crate::content;
use crate::effects::Effect;
use crate::error::SnapshotError;
use crate::hero::{ClassId, Hero, HeroClass, ManaPool};
use crate::items::Item;

/// Persisted form of the actor-level state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRecord {
    pub name: String,
    pub gender: Gender,
    pub hp: u32,
    pub max_hp: u32,
    pub strength: u32,
    pub base_strength: u32,
    pub agility: u32,
    pub intellect: u32,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// By id; resolved against the catalog on restore.
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// Persisted form of a hero. Class-specific fields are optional in the
/// record and checked against the class on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroRecord {
    #[serde(flatten)]
    pub actor: ActorRecord,
    pub class: ClassId,
    #[serde(default)]
    pub ability_uses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<ManaPool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spells_used: Option<[bool; 3]>,
}

impl HeroRecord {
    pub fn from_hero(hero: &Hero) -> Self {
        let actor = &hero.actor;
        let record = ActorRecord {
            name: actor.name.clone(),
            gender: actor.gender,
            hp: actor.hp,
            max_hp: actor.max_hp,
            strength: actor.strength,
            base_strength: actor.base_strength,
            agility: actor.agility,
            intellect: actor.intellect,
            effects: actor.effects.clone(),
            inventory: actor.inventory.clone(),
            artifacts: actor.artifacts.iter().map(|a| a.id.clone()).collect(),
        };
        let (ability_uses, mana, spells_used) = match &hero.class {
            HeroClass::Fool { ability_uses } | HeroClass::Servant { ability_uses } => {
                (*ability_uses, None, None)
            }
            HeroClass::Sorceress { mana, spells_used } => (0, Some(*mana), Some(*spells_used)),
        };
        Self {
            actor: record,
            class: hero.class_id(),
            ability_uses,
            mana,
            spells_used,
        }
    }

    /// Validates the record and builds the hero. Any failure rejects the
    /// whole record.
    pub fn into_hero(self) -> Result<Hero, SnapshotError> {
        if self.actor.hp > self.actor.max_hp {
            return Err(SnapshotError::HpAboveMax {
                hp: self.actor.hp,
                max_hp: self.actor.max_hp,
            });
        }
        if self.actor.agility > 100 {
            return Err(SnapshotError::AgilityOutOfRange(self.actor.agility));
        }

        let class = match self.class {
            ClassId::Fool => {
                if self.mana.is_some() {
                    return Err(SnapshotError::ManaMismatch);
                }
                if self.ability_uses > FOOL_ABILITY_USES {
                    return Err(SnapshotError::AbilityUsesOutOfRange(self.ability_uses));
                }
                HeroClass::Fool {
                    ability_uses: self.ability_uses,
                }
            }
            ClassId::Sorceress => {
                let mana = self.mana.ok_or(SnapshotError::ManaMismatch)?;
                if mana.mp > mana.max_mp {
                    return Err(SnapshotError::ManaMismatch);
                }
                let spells_used = self.spells_used.ok_or(SnapshotError::MissingSpellFlags)?;
                HeroClass::Sorceress { mana, spells_used }
            }
            ClassId::Servant => {
                if self.mana.is_some() {
                    return Err(SnapshotError::ManaMismatch);
                }
                if self.ability_uses > SERVANT_ABILITY_USES {
                    return Err(SnapshotError::AbilityUsesOutOfRange(self.ability_uses));
                }
                HeroClass::Servant {
                    ability_uses: self.ability_uses,
                }
            }
        };

        let mut artifacts = Vec::with_capacity(self.actor.artifacts.len());
        for id in &self.actor.artifacts {
            let artifact =
                content::artifact(id).ok_or_else(|| SnapshotError::UnknownArtifact(id.clone()))?;
            artifacts.push(artifact);
        }

        let actor = Actor {
            name: self.actor.name,
            gender: self.actor.gender,
            hp: self.actor.hp,
            max_hp: self.actor.max_hp,
            strength: self.actor.strength,
            base_strength: self.actor.base_strength,
            agility: self.actor.agility,
            intellect: self.actor.intellect,
            effects: self.actor.effects,
            inventory: self.actor.inventory,
            artifacts,
        };
        Ok(Hero { actor, class })
    }
}

pub fn hero_to_json(hero: &Hero) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(&HeroRecord::from_hero(hero))
        .map_err(|e| SnapshotError::Parse(e.to_string()))
}

pub fn hero_from_json(json: &str) -> Result<Hero, SnapshotError> {
    let record: HeroRecord =
        serde_json::from_str(json).map_err(|e| SnapshotError::Parse(e.to_string()))?;
    record.into_hero()
}
