//! Resource routing for the community API.
//!
//! Each [`Endpoint`] knows its resource path below the `wow/` namespace and
//! any extra query parameters it sends. Optional field lists are checked
//! against the matching whitelist before a path is produced.

use crate::error::Result;
use crate::fields::{CHARACTER_FIELDS, GUILD_FIELDS};
use crate::request::QueryParams;

/// A read-only resource of the community API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Achievement(u64),
    AuctionData { realm: String },
    BattlePetAbility(u64),
    BattlePetSpecies(u64),
    BattlePetStats {
        species_id: u64,
        level: u32,
        breed_id: u32,
        quality_id: u32,
    },
    /// Challenge mode leaderboard; an empty realm selects the whole region
    Challenge { realm: String },
    Character {
        realm: String,
        name: String,
        fields: Vec<String>,
    },
    Guild {
        realm: String,
        name: String,
        fields: Vec<String>,
    },
    Item(u64),
    ItemSet(u64),
    PvpLeaderboard { bracket: String },
    Quest(u64),
    RealmStatus,
    Recipe(u64),
    Spell(u64),

    // data/ resources
    Battlegroups,
    Races,
    Classes,
    Achievements,
    GuildRewards,
    GuildPerks,
    GuildAchievements,
    ItemClasses,
    Talents,
    PetTypes,
}

/// Resource path and extra parameters for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub params: QueryParams,
}

impl Route {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Comma-joined `fields` parameter, omitted for an empty list
    fn fields(mut self, fields: &[String]) -> Self {
        if !fields.is_empty() {
            self.params.insert("fields".to_string(), fields.join(","));
        }
        self
    }
}

impl Endpoint {
    pub fn character(realm: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Character {
            realm: realm.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn guild(realm: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Guild {
            realm: realm.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Request optional sections of a character or guild.
    ///
    /// Other resources have no optional sections: the requested fields are
    /// discarded and the endpoint is returned unchanged.
    pub fn with_fields<I, S>(mut self, requested: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Self::Character { fields, .. } | Self::Guild { fields, .. } = &mut self {
            fields.extend(requested.into_iter().map(Into::into));
        } else {
            let dropped: Vec<String> = requested.into_iter().map(Into::into).collect();
            if !dropped.is_empty() {
                tracing::warn!(endpoint = ?self, ?dropped, "resource takes no fields, ignoring");
            }
        }
        self
    }

    /// Validate the endpoint and produce its route.
    pub fn route(&self) -> Result<Route> {
        let route = match self {
            Self::Achievement(id) => Route::new(format!("achievement/{id}")),
            Self::AuctionData { realm } => Route::new(format!("auction/data/{}", segment(realm))),
            Self::BattlePetAbility(id) => Route::new(format!("battlePet/ability/{id}")),
            Self::BattlePetSpecies(id) => Route::new(format!("battlePet/species/{id}")),
            Self::BattlePetStats {
                species_id,
                level,
                breed_id,
                quality_id,
            } => Route::new(format!("battlePet/stats/{species_id}"))
                .param("level", level)
                .param("breedId", breed_id)
                .param("qualityId", quality_id),
            Self::Challenge { realm } if realm.is_empty() => Route::new("challenge/region"),
            Self::Challenge { realm } => Route::new(format!("challenge/{}", segment(realm))),
            Self::Character {
                realm,
                name,
                fields,
            } => {
                CHARACTER_FIELDS.validate(fields)?;
                Route::new(format!("character/{}/{}", segment(realm), segment(name))).fields(fields)
            }
            Self::Guild {
                realm,
                name,
                fields,
            } => {
                GUILD_FIELDS.validate(fields)?;
                Route::new(format!("guild/{}/{}", segment(realm), segment(name))).fields(fields)
            }
            Self::Item(id) => Route::new(format!("item/{id}")),
            Self::ItemSet(id) => Route::new(format!("item/set/{id}")),
            Self::PvpLeaderboard { bracket } => {
                Route::new(format!("leaderboard/{}", segment(bracket)))
            }
            Self::Quest(id) => Route::new(format!("quest/{id}")),
            Self::RealmStatus => Route::new("realm/status"),
            Self::Recipe(id) => Route::new(format!("recipe/{id}")),
            Self::Spell(id) => Route::new(format!("spell/{id}")),
            Self::Battlegroups => Route::new("data/battlegroups/"),
            Self::Races => Route::new("data/character/races"),
            Self::Classes => Route::new("data/character/classes"),
            Self::Achievements => Route::new("data/character/achievements"),
            Self::GuildRewards => Route::new("data/guild/rewards"),
            Self::GuildPerks => Route::new("data/guild/perks"),
            Self::GuildAchievements => Route::new("data/guild/achievements"),
            Self::ItemClasses => Route::new("data/item/classes"),
            Self::Talents => Route::new("data/talents"),
            Self::PetTypes => Route::new("data/pet/types"),
        };

        Ok(route)
    }
}

/// Percent-encode a caller-supplied path segment
fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
