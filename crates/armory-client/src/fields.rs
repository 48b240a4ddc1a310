//! Optional response field whitelists

use crate::error::{ApiError, Result};

/// Set of optional response sections a resource accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWhitelist {
    name: &'static str,
    fields: &'static [&'static str],
}

/// Optional sections of the character resource.
pub const CHARACTER_FIELDS: FieldWhitelist = FieldWhitelist {
    name: "character",
    fields: &[
        "achievements",
        "appearance",
        "feed",
        "guild",
        "hunterPets",
        "items",
        "mounts",
        "pets",
        "petSlots",
        "professions",
        "progression",
        "pvp",
        "quests",
        "reputation",
        "stats",
        "talents",
        "titles",
    ],
};

/// Optional sections of the guild resource.
pub const GUILD_FIELDS: FieldWhitelist = FieldWhitelist {
    name: "guild",
    fields: &["members", "achievements", "news", "challenge"],
};

impl FieldWhitelist {
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Look up a whitelist by resource kind (`character` or `guild`)
    pub fn for_resource(name: &str) -> Option<Self> {
        [CHARACTER_FIELDS, GUILD_FIELDS]
            .into_iter()
            .find(|whitelist| whitelist.name == name)
    }

    /// Check `requested` against this whitelist.
    ///
    /// Every unknown field is reported, in request order.
    pub fn validate<S: AsRef<str>>(&self, requested: &[S]) -> Result<()> {
        let mut invalid = Vec::new();
        for field in requested {
            let field: &str = field.as_ref();
            if !self.contains(field) {
                invalid.push(field.to_string());
            }
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            tracing::debug!(resource = self.name, ?invalid, "rejected optional fields");
            Err(ApiError::InvalidFields(invalid))
        }
    }
}

/// Check `requested` against `whitelist`.
pub fn validate<S: AsRef<str>>(whitelist: &FieldWhitelist, requested: &[S]) -> Result<()> {
    whitelist.validate(requested)
}
