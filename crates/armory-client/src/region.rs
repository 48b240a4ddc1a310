//! Region catalog for the community web API.
//!
//! Each region is served from its own host and supports a fixed, ordered
//! list of locales. The first locale of a region is its default.
//!
//! | Region | Aliases                | Host                | Locales                                  |
//! |--------|------------------------|---------------------|------------------------------------------|
//! | US     | `US`, `United States`  | `us.api.battle.net` | en_US, es_MX, pt_BR                      |
//! | EU     | `EU`, `Europe`         | `eu.battle.net`     | en_GB, es_ES, fr_FR, ru_RU, de_DE, ...   |
//! | KR     | `KR`, `Korea`          | `kr.battle.net`     | ko_KR                                    |
//! | TW     | `TW`, `Taiwan`         | `tw.battle.net`     | zh_TW                                    |
//! | CN     | `ZH`, `CN`, `China`    | `www.battle.com.cn` | zh_CN                                    |
//!
//! Region names are matched case-sensitively.

use std::fmt;

use crate::error::{ApiError, Result};

/// Game service region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// United States
    US,
    /// Europe
    EU,
    /// Korea
    KR,
    /// Taiwan
    TW,
    /// China (served from a `.com.cn` domain)
    CN,
}

/// Static catalog row describing one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntry {
    pub region: Region,
    /// Every accepted spelling of the region, case-sensitive
    pub aliases: &'static [&'static str],
    pub host: &'static str,
    /// Supported locales; the first one is the default
    pub locales: &'static [&'static str],
}

static CATALOG: [RegionEntry; 5] = [
    RegionEntry {
        region: Region::US,
        aliases: &["US", "United States"],
        host: "us.api.battle.net",
        locales: &["en_US", "es_MX", "pt_BR"],
    },
    RegionEntry {
        region: Region::EU,
        aliases: &["EU", "Europe"],
        host: "eu.battle.net",
        locales: &[
            "en_GB", "es_ES", "fr_FR", "ru_RU", "de_DE", "pt_PT", "it_IT",
        ],
    },
    RegionEntry {
        region: Region::KR,
        aliases: &["KR", "Korea"],
        host: "kr.battle.net",
        locales: &["ko_KR"],
    },
    RegionEntry {
        region: Region::TW,
        aliases: &["TW", "Taiwan"],
        host: "tw.battle.net",
        locales: &["zh_TW"],
    },
    RegionEntry {
        region: Region::CN,
        aliases: &["ZH", "CN", "China"],
        host: "www.battle.com.cn",
        locales: &["zh_CN"],
    },
];

/// A region/locale pair that has been checked against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub region: Region,
    pub host: &'static str,
    pub locale: &'static str,
}

impl Region {
    /// Get all available regions
    pub fn all() -> &'static [Region] {
        &[Region::US, Region::EU, Region::KR, Region::TW, Region::CN]
    }

    /// Catalog entry for this region
    pub fn entry(&self) -> &'static RegionEntry {
        // CATALOG is declared in the same order as the enum
        &CATALOG[*self as usize]
    }

    /// Canonical short code (`US`, `EU`, `KR`, `TW`, `CN`)
    pub fn code(&self) -> &'static str {
        match self {
            Self::US => "US",
            Self::EU => "EU",
            Self::KR => "KR",
            Self::TW => "TW",
            Self::CN => "CN",
        }
    }

    pub fn host(&self) -> &'static str {
        self.entry().host
    }

    pub fn locales(&self) -> &'static [&'static str] {
        self.entry().locales
    }

    pub fn default_locale(&self) -> &'static str {
        self.entry().locales[0]
    }

    /// Look up a region by code or full name.
    pub fn parse(s: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|entry| entry.aliases.contains(&s))
            .map(|entry| entry.region)
    }

    /// Validate `locale` for this region.
    ///
    /// An empty locale selects the region default.
    pub fn locale(&self, locale: &str) -> Result<&'static str> {
        if locale.is_empty() {
            return Ok(self.default_locale());
        }

        self.locales()
            .iter()
            .find(|valid| **valid == locale)
            .copied()
            .ok_or_else(|| ApiError::invalid_locale(locale, self.code()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Region {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| ApiError::InvalidRegion(s.to_string()))
    }
}

/// Resolve a region selector and optional locale into a host and locale.
pub fn resolve(region: &str, locale: &str) -> Result<ResolvedRegion> {
    let parsed = Region::parse(region).ok_or_else(|| ApiError::InvalidRegion(region.to_string()))?;
    let locale = parsed
        .locale(locale)
        .map_err(|_| ApiError::invalid_locale(locale, region))?;

    Ok(ResolvedRegion {
        region: parsed,
        host: parsed.host(),
        locale,
    })
}
