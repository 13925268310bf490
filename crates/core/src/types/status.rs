//! Category and status enums for campaigns.

use serde::{Deserialize, Serialize};

/// Campaign category.
///
/// A closed enumeration; the wire format carries the capitalized variant
/// name (`"Tech"`), the database stores the lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tech,
    Design,
    Community,
}

/// Error parsing a [`Category`] from its stored form.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid category: {0}")]
pub struct CategoryParseError(String);

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tech => write!(f, "tech"),
            Self::Design => write!(f, "design"),
            Self::Community => write!(f, "community"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tech" => Ok(Self::Tech),
            "design" => Ok(Self::Design),
            "community" => Ok(Self::Community),
            _ => Err(CategoryParseError(s.to_owned())),
        }
    }
}

/// Campaign lifecycle status.
///
/// Governs whether funding is accepted: only `active` campaigns may be
/// funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// Error parsing a [`ProjectStatus`] from its stored form.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid project status: {0}")]
pub struct StatusParseError(String);

impl ProjectStatus {
    /// Whether contributions are accepted in this status.
    #[must_use]
    pub const fn accepts_funding(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}
