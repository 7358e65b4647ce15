//! Content classification enums.

use serde::{Deserialize, Serialize};

/// The kind of a content item.
///
/// Maps to the remote API's `type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Magazine,
    Article,
    Digest,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Magazine => write!(f, "magazine"),
            Self::Article => write!(f, "article"),
            Self::Digest => write!(f, "digest"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magazine" => Ok(Self::Magazine),
            "article" => Ok(Self::Article),
            "digest" => Ok(Self::Digest),
            _ => Err(format!("invalid content kind: {s}")),
        }
    }
}

/// Access tier for a content item.
///
/// Free items are readable by anyone; pro items require a subscription
/// checked by the remote API, not by this gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    #[default]
    Free,
    Pro,
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

impl std::str::FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            _ => Err(format!("invalid access tier: {s}")),
        }
    }
}
