//! Saved list records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two persisted lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Wishlist,
    Collection,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Wishlist, ListKind::Collection];

    /// Storage key of the list
    pub fn key(&self) -> &'static str {
        match self {
            ListKind::Wishlist => "wishlist",
            ListKind::Collection => "collection",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wishlist" => Ok(ListKind::Wishlist),
            "collection" => Ok(ListKind::Collection),
            other => Err(format!("unknown list '{}', expected wishlist or collection", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    pub url: String,
    pub image: String,
}

impl ListItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            image: image.into(),
        }
    }
}
