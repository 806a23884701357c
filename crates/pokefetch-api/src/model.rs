//! Shape of a successful lookup response.
//!
//! Only the fields the card needs are modelled; serde skips everything else in
//! the (large) PokeAPI document.

use serde::{Deserialize, Serialize};

/// Labels of the three image slots, in display order
pub const SPRITE_LABELS: [&str; 3] = ["Default", "Shiny", "Back View"];

/// One creature as returned by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub name: String,
    pub id: u32,
    /// Decimetres
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    /// Null for some forms
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl LookupResult {
    /// Type labels in the order they were received
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.kind.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
}

impl Sprites {
    /// Image references paired with their slot labels (see [`SPRITE_LABELS`])
    pub fn slots(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (SPRITE_LABELS[0], self.front_default.as_deref()),
            (SPRITE_LABELS[1], self.front_shiny.as_deref()),
            (SPRITE_LABELS[2], self.back_default.as_deref()),
        ]
    }
}
