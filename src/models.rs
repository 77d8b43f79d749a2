use serde::{Deserialize, Serialize};

/// `{ name, url }` pair the catalog uses for every cross reference.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Body of `GET /pokemon?offset=..&limit=..`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ListResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Minimal listing record shown in the paginated list.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub image: Option<String>,
}

/// One fetched page. `listed` counts the entries the list call returned,
/// which can exceed `items.len()` when failed entries were skipped.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Summary>,
    pub listed: usize,
}

impl Page {
    /// A page where every listed entry loaded.
    pub fn complete(items: Vec<Summary>) -> Self {
        let listed = items.len();
        Self { items, listed }
    }
}

/// Full record returned by `GET /pokemon/{id or name}`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Detail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub species: NamedResource,
}

impl Detail {
    /// Official artwork when present, otherwise the default front sprite.
    pub fn artwork(&self) -> Option<&str> {
        self.sprites
            .other
            .official_artwork
            .front_default
            .as_deref()
            .or(self.sprites.front_default.as_deref())
    }

    /// Listing record derived from this detail, pointing back at `base_url`.
    pub fn to_summary(&self, base_url: &str) -> Summary {
        Summary {
            id: self.id,
            name: self.name.clone(),
            url: format!("{}/pokemon/{}", base_url, self.id),
            image: self.artwork().map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
    #[serde(default)]
    pub back_shiny: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: FrontSprite,
    #[serde(default)]
    pub dream_world: FrontSprite,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct FrontSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(default, rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct AbilitySlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Stat {
    #[serde(default)]
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    #[serde(default)]
    pub stat: NamedResource,
}
