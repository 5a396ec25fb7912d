use serde::{Deserialize, Serialize};

/// One entry of the list endpoint: a name and the URL of its detail record.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawListing {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl RawListing {
    /// Numeric identity carried by the trailing path segment of `url`
    /// (`.../pokemon/25/` -> `25`).
    pub fn identity(&self) -> Option<u32> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|seg| seg.parse::<u32>().ok())
            .filter(|id| *id > 0)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ListingPage {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<RawListing>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct StatEntry {
    #[serde(default)]
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedRef,
}

/// Full detail record as served by the catalog.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RawDetail {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
}

impl RawDetail {
    pub fn official_artwork(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
    }

    pub fn default_sprite(&self) -> Option<&str> {
        self.sprites.front_default.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpecialAttack,
        StatKind::SpecialDefense,
        StatKind::Speed,
    ];

    /// Map the catalog's stat identifier onto a kind.
    pub fn from_wire(name: &str) -> Option<StatKind> {
        match name {
            "hp" => Some(StatKind::Hp),
            "attack" => Some(StatKind::Attack),
            "defense" => Some(StatKind::Defense),
            "special-attack" => Some(StatKind::SpecialAttack),
            "special-defense" => Some(StatKind::SpecialDefense),
            "speed" => Some(StatKind::Speed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Attack => "ATK",
            StatKind::Defense => "DEF",
            StatKind::SpecialAttack => "SpA",
            StatKind::SpecialDefense => "SpD",
            StatKind::Speed => "SPD",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpecialAttack => self.special_attack,
            StatKind::SpecialDefense => self.special_defense,
            StatKind::Speed => self.speed,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: u32) {
        let slot = match kind {
            StatKind::Hp => &mut self.hp,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::SpecialAttack => &mut self.special_attack,
            StatKind::SpecialDefense => &mut self.special_defense,
            StatKind::Speed => &mut self.speed,
        };
        *slot = value;
    }

    pub fn total(&self) -> u32 {
        StatKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

/// UI-facing record produced by [`crate::normalize::normalize`].
///
/// `height` and `weight` stay in catalog units (tenths of a metre / kilogram).
/// `image` is `None` when neither artwork nor sprite is available; the
/// presentation layer substitutes its own placeholder.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DisplayRecord {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub types: Vec<String>,
    pub stats: StatBlock,
    pub height: u32,
    pub weight: u32,
}
