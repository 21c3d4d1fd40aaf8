use serde::{Deserialize, Serialize};

/// Evolution stage, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "In-Training")]
    InTraining,
    Rookie,
    Champion,
    Ultimate,
    Mega,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::InTraining,
        Stage::Rookie,
        Stage::Champion,
        Stage::Ultimate,
        Stage::Mega,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "In-Training" => Some(Self::InTraining),
            "Rookie" => Some(Self::Rookie),
            "Champion" => Some(Self::Champion),
            "Ultimate" => Some(Self::Ultimate),
            "Mega" => Some(Self::Mega),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InTraining => "In-Training",
            Self::Rookie => "Rookie",
            Self::Champion => "Champion",
            Self::Ultimate => "Ultimate",
            Self::Mega => "Mega",
        }
    }

    /// Position in the fixed stage enumeration.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub spirit: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub stage: Stage,
    pub image: String,
    pub type_tags: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

impl Entity {
    /// Identifier used when a record carries no explicit id: the display name
    /// lowercased with all whitespace removed.
    pub fn derive_id(name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

/// Directed evolution `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

impl Evolution {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            requirements: None,
        }
    }

    pub fn with_requirements(mut self, requirements: &str) -> Self {
        self.requirements = Some(requirements.to_string());
        self
    }
}

/// Entity as it appears in a data file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub stage: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "type")]
    pub type_tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exclusive: Option<String>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

/// Top-level data file: entities plus evolutions.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRecord {
    #[serde(alias = "digimon")]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub evolutions: Vec<Evolution>,
}
