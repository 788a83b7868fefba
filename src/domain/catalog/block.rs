use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// Block names follow the registry's `namespace/slug` convention: lowercase
// alphanumerics and dashes on both sides, slug may not start with a dash.
static BLOCK_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*/[a-z0-9][a-z0-9-]*$").expect("valid regex"));

/// One installable entry of the remote directory, as returned by the search
/// endpoint. Immutable; a new search discards the previous records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Unique `namespace/slug` identifier the block registers itself under.
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Plugin slug the install endpoint is keyed by.
    pub id: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: u64,
    #[serde(default)]
    pub active_installs: u64,
    #[serde(default)]
    pub author_block_rating: f64,
    #[serde(default)]
    pub author_block_count: u64,
    #[serde(default)]
    pub author: String,
    /// Dashicon identifier or icon URL.
    #[serde(default)]
    pub icon: String,
    /// Script URLs in execution order; later assets may assume earlier ones
    /// already ran.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub humanized_updated: String,
}

impl BlockRecord {
    pub fn has_valid_name(&self) -> bool {
        is_valid_block_name(&self.name)
    }
}

pub fn is_valid_block_name(name: &str) -> bool {
    BLOCK_NAME_RE.is_match(name)
}

/// What the runtime registry hands back for a registered block. The pipeline
/// never looks inside `settings`; it only forwards the definition to the
/// insertion capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    #[serde(default)]
    pub settings: JsonValue,
}

impl BlockDefinition {
    pub fn new(name: impl Into<String>, settings: JsonValue) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }
}
