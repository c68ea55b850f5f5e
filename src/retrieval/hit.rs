//! Search hits and the item records they point at

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identity of a content item, independent of language and version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identity
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.hyphenated().to_string().to_uppercase())
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    /// Accepts plain, hyphenated and braced GUIDs
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One raw candidate produced by a query, before deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Identity of the underlying item
    pub item_id: ItemId,

    /// Language tag of this item version (e.g. "en", "da-DK")
    pub language: String,

    /// Version number within the language
    pub version: u32,

    /// Indexed content snippet
    #[serde(default)]
    pub content: String,

    /// Raw item name
    #[serde(default)]
    pub name: Option<String>,

    /// Display name, preferred over the raw name for titles
    #[serde(default)]
    pub display_name: Option<String>,

    /// Icon stored with the indexed document
    #[serde(default)]
    pub icon: Option<String>,

    /// Location path of the item (e.g. "/content/home/news")
    #[serde(default)]
    pub path: String,

    /// Identities of the item and its ancestors, used for root scoping
    #[serde(default)]
    pub ancestors: Vec<ItemId>,

    /// Originating URI of the indexed document
    #[serde(default)]
    pub uri: Option<String>,
}

impl Hit {
    /// Create a hit with only identity, language and version set
    pub fn new(item_id: ItemId, language: impl Into<String>, version: u32) -> Self {
        Self {
            item_id,
            language: language.into(),
            version,
            content: String::new(),
            name: None,
            display_name: None,
            icon: None,
            path: String::new(),
            ancestors: Vec::new(),
            uri: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_ancestors(mut self, ancestors: Vec<ItemId>) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Title to show for this hit: display name, then raw name
    pub fn title(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.name.as_deref())
    }

    /// True if `root` is this item or one of its ancestors
    pub fn is_under(&self, root: &ItemId) -> bool {
        self.item_id == *root || self.ancestors.contains(root)
    }
}

/// Item metadata resolved from the content repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,

    #[serde(default)]
    pub parent: Option<ItemId>,

    /// Item is flagged hidden in the content tree
    #[serde(default)]
    pub hidden: bool,

    /// Icon configured on the item itself
    #[serde(default)]
    pub icon: Option<String>,
}

impl ItemRecord {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            parent: None,
            hidden: false,
            icon: None,
        }
    }

    pub fn with_parent(mut self, parent: ItemId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
