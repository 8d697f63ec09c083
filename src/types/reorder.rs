use serde::{Deserialize, Serialize};

use super::bookmark::Listing;

/// A position inside a group's bookmark list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkSlot {
    pub group_id: String,
    pub index: usize,
}

impl BookmarkSlot {
    pub fn new(group_id: impl Into<String>, index: usize) -> Self {
        Self {
            group_id: group_id.into(),
            index,
        }
    }
}

/// A completed drag gesture.
///
/// A missing destination means the drop landed outside any valid container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragResult {
    /// Move a group within the top-level listing.
    Group {
        source: usize,
        #[serde(default)]
        destination: Option<usize>,
    },
    /// Move a bookmark within a group or into another group.
    Bookmark {
        source: BookmarkSlot,
        #[serde(default)]
        destination: Option<BookmarkSlot>,
    },
}

impl DragResult {
    pub fn is_cancelled(&self) -> bool {
        match self {
            DragResult::Group { destination, .. } => destination.is_none(),
            DragResult::Bookmark { destination, .. } => destination.is_none(),
        }
    }
}

/// The order of one group and its bookmarks, by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOrder {
    pub id: String,
    pub bookmark_ids: Vec<String>,
}

/// Body sent to the remote store when a reorder is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub groups: Vec<GroupOrder>,
}

impl From<&Listing> for OrderSnapshot {
    fn from(listing: &Listing) -> Self {
        Self {
            groups: listing
                .groups
                .iter()
                .map(|g| GroupOrder {
                    id: g.id.clone(),
                    bookmark_ids: g.bookmarks.iter().map(|b| b.id.clone()).collect(),
                })
                .collect(),
        }
    }
}
