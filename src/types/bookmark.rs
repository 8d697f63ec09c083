use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A saved bookmark. Owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// A named, ordered collection of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bookmarks: Vec<Bookmark>,
}

/// The full ordered set of groups for one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: Vec<Group>,
}

/// Fields the user fills in when adding a bookmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An entry for a group picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOption {
    pub id: String,
    pub name: String,
}

impl Listing {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_index(&self, group_id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.group_index(group_id).is_some()
    }

    /// Total number of bookmarks across all groups.
    pub fn bookmark_count(&self) -> usize {
        self.groups.iter().map(|g| g.bookmarks.len()).sum()
    }

    /// Locates a bookmark, returning its owning group ID and index within that group.
    pub fn find_bookmark(&self, bookmark_id: &str) -> Option<(&str, usize)> {
        self.groups.iter().find_map(|g| {
            g.bookmarks
                .iter()
                .position(|b| b.id == bookmark_id)
                .map(|idx| (g.id.as_str(), idx))
        })
    }

    /// Group ID/name pairs in display order.
    pub fn group_options(&self) -> Vec<GroupOption> {
        self.groups
            .iter()
            .map(|g| GroupOption {
                id: g.id.clone(),
                name: g.name.clone(),
            })
            .collect()
    }

    /// Checks that group IDs and bookmark IDs are each unique.
    ///
    /// Returns the first duplicated ID on failure.
    pub fn validate_ids(&self) -> Result<(), String> {
        let mut group_ids = HashSet::new();
        let mut bookmark_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(format!("duplicate group id {}", group.id));
            }
            for bookmark in &group.bookmarks {
                if !bookmark_ids.insert(bookmark.id.as_str()) {
                    return Err(format!("duplicate bookmark id {}", bookmark.id));
                }
            }
        }
        Ok(())
    }
}

/// Treats an explicit `null` list the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
