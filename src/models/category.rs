//! Category groups and the category-to-group index
//!
//! The index answers one question for the selector: which group does a
//! category belong to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::CategoryId;

/// A category as returned inside a YNAB category group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A category group with its categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Mapping from category id to the name of its group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroupIndex(BTreeMap<CategoryId, String>);

impl CategoryGroupIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from category groups
    pub fn from_groups(groups: &[CategoryGroup]) -> Self {
        let mut index = BTreeMap::new();
        for group in groups {
            for category in &group.categories {
                index.insert(category.id.clone(), group.name.clone());
            }
        }
        Self(index)
    }

    /// Record that a category belongs to a group
    pub fn insert(&mut self, category_id: CategoryId, group_name: impl Into<String>) {
        self.0.insert(category_id, group_name.into());
    }

    /// Name of the group a category belongs to
    pub fn group_name(&self, category_id: &CategoryId) -> Option<&str> {
        self.0.get(category_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_groups() {
        let groups = vec![
            CategoryGroup {
                id: "g1".into(),
                name: "Shared".into(),
                categories: vec![
                    Category {
                        id: "groceries".into(),
                        name: "Groceries".into(),
                    },
                    Category {
                        id: "dining".into(),
                        name: "Restaurants".into(),
                    },
                ],
            },
            CategoryGroup {
                id: "g2".into(),
                name: "Personal".into(),
                categories: vec![Category {
                    id: "hobby".into(),
                    name: "Hobbies".into(),
                }],
            },
        ];

        let index = CategoryGroupIndex::from_groups(&groups);
        assert_eq!(index.len(), 3);
        assert_eq!(index.group_name(&"groceries".into()), Some("Shared"));
        assert_eq!(index.group_name(&"hobby".into()), Some("Personal"));
        assert_eq!(index.group_name(&"missing".into()), None);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let mut index = CategoryGroupIndex::new();
        index.insert("c1".into(), "Shared");
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"c1":"Shared"}"#);

        let back: CategoryGroupIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, index);
    }
}
