//! Row types shared by every backing store.

use serde::{Deserialize, Serialize};

/// One stored edge of the category taxonomy, in one locale.
///
/// A row with no parent describes a top-level category. A row with a parent
/// describes a subcategory filed under `parent_category_id`. The same
/// `category_id` appears on several rows when it has several translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<String>,
    pub category_id: String,
    pub locale_id: String,
    pub localized_name: String,
}

impl CategoryRow {
    /// Creates a row describing a top-level category.
    pub fn top_level(
        category_id: impl Into<String>,
        locale_id: impl Into<String>,
        localized_name: impl Into<String>,
    ) -> Self {
        Self {
            parent_category_id: None,
            category_id: category_id.into(),
            locale_id: locale_id.into(),
            localized_name: localized_name.into(),
        }
    }

    /// Creates a row describing a subcategory of `parent_category_id`.
    pub fn child(
        parent_category_id: impl Into<String>,
        category_id: impl Into<String>,
        locale_id: impl Into<String>,
        localized_name: impl Into<String>,
    ) -> Self {
        Self {
            parent_category_id: Some(parent_category_id.into()),
            category_id: category_id.into(),
            locale_id: locale_id.into(),
            localized_name: localized_name.into(),
        }
    }

    /// Returns the parent id, treating an empty string the same as no parent.
    pub fn parent(&self) -> Option<&str> {
        self.parent_category_id
            .as_deref()
            .filter(|parent| !parent.is_empty())
    }

    /// Returns `true` if this row describes a top-level category.
    pub fn is_top_level(&self) -> bool {
        self.parent().is_none()
    }
}
