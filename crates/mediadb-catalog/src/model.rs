//! Category tree types produced by the hierarchy builder.

use serde::{Deserialize, Serialize};

/// A display name in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    pub text: String,
    pub locale_id: String,
}

impl LocalizedName {
    pub fn new(text: impl Into<String>, locale_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale_id: locale_id.into(),
        }
    }
}

/// Second-level taxonomy node. Subcategories do not nest further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub subcategory_id: String,
    /// Sorted ascending by `locale_id`.
    pub names: Vec<LocalizedName>,
}

/// Top-level taxonomy node with its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    /// Sorted ascending by `locale_id`. Empty when the category is only known
    /// as the parent of some subcategory.
    pub names: Vec<LocalizedName>,
    /// Sorted ascending by `subcategory_id`.
    pub subcategories: Vec<Subcategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_json_shape() {
        let category = Category {
            category_id: "100".into(),
            names: vec![LocalizedName::new("Pools", "en_US")],
            subcategories: vec![Subcategory {
                subcategory_id: "101".into(),
                names: vec![LocalizedName::new("Indoor Pool", "en_US")],
            }],
        };

        let json = serde_json::to_value(&category).expect("serialize");
        assert_eq!(json["categoryId"], "100");
        assert_eq!(json["names"][0]["localeId"], "en_US");
        assert_eq!(json["subcategories"][0]["subcategoryId"], "101");
        assert_eq!(json["subcategories"][0]["names"][0]["text"], "Indoor Pool");
    }
}
