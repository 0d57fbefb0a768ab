//! Flat category rows to a nested, sorted category tree.
//!
//! The store keeps one row per `(node, locale)` pair with a parent pointer on
//! child rows. Building is a two-pass affair: rows are folded into a map keyed
//! by category id, then the map is projected into sorted vectors. The final
//! sort makes the output independent of row arrival order.

use std::collections::{HashMap, HashSet};

use mediadb_storage::CategoryRow;
use serde::{Deserialize, Serialize};

use crate::model::{Category, LocalizedName, Subcategory};

/// How repeated `(text, locale)` names on the same node are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Every row contributes a name, even an exact duplicate of an earlier row.
    #[default]
    Append,
    /// A name identical to one already recorded on the same node is dropped.
    Dedup,
}

#[derive(Default)]
struct CategoryAcc {
    names: Vec<LocalizedName>,
    subcategories: HashMap<String, Vec<LocalizedName>>,
}

/// Builds category trees from flat rows. Stateless apart from its policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder {
    policy: NamePolicy,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NamePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    /// Builds the category tree for `rows`.
    ///
    /// Never fails: a child row whose parent is never defined as top-level
    /// yields a category with an empty name list holding that child.
    pub fn build(&self, rows: &[CategoryRow]) -> Vec<Category> {
        let mut acc: HashMap<String, CategoryAcc> = HashMap::new();

        for row in rows {
            let name = LocalizedName::new(&row.localized_name, &row.locale_id);
            match row.parent() {
                None => {
                    let category = acc.entry(row.category_id.clone()).or_default();
                    self.push_name(&mut category.names, name);
                }
                Some(parent) => {
                    let category = acc.entry(parent.to_string()).or_default();
                    let names = category
                        .subcategories
                        .entry(row.category_id.clone())
                        .or_default();
                    self.push_name(names, name);
                }
            }
        }

        let mut categories: Vec<Category> = acc
            .into_iter()
            .map(|(category_id, acc)| project(category_id, acc))
            .collect();
        categories.sort_by(|a, b| a.category_id.cmp(&b.category_id));
        categories
    }

    fn push_name(&self, names: &mut Vec<LocalizedName>, name: LocalizedName) {
        if self.policy == NamePolicy::Dedup && names.contains(&name) {
            return;
        }
        names.push(name);
    }
}

fn project(category_id: String, acc: CategoryAcc) -> Category {
    let mut subcategories: Vec<Subcategory> = acc
        .subcategories
        .into_iter()
        .map(|(subcategory_id, mut names)| {
            sort_names(&mut names);
            Subcategory {
                subcategory_id,
                names,
            }
        })
        .collect();
    subcategories.sort_by(|a, b| a.subcategory_id.cmp(&b.subcategory_id));

    let mut names = acc.names;
    sort_names(&mut names);

    Category {
        category_id,
        names,
        subcategories,
    }
}

// Stable, so names sharing a locale keep their arrival order.
fn sort_names(names: &mut [LocalizedName]) {
    names.sort_by(|a, b| a.locale_id.cmp(&b.locale_id));
}

/// Builds a tree with the default [`NamePolicy::Append`] policy.
pub fn build_hierarchy(rows: &[CategoryRow]) -> Vec<Category> {
    HierarchyBuilder::new().build(rows)
}

/// Union of every subcategory id across `categories`.
pub fn subcategory_ids(categories: &[Category]) -> HashSet<String> {
    categories
        .iter()
        .flat_map(|category| category.subcategories.iter())
        .map(|sub| sub.subcategory_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[(&str, &str)]) -> Vec<LocalizedName> {
        pairs
            .iter()
            .map(|(text, locale)| LocalizedName::new(*text, *locale))
            .collect()
    }

    #[test]
    fn test_empty_rows_build_empty_tree() {
        assert!(build_hierarchy(&[]).is_empty());
    }

    #[test]
    fn test_pools_example() {
        let rows = vec![
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::top_level("100", "fr_FR", "Piscines"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
        ];

        let tree = build_hierarchy(&rows);
        assert_eq!(
            tree,
            vec![Category {
                category_id: "100".into(),
                names: names(&[("Pools", "en_US"), ("Piscines", "fr_FR")]),
                subcategories: vec![Subcategory {
                    subcategory_id: "101".into(),
                    names: names(&[("Indoor Pool", "en_US")]),
                }],
            }]
        );
    }

    #[test]
    fn test_output_sorted_regardless_of_arrival_order() {
        let rows = vec![
            CategoryRow::child("300", "302", "fr_FR", "Sauna"),
            CategoryRow::top_level("300", "fr_FR", "Bien-être"),
            CategoryRow::child("100", "103", "en_US", "Rooftop Pool"),
            CategoryRow::top_level("300", "en_US", "Wellness"),
            CategoryRow::child("300", "301", "en_US", "Spa"),
            CategoryRow::child("300", "302", "en_US", "Sauna"),
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
        ];

        let tree = build_hierarchy(&rows);
        let ids: Vec<&str> = tree.iter().map(|c| c.category_id.as_str()).collect();
        assert_eq!(ids, ["100", "300"]);

        let wellness = &tree[1];
        assert_eq!(
            wellness.names,
            names(&[("Wellness", "en_US"), ("Bien-être", "fr_FR")])
        );
        let sub_ids: Vec<&str> = wellness
            .subcategories
            .iter()
            .map(|s| s.subcategory_id.as_str())
            .collect();
        assert_eq!(sub_ids, ["301", "302"]);
        assert_eq!(
            wellness.subcategories[1].names,
            names(&[("Sauna", "en_US"), ("Sauna", "fr_FR")])
        );

        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(build_hierarchy(&reversed), tree);
    }

    #[test]
    fn test_orphan_parent_is_synthesized_without_names() {
        let rows = vec![CategoryRow::child("900", "901", "en_US", "Loose End")];

        let tree = build_hierarchy(&rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category_id, "900");
        assert!(tree[0].names.is_empty());
        assert_eq!(tree[0].subcategories.len(), 1);
        assert_eq!(tree[0].subcategories[0].subcategory_id, "901");
    }

    #[test]
    fn test_parent_defined_after_child_keeps_names() {
        let rows = vec![
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
            CategoryRow::top_level("100", "en_US", "Pools"),
        ];

        let tree = build_hierarchy(&rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].names, names(&[("Pools", "en_US")]));
        assert_eq!(tree[0].subcategories.len(), 1);
    }

    #[test]
    fn test_empty_parent_string_means_top_level() {
        let rows = vec![CategoryRow::child("", "100", "en_US", "Pools")];

        let tree = build_hierarchy(&rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category_id, "100");
        assert_eq!(tree[0].names, names(&[("Pools", "en_US")]));
        assert!(tree[0].subcategories.is_empty());
    }

    #[test]
    fn test_duplicate_rows_append_by_default() {
        let rows = vec![
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
        ];

        let tree = build_hierarchy(&rows);
        assert_eq!(tree[0].names.len(), 2);
        assert_eq!(tree[0].subcategories.len(), 1);
        assert_eq!(tree[0].subcategories[0].names.len(), 2);
    }

    #[test]
    fn test_dedup_policy_drops_identical_names() {
        let rows = vec![
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::top_level("100", "en_US", "Swimming Pools"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
        ];

        let tree = HierarchyBuilder::with_policy(NamePolicy::Dedup).build(&rows);
        assert_eq!(
            tree[0].names,
            names(&[("Pools", "en_US"), ("Swimming Pools", "en_US")])
        );
        assert_eq!(tree[0].subcategories[0].names.len(), 1);
    }

    #[test]
    fn test_every_row_contributes_one_name() {
        let rows = vec![
            CategoryRow::top_level("100", "en_US", "Pools"),
            CategoryRow::top_level("200", "en_US", "Dining"),
            CategoryRow::top_level("200", "de_DE", "Essen"),
            CategoryRow::child("200", "201", "en_US", "Restaurant"),
            CategoryRow::child("200", "201", "de_DE", "Restaurant"),
            CategoryRow::child("200", "202", "en_US", "Bar"),
        ];

        let tree = build_hierarchy(&rows);
        let total: usize = tree
            .iter()
            .map(|c| c.names.len() + c.subcategories.iter().map(|s| s.names.len()).sum::<usize>())
            .sum();
        assert_eq!(total, rows.len());
    }

    #[test]
    fn test_subcategory_ids_union_across_categories() {
        let rows = vec![
            CategoryRow::child("100", "101", "en_US", "Indoor Pool"),
            CategoryRow::child("100", "102", "en_US", "Outdoor Pool"),
            CategoryRow::child("200", "201", "en_US", "Restaurant"),
            CategoryRow::top_level("300", "en_US", "Wellness"),
        ];

        let ids = subcategory_ids(&build_hierarchy(&rows));
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("101"));
        assert!(ids.contains("201"));
        assert!(!ids.contains("300"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let rows = vec![
            CategoryRow::top_level("200", "en_US", "Dining"),
            CategoryRow::child("200", "202", "en_US", "Bar"),
            CategoryRow::child("200", "201", "en_US", "Restaurant"),
            CategoryRow::top_level("100", "fr_FR", "Piscines"),
            CategoryRow::top_level("100", "en_US", "Pools"),
        ];

        let builder = HierarchyBuilder::new();
        assert_eq!(builder.build(&rows), builder.build(&rows));
    }
}
