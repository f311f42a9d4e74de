//! Flattening of an annotation set into a processing sequence

use crate::annotations::Item;

/// One unit of work: a search of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchOrderEntry {
    /// Index into the set's items
    pub item: usize,
    /// Index into the item's searches
    pub search: usize,
}

/// Enumerate every search of every item, items first, in array order.
///
/// Earlier entries are wrapped first and so claim their text before later
/// entries run against the mutated HTML.
pub fn build_search_order(items: &[Item]) -> Vec<SearchOrderEntry> {
    items
        .iter()
        .enumerate()
        .flat_map(|(item, it)| {
            (0..it.searches.len()).map(move |search| SearchOrderEntry { item, search })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Search;

    fn item(id: u64, searches: &[&str]) -> Item {
        Item {
            id,
            title: None,
            searches: searches.iter().map(|s| Search::literal(s)).collect(),
            annotations: vec![],
        }
    }

    #[test]
    fn test_item_then_search_order() {
        let items = vec![item(10, &["a", "b"]), item(20, &[]), item(30, &["c"])];
        let order = build_search_order(&items);

        assert_eq!(
            order,
            vec![
                SearchOrderEntry { item: 0, search: 0 },
                SearchOrderEntry { item: 0, search: 1 },
                SearchOrderEntry { item: 2, search: 0 },
            ]
        );
    }

    #[test]
    fn test_order_is_stable_across_calls() {
        let items = vec![item(1, &["zeta", "alpha"]), item(2, &["mid"])];
        assert_eq!(build_search_order(&items), build_search_order(&items));
    }

    #[test]
    fn test_empty_set() {
        assert!(build_search_order(&[]).is_empty());
    }
}
