//! Result pager

use serde::Serialize;
use std::num::NonZeroUsize;

/// Items per page when nothing is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(size) => size,
    None => unreachable!(),
};

/// One bounded group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// 1-based page number
    pub number: usize,
    /// Total pages in the sequence
    pub total: usize,
    /// Items on this page
    pub items: Vec<T>,
}

/// Split `items` into contiguous pages of `page_size`; the last may be shorter.
/// No items means no pages.
pub fn paginate<T>(items: impl IntoIterator<Item = T>, page_size: NonZeroUsize) -> Vec<Page<T>> {
    let size = page_size.get();
    let mut rest: Vec<T> = items.into_iter().collect();
    let mut groups = Vec::with_capacity(rest.len().div_ceil(size));
    while !rest.is_empty() {
        let tail = rest.split_off(size.min(rest.len()));
        groups.push(std::mem::replace(&mut rest, tail));
    }

    let total = groups.len();
    groups
        .into_iter()
        .enumerate()
        .map(|(index, items)| Page {
            number: index + 1,
            total,
            items,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_forty_seven_items() {
        let pages = paginate(1..=47, DEFAULT_PAGE_SIZE);
        let sizes: Vec<_> = pages.iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, vec![20, 20, 7]);
        assert_eq!(pages[2].items, (41..=47).collect::<Vec<_>>());
        assert!(pages.iter().all(|p| p.total == 3));
        assert_eq!(pages[0].number, 1);
    }

    #[test]
    fn test_empty_input_has_no_pages() {
        assert!(paginate(Vec::<u8>::new(), size(20)).is_empty());
    }

    #[test]
    fn test_exact_multiple() {
        let pages = paginate(0..40, size(20));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].items.len(), 20);
    }

    proptest! {
        #[test]
        fn test_pages_preserve_order(items in proptest::collection::vec(any::<u32>(), 0..200), n in 1usize..50) {
            let pages = paginate(items.clone(), size(n));
            prop_assert_eq!(pages.len(), items.len().div_ceil(n));
            for page in &pages {
                prop_assert!(!page.items.is_empty() && page.items.len() <= n);
            }
            let flat: Vec<u32> = pages.into_iter().flat_map(|p| p.items).collect();
            prop_assert_eq!(flat, items);
        }
    }
}
