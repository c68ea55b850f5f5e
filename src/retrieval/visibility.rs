//! Hidden-item filtering

use ahash::{HashSet, HashSetExt};

use crate::error::LookupError;
use crate::retrieval::{Hit, ItemId, ItemRecord};

/// Resolves item metadata from the content repository
pub trait ItemRepository {
    /// `Ok(None)` when the item does not exist
    fn get_item(&self, id: &ItemId) -> Result<Option<ItemRecord>, LookupError>;
}

/// Decides whether a hit must be withheld from the caller
///
/// An item is hidden when it or any of its ancestors carries the hidden
/// flag. Hidden items are withheld unless the caller may view them.
pub struct HiddenItemFilter<'a, R: ?Sized> {
    repository: &'a R,
    show_hidden_items: bool,
}

impl<'a, R: ItemRepository + ?Sized> HiddenItemFilter<'a, R> {
    pub fn new(repository: &'a R, show_hidden_items: bool) -> Self {
        Self {
            repository,
            show_hidden_items,
        }
    }

    /// True if the item or one of its ancestors is flagged hidden
    ///
    /// Items that cannot be resolved are not considered hidden.
    pub fn is_hidden(&self, id: &ItemId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(*id);

        while let Some(item_id) = current {
            if !visited.insert(item_id) {
                tracing::warn!("Ancestor cycle detected at item {}", item_id);
                return false;
            }

            match self.repository.get_item(&item_id) {
                Ok(Some(item)) => {
                    if item.hidden {
                        return true;
                    }
                    current = item.parent;
                }
                Ok(None) => return false,
                Err(e) => {
                    tracing::warn!("Treating item {} as unavailable: {}", item_id, e);
                    return false;
                }
            }
        }

        false
    }

    /// Skips the repository entirely when hidden items are viewable
    pub fn is_hidden_and_unauthorized(&self, id: &ItemId) -> bool {
        !self.show_hidden_items && self.is_hidden(id)
    }

    pub fn excludes(&self, hit: &Hit) -> bool {
        self.is_hidden_and_unauthorized(&hit.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::{HashMap, HashMapExt};
    use std::cell::Cell;

    #[derive(Default)]
    struct Tree {
        items: HashMap<ItemId, ItemRecord>,
        denied: Option<ItemId>,
        lookups: Cell<usize>,
    }

    impl Tree {
        fn insert(&mut self, item: ItemRecord) {
            self.items.insert(item.id, item);
        }
    }

    impl ItemRepository for Tree {
        fn get_item(&self, id: &ItemId) -> Result<Option<ItemRecord>, LookupError> {
            self.lookups.set(self.lookups.get() + 1);
            if self.denied == Some(*id) {
                return Err(LookupError::AccessDenied(*id));
            }
            Ok(self.items.get(id).cloned())
        }
    }

    fn chain() -> (Tree, ItemId, ItemId, ItemId) {
        let root = ItemId::new_v4();
        let folder = ItemId::new_v4();
        let page = ItemId::new_v4();

        let mut tree = Tree {
            items: HashMap::new(),
            ..Default::default()
        };
        tree.insert(ItemRecord::new(root));
        tree.insert(ItemRecord::new(folder).with_parent(root));
        tree.insert(ItemRecord::new(page).with_parent(folder));
        (tree, root, folder, page)
    }

    #[test]
    fn test_hidden_ancestor_hides_descendant() {
        let (mut tree, root, folder, page) = chain();
        tree.insert(ItemRecord::new(folder).with_parent(root).hidden());

        let filter = HiddenItemFilter::new(&tree, false);
        assert!(filter.is_hidden(&page));
        assert!(filter.is_hidden(&folder));
        assert!(!filter.is_hidden(&root));
    }

    #[test]
    fn test_visible_chain() {
        let (tree, _, _, page) = chain();
        let filter = HiddenItemFilter::new(&tree, false);
        assert!(!filter.is_hidden_and_unauthorized(&page));
    }

    #[test]
    fn test_show_hidden_items_skips_lookup() {
        let (mut tree, root, folder, page) = chain();
        tree.insert(ItemRecord::new(folder).with_parent(root).hidden());

        let filter = HiddenItemFilter::new(&tree, true);
        assert!(!filter.is_hidden_and_unauthorized(&page));
        assert_eq!(tree.lookups.get(), 0);
    }

    #[test]
    fn test_missing_or_denied_item_is_not_hidden() {
        let (mut tree, _, folder, page) = chain();
        tree.denied = Some(folder);

        let filter = HiddenItemFilter::new(&tree, false);
        assert!(!filter.is_hidden(&page));
        assert!(!filter.is_hidden(&ItemId::new_v4()));
    }

    #[test]
    fn test_cycle_terminates() {
        let a = ItemId::new_v4();
        let b = ItemId::new_v4();
        let mut tree = Tree::default();
        tree.insert(ItemRecord::new(a).with_parent(b));
        tree.insert(ItemRecord::new(b).with_parent(a));

        let filter = HiddenItemFilter::new(&tree, false);
        assert!(!filter.is_hidden(&a));
    }
}
