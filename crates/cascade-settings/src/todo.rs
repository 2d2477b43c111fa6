//! Todo lists
//!
//! A todo list is owned by the member who created it. The owner may delegate
//! editing to other members; only the owner may delete the list or change
//! who its editors are.

use crate::resource::{OwnedResource, ResourceCollection};
use cascade_core::{CascadeError, MemberId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry on a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Item text
    pub text: String,
    /// Whether the item is checked off
    #[serde(default)]
    pub done: bool,
}

/// A member's todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    owner_id: MemberId,
    items: Vec<TodoItem>,
    #[serde(default)]
    editors: BTreeSet<MemberId>,
}

impl TodoList {
    /// Empty list owned by `owner_id`.
    pub fn new(owner_id: MemberId) -> Self {
        Self {
            owner_id,
            items: Vec::new(),
            editors: BTreeSet::new(),
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Delegated editors.
    pub fn editors(&self) -> &BTreeSet<MemberId> {
        &self.editors
    }

    /// Append an item, returning its 1-based position.
    pub fn add_item(&mut self, text: impl Into<String>) -> Result<usize> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CascadeError::invalid_argument("todo item text is empty"));
        }
        self.items.push(TodoItem { text, done: false });
        Ok(self.items.len())
    }

    /// Remove the item at a 1-based position.
    pub fn remove_item(&mut self, position: usize) -> Result<TodoItem> {
        let index = self.index(position)?;
        Ok(self.items.remove(index))
    }

    /// Flip the done flag of the item at a 1-based position, returning the new state.
    pub fn toggle_item(&mut self, position: usize) -> Result<bool> {
        let index = self.index(position)?;
        let item = &mut self.items[index];
        item.done = !item.done;
        Ok(item.done)
    }

    /// Let another member edit. Returns whether the editor set changed.
    pub fn add_editor(&mut self, member: MemberId) -> bool {
        member != self.owner_id && self.editors.insert(member)
    }

    /// Revoke a delegated editor. Returns whether the editor set changed.
    pub fn remove_editor(&mut self, member: MemberId) -> bool {
        self.editors.remove(&member)
    }

    fn index(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.items.len() {
            return Err(CascadeError::invalid_argument(format!(
                "item {position} does not exist, the list has {} items",
                self.items.len()
            )));
        }
        Ok(position - 1)
    }
}

impl OwnedResource for TodoList {
    fn owner_id(&self) -> MemberId {
        self.owner_id
    }

    fn can_edit(&self, member: MemberId) -> bool {
        member == self.owner_id || self.editors.contains(&member)
    }
}

/// Utility data for one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsefulSettings {
    todo_lists: BTreeMap<String, TodoList>,
}

impl UsefulSettings {
    /// Create a list. Names are unique per guild.
    pub fn create(&mut self, name: &str, owner_id: MemberId) -> Result<&mut TodoList> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(CascadeError::invalid_argument(format!(
                "todo list name `{name}` must be a single non-empty word"
            )));
        }
        if self.todo_lists.contains_key(name) {
            return Err(CascadeError::invalid_argument(format!(
                "todo list `{name}` already exists"
            )));
        }
        Ok(self
            .todo_lists
            .entry(name.to_string())
            .or_insert_with(|| TodoList::new(owner_id)))
    }

    /// Look up a list.
    pub fn get(&self, name: &str) -> Option<&TodoList> {
        self.todo_lists.get(name)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TodoList> {
        self.todo_lists.get_mut(name)
    }

    /// Delete a list.
    pub fn delete(&mut self, name: &str) -> Option<TodoList> {
        self.todo_lists.remove(name)
    }

    /// List names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.todo_lists.keys().map(String::as_str)
    }
}

impl ResourceCollection for UsefulSettings {
    type Resource = TodoList;

    const KIND: &'static str = "todo list";

    fn resource(&self, name: &str, _viewer: MemberId) -> Option<&TodoList> {
        self.get(name)
    }

    fn resource_mut(&mut self, name: &str, _viewer: MemberId) -> Option<&mut TodoList> {
        self.get_mut(name)
    }

    fn stored(&self, name: &str) -> Option<&TodoList> {
        self.get(name)
    }

    fn remove(&mut self, name: &str) -> Option<TodoList> {
        self.delete(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Access;
    use assert_matches::assert_matches;

    const OWNER: MemberId = MemberId::new(10);
    const OTHER: MemberId = MemberId::new(20);

    #[test]
    fn test_items_are_one_based() {
        let mut list = TodoList::new(OWNER);
        assert_eq!(list.add_item("milk").unwrap(), 1);
        assert_eq!(list.add_item("eggs").unwrap(), 2);

        assert!(list.toggle_item(2).unwrap());
        assert!(list.items()[1].done);
        assert_matches!(list.remove_item(0), Err(CascadeError::InvalidArgument { .. }));
        assert_matches!(list.remove_item(3), Err(CascadeError::InvalidArgument { .. }));

        let removed = list.remove_item(1).unwrap();
        assert_eq!(removed.text, "milk");
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_editors_can_edit_but_not_own() {
        let mut list = TodoList::new(OWNER);
        assert!(!list.can_edit(OTHER));
        assert!(list.add_editor(OTHER));
        assert!(!list.add_editor(OWNER));
        assert!(Access::Edit.permits(&list, OTHER));
        assert!(!Access::Owner.permits(&list, OTHER));

        assert!(list.remove_editor(OTHER));
        assert!(!list.can_edit(OTHER));
    }

    #[test]
    fn test_list_names_unique() {
        let mut useful = UsefulSettings::default();
        useful.create("groceries", OWNER).unwrap();
        assert_matches!(
            useful.create("groceries", OTHER),
            Err(CascadeError::InvalidArgument { .. })
        );
        assert_eq!(useful.get("groceries").unwrap().owner_id(), OWNER);
        assert_eq!(useful.names().collect::<Vec<_>>(), vec!["groceries"]);
    }
}
