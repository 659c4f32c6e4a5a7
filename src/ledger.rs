// 🛒 Shopping List - item name → quantity
//
// Purely in-memory. Quantities are trusted: nothing here rejects zero or
// negative values, so a negative add decrements.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Quantity used by `add_one` / `remove_one`
pub const DEFAULT_QUANTITY: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    items: HashMap<String, i64>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `name`, inserting the item if it is new
    pub fn add_item(&mut self, name: impl Into<String>, quantity: i64) {
        let stored = self.items.entry(name.into()).or_insert(0);
        *stored = stored.saturating_add(quantity);
    }

    pub fn add_one(&mut self, name: impl Into<String>) {
        self.add_item(name, DEFAULT_QUANTITY);
    }

    /// Take `quantity` of `name` off the list.
    ///
    /// When more than `quantity` is stored the item is decremented,
    /// otherwise it is dropped entirely. Unknown items are ignored.
    /// Returns what is left, or `None` once the item is gone.
    pub fn remove_item(&mut self, name: &str, quantity: i64) -> Option<i64> {
        let stored = self.items.get_mut(name)?;

        if *stored > quantity {
            *stored = stored.saturating_sub(quantity);
            Some(*stored)
        } else {
            self.items.remove(name);
            debug!(item = name, "item removed from list");
            None
        }
    }

    pub fn remove_one(&mut self, name: &str) -> Option<i64> {
        self.remove_item(name, DEFAULT_QUANTITY)
    }

    /// Drop `name` whatever its quantity (the older, quantity-less removal).
    /// Returns the quantity that was stored.
    pub fn remove_all(&mut self, name: &str) -> Option<i64> {
        self.items.remove(name)
    }

    pub fn get_items(&self) -> &HashMap<String, i64> {
        &self.items
    }

    pub fn quantity(&self, name: &str) -> Option<i64> {
        self.items.get(name).copied()
    }

    /// Items ordered by name
    pub fn sorted_items(&self) -> Vec<(&str, i64)> {
        let mut items: Vec<(&str, i64)> = self
            .items
            .iter()
            .map(|(name, qty)| (name.as_str(), *qty))
            .collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
