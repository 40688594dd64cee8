//! Per-view styling held only while the view is on screen.
//!
//! A view calls `StyleRegistry::enter` when it is entered and keeps the
//! returned `StyleGuard` for as long as it is displayed. Dropping the guard
//! removes the sheet, so nothing a view installs outlives it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Green,
    Blue,
    Yellow,
    Magenta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSheet {
    pub view: &'static str,
    pub accent: Accent,
    /// Fewer borders, for wide tables.
    pub compact: bool,
}

#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    sheets: Rc<RefCell<Vec<(u64, StyleSheet)>>>,
    next_id: Rc<Cell<u64>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the sheet is removed as soon as the guard is dropped"]
    pub fn enter(&self, sheet: StyleSheet) -> StyleGuard {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.sheets.borrow_mut().push((id, sheet));
        StyleGuard {
            sheets: Rc::clone(&self.sheets),
            id,
        }
    }

    /// The most recently entered sheet still in scope.
    pub fn active(&self) -> Option<StyleSheet> {
        self.sheets.borrow().last().map(|(_, sheet)| *sheet)
    }

    pub fn len(&self) -> usize {
        self.sheets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.borrow().is_empty()
    }
}

pub struct StyleGuard {
    sheets: Rc<RefCell<Vec<(u64, StyleSheet)>>>,
    id: u64,
}

impl Drop for StyleGuard {
    fn drop(&mut self) {
        self.sheets.borrow_mut().retain(|(id, _)| *id != self.id);
    }
}
