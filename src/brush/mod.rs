//! Brushes: ordered item-template collections and their selection state.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod selection;
pub mod spacing;
pub mod template;

pub use selection::{ItemSelector, Slot};
pub use spacing::{Axis, SpacingConfig, SpacingMode, SpacingResolver};
pub use template::{FlipPolicy, ItemRandomization, ItemTemplate, SurfaceProjection, ValueRange};

pub type ItemId = String;

/// How the next item template is chosen for each sampled slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectionMode {
    /// Round-robin through the templates in order.
    #[default]
    Sequential,
    /// Independent uniform draws.
    Random,
    /// Driven by the brush's pattern string.
    Pattern,
}

/// An ordered collection of item templates plus a selection policy.
///
/// Read-only during a layout pass; the live selection cursor is owned by an
/// [`ItemSelector`] the caller passes into each pass.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct Multibrush {
    pub id: String,
    pub items: Vec<ItemTemplate>,
    pub selection: SelectionMode,
    /// Pattern string for [`SelectionMode::Pattern`]: ASCII letters map
    /// case-insensitively onto template indices in alphabet order; `-`,
    /// `.`, and space mean "skip this slot".
    pub pattern: String,
}

impl Multibrush {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            selection: SelectionMode::Sequential,
            pattern: String::new(),
        }
    }

    pub fn with_item(mut self, item: ItemTemplate) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_items(mut self, items: Vec<ItemTemplate>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the pattern string and switches to [`SelectionMode::Pattern`].
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self.selection = SelectionMode::Pattern;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&ItemTemplate> {
        self.items.get(index)
    }
}
