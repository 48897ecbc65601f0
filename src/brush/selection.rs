//! Deterministic next-item selection for a brush.
//!
//! An [`ItemSelector`] is an explicitly owned state machine passed by the
//! caller into each layout pass. Callers that want "restart per stroke"
//! call [`ItemSelector::reset`] before building; callers that want the
//! cursor to persist across strokes simply omit the reset. Selection is
//! consume-on-read: there is no peek, because `Random` mode draws fresh
//! entropy each call.
use rand::RngCore;

use crate::brush::{Multibrush, SelectionMode};
use crate::error::{Error, Result};
use crate::guide::rand01;

/// Outcome of one selection step.
///
/// Replaces the implicit `-1`/`-2` index sentinels of ad-hoc
/// implementations: a pattern sentinel yields [`Slot::Skip`], which
/// consumes the slot's spacing budget but produces no item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Item(usize),
    Skip,
}

/// Produces the index of the next item template to place.
#[derive(Clone, Debug)]
pub struct ItemSelector {
    mode: SelectionMode,
    item_count: usize,
    cursor: usize,
    pattern: Vec<Slot>,
    /// A drawn slot handed back unused; served before the next draw.
    returned: Option<Slot>,
}

impl ItemSelector {
    /// Builds a selector for the brush, compiling the pattern string when
    /// pattern mode is active.
    ///
    /// Fails with [`Error::EmptyBrush`] for a brush without templates, and
    /// [`Error::InvalidConfig`] for an empty pattern, a symbol outside the
    /// template range, or an unrecognized symbol.
    pub fn for_brush(brush: &Multibrush) -> Result<Self> {
        if brush.is_empty() {
            return Err(Error::EmptyBrush);
        }

        let pattern = match brush.selection {
            SelectionMode::Pattern => compile_pattern(&brush.pattern, brush.len())?,
            _ => Vec::new(),
        };

        Ok(Self {
            mode: brush.selection,
            item_count: brush.len(),
            cursor: 0,
            pattern,
            returned: None,
        })
    }

    /// Advances the selector and returns the slot for the next sample.
    ///
    /// A slot given back via [`ItemSelector::push_back`] is served first,
    /// without advancing the cursor or drawing entropy.
    pub fn next(&mut self, rng: &mut dyn RngCore) -> Slot {
        if let Some(slot) = self.returned.take() {
            return slot;
        }
        match self.mode {
            SelectionMode::Sequential => {
                let index = self.cursor;
                self.cursor = (self.cursor + 1) % self.item_count;
                Slot::Item(index)
            }
            SelectionMode::Random => {
                let index = (rand01(rng) * self.item_count as f32) as usize;
                Slot::Item(index.min(self.item_count - 1))
            }
            SelectionMode::Pattern => {
                let slot = self.pattern[self.cursor];
                self.cursor = (self.cursor + 1) % self.pattern.len();
                slot
            }
        }
    }

    /// Hands back a slot that was drawn but not used, so a guide that
    /// overshoots its geometry does not burn the slot. The next call to
    /// [`ItemSelector::next`] returns it unchanged.
    pub fn push_back(&mut self, slot: Slot) {
        self.returned = Some(slot);
    }

    /// Restarts the cursor to its initial state, dropping any returned slot.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.returned = None;
    }

    /// Number of templates this selector draws from.
    pub fn item_count(&self) -> usize {
        self.item_count
    }
}

fn compile_pattern(pattern: &str, item_count: usize) -> Result<Vec<Slot>> {
    if pattern.is_empty() {
        return Err(Error::InvalidConfig(
            "pattern selection requires a non-empty pattern string".into(),
        ));
    }

    let mut slots = Vec::with_capacity(pattern.len());
    for symbol in pattern.chars() {
        let slot = match symbol {
            'a'..='z' => Slot::Item(symbol as usize - 'a' as usize),
            'A'..='Z' => Slot::Item(symbol as usize - 'A' as usize),
            '-' | '.' | ' ' => Slot::Skip,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unrecognized pattern symbol '{other}'"
                )));
            }
        };
        if let Slot::Item(index) = slot {
            if index >= item_count {
                return Err(Error::InvalidConfig(format!(
                    "pattern symbol '{symbol}' maps to template {index}, but the brush has {item_count}"
                )));
            }
        }
        slots.push(slot);
    }

    Ok(slots)
}
