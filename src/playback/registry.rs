//! Now-playing registry and stacking-order policy.
//!
//! Effects stack in a dedicated z band so panel-owned layers never
//! collide with host UI. In ascending mode newer effects stack above
//! older ones; descending mode inverts that by counting down from the
//! top of the band. The registry itself is pure bookkeeping; driving
//! the host engine happens in the session layer.

use serde::{Deserialize, Serialize};

use crate::host::SettingsStore;
use crate::storage::settings::{self, keys};

/// Bottom of the z band reserved for panel effects.
pub const Z_BASE: i64 = 10_000;

/// Width of the z band.
pub const Z_RANGE: i64 = 1_000_000;

/// Tag attached to every effect the panel starts.
pub const EFFECT_TAG: &str = "media-orb";

/// Stacking direction for newly started effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderMode {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl OrderMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            OrderMode::Ascending => OrderMode::Descending,
            OrderMode::Descending => OrderMode::Ascending,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OrderMode::Ascending => "New on top",
            OrderMode::Descending => "New below",
        }
    }

    /// Z for a registry position during a replay, with position 0
    /// being the first record.
    #[must_use]
    pub fn z_for_position(self, position: usize) -> i64 {
        let p = position as i64;
        match self {
            OrderMode::Ascending => Z_BASE + p,
            OrderMode::Descending => Z_BASE + Z_RANGE - p,
        }
    }

    /// Z for the next freshly started effect, advancing the counter.
    pub fn z_for_next(self, counter: &mut i64) -> i64 {
        let z = self.z_for_position(usize::try_from(*counter).unwrap_or(0));
        *counter += 1;
        z
    }
}

/// Reads the persisted order mode, ascending by default.
pub fn order_mode(store: &dyn SettingsStore) -> OrderMode {
    settings::read_or(store, keys::ORDER_MODE, || OrderMode::Ascending)
}

pub fn set_order_mode(store: &dyn SettingsStore, mode: OrderMode) -> crate::domain::Result<()> {
    settings::write(store, keys::ORDER_MODE, &mode)
}

/// One effect the panel currently has running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffectRecord {
    /// Short unique id, the suffix of `name`.
    pub id: String,
    /// Raw media path.
    pub path: String,
    pub tag: String,
    /// Full engine-facing effect name, `tag:id`.
    pub name: String,
    /// Z the effect was started (or last replayed) at.
    pub z: i64,
}

/// Ordered bookkeeping of running effects plus the replace-target
/// selection.
#[derive(Debug, Default)]
pub struct NowPlayingRegistry {
    records: Vec<ActiveEffectRecord>,
    selected: Option<String>,
    order_counter: i64,
}

impl NowPlayingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[ActiveEffectRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Z for the next new effect under `mode`.
    pub fn next_z(&mut self, mode: OrderMode) -> i64 {
        mode.z_for_next(&mut self.order_counter)
    }

    pub fn push(&mut self, record: ActiveEffectRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActiveEffectRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Removes a record by name, clearing the selection when it
    /// pointed at the removed effect.
    pub fn remove(&mut self, name: &str) -> Option<ActiveEffectRecord> {
        let pos = self.position_of(name)?;
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        Some(self.records.remove(pos))
    }

    /// Swaps the record at `name`'s slot for a replacement, keeping
    /// registry order. A completed replace consumes the selection, so
    /// the next activation plays normally.
    pub fn replace(&mut self, name: &str, record: ActiveEffectRecord) -> bool {
        match self.position_of(name) {
            Some(pos) => {
                if self.selected.as_deref() == Some(name) {
                    self.selected = None;
                }
                self.records[pos] = record;
                true
            }
            None => false,
        }
    }

    /// Reorders records to match `names`; names not present are
    /// ignored, records not named keep their relative order at the
    /// end.
    pub fn reorder_by_names(&mut self, names: &[String]) {
        self.records.sort_by_key(|r| {
            names
                .iter()
                .position(|n| *n == r.name)
                .unwrap_or(usize::MAX)
        });
    }

    pub fn move_record(&mut self, from: usize, to: usize) {
        if from < self.records.len() && to < self.records.len() && from != to {
            let record = self.records.remove(from);
            self.records.insert(to, record);
        }
    }

    /// Selects `name` as the replace target, or clears the selection
    /// when it is already selected. Returns the new selection.
    pub fn toggle_selected(&mut self, name: &str) -> Option<&str> {
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        } else if self.position_of(name).is_some() {
            self.selected = Some(name.to_string());
        }
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Restarts the z counter without touching records. Order-mode
    /// changes restart the band so the new direction begins at its
    /// extreme.
    pub fn reset_counter(&mut self) {
        self.order_counter = 0;
    }

    /// Empties the registry and resets the z counter. Used by
    /// clear-all.
    pub fn reset(&mut self) -> Vec<ActiveEffectRecord> {
        self.selected = None;
        self.order_counter = 0;
        std::mem::take(&mut self.records)
    }

    /// Updates stored z values after a replay, following registry
    /// order under `mode`.
    pub fn restamp_z(&mut self, mode: OrderMode) {
        for (i, record) in self.records.iter_mut().enumerate() {
            record.z = mode.z_for_position(i);
        }
    }
}
