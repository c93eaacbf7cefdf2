//! Per-item interaction flags.

use serde::{Deserialize, Serialize};

/// What a view may do with an item.
///
/// Missing fields deserialize as `false`, so a config only lists the flags it
/// turns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFlags {
    pub selectable: bool,
    pub editable: bool,
    pub enabled: bool,
    pub drag_enabled: bool,
    pub drop_enabled: bool,
}

impl ItemFlags {
    /// Nothing allowed. Reported for coordinates that address no item.
    pub const DISABLED: Self = Self {
        selectable: false,
        editable: false,
        enabled: false,
        drag_enabled: false,
        drop_enabled: false,
    };

    /// Enabled and selectable, but read-only.
    pub const READ_ONLY: Self = Self {
        selectable: true,
        enabled: true,
        ..Self::DISABLED
    };

    /// Enabled, selectable and editable.
    pub const EDITABLE: Self = Self {
        editable: true,
        ..Self::READ_ONLY
    };

    /// Same as [`READ_ONLY`](Self::READ_ONLY).
    pub const fn new() -> Self {
        Self::READ_ONLY
    }

    pub const fn disabled() -> Self {
        Self::DISABLED
    }

    pub const fn editable() -> Self {
        Self::EDITABLE
    }

    pub fn with_selectable(self, selectable: bool) -> Self {
        Self { selectable, ..self }
    }

    pub fn with_editable(self, editable: bool) -> Self {
        Self { editable, ..self }
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    pub fn with_drag(self, drag_enabled: bool) -> Self {
        Self {
            drag_enabled,
            ..self
        }
    }

    pub fn with_drop(self, drop_enabled: bool) -> Self {
        Self {
            drop_enabled,
            ..self
        }
    }

    /// Returns `true` if a view may start an edit on the item.
    pub fn allows_edit(&self) -> bool {
        self.enabled && self.editable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(ItemFlags::new().selectable && ItemFlags::new().enabled);
        assert!(!ItemFlags::new().editable);
        assert!(ItemFlags::editable().allows_edit());
        assert_eq!(ItemFlags::disabled(), ItemFlags::default());
    }

    #[test]
    fn test_builders() {
        let flags = ItemFlags::new().with_drag(true).with_enabled(false);
        assert!(flags.drag_enabled);
        assert!(!flags.enabled);
        assert!(!flags.with_editable(true).allows_edit());
    }

    #[test]
    fn test_deserialize_partial() {
        let flags: ItemFlags = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(flags.enabled);
        assert!(!flags.editable);
        assert!(!flags.selectable);
    }
}
