//! What a cell holds: one [`ItemData`] per [`ItemRole`].

use std::fmt;

const USER_BASE: u32 = 256;

/// Selects one of the values stored in a cell.
///
/// Only two roles are predefined. Status flags, sort keys or the raw value
/// behind a formatted label go under `User` roles, usually named in the role
/// table of a [`TreeModelConfig`](crate::config::TreeModelConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ItemRole {
    /// The value a view renders.
    Display = 0,
    /// The value an editor starts from, when it differs from the rendered one.
    Edit = 2,

    /// Application-specific data. `User(n)` has the numeric value `256 + n`.
    User(u32) = 256,
}

impl ItemRole {
    #[inline]
    pub fn is_user_role(&self) -> bool {
        matches!(self, ItemRole::User(_))
    }

    /// The number a role table uses for this role.
    pub fn value(&self) -> u32 {
        match *self {
            Self::Display => 0,
            Self::Edit => 2,
            Self::User(offset) => USER_BASE.saturating_add(offset),
        }
    }

    /// Inverse of [`value`](Self::value). Unassigned numbers below 256 give
    /// `None`.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Display),
            2 => Some(Self::Edit),
            v if v >= USER_BASE => Some(Self::User(v - USER_BASE)),
            _ => None,
        }
    }
}

/// A cell value.
///
/// The set of kinds is closed, so every view can render every value.
///
/// ```
/// use lattice_tree::model::ItemData;
///
/// let size = ItemData::from(42);
/// assert_eq!(size.as_int(), Some(42));
/// assert_eq!(size.as_float(), Some(42.0));
/// assert_eq!(ItemData::from("README").as_string(), Some("README"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    /// Nothing stored, or nothing addressed.
    #[default]
    None,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ItemData {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Takes the text out, if this is text.
    pub fn into_string(self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ItemData::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, and integers converted to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ItemData::Float(n) => Some(*n),
            ItemData::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ItemData::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ItemData::None => "none",
            ItemData::String(_) => "string",
            ItemData::Int(_) => "int",
            ItemData::Float(_) => "float",
            ItemData::Bool(_) => "bool",
        }
    }
}

/// Renders the value the way a text cell would show it; `None` is empty.
impl fmt::Display for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemData::None => Ok(()),
            ItemData::String(s) => f.write_str(s),
            ItemData::Int(n) => write!(f, "{n}"),
            ItemData::Float(n) => write!(f, "{n}"),
            ItemData::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(text: &str) -> Self {
        ItemData::String(text.to_owned())
    }
}

impl From<i64> for ItemData {
    fn from(n: i64) -> Self {
        ItemData::Int(n)
    }
}

impl From<i32> for ItemData {
    fn from(n: i32) -> Self {
        ItemData::Int(i64::from(n))
    }
}

impl From<f64> for ItemData {
    fn from(n: f64) -> Self {
        ItemData::Float(n)
    }
}

impl From<bool> for ItemData {
    fn from(b: bool) -> Self {
        ItemData::Bool(b)
    }
}

impl<T: Into<ItemData>> From<Option<T>> for ItemData {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(ItemData::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_numbers() {
        let numbers: Vec<u32> = [ItemRole::Display, ItemRole::Edit, ItemRole::User(0), ItemRole::User(10)]
            .iter()
            .map(ItemRole::value)
            .collect();
        assert_eq!(numbers, vec![0, 2, 256, 266]);
        assert!(ItemRole::User(3).is_user_role());
        assert!(!ItemRole::Edit.is_user_role());
    }

    #[test]
    fn test_role_from_number() {
        for role in [ItemRole::Display, ItemRole::Edit, ItemRole::User(7)] {
            assert_eq!(ItemRole::from_value(role.value()), Some(role));
        }
        assert_eq!(ItemRole::from_value(1), None);
        assert_eq!(ItemRole::from_value(255), None);
    }

    #[test]
    fn test_text_value() {
        let data = ItemData::from("notes.txt");
        assert_eq!(data.as_string(), Some("notes.txt"));
        assert!(data.as_int().is_none());
        assert_eq!(data.kind(), "string");
    }

    #[test]
    fn test_item_data_option() {
        assert!(ItemData::from(None::<String>).is_none());
        assert_eq!(ItemData::from(Some(3)), ItemData::Int(3));
    }

    #[test]
    fn test_item_data_display() {
        assert_eq!(ItemData::None.to_string(), "");
        assert_eq!(ItemData::from("a").to_string(), "a");
        assert_eq!(ItemData::from(7).to_string(), "7");
        assert_eq!(ItemData::from(true).to_string(), "true");
    }
}
