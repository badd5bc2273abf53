use serde::{Deserialize, Deserializer};

/// A single field of a merge-patch request body.
///
/// Use with `#[serde(default)]` so a missing key stays `Absent`:
/// `{}` leaves the column untouched, `{"local": null}` clears it and
/// `{"local": "x"}` overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Overwrite a NOT NULL column. `Null` is rejected during validation,
    /// so only `Value` has an effect here.
    pub fn set(self, slot: &mut T) {
        if let Self::Value(v) = self {
            *slot = v;
        }
    }

    /// Overwrite a nullable column.
    pub fn set_nullable(self, slot: &mut Option<T>) {
        match self {
            Self::Absent => {}
            Self::Null => *slot = None,
            Self::Value(v) => *slot = Some(v),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}
