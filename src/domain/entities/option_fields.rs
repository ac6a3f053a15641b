use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents optional field semantics in PATCH/UPDATE requests.
///
/// - `Unchanged` → field not present in the payload
/// - `SetToNull` → explicitly null
/// - `SetToValue` → set to provided value
///
/// Deserializes from plain JSON: a missing key is `Unchanged` (via
/// `#[serde(default)]` on the containing struct), `null` is `SetToNull`,
/// anything else is `SetToValue`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OptionField<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            None => OptionField::SetToNull,
            Some(v) => OptionField::SetToValue(v),
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Unchanged fields are skipped at the struct level with
            // `skip_serializing_if = "OptionField::is_unchanged"`; a bare
            // Unchanged serializes as null like SetToNull.
            OptionField::Unchanged | OptionField::SetToNull => serializer.serialize_none(),
            OptionField::SetToValue(v) => serializer.serialize_some(v),
        }
    }
}

impl<T> OptionField<T> {
    /// True when `Unchanged`.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// True when `SetToNull`.
    pub fn is_set_to_null(&self) -> bool {
        matches!(self, Self::SetToNull)
    }

    /// If `SetToValue`, returns a reference to the inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        title: OptionField<String>,
        count: OptionField<i64>,
    }

    #[test]
    fn missing_key_is_unchanged() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.title.is_unchanged());
        assert!(patch.count.is_unchanged());
    }

    #[test]
    fn null_is_set_to_null() {
        let patch: Patch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(patch.title.is_set_to_null());
        assert!(patch.count.is_unchanged());
    }

    #[test]
    fn value_is_set_to_value() {
        let patch: Patch = serde_json::from_str(r#"{"title": "Une", "count": 3}"#).unwrap();
        assert_eq!(patch.title.value_ref().map(|s| s.as_str()), Some("Une"));
        assert_eq!(patch.count, OptionField::SetToValue(3));
    }
}
