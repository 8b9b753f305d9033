//! Todo item

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single todo entry.
///
/// `id` is assigned by the store on creation. Request bodies are decoded as
/// [`ItemInput`], never as `Item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub completed: bool,
}

impl Item {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: 0,
            title: title.into(),
            completed,
        }
    }

    /// Returns the item carrying a store-assigned identifier.
    pub fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }
}

/// Client-supplied fields of a create or update body.
///
/// Keys match case-insensitively, `null` leaves a field untouched, a later
/// duplicate key wins, and anything else (including `id`) is skipped. A
/// value of the wrong JSON type is still an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInput {
    pub title: String,
    pub completed: bool,
}

impl ItemInput {
    /// The item to store; its id is left for the store to assign.
    pub fn into_item(self) -> Item {
        Item::new(self.title, self.completed)
    }
}

impl<'de> Deserialize<'de> for ItemInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ItemInputVisitor)
    }
}

struct ItemInputVisitor;

impl<'de> Visitor<'de> for ItemInputVisitor {
    type Value = ItemInput;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a todo item object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let mut input = ItemInput::default();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("title") {
                if let Some(title) = map.next_value::<Option<String>>()? {
                    input.title = title;
                }
            } else if key.eq_ignore_ascii_case("completed") {
                if let Some(completed) = map.next_value::<Option<bool>>()? {
                    input.completed = completed;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_field_names() {
        let item = Item::new("buy milk", false).with_id(1);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"buy milk","completed":false}"#);
    }

    #[test]
    fn test_missing_fields_default() {
        let item: Item = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(item, Item::new("x", false));

        let empty: Item = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Item::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let item: Item =
            serde_json::from_str(r#"{"title":"a","completed":true,"owner":"bob"}"#).unwrap();
        assert_eq!(item, Item::new("a", true));
    }

    fn input(json: &str) -> ItemInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_input_skips_id() {
        assert_eq!(
            input(r#"{"id":99999999999,"title":"a"}"#).into_item(),
            Item::new("a", false)
        );
        assert_eq!(
            input(r#"{"id":null,"title":"a"}"#).into_item(),
            Item::new("a", false)
        );
        assert_eq!(
            input(r#"{"id":"abc","completed":true}"#).into_item(),
            Item::new("", true)
        );
    }

    #[test]
    fn test_input_null_fields() {
        assert_eq!(
            input(r#"{"title":null,"completed":true}"#),
            ItemInput {
                title: String::new(),
                completed: true
            }
        );
        assert_eq!(
            input(r#"{"title":"a","completed":null}"#),
            ItemInput {
                title: "a".into(),
                completed: false
            }
        );
        // null does not reset an earlier value
        assert_eq!(input(r#"{"title":"a","Title":null}"#).title, "a");
    }

    #[test]
    fn test_input_keys_case_insensitive() {
        assert_eq!(
            input(r#"{"Title":"a","COMPLETED":true}"#),
            ItemInput {
                title: "a".into(),
                completed: true
            }
        );
        assert_eq!(input(r#"{"title":"a","TITLE":"b"}"#).title, "b");
    }

    #[test]
    fn test_input_wrong_types_rejected() {
        assert!(serde_json::from_str::<ItemInput>(r#"{"Completed":"yes"}"#).is_err());
        assert!(serde_json::from_str::<ItemInput>(r#"{"title":5}"#).is_err());
        assert!(serde_json::from_str::<ItemInput>("[1]").is_err());
        assert!(serde_json::from_str::<ItemInput>("null").is_err());
    }

    #[test]
    fn test_wrong_types_rejected() {
        assert!(serde_json::from_str::<Item>(r#"{"completed":"yes"}"#).is_err());
        assert!(serde_json::from_str::<Item>(r#"{"id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Item>("not json").is_err());
    }
}
