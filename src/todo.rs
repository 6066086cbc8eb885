//! The todo record as it crosses the API.

use serde::{Deserialize, Serialize};

/// A todo item.
///
/// Every field is optional so a request body can tell "absent" apart from
/// "present with a zero value". Partial updates depend on that distinction.
/// Records returned by the service always have every field set.
///
/// `url` is derived from `id` on the way out and never read from a client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, skip_deserializing)]
    pub url: String,
}

/// A fully defaulted record, ready for insertion. Has no id: the store
/// assigns one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

impl NewTodo {
    /// Fills unset fields with their zero values. Any id on `todo` is dropped.
    pub fn with_defaults(todo: Todo) -> Self {
        Self {
            title: todo.title.unwrap_or_default(),
            completed: todo.completed.unwrap_or(false),
            order: todo.order.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_every_field() {
        let todo = Todo {
            id: Some(1),
            title: Some("buy milk".to_owned()),
            completed: Some(false),
            order: Some(0),
            url: "http://host/1".to_owned(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "buy milk",
                "completed": false,
                "order": 0,
                "url": "http://host/1",
            })
        );
    }

    #[test]
    fn absent_fields_decode_as_none() {
        let todo: Todo = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(todo.title.as_deref(), Some("x"));
        assert_eq!(todo.completed, None);
        assert_eq!(todo.order, None);
        assert_eq!(todo.id, None);
    }

    #[test]
    fn zero_values_are_kept_distinct_from_absent() {
        let todo: Todo = serde_json::from_str(r#"{"completed":false,"order":0}"#).unwrap();
        assert_eq!(todo.completed, Some(false));
        assert_eq!(todo.order, Some(0));
    }

    #[test]
    fn client_url_is_ignored() {
        let todo: Todo = serde_json::from_str(r#"{"url":"http://evil/9"}"#).unwrap();
        assert!(todo.url.is_empty());
    }

    #[test]
    fn json_roundtrip_ignoring_url() {
        let todo = Todo {
            id: Some(7),
            title: Some("walk".to_owned()),
            completed: Some(true),
            order: Some(3),
            url: "http://host/7".to_owned(),
        };
        let back: Todo = serde_json::from_str(&serde_json::to_string(&todo).unwrap()).unwrap();
        assert_eq!(back, Todo { url: String::new(), ..todo });
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let new = NewTodo::with_defaults(Todo { id: Some(4), ..Todo::default() });
        assert_eq!(new, NewTodo { title: String::new(), completed: false, order: 0 });
    }
}
