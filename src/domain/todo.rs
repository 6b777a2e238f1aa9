use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub order: i32,
}

/// A record that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub order: i32,
}

/// Request body accepted by create and update.
///
/// Unknown keys are ignored, so a client may send back a full record: its
/// `id` has no effect. Optional fields left out of an update keep their
/// stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPayload {
    pub title: String,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub order: Option<i32>,
}

impl TodoPayload {
    pub fn into_new(self) -> NewTodo {
        NewTodo { title: self.title, completed: self.completed.unwrap_or_default(), order: self.order.unwrap_or_default() }
    }

    /// Overwrites `todo` with the payload fields. The id is left alone.
    pub fn apply_to(self, todo: &mut Todo) {
        todo.title = self.title;
        if let Some(completed) = self.completed { todo.completed = completed; }
        if let Some(order) = self.order { todo.order = order; }
    }
}

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_integer_id_and_order() {
        let todo = Todo { id: TodoId(1), title: "title".into(), completed: true, order: 2 };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 1, "title": "title", "completed": true, "order": 2 }));
    }

    #[test]
    fn payload_leaves_optional_fields_unset() {
        let payload: TodoPayload = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(payload.completed, None);
        assert_eq!(payload.order, None);
        assert_eq!(payload.into_new(), NewTodo { title: "x".into(), completed: false, order: 0 });
    }

    #[test]
    fn payload_rejects_missing_title() {
        assert!(serde_json::from_str::<TodoPayload>(r#"{"completed":true}"#).is_err());
    }

    #[test]
    fn apply_ignores_body_id() {
        let mut todo = Todo { id: TodoId(1), title: "title".into(), completed: false, order: 2 };
        let payload: TodoPayload = serde_json::from_str(r#"{"id":9,"title":"title2","completed":true,"order":5}"#).unwrap();
        payload.apply_to(&mut todo);
        assert_eq!(todo, Todo { id: TodoId(1), title: "title2".into(), completed: true, order: 5 });
    }

    #[test]
    fn apply_keeps_fields_missing_from_body() {
        let mut todo = Todo { id: TodoId(1), title: "title".into(), completed: true, order: 2 };
        let payload: TodoPayload = serde_json::from_str(r#"{"title":"title2"}"#).unwrap();
        payload.apply_to(&mut todo);
        assert_eq!(todo, Todo { id: TodoId(1), title: "title2".into(), completed: true, order: 2 });
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(validate_title("ok").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }
}
