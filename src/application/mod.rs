pub mod error;
pub mod show_service;
pub mod todo_service;
