//! Headless view state. Components never talk to the service directly: they
//! hand out [`Request`](crate::core::Request)s and take back
//! [`Reply`](crate::core::Reply)s, which keeps them testable without a
//! terminal or a network.

pub mod field;
pub mod form;
pub mod list;
pub mod row;

pub use field::TextField;
pub use form::{FormField, TaskForm};
pub use list::{empty_message, TaskListView, BANNER_TTL, LOADING_TEXT};
pub use row::{TaskRow, DELETE_PROMPT};
