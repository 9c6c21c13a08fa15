pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod services;

pub use api::{HttpTaskApi, TaskApi};
pub use config::AppConfig;
pub use error::{Operation, RequestError, ValidationError};
pub use model::*;
pub use services::{Reply, Request, TasksService};
