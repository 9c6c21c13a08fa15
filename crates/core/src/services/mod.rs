pub mod tasks;

pub use tasks::{tasks_from_body, Reply, Request, TasksService};
