use std::fmt;

use thiserror::Error;

/// The four calls the client makes against the task service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Complete,
    Delete,
}

impl Operation {
    /// Prefix shown in front of every failure of this operation.
    pub fn prefix(&self) -> &'static str {
        match self {
            Operation::List => "Error listing tasks",
            Operation::Create => "Error creating task",
            Operation::Complete => "Error marking task as completed",
            Operation::Delete => "Error deleting task",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Any failed call against the task service, whatever went wrong underneath.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {cause}")]
pub struct RequestError {
    operation: Operation,
    status: Option<u16>,
    cause: String,
}

impl RequestError {
    /// The service answered with a status outside the success range.
    pub fn status(operation: Operation, status: u16) -> Self {
        Self {
            operation,
            status: Some(status),
            cause: format!("HTTP {}", status),
        }
    }

    /// The request never produced a usable response.
    pub fn transport(operation: Operation, cause: impl fmt::Display) -> Self {
        Self {
            operation,
            status: None,
            cause: cause.to_string(),
        }
    }

    /// A failure raised by a library error; the cause keeps its whole `source()` chain.
    pub fn from_error<E>(operation: Operation, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::transport(operation, format!("{:#}", anyhow::Error::new(err)))
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn http_status(&self) -> Option<u16> {
        self.status
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// Local form checks; these never reach the task service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter the task title.")]
    MissingTitle,
    #[error("Please enter the task description.")]
    MissingDescription,
    #[error("Please select a category.")]
    MissingCategory,
    #[error("Please set the task deadline.")]
    MissingDeadline,
    #[error("Deadline must use the format YYYY-MM-DDTHH:MM.")]
    InvalidDeadline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_errors_carry_code_and_prefix() {
        let err = RequestError::status(Operation::Create, 500);
        assert_eq!(err.to_string(), "Error creating task: HTTP 500");
        assert_eq!(err.http_status(), Some(500));
    }

    #[test]
    fn transport_errors_wrap_the_cause() {
        let err = RequestError::transport(Operation::Delete, "connection refused");
        assert_eq!(err.to_string(), "Error deleting task: connection refused");
        assert_eq!(err.http_status(), None);
        assert_eq!(err.operation(), Operation::Delete);
    }

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn library_errors_keep_their_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = RequestError::from_error(Operation::List, Outer(io));
        assert_eq!(
            err.to_string(),
            "Error listing tasks: error sending request: connection refused"
        );
        assert_eq!(err.http_status(), None);
    }
}
