use thiserror::Error;

/// Errors that can occur when validating a club.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("Club name cannot be empty")]
    EmptyName,
    #[error("Club name too long (max 255 characters)")]
    NameTooLong,
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
}

/// Errors that can occur when validating an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event name cannot be empty")]
    EmptyName,
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
    #[error("Event end time must be after or equal to start time")]
    InvalidTimeRange,
}

/// Errors that can occur when validating a club application cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("Application end time must be after or equal to start time")]
    EndsBeforeStart,
    #[error("Results cannot be released before the application closes")]
    ReleaseBeforeEnd,
    #[error("Application URL is required")]
    MissingUrl,
}
