mod error;
mod operations;
mod types;

pub use error::{ApplicationError, ClubError, EventError};
pub use operations::{
    slugify, sort_clubs_by_name, validate_application, validate_club, validate_event,
    validate_slug,
};
pub use types::{Club, ClubApplication, ClubSize, ContactLinks, Event, Tag};
