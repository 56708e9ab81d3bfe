mod error;
mod traits;

pub use error::{RepositoryError, Result};
pub use traits::{
    ApplicationRepository, ClubRepository, EventRepository, MembershipRepository, NoteRepository,
    PersonRepository, TagRepository,
};
