mod types;

pub use types::{CreatingClubPermission, Note, NoteTag, OutsideClubPermission};
