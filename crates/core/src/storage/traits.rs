use async_trait::async_trait;
use uuid::Uuid;

use crate::club::{Club, ClubApplication, Event, Tag};
use crate::membership::{Membership, Person, Profile};
use crate::note::{Note, NoteTag};

use super::Result;

/// Repository for people and their profiles.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Gets a person by their ID.
    async fn get_person(&self, id: Uuid) -> Result<Option<Person>>;

    /// Creates a new person.
    async fn create_person(&self, person: &Person) -> Result<()>;

    /// Gets the profile for a person, if one exists.
    async fn get_profile(&self, person_id: Uuid) -> Result<Option<Profile>>;

    /// Creates or replaces the profile for a person.
    async fn save_profile(&self, profile: &Profile) -> Result<()>;

    /// Deletes a person along with their profile, memberships, and authored notes.
    async fn delete_person(&self, id: Uuid) -> Result<()>;
}

/// Repository for club operations.
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Gets a club by its slug.
    async fn get_club(&self, id: &str) -> Result<Option<Club>>;

    /// Lists all clubs ordered by name.
    async fn list_clubs(&self) -> Result<Vec<Club>>;

    /// Creates a new club.
    async fn create_club(&self, club: &Club) -> Result<()>;

    /// Updates an existing club.
    async fn update_club(&self, club: &Club) -> Result<()>;

    /// Deletes a club and everything that belongs to it.
    async fn delete_club(&self, id: &str) -> Result<()>;
}

/// Repository for club tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Creates a new tag.
    async fn create_tag(&self, tag: &Tag) -> Result<()>;

    /// Gets the tags attached to a club, ordered by name.
    async fn get_tags_for_club(&self, club_id: &str) -> Result<Vec<Tag>>;

    /// Attaches a tag to a club. Attaching twice is a no-op.
    async fn add_tag_to_club(&self, club_id: &str, tag_id: Uuid) -> Result<()>;

    /// Detaches a tag from a club.
    async fn remove_tag_from_club(&self, club_id: &str, tag_id: Uuid) -> Result<()>;
}

/// Repository for club events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Gets an event by its slug.
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    /// Gets all events hosted by a club, ordered by start time.
    async fn get_events_for_club(&self, club_id: &str) -> Result<Vec<Event>>;

    /// Creates a new event.
    async fn create_event(&self, event: &Event) -> Result<()>;

    /// Updates an existing event.
    async fn update_event(&self, event: &Event) -> Result<()>;

    /// Deletes an event by its slug.
    async fn delete_event(&self, id: &str) -> Result<()>;
}

/// Repository for club membership operations.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Gets a membership by club and person, active or not.
    async fn get_membership(&self, club_id: &str, person_id: Uuid) -> Result<Option<Membership>>;

    /// Gets the active roster of a club, most senior first.
    async fn get_members_for_club(&self, club_id: &str) -> Result<Vec<(Person, Membership)>>;

    /// Gets the clubs a person is currently an active member of.
    async fn get_clubs_for_person(&self, person_id: Uuid) -> Result<Vec<(Club, Membership)>>;

    /// Creates a new membership.
    async fn create_membership(&self, membership: &Membership) -> Result<()>;

    /// Updates title, role, and active state of an existing membership.
    async fn update_membership(&self, membership: &Membership) -> Result<()>;

    /// Deletes a membership.
    async fn delete_membership(&self, club_id: &str, person_id: Uuid) -> Result<()>;

    /// Marks inactive every active membership whose holder's profile has a
    /// graduation year at or before `cutoff_year`, in one bulk operation.
    ///
    /// Returns the number of memberships that changed from active to inactive.
    async fn deactivate_graduated(&self, cutoff_year: i32) -> Result<u64>;
}

/// Repository for notes and note tags.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Creates a new note tag.
    async fn create_note_tag(&self, tag: &NoteTag) -> Result<()>;

    /// Gets a note, including its tags.
    async fn get_note(&self, id: Uuid) -> Result<Option<Note>>;

    /// Gets all notes whose subject is the given club, newest first.
    async fn get_notes_about_club(&self, club_id: &str) -> Result<Vec<Note>>;

    /// Creates a note and links its tags. The tags must already exist.
    async fn create_note(&self, note: &Note) -> Result<()>;

    /// Deletes a note.
    async fn delete_note(&self, id: Uuid) -> Result<()>;
}

/// Repository for club application cycles.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Gets an application cycle by its ID.
    async fn get_application(&self, id: Uuid) -> Result<Option<ClubApplication>>;

    /// Gets all application cycles for a club, ordered by start time.
    async fn get_applications_for_club(&self, club_id: &str) -> Result<Vec<ClubApplication>>;

    /// Creates a new application cycle.
    async fn create_application(&self, application: &ClubApplication) -> Result<()>;

    /// Deletes an application cycle.
    async fn delete_application(&self, id: Uuid) -> Result<()>;
}
