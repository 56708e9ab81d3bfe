//! SQLite repository implementation.
//!
//! Implements the repository traits from `clubroster_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use clubroster_core::club::{
    validate_application, validate_club, validate_event, Club, ClubApplication, Event, Tag,
};
use clubroster_core::membership::{Membership, Person, Profile};
use clubroster_core::note::{Note, NoteTag};
use clubroster_core::storage::{
    ApplicationRepository, ClubRepository, EventRepository, MembershipRepository, NoteRepository,
    PersonRepository, RepositoryError, Result, TagRepository,
};

use super::conversions::{
    format_date, format_datetime, row_to_application, row_to_club, row_to_club_with_membership,
    row_to_event, row_to_membership, row_to_note, row_to_note_tag, row_to_person,
    row_to_person_with_membership, row_to_profile, row_to_tag,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns a zero-row write into `QueryReturnedNoRows` so it maps to `NotFound`.
fn require_rows(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> std::result::Result<Vec<T>, tokio_rusqlite::Error> {
    rows.map(|row| row.map_err(wrap_err)).collect()
}

/// Loads the tags linked to a note into `note.note_tags`.
fn load_note_tags(conn: &rusqlite::Connection, note: &mut Note) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(schema::SELECT_TAGS_FOR_NOTE)?;
    let tags = stmt
        .query_map([note.id.to_string()], row_to_note_tag)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    note.note_tags = tags;
    Ok(())
}

fn membership_key(club_id: &str, person_id: Uuid) -> String {
    format!("{club_id}:{person_id}")
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Schema"))
    }
}

// ============================================================================
// PersonRepository implementation
// ============================================================================

#[async_trait]
impl PersonRepository for SqliteRepository {
    async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_PERSON_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_person) {
                    Ok(person) => Ok(Some(person)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Person", id.to_string()))
    }

    async fn create_person(&self, person: &Person) -> Result<()> {
        let id = person.id.to_string();
        let username = person.username.clone();
        let email = person.email.clone();
        let person_id = person.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_PERSON, rusqlite::params![id, username, email])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Person", person_id))
    }

    async fn get_profile(&self, person_id: Uuid) -> Result<Option<Profile>> {
        let id_str = person_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_PROFILE).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_profile) {
                    Ok(profile) => Ok(Some(profile)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Profile", person_id.to_string()))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let person_id = profile.person_id.to_string();
        let graduation_year = profile.graduation_year;
        let profile_id = profile.person_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_PROFILE,
                    rusqlite::params![person_id, graduation_year],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Profile", profile_id))
    }

    async fn delete_person(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_PERSON, [&id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Person", id.to_string()))
    }
}

// ============================================================================
// ClubRepository implementation
// ============================================================================

#[async_trait]
impl ClubRepository for SqliteRepository {
    async fn get_club(&self, id: &str) -> Result<Option<Club>> {
        let id_str = id.to_string();
        let club_id = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_CLUB_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_club) {
                    Ok(club) => Ok(Some(club)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Club", club_id))
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_CLUBS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_club).map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Club"))
    }

    async fn create_club(&self, club: &Club) -> Result<()> {
        validate_club(club)?;

        let club = club.clone();
        let club_id = club.id.clone();

        self.conn
            .call(move |conn| {
                let founded = club.founded.as_ref().map(format_date);
                conn.execute(
                    schema::INSERT_CLUB,
                    rusqlite::params![
                        club.id,
                        club.name,
                        club.subtitle,
                        club.description,
                        founded,
                        club.size.value(),
                        club.links.email,
                        club.links.website,
                        club.links.facebook,
                        club.links.twitter,
                        club.links.instagram,
                        club.links.linkedin,
                        club.how_to_get_involved,
                        club.application_required,
                        club.application_available,
                        club.listserv_available,
                        club.image_url,
                        club.ics_import_url
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Club", club_id))
    }

    async fn update_club(&self, club: &Club) -> Result<()> {
        validate_club(club)?;

        let club = club.clone();
        let club_id = club.id.clone();

        self.conn
            .call(move |conn| {
                let founded = club.founded.as_ref().map(format_date);
                let rows = conn
                    .execute(
                        schema::UPDATE_CLUB,
                        rusqlite::params![
                            club.id,
                            club.name,
                            club.subtitle,
                            club.description,
                            founded,
                            club.size.value(),
                            club.links.email,
                            club.links.website,
                            club.links.facebook,
                            club.links.twitter,
                            club.links.instagram,
                            club.links.linkedin,
                            club.how_to_get_involved,
                            club.application_required,
                            club.application_available,
                            club.listserv_available,
                            club.image_url,
                            club.ics_import_url
                        ],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Club", club_id))
    }

    async fn delete_club(&self, id: &str) -> Result<()> {
        let id_str = id.to_string();
        let club_id = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_CLUB, [&id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Club", club_id))
    }
}

// ============================================================================
// TagRepository implementation
// ============================================================================

#[async_trait]
impl TagRepository for SqliteRepository {
    async fn create_tag(&self, tag: &Tag) -> Result<()> {
        let id = tag.id.to_string();
        let name = tag.name.clone();
        let tag_id = tag.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_TAG, rusqlite::params![id, name])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Tag", tag_id))
    }

    async fn get_tags_for_club(&self, club_id: &str) -> Result<Vec<Tag>> {
        let club_id = club_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TAGS_FOR_CLUB)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&club_id], row_to_tag).map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Tag"))
    }

    async fn add_tag_to_club(&self, club_id: &str, tag_id: Uuid) -> Result<()> {
        let club_id = club_id.to_string();
        let tag_id_str = tag_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_CLUB_TAG, [&club_id, &tag_id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Tag", tag_id.to_string()))
    }

    async fn remove_tag_from_club(&self, club_id: &str, tag_id: Uuid) -> Result<()> {
        let club_id = club_id.to_string();
        let tag_id_str = tag_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_CLUB_TAG, [&club_id, &tag_id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Tag", tag_id.to_string()))
    }
}

// ============================================================================
// EventRepository implementation
// ============================================================================

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let id_str = id.to_string();
        let event_id = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_EVENT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_event) {
                    Ok(event) => Ok(Some(event)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }

    async fn get_events_for_club(&self, club_id: &str) -> Result<Vec<Event>> {
        let club_id = club_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_EVENTS_FOR_CLUB)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&club_id], row_to_event).map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Event"))
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        validate_event(event)?;

        let event = event.clone();
        let event_id = event.id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EVENT,
                    rusqlite::params![
                        event.id,
                        event.club_id,
                        event.name,
                        format_datetime(&event.start_time),
                        format_datetime(&event.end_time),
                        event.location,
                        event.url,
                        event.image_url,
                        event.description,
                        event.is_ics_event,
                        event.ics_uuid.to_string()
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        validate_event(event)?;

        let event = event.clone();
        let event_id = event.id.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_EVENT,
                        rusqlite::params![
                            event.id,
                            event.name,
                            format_datetime(&event.start_time),
                            format_datetime(&event.end_time),
                            event.location,
                            event.url,
                            event.image_url,
                            event.description,
                            event.is_ics_event,
                            event.ics_uuid.to_string()
                        ],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let id_str = id.to_string();
        let event_id = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }
}

// ============================================================================
// MembershipRepository implementation
// ============================================================================

#[async_trait]
impl MembershipRepository for SqliteRepository {
    async fn get_membership(&self, club_id: &str, person_id: Uuid) -> Result<Option<Membership>> {
        let club_id_str = club_id.to_string();
        let person_id_str = person_id.to_string();
        let membership_id = membership_key(club_id, person_id);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_MEMBERSHIP).map_err(wrap_err)?;
                match stmt.query_row([&club_id_str, &person_id_str], row_to_membership) {
                    Ok(membership) => Ok(Some(membership)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Membership", membership_id))
    }

    async fn get_members_for_club(&self, club_id: &str) -> Result<Vec<(Person, Membership)>> {
        let club_id = club_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_MEMBERS_FOR_CLUB)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&club_id], row_to_person_with_membership)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Membership"))
    }

    async fn get_clubs_for_person(&self, person_id: Uuid) -> Result<Vec<(Club, Membership)>> {
        let person_id_str = person_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CLUBS_FOR_PERSON)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&person_id_str], row_to_club_with_membership)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Membership"))
    }

    async fn create_membership(&self, membership: &Membership) -> Result<()> {
        let club_id = membership.club_id.clone();
        let person_id = membership.person_id.to_string();
        let title = membership.title.clone();
        let role = membership.role.value();
        let active = membership.active;
        let created_at = format_datetime(&membership.created_at);
        let updated_at = format_datetime(&membership.updated_at);
        let membership_id = membership_key(&membership.club_id, membership.person_id);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_MEMBERSHIP,
                    rusqlite::params![club_id, person_id, title, role, active, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Membership", membership_id))
    }

    async fn update_membership(&self, membership: &Membership) -> Result<()> {
        let club_id = membership.club_id.clone();
        let person_id = membership.person_id.to_string();
        let title = membership.title.clone();
        let role = membership.role.value();
        let active = membership.active;
        let updated_at = format_datetime(&membership.updated_at);
        let membership_id = membership_key(&membership.club_id, membership.person_id);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_MEMBERSHIP,
                        rusqlite::params![club_id, person_id, title, role, active, updated_at],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Membership", membership_id))
    }

    async fn delete_membership(&self, club_id: &str, person_id: Uuid) -> Result<()> {
        let club_id_str = club_id.to_string();
        let person_id_str = person_id.to_string();
        let membership_id = membership_key(club_id, person_id);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_MEMBERSHIP, [&club_id_str, &person_id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Membership", membership_id))
    }

    async fn deactivate_graduated(&self, cutoff_year: i32) -> Result<u64> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DEACTIVATE_GRADUATED_MEMBERSHIPS, [cutoff_year])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Membership"))
    }
}

// ============================================================================
// NoteRepository implementation
// ============================================================================

#[async_trait]
impl NoteRepository for SqliteRepository {
    async fn create_note_tag(&self, tag: &NoteTag) -> Result<()> {
        let id = tag.id.to_string();
        let name = tag.name.clone();
        let tag_id = tag.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_NOTE_TAG, rusqlite::params![id, name])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "NoteTag", tag_id))
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_NOTE_BY_ID).map_err(wrap_err)?;
                let mut note = match stmt.query_row([&id_str], row_to_note) {
                    Ok(note) => note,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };
                load_note_tags(conn, &mut note).map_err(wrap_err)?;
                Ok(Some(note))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Note", id.to_string()))
    }

    async fn get_notes_about_club(&self, club_id: &str) -> Result<Vec<Note>> {
        let club_id = club_id.to_string();

        self.conn
            .call(move |conn| {
                let mut notes = {
                    let mut stmt = conn
                        .prepare(schema::SELECT_NOTES_ABOUT_CLUB)
                        .map_err(wrap_err)?;
                    let rows = stmt.query_map([&club_id], row_to_note).map_err(wrap_err)?;
                    collect_rows(rows)?
                };
                for note in &mut notes {
                    load_note_tags(conn, note).map_err(wrap_err)?;
                }
                Ok(notes)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note"))
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let note = note.clone();
        let note_id = note.id.to_string();

        self.conn
            .call(move |conn| {
                let id = note.id.to_string();
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_NOTE,
                    rusqlite::params![
                        id,
                        note.creator_id.to_string(),
                        note.creating_club_id,
                        note.subject_club_id,
                        note.title,
                        note.content,
                        note.creating_club_permission.value(),
                        note.outside_club_permission.value(),
                        format_datetime(&note.created_at),
                        format_datetime(&note.updated_at)
                    ],
                )
                .map_err(wrap_err)?;
                for tag in &note.note_tags {
                    tx.execute(
                        schema::INSERT_NOTE_NOTE_TAG,
                        rusqlite::params![id, tag.id.to_string()],
                    )
                    .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Note", note_id))
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_NOTE, [&id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Note", id.to_string()))
    }
}

// ============================================================================
// ApplicationRepository implementation
// ============================================================================

#[async_trait]
impl ApplicationRepository for SqliteRepository {
    async fn get_application(&self, id: Uuid) -> Result<Option<ClubApplication>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_APPLICATION_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_application) {
                    Ok(application) => Ok(Some(application)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ClubApplication", id.to_string()))
    }

    async fn get_applications_for_club(&self, club_id: &str) -> Result<Vec<ClubApplication>> {
        let club_id = club_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_APPLICATIONS_FOR_CLUB)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&club_id], row_to_application)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ClubApplication"))
    }

    async fn create_application(&self, application: &ClubApplication) -> Result<()> {
        validate_application(application)?;

        let application = application.clone();
        let application_id = application.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_APPLICATION,
                    rusqlite::params![
                        application.id.to_string(),
                        application.club_id,
                        application.name,
                        format_datetime(&application.application_start_time),
                        format_datetime(&application.application_end_time),
                        format_datetime(&application.result_release_time),
                        application.application_url,
                        format_datetime(&application.created_at),
                        format_datetime(&application.updated_at)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ClubApplication", application_id))
    }

    async fn delete_application(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_APPLICATION, [&id_str])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ClubApplication", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use clubroster_core::membership::MembershipRole;
    use clubroster_core::note::{CreatingClubPermission, OutsideClubPermission};

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory()
            .await
            .expect("Failed to create in-memory repository")
    }

    async fn seed_person(
        repo: &SqliteRepository,
        username: &str,
        graduation_year: Option<i32>,
    ) -> Person {
        let person = Person::new(username, format!("{username}@example.edu"));
        repo.create_person(&person).await.unwrap();
        repo.save_profile(&Profile::new(person.id, graduation_year))
            .await
            .unwrap();
        person
    }

    async fn seed_club(repo: &SqliteRepository, id: &str, name: &str) -> Club {
        let club = Club::new(id, name);
        repo.create_club(&club).await.unwrap();
        club
    }

    async fn is_active(repo: &SqliteRepository, club_id: &str, person_id: Uuid) -> bool {
        repo.get_membership(club_id, person_id)
            .await
            .unwrap()
            .map(|m| m.active)
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_person_and_profile_roundtrip() {
        let repo = setup().await;
        let person = seed_person(&repo, "alice", Some(2026)).await;

        let fetched = repo.get_person(person.id).await.unwrap().unwrap();
        assert_eq!(fetched, person);

        let profile = repo.get_profile(person.id).await.unwrap().unwrap();
        assert_eq!(profile.graduation_year, Some(2026));

        repo.save_profile(&Profile::new(person.id, Some(2027)))
            .await
            .unwrap();
        let profile = repo.get_profile(person.id).await.unwrap().unwrap();
        assert_eq!(profile.graduation_year, Some(2027));
    }

    #[tokio::test]
    async fn test_get_missing_person_returns_none() {
        let repo = setup().await;

        assert!(repo.get_person(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.get_profile(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_club_is_already_exists() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;

        let result = repo.create_club(&Club::new("penn-labs", "Penn Labs")).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_list_clubs_ordered_by_name() {
        let repo = setup().await;
        seed_club(&repo, "zeta", "Zeta Society").await;
        seed_club(&repo, "alpha", "Alpha Club").await;

        let clubs = repo.list_clubs().await.unwrap();

        let names: Vec<_> = clubs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Club", "Zeta Society"]);
    }

    #[tokio::test]
    async fn test_update_missing_club_is_not_found() {
        let repo = setup().await;

        let result = repo.update_club(&Club::new("ghost", "Ghost Club")).await;

        assert_eq!(result, Err(RepositoryError::not_found("Club", "ghost")));
    }

    #[tokio::test]
    async fn test_update_club_persists_fields() {
        let repo = setup().await;
        let club = seed_club(&repo, "penn-labs", "Penn Labs").await;

        let updated = club
            .with_subtitle("We build apps")
            .with_founded(chrono::NaiveDate::from_ymd_opt(2012, 9, 1).unwrap());
        repo.update_club(&updated).await.unwrap();

        let fetched = repo.get_club("penn-labs").await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_tags_attach_idempotently() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let tag = Tag::new("Technology");
        repo.create_tag(&tag).await.unwrap();

        repo.add_tag_to_club("penn-labs", tag.id).await.unwrap();
        repo.add_tag_to_club("penn-labs", tag.id).await.unwrap();

        let tags = repo.get_tags_for_club("penn-labs").await.unwrap();
        assert_eq!(tags, vec![tag.clone()]);

        repo.remove_tag_from_club("penn-labs", tag.id).await.unwrap();
        assert!(repo.get_tags_for_club("penn-labs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_event_for_missing_club_is_invalid_data() {
        let repo = setup().await;
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap();
        let event = Event::new("gbm", "ghost", "GBM", start, start + Duration::hours(1));

        let result = repo.create_event(&event).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_event_crud() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap();
        let event = Event::new("gbm", "penn-labs", "GBM", start, start + Duration::hours(1))
            .with_location("Towne 100");
        repo.create_event(&event).await.unwrap();

        let fetched = repo.get_event("gbm").await.unwrap().unwrap();
        assert_eq!(fetched, event);

        let moved = event.clone().with_location("Levine 101");
        repo.update_event(&moved).await.unwrap();
        let events = repo.get_events_for_club("penn-labs").await.unwrap();
        assert_eq!(events, vec![moved]);

        repo.delete_event("gbm").await.unwrap();
        assert!(repo.get_event("gbm").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_members_for_club_excludes_inactive() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", Some(2026)).await;
        let bob = seed_person(&repo, "bob", Some(2026)).await;

        repo.create_membership(&Membership::officer("penn-labs", alice.id))
            .await
            .unwrap();
        repo.create_membership(&Membership::member("penn-labs", bob.id).inactive())
            .await
            .unwrap();

        let members = repo.get_members_for_club("penn-labs").await.unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].0, alice);
        assert_eq!(members[0].1.role, MembershipRole::Officer);
    }

    #[tokio::test]
    async fn test_clubs_for_person() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        seed_club(&repo, "chess", "Chess Club").await;
        let alice = seed_person(&repo, "alice", Some(2026)).await;

        repo.create_membership(&Membership::owner("penn-labs", alice.id))
            .await
            .unwrap();
        repo.create_membership(&Membership::member("chess", alice.id))
            .await
            .unwrap();

        let clubs = repo.get_clubs_for_person(alice.id).await.unwrap();

        let names: Vec<_> = clubs.iter().map(|(c, _)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Chess Club", "Penn Labs"]);
    }

    #[tokio::test]
    async fn test_duplicate_membership_is_already_exists() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", None).await;
        repo.create_membership(&Membership::member("penn-labs", alice.id))
            .await
            .unwrap();

        let result = repo
            .create_membership(&Membership::officer("penn-labs", alice.id))
            .await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_and_delete_membership() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", None).await;
        let membership = Membership::member("penn-labs", alice.id);
        repo.create_membership(&membership).await.unwrap();

        let promoted = Membership {
            role: MembershipRole::Officer,
            ..membership.with_title("Treasurer")
        };
        repo.update_membership(&promoted).await.unwrap();

        let fetched = repo
            .get_membership("penn-labs", alice.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.role, MembershipRole::Officer);
        assert_eq!(fetched.title, "Treasurer");

        repo.delete_membership("penn-labs", alice.id).await.unwrap();
        let result = repo.delete_membership("penn-labs", alice.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_deactivate_graduated() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let a = seed_person(&repo, "a", Some(2023)).await;
        let b = seed_person(&repo, "b", Some(2024)).await;
        let c = seed_person(&repo, "c", None).await;
        let d = seed_person(&repo, "d", Some(2020)).await;
        for person in [&a, &b, &c] {
            repo.create_membership(&Membership::member("penn-labs", person.id))
                .await
                .unwrap();
        }
        repo.create_membership(&Membership::member("penn-labs", d.id).inactive())
            .await
            .unwrap();

        let count = repo.deactivate_graduated(2023).await.unwrap();

        assert_eq!(count, 1);
        assert!(!is_active(&repo, "penn-labs", a.id).await);
        assert!(is_active(&repo, "penn-labs", b.id).await);
        assert!(is_active(&repo, "penn-labs", c.id).await);
        assert!(!is_active(&repo, "penn-labs", d.id).await);

        // A second pass has nothing left to do
        assert_eq!(repo.deactivate_graduated(2023).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deactivate_ignores_people_without_profile() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let person = Person::new("noprofile", "noprofile@example.edu");
        repo.create_person(&person).await.unwrap();
        repo.create_membership(&Membership::member("penn-labs", person.id))
            .await
            .unwrap();

        assert_eq!(repo.deactivate_graduated(2100).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_note_with_tags() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        seed_club(&repo, "chess", "Chess Club").await;
        let author = seed_person(&repo, "alice", None).await;
        let tag = NoteTag::new("Finance");
        repo.create_note_tag(&tag).await.unwrap();

        let note = Note::new(author.id, "penn-labs", "chess")
            .with_title("Budget")
            .with_content("Shared funding request")
            .with_permissions(
                CreatingClubPermission::Officers,
                OutsideClubPermission::SubjectMembers,
            )
            .with_tags(vec![tag.clone()]);
        repo.create_note(&note).await.unwrap();

        let fetched = repo.get_note(note.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Budget");
        assert_eq!(fetched.content, "Shared funding request");
        assert_eq!(fetched.creating_club_permission, CreatingClubPermission::Officers);
        assert_eq!(fetched.outside_club_permission, OutsideClubPermission::SubjectMembers);
        assert_eq!(fetched.note_tags, vec![tag.clone()]);

        let about = repo.get_notes_about_club("chess").await.unwrap();
        assert_eq!(about.len(), 1);
        assert_eq!(about[0].note_tags, vec![tag]);

        repo.delete_note(note.id).await.unwrap();
        assert!(repo.get_note(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_note_with_unknown_tag_is_rolled_back() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let author = seed_person(&repo, "alice", None).await;
        let note = Note::new(author.id, "penn-labs", "penn-labs")
            .with_tags(vec![NoteTag::new("Unsaved")]);

        let result = repo.create_note(&note).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.get_note(note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_application_roundtrip() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let start = Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap();
        let application = ClubApplication::new(
            "penn-labs",
            start,
            start + Duration::days(14),
            start + Duration::days(21),
            "https://pennlabs.org/apply",
        )
        .with_name("Fall Recruitment");
        repo.create_application(&application).await.unwrap();

        let fetched = repo.get_application(application.id).await.unwrap().unwrap();
        assert_eq!(fetched.name.as_deref(), Some("Fall Recruitment"));
        assert_eq!(fetched.application_start_time, application.application_start_time);
        assert_eq!(fetched.result_release_time, application.result_release_time);
        assert_eq!(fetched.application_url, application.application_url);

        let listed = repo.get_applications_for_club("penn-labs").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, application.id);

        repo.delete_application(application.id).await.unwrap();
        assert!(repo
            .get_application(application.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_club_cascades() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", Some(2026)).await;
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap();
        repo.create_event(&Event::new(
            "gbm",
            "penn-labs",
            "GBM",
            start,
            start + Duration::hours(1),
        ))
        .await
        .unwrap();
        repo.create_membership(&Membership::owner("penn-labs", alice.id))
            .await
            .unwrap();

        repo.delete_club("penn-labs").await.unwrap();

        assert!(repo.get_club("penn-labs").await.unwrap().is_none());
        assert!(repo.get_event("gbm").await.unwrap().is_none());
        assert!(repo
            .get_membership("penn-labs", alice.id)
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_person(alice.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_club_slug_rejected() {
        let repo = setup().await;

        let result = repo.create_club(&Club::new("Not A Slug!", "Bad")).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_clubs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_club_with_empty_name_rejected() {
        let repo = setup().await;
        let club = seed_club(&repo, "penn-labs", "Penn Labs").await;

        let result = repo.update_club(&Club { name: "  ".to_string(), ..club }).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert_eq!(
            repo.get_club("penn-labs").await.unwrap().unwrap().name,
            "Penn Labs"
        );
    }

    #[tokio::test]
    async fn test_invalid_events_rejected() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap();

        let bad_slug = Event::new("Bad Event", "penn-labs", "GBM", start, start + Duration::hours(1));
        let backwards = Event::new("gbm", "penn-labs", "GBM", start, start - Duration::hours(5));

        assert!(matches!(
            repo.create_event(&bad_slug).await,
            Err(RepositoryError::InvalidData(_))
        ));
        assert!(matches!(
            repo.create_event(&backwards).await,
            Err(RepositoryError::InvalidData(_))
        ));
        assert!(repo.get_events_for_club("penn-labs").await.unwrap().is_empty());

        let event = Event::new("gbm", "penn-labs", "GBM", start, start + Duration::hours(1));
        repo.create_event(&event).await.unwrap();
        let moved = Event {
            end_time: start - Duration::hours(1),
            ..event.clone()
        };
        assert!(matches!(
            repo.update_event(&moved).await,
            Err(RepositoryError::InvalidData(_))
        ));
        assert_eq!(repo.get_event("gbm").await.unwrap().unwrap(), event);
    }

    #[tokio::test]
    async fn test_application_out_of_order_rejected() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let start = Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap();
        let application = ClubApplication::new(
            "penn-labs",
            start,
            start + Duration::days(14),
            start + Duration::days(7),
            "https://pennlabs.org/apply",
        );

        let result = repo.create_application(&application).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo
            .get_applications_for_club("penn-labs")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_membership_roundtrip_is_exact() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", Some(2026)).await;
        let membership = Membership::member("penn-labs", alice.id);
        repo.create_membership(&membership).await.unwrap();

        let stored = repo
            .get_membership("penn-labs", alice.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stored, membership);
    }

    #[tokio::test]
    async fn test_delete_person_cascades() {
        let repo = setup().await;
        seed_club(&repo, "penn-labs", "Penn Labs").await;
        let alice = seed_person(&repo, "alice", Some(2026)).await;
        repo.create_membership(&Membership::owner("penn-labs", alice.id))
            .await
            .unwrap();
        let note = Note::new(alice.id, "penn-labs", "penn-labs");
        repo.create_note(&note).await.unwrap();

        repo.delete_person(alice.id).await.unwrap();

        assert!(repo.get_person(alice.id).await.unwrap().is_none());
        assert!(repo.get_profile(alice.id).await.unwrap().is_none());
        assert!(repo
            .get_membership("penn-labs", alice.id)
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_note(note.id).await.unwrap().is_none());
        assert!(repo.get_club("penn-labs").await.unwrap().is_some());
        assert_eq!(
            repo.delete_person(alice.id).await,
            Err(RepositoryError::not_found("Person", alice.id))
        );
    }
}
