//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, NaiveDate, Utc};
use clubroster_core::club::{Club, ClubApplication, ClubSize, ContactLinks, Event, Tag};
use clubroster_core::membership::{Membership, MembershipRole, Person, Profile};
use clubroster_core::note::{CreatingClubPermission, Note, NoteTag, OutsideClubPermission};
use rusqlite::Row;
use uuid::Uuid;

/// Number of columns `club_from_row` consumes.
const CLUB_COLUMNS: usize = 18;

/// Number of columns `person_from_row` consumes.
const PERSON_COLUMNS: usize = 3;

// ============================================================================
// Person conversions
// ============================================================================

/// Convert a SQLite row to a Person.
///
/// Expected columns: id, username, email
pub fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
    person_from_row(row, 0)
}

fn person_from_row(row: &Row, offset: usize) -> rusqlite::Result<Person> {
    let id: String = row.get(offset)?;
    let username: String = row.get(offset + 1)?;
    let email: String = row.get(offset + 2)?;

    Ok(Person {
        id: parse_uuid(&id)?,
        username,
        email,
    })
}

/// Convert a SQLite row to a Profile.
///
/// Expected columns: person_id, graduation_year
pub fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
    let person_id: String = row.get(0)?;
    let graduation_year: Option<i32> = row.get(1)?;

    Ok(Profile {
        person_id: parse_uuid(&person_id)?,
        graduation_year,
    })
}

// ============================================================================
// Club conversions
// ============================================================================

/// Convert a SQLite row to a Club.
///
/// Expected columns: id, name, subtitle, description, founded, size, email,
/// website, facebook, twitter, instagram, linkedin, how_to_get_involved,
/// application_required, application_available, listserv_available,
/// image_url, ics_import_url
pub fn row_to_club(row: &Row) -> rusqlite::Result<Club> {
    club_from_row(row, 0)
}

fn club_from_row(row: &Row, offset: usize) -> rusqlite::Result<Club> {
    let founded: Option<String> = row.get(offset + 4)?;
    let size: i64 = row.get(offset + 5)?;

    Ok(Club {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        subtitle: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        founded: founded.as_deref().map(parse_date).transpose()?,
        size: parse_size(size)?,
        links: ContactLinks {
            email: row.get(offset + 6)?,
            website: row.get(offset + 7)?,
            facebook: row.get(offset + 8)?,
            twitter: row.get(offset + 9)?,
            instagram: row.get(offset + 10)?,
            linkedin: row.get(offset + 11)?,
        },
        how_to_get_involved: row.get(offset + 12)?,
        application_required: row.get(offset + 13)?,
        application_available: row.get(offset + 14)?,
        listserv_available: row.get(offset + 15)?,
        image_url: row.get(offset + 16)?,
        ics_import_url: row.get(offset + 17)?,
    })
}

/// Convert a SQLite row to a Tag.
///
/// Expected columns: id, name
pub fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;

    Ok(Tag {
        id: parse_uuid(&id)?,
        name,
    })
}

// ============================================================================
// Event conversions
// ============================================================================

/// Convert a SQLite row to an Event.
///
/// Expected columns: id, club_id, name, start_time, end_time, location, url,
/// image_url, description, is_ics_event, ics_uuid
pub fn row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let start_time: String = row.get(3)?;
    let end_time: String = row.get(4)?;
    let ics_uuid: String = row.get(10)?;

    Ok(Event {
        id: row.get(0)?,
        club_id: row.get(1)?,
        name: row.get(2)?,
        start_time: parse_datetime(&start_time)?,
        end_time: parse_datetime(&end_time)?,
        location: row.get(5)?,
        url: row.get(6)?,
        image_url: row.get(7)?,
        description: row.get(8)?,
        is_ics_event: row.get(9)?,
        ics_uuid: parse_uuid(&ics_uuid)?,
    })
}

// ============================================================================
// Membership conversions
// ============================================================================

/// Convert a SQLite row to a Membership.
///
/// Expected columns: club_id, person_id, title, role, active, created_at, updated_at
pub fn row_to_membership(row: &Row) -> rusqlite::Result<Membership> {
    membership_from_row(row, 0)
}

fn membership_from_row(row: &Row, offset: usize) -> rusqlite::Result<Membership> {
    let person_id: String = row.get(offset + 1)?;
    let role: i64 = row.get(offset + 3)?;
    let created_at: String = row.get(offset + 5)?;
    let updated_at: String = row.get(offset + 6)?;

    Ok(Membership {
        club_id: row.get(offset)?,
        person_id: parse_uuid(&person_id)?,
        title: row.get(offset + 2)?,
        role: parse_role(role)?,
        active: row.get(offset + 4)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a row to Person with membership (from JOIN query).
///
/// Expected columns: person columns followed by membership columns
pub fn row_to_person_with_membership(row: &Row) -> rusqlite::Result<(Person, Membership)> {
    let person = person_from_row(row, 0)?;
    let membership = membership_from_row(row, PERSON_COLUMNS)?;
    Ok((person, membership))
}

/// Convert a row to Club with membership (from JOIN query).
///
/// Expected columns: club columns followed by membership columns
pub fn row_to_club_with_membership(row: &Row) -> rusqlite::Result<(Club, Membership)> {
    let club = club_from_row(row, 0)?;
    let membership = membership_from_row(row, CLUB_COLUMNS)?;
    Ok((club, membership))
}

// ============================================================================
// Note conversions
// ============================================================================

/// Convert a SQLite row to a NoteTag.
///
/// Expected columns: id, name
pub fn row_to_note_tag(row: &Row) -> rusqlite::Result<NoteTag> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;

    Ok(NoteTag {
        id: parse_uuid(&id)?,
        name,
    })
}

/// Convert a SQLite row to a Note without its tags.
///
/// Expected columns: id, creator_id, creating_club_id, subject_club_id, title,
/// content, creating_club_permission, outside_club_permission, created_at, updated_at
pub fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    let id: String = row.get(0)?;
    let creator_id: String = row.get(1)?;
    let creating_permission: i64 = row.get(6)?;
    let outside_permission: i64 = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(Note {
        id: parse_uuid(&id)?,
        creator_id: parse_uuid(&creator_id)?,
        creating_club_id: row.get(2)?,
        subject_club_id: row.get(3)?,
        title: row.get(4)?,
        content: row.get(5)?,
        creating_club_permission: CreatingClubPermission::from_value(creating_permission)
            .ok_or_else(|| invalid_code("creating club permission", creating_permission))?,
        outside_club_permission: OutsideClubPermission::from_value(outside_permission)
            .ok_or_else(|| invalid_code("outside club permission", outside_permission))?,
        note_tags: Vec::new(),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Club application conversions
// ============================================================================

/// Convert a SQLite row to a ClubApplication.
///
/// Expected columns: id, club_id, name, application_start_time,
/// application_end_time, result_release_time, application_url, created_at, updated_at
pub fn row_to_application(row: &Row) -> rusqlite::Result<ClubApplication> {
    let id: String = row.get(0)?;
    let start: String = row.get(3)?;
    let end: String = row.get(4)?;
    let release: String = row.get(5)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(ClubApplication {
        id: parse_uuid(&id)?,
        club_id: row.get(1)?,
        name: row.get(2)?,
        application_start_time: parse_datetime(&start)?,
        application_end_time: parse_datetime(&end)?,
        result_release_time: parse_datetime(&release)?,
        application_url: row.get(6)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn invalid_code(kind: &str, value: i64) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Integer,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Unknown {kind}: {value}"),
        )),
    )
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a MembershipRole from its stored code.
fn parse_role(value: i64) -> rusqlite::Result<MembershipRole> {
    MembershipRole::from_value(value).ok_or_else(|| invalid_code("membership role", value))
}

/// Parse a ClubSize from its stored code.
fn parse_size(value: i64) -> rusqlite::Result<ClubSize> {
    ClubSize::from_value(value).ok_or_else(|| invalid_code("club size", value))
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
///
/// Fixed-width so lexicographic order in SQL matches chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
