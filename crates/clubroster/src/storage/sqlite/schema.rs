//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
///
/// Foreign keys are off by default in SQLite and must be enabled on every
/// connection for the cascades below to apply.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- People table (mirrors the identity subsystem)
CREATE TABLE IF NOT EXISTS people (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL
);

-- Profiles table (at most one per person)
CREATE TABLE IF NOT EXISTS profiles (
    person_id TEXT PRIMARY KEY,
    graduation_year INTEGER,
    FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
);

-- Clubs table
CREATE TABLE IF NOT EXISTS clubs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    subtitle TEXT NOT NULL,
    description TEXT NOT NULL,
    founded TEXT,
    size INTEGER NOT NULL DEFAULT 1,
    email TEXT,
    website TEXT,
    facebook TEXT,
    twitter TEXT,
    instagram TEXT,
    linkedin TEXT,
    how_to_get_involved TEXT NOT NULL,
    application_required INTEGER NOT NULL DEFAULT 1,
    application_available INTEGER NOT NULL DEFAULT 0,
    listserv_available INTEGER NOT NULL DEFAULT 0,
    image_url TEXT,
    ics_import_url TEXT
);

-- Tags table
CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- Club/tag join table
CREATE TABLE IF NOT EXISTS club_tags (
    club_id TEXT NOT NULL,
    tag_id TEXT NOT NULL,
    PRIMARY KEY (club_id, tag_id),
    FOREIGN KEY (club_id) REFERENCES clubs(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

-- Events table
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    club_id TEXT NOT NULL,
    name TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    location TEXT,
    url TEXT,
    image_url TEXT,
    description TEXT NOT NULL,
    is_ics_event INTEGER NOT NULL DEFAULT 0,
    ics_uuid TEXT NOT NULL,
    FOREIGN KEY (club_id) REFERENCES clubs(id) ON DELETE CASCADE
);

-- Memberships table
CREATE TABLE IF NOT EXISTS memberships (
    club_id TEXT NOT NULL,
    person_id TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT 'Member',
    role INTEGER NOT NULL DEFAULT 20,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (club_id, person_id),
    FOREIGN KEY (club_id) REFERENCES clubs(id) ON DELETE CASCADE,
    FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
);

-- Note tags table
CREATE TABLE IF NOT EXISTS note_tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- Notes table
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    creator_id TEXT NOT NULL,
    creating_club_id TEXT NOT NULL,
    subject_club_id TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT 'Note',
    content TEXT NOT NULL,
    creating_club_permission INTEGER NOT NULL DEFAULT 30,
    outside_club_permission INTEGER NOT NULL DEFAULT 30,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (creator_id) REFERENCES people(id) ON DELETE CASCADE,
    FOREIGN KEY (creating_club_id) REFERENCES clubs(id) ON DELETE CASCADE,
    FOREIGN KEY (subject_club_id) REFERENCES clubs(id) ON DELETE CASCADE
);

-- Note/note tag join table
CREATE TABLE IF NOT EXISTS note_note_tags (
    note_id TEXT NOT NULL,
    note_tag_id TEXT NOT NULL,
    PRIMARY KEY (note_id, note_tag_id),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE,
    FOREIGN KEY (note_tag_id) REFERENCES note_tags(id) ON DELETE CASCADE
);

-- Club application cycles table
CREATE TABLE IF NOT EXISTS club_applications (
    id TEXT PRIMARY KEY,
    club_id TEXT NOT NULL,
    name TEXT,
    application_start_time TEXT NOT NULL,
    application_end_time TEXT NOT NULL,
    result_release_time TEXT NOT NULL,
    application_url TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (club_id) REFERENCES clubs(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_profiles_graduation_year ON profiles(graduation_year);
CREATE INDEX IF NOT EXISTS idx_clubs_name ON clubs(name);
CREATE INDEX IF NOT EXISTS idx_events_club_id ON events(club_id);
CREATE INDEX IF NOT EXISTS idx_memberships_person_id ON memberships(person_id);
CREATE INDEX IF NOT EXISTS idx_notes_subject_club_id ON notes(subject_club_id);
CREATE INDEX IF NOT EXISTS idx_club_applications_club_id ON club_applications(club_id);
"#;

// Person queries
pub const INSERT_PERSON: &str = r#"
INSERT INTO people (id, username, email)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_PERSON_BY_ID: &str = r#"
SELECT id, username, email
FROM people
WHERE id = ?1
"#;

pub const DELETE_PERSON: &str = r#"
DELETE FROM people
WHERE id = ?1
"#;

pub const SELECT_PROFILE: &str = r#"
SELECT person_id, graduation_year
FROM profiles
WHERE person_id = ?1
"#;

pub const UPSERT_PROFILE: &str = r#"
INSERT INTO profiles (person_id, graduation_year)
VALUES (?1, ?2)
ON CONFLICT(person_id) DO UPDATE SET graduation_year = excluded.graduation_year
"#;

// Club queries
pub const INSERT_CLUB: &str = r#"
INSERT INTO clubs (id, name, subtitle, description, founded, size, email, website, facebook, twitter, instagram, linkedin, how_to_get_involved, application_required, application_available, listserv_available, image_url, ics_import_url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
"#;

pub const SELECT_CLUB_BY_ID: &str = r#"
SELECT id, name, subtitle, description, founded, size, email, website, facebook, twitter, instagram, linkedin, how_to_get_involved, application_required, application_available, listserv_available, image_url, ics_import_url
FROM clubs
WHERE id = ?1
"#;

pub const SELECT_ALL_CLUBS: &str = r#"
SELECT id, name, subtitle, description, founded, size, email, website, facebook, twitter, instagram, linkedin, how_to_get_involved, application_required, application_available, listserv_available, image_url, ics_import_url
FROM clubs
ORDER BY name ASC, id ASC
"#;

pub const UPDATE_CLUB: &str = r#"
UPDATE clubs
SET name = ?2, subtitle = ?3, description = ?4, founded = ?5, size = ?6, email = ?7, website = ?8, facebook = ?9, twitter = ?10, instagram = ?11, linkedin = ?12, how_to_get_involved = ?13, application_required = ?14, application_available = ?15, listserv_available = ?16, image_url = ?17, ics_import_url = ?18
WHERE id = ?1
"#;

pub const DELETE_CLUB: &str = r#"
DELETE FROM clubs
WHERE id = ?1
"#;

// Tag queries
pub const INSERT_TAG: &str = r#"
INSERT INTO tags (id, name)
VALUES (?1, ?2)
"#;

pub const SELECT_TAGS_FOR_CLUB: &str = r#"
SELECT t.id, t.name
FROM tags t
INNER JOIN club_tags ct ON t.id = ct.tag_id
WHERE ct.club_id = ?1
ORDER BY t.name ASC
"#;

pub const INSERT_CLUB_TAG: &str = r#"
INSERT OR IGNORE INTO club_tags (club_id, tag_id)
VALUES (?1, ?2)
"#;

pub const DELETE_CLUB_TAG: &str = r#"
DELETE FROM club_tags
WHERE club_id = ?1 AND tag_id = ?2
"#;

// Event queries
pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, club_id, name, start_time, end_time, location, url, image_url, description, is_ics_event, ics_uuid)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const SELECT_EVENT_BY_ID: &str = r#"
SELECT id, club_id, name, start_time, end_time, location, url, image_url, description, is_ics_event, ics_uuid
FROM events
WHERE id = ?1
"#;

pub const SELECT_EVENTS_FOR_CLUB: &str = r#"
SELECT id, club_id, name, start_time, end_time, location, url, image_url, description, is_ics_event, ics_uuid
FROM events
WHERE club_id = ?1
ORDER BY start_time ASC
"#;

pub const UPDATE_EVENT: &str = r#"
UPDATE events
SET name = ?2, start_time = ?3, end_time = ?4, location = ?5, url = ?6, image_url = ?7, description = ?8, is_ics_event = ?9, ics_uuid = ?10
WHERE id = ?1
"#;

pub const DELETE_EVENT: &str = r#"
DELETE FROM events
WHERE id = ?1
"#;

// Membership queries
pub const INSERT_MEMBERSHIP: &str = r#"
INSERT INTO memberships (club_id, person_id, title, role, active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_MEMBERSHIP: &str = r#"
SELECT club_id, person_id, title, role, active, created_at, updated_at
FROM memberships
WHERE club_id = ?1 AND person_id = ?2
"#;

pub const SELECT_MEMBERS_FOR_CLUB: &str = r#"
SELECT p.id, p.username, p.email, m.club_id, m.person_id, m.title, m.role, m.active, m.created_at, m.updated_at
FROM people p
INNER JOIN memberships m ON p.id = m.person_id
WHERE m.club_id = ?1 AND m.active = 1
ORDER BY m.role ASC, m.created_at ASC
"#;

pub const SELECT_CLUBS_FOR_PERSON: &str = r#"
SELECT c.id, c.name, c.subtitle, c.description, c.founded, c.size, c.email, c.website, c.facebook, c.twitter, c.instagram, c.linkedin, c.how_to_get_involved, c.application_required, c.application_available, c.listserv_available, c.image_url, c.ics_import_url,
       m.club_id, m.person_id, m.title, m.role, m.active, m.created_at, m.updated_at
FROM clubs c
INNER JOIN memberships m ON c.id = m.club_id
WHERE m.person_id = ?1 AND m.active = 1
ORDER BY c.name ASC
"#;

pub const UPDATE_MEMBERSHIP: &str = r#"
UPDATE memberships
SET title = ?3, role = ?4, active = ?5, updated_at = ?6
WHERE club_id = ?1 AND person_id = ?2
"#;

pub const DELETE_MEMBERSHIP: &str = r#"
DELETE FROM memberships
WHERE club_id = ?1 AND person_id = ?2
"#;

/// Bulk graduation sweep. `?1` is the cutoff year.
///
/// A NULL graduation year never satisfies `<=`, and people without a
/// profile row are absent from the subquery.
pub const DEACTIVATE_GRADUATED_MEMBERSHIPS: &str = r#"
UPDATE memberships
SET active = 0
WHERE active = 1
  AND person_id IN (
    SELECT person_id
    FROM profiles
    WHERE graduation_year <= ?1
  )
"#;

// Note queries
pub const INSERT_NOTE_TAG: &str = r#"
INSERT INTO note_tags (id, name)
VALUES (?1, ?2)
"#;

pub const INSERT_NOTE: &str = r#"
INSERT INTO notes (id, creator_id, creating_club_id, subject_club_id, title, content, creating_club_permission, outside_club_permission, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const INSERT_NOTE_NOTE_TAG: &str = r#"
INSERT OR IGNORE INTO note_note_tags (note_id, note_tag_id)
VALUES (?1, ?2)
"#;

pub const SELECT_NOTE_BY_ID: &str = r#"
SELECT id, creator_id, creating_club_id, subject_club_id, title, content, creating_club_permission, outside_club_permission, created_at, updated_at
FROM notes
WHERE id = ?1
"#;

pub const SELECT_NOTES_ABOUT_CLUB: &str = r#"
SELECT id, creator_id, creating_club_id, subject_club_id, title, content, creating_club_permission, outside_club_permission, created_at, updated_at
FROM notes
WHERE subject_club_id = ?1
ORDER BY created_at DESC
"#;

pub const SELECT_TAGS_FOR_NOTE: &str = r#"
SELECT t.id, t.name
FROM note_tags t
INNER JOIN note_note_tags nt ON t.id = nt.note_tag_id
WHERE nt.note_id = ?1
ORDER BY t.name ASC
"#;

pub const DELETE_NOTE: &str = r#"
DELETE FROM notes
WHERE id = ?1
"#;

// Club application queries
pub const INSERT_APPLICATION: &str = r#"
INSERT INTO club_applications (id, club_id, name, application_start_time, application_end_time, result_release_time, application_url, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const SELECT_APPLICATION_BY_ID: &str = r#"
SELECT id, club_id, name, application_start_time, application_end_time, result_release_time, application_url, created_at, updated_at
FROM club_applications
WHERE id = ?1
"#;

pub const SELECT_APPLICATIONS_FOR_CLUB: &str = r#"
SELECT id, club_id, name, application_start_time, application_end_time, result_release_time, application_url, created_at, updated_at
FROM club_applications
WHERE club_id = ?1
ORDER BY application_start_time ASC
"#;

pub const DELETE_APPLICATION: &str = r#"
DELETE FROM club_applications
WHERE id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        for table in [
            "people",
            "profiles",
            "clubs",
            "tags",
            "club_tags",
            "events",
            "memberships",
            "note_tags",
            "notes",
            "note_note_tags",
            "club_applications",
        ] {
            assert!(
                CREATE_TABLES.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
        assert!(CREATE_TABLES.contains("PRAGMA foreign_keys = ON"));
    }

    #[test]
    fn test_graduation_sweep_is_a_single_bulk_update() {
        assert!(DEACTIVATE_GRADUATED_MEMBERSHIPS.trim_start().starts_with("UPDATE memberships"));
        assert!(DEACTIVATE_GRADUATED_MEMBERSHIPS.contains("active = 1"));
        assert!(DEACTIVATE_GRADUATED_MEMBERSHIPS.contains("graduation_year <= ?1"));
    }

    #[test]
    fn test_roster_queries_only_read_active_memberships() {
        assert!(SELECT_MEMBERS_FOR_CLUB.contains("m.active = 1"));
        assert!(SELECT_CLUBS_FOR_PERSON.contains("m.active = 1"));
        assert!(!SELECT_MEMBERSHIP.contains("active = 1"));
    }
}
