//! In-memory repository implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
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

type MembershipKey = (String, Uuid);

fn missing_reference(entity_type: &str, id: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::InvalidData(format!("Foreign key constraint violation for {entity_type} {id}"))
}

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
///
/// Methods that take several locks acquire them in field declaration order.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    people: Arc<RwLock<HashMap<Uuid, Person>>>,
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
    clubs: Arc<RwLock<HashMap<String, Club>>>,
    tags: Arc<RwLock<HashMap<Uuid, Tag>>>,
    club_tags: Arc<RwLock<HashSet<(String, Uuid)>>>,
    events: Arc<RwLock<HashMap<String, Event>>>,
    memberships: Arc<RwLock<HashMap<MembershipKey, Membership>>>,
    note_tags: Arc<RwLock<HashMap<Uuid, NoteTag>>>,
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
    applications: Arc<RwLock<HashMap<Uuid, ClubApplication>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            people: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            clubs: Arc::new(RwLock::new(HashMap::new())),
            tags: Arc::new(RwLock::new(HashMap::new())),
            club_tags: Arc::new(RwLock::new(HashSet::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
            memberships: Arc::new(RwLock::new(HashMap::new())),
            note_tags: Arc::new(RwLock::new(HashMap::new())),
            notes: Arc::new(RwLock::new(HashMap::new())),
            applications: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl PersonRepository for InMemoryRepository {
    async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
        let people = self.people.read().await;
        Ok(people.get(&id).cloned())
    }

    async fn create_person(&self, person: &Person) -> Result<()> {
        let mut people = self.people.write().await;
        let taken = people.contains_key(&person.id)
            || people.values().any(|p| p.username == person.username);
        if taken {
            return Err(RepositoryError::already_exists("Person", person.id));
        }
        people.insert(person.id, person.clone());
        Ok(())
    }

    async fn get_profile(&self, person_id: Uuid) -> Result<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&person_id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let people = self.people.read().await;
        let mut profiles = self.profiles.write().await;
        if !people.contains_key(&profile.person_id) {
            return Err(missing_reference("Profile", profile.person_id));
        }
        profiles.insert(profile.person_id, profile.clone());
        Ok(())
    }

    async fn delete_person(&self, id: Uuid) -> Result<()> {
        let mut people = self.people.write().await;
        let mut profiles = self.profiles.write().await;
        let mut memberships = self.memberships.write().await;
        let mut notes = self.notes.write().await;

        if people.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Person", id));
        }
        profiles.remove(&id);
        memberships.retain(|(_, person_id), _| *person_id != id);
        notes.retain(|_, n| n.creator_id != id);
        Ok(())
    }
}

#[async_trait]
impl ClubRepository for InMemoryRepository {
    async fn get_club(&self, id: &str) -> Result<Option<Club>> {
        let clubs = self.clubs.read().await;
        Ok(clubs.get(id).cloned())
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let clubs = self.clubs.read().await;
        let mut result: Vec<Club> = clubs.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn create_club(&self, club: &Club) -> Result<()> {
        validate_club(club)?;

        let mut clubs = self.clubs.write().await;
        if clubs.contains_key(&club.id) {
            return Err(RepositoryError::already_exists("Club", &club.id));
        }
        clubs.insert(club.id.clone(), club.clone());
        Ok(())
    }

    async fn update_club(&self, club: &Club) -> Result<()> {
        validate_club(club)?;

        let mut clubs = self.clubs.write().await;
        if !clubs.contains_key(&club.id) {
            return Err(RepositoryError::not_found("Club", &club.id));
        }
        clubs.insert(club.id.clone(), club.clone());
        Ok(())
    }

    async fn delete_club(&self, id: &str) -> Result<()> {
        let mut clubs = self.clubs.write().await;
        let mut club_tags = self.club_tags.write().await;
        let mut events = self.events.write().await;
        let mut memberships = self.memberships.write().await;
        let mut notes = self.notes.write().await;
        let mut applications = self.applications.write().await;

        if clubs.remove(id).is_none() {
            return Err(RepositoryError::not_found("Club", id));
        }
        club_tags.retain(|(club_id, _)| club_id != id);
        events.retain(|_, e| e.club_id != id);
        memberships.retain(|(club_id, _), _| club_id != id);
        notes.retain(|_, n| n.creating_club_id != id && n.subject_club_id != id);
        applications.retain(|_, a| a.club_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryRepository {
    async fn create_tag(&self, tag: &Tag) -> Result<()> {
        let mut tags = self.tags.write().await;
        if tags.contains_key(&tag.id) {
            return Err(RepositoryError::already_exists("Tag", tag.id));
        }
        tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn get_tags_for_club(&self, club_id: &str) -> Result<Vec<Tag>> {
        let tags = self.tags.read().await;
        let club_tags = self.club_tags.read().await;

        let mut result: Vec<Tag> = club_tags
            .iter()
            .filter(|(c, _)| c == club_id)
            .filter_map(|(_, tag_id)| tags.get(tag_id).cloned())
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn add_tag_to_club(&self, club_id: &str, tag_id: Uuid) -> Result<()> {
        let clubs = self.clubs.read().await;
        let tags = self.tags.read().await;
        let mut club_tags = self.club_tags.write().await;

        if !clubs.contains_key(club_id) || !tags.contains_key(&tag_id) {
            return Err(missing_reference("Tag", tag_id));
        }
        club_tags.insert((club_id.to_string(), tag_id));
        Ok(())
    }

    async fn remove_tag_from_club(&self, club_id: &str, tag_id: Uuid) -> Result<()> {
        let mut club_tags = self.club_tags.write().await;
        if !club_tags.remove(&(club_id.to_string(), tag_id)) {
            return Err(RepositoryError::not_found("Tag", tag_id));
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(id).cloned())
    }

    async fn get_events_for_club(&self, club_id: &str) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut result: Vec<Event> = events
            .values()
            .filter(|e| e.club_id == club_id)
            .cloned()
            .collect();
        result.sort_by_key(|e| e.start_time);
        Ok(result)
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        validate_event(event)?;

        let clubs = self.clubs.read().await;
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepositoryError::already_exists("Event", &event.id));
        }
        if !clubs.contains_key(&event.club_id) {
            return Err(missing_reference("Event", &event.id));
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        validate_event(event)?;

        let mut events = self.events.write().await;
        let Some(existing) = events.get_mut(&event.id) else {
            return Err(RepositoryError::not_found("Event", &event.id));
        };
        // The owning club is fixed at creation
        let club_id = existing.club_id.clone();
        *existing = Event {
            club_id,
            ..event.clone()
        };
        Ok(())
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let mut events = self.events.write().await;
        if events.remove(id).is_none() {
            return Err(RepositoryError::not_found("Event", id));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryRepository {
    async fn get_membership(&self, club_id: &str, person_id: Uuid) -> Result<Option<Membership>> {
        let memberships = self.memberships.read().await;
        Ok(memberships
            .get(&(club_id.to_string(), person_id))
            .cloned())
    }

    async fn get_members_for_club(&self, club_id: &str) -> Result<Vec<(Person, Membership)>> {
        let people = self.people.read().await;
        let memberships = self.memberships.read().await;

        let mut result: Vec<(Person, Membership)> = memberships
            .values()
            .filter(|m| m.club_id == club_id && m.active)
            .filter_map(|m| people.get(&m.person_id).map(|p| (p.clone(), m.clone())))
            .collect();
        result.sort_by(|(_, a), (_, b)| {
            a.role
                .cmp(&b.role)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(result)
    }

    async fn get_clubs_for_person(&self, person_id: Uuid) -> Result<Vec<(Club, Membership)>> {
        let clubs = self.clubs.read().await;
        let memberships = self.memberships.read().await;

        let mut result: Vec<(Club, Membership)> = memberships
            .values()
            .filter(|m| m.person_id == person_id && m.active)
            .filter_map(|m| clubs.get(&m.club_id).map(|c| (c.clone(), m.clone())))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create_membership(&self, membership: &Membership) -> Result<()> {
        let people = self.people.read().await;
        let clubs = self.clubs.read().await;
        let mut memberships = self.memberships.write().await;

        let key = (membership.club_id.clone(), membership.person_id);
        let id = format!("{}:{}", membership.club_id, membership.person_id);
        if memberships.contains_key(&key) {
            return Err(RepositoryError::already_exists("Membership", id));
        }
        if !people.contains_key(&membership.person_id) || !clubs.contains_key(&membership.club_id)
        {
            return Err(missing_reference("Membership", id));
        }
        memberships.insert(key, membership.clone());
        Ok(())
    }

    async fn update_membership(&self, membership: &Membership) -> Result<()> {
        let mut memberships = self.memberships.write().await;
        let key = (membership.club_id.clone(), membership.person_id);
        let Some(existing) = memberships.get_mut(&key) else {
            return Err(RepositoryError::not_found(
                "Membership",
                format!("{}:{}", membership.club_id, membership.person_id),
            ));
        };
        existing.title = membership.title.clone();
        existing.role = membership.role;
        existing.active = membership.active;
        existing.updated_at = membership.updated_at;
        Ok(())
    }

    async fn delete_membership(&self, club_id: &str, person_id: Uuid) -> Result<()> {
        let mut memberships = self.memberships.write().await;
        if memberships
            .remove(&(club_id.to_string(), person_id))
            .is_none()
        {
            return Err(RepositoryError::not_found(
                "Membership",
                format!("{club_id}:{person_id}"),
            ));
        }
        Ok(())
    }

    async fn deactivate_graduated(&self, cutoff_year: i32) -> Result<u64> {
        let profiles = self.profiles.read().await;
        let mut memberships = self.memberships.write().await;

        let mut deactivated = 0;
        for membership in memberships.values_mut().filter(|m| m.active) {
            let graduated = profiles
                .get(&membership.person_id)
                .and_then(|p| p.graduation_year)
                .is_some_and(|year| year <= cutoff_year);
            if graduated {
                membership.active = false;
                deactivated += 1;
            }
        }
        Ok(deactivated)
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn create_note_tag(&self, tag: &NoteTag) -> Result<()> {
        let mut note_tags = self.note_tags.write().await;
        if note_tags.contains_key(&tag.id) {
            return Err(RepositoryError::already_exists("NoteTag", tag.id));
        }
        note_tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).cloned())
    }

    async fn get_notes_about_club(&self, club_id: &str) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut result: Vec<Note> = notes
            .values()
            .filter(|n| n.subject_club_id == club_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let people = self.people.read().await;
        let clubs = self.clubs.read().await;
        let note_tags = self.note_tags.read().await;
        let mut notes = self.notes.write().await;

        if notes.contains_key(&note.id) {
            return Err(RepositoryError::already_exists("Note", note.id));
        }
        let references_ok = people.contains_key(&note.creator_id)
            && clubs.contains_key(&note.creating_club_id)
            && clubs.contains_key(&note.subject_club_id)
            && note.note_tags.iter().all(|t| note_tags.contains_key(&t.id));
        if !references_ok {
            return Err(missing_reference("Note", note.id));
        }

        let mut stored = note.clone();
        stored.note_tags.sort_by(|a, b| a.name.cmp(&b.name));
        stored.note_tags.dedup_by_key(|t| t.id);
        notes.insert(note.id, stored);
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        if notes.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Note", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryRepository {
    async fn get_application(&self, id: Uuid) -> Result<Option<ClubApplication>> {
        let applications = self.applications.read().await;
        Ok(applications.get(&id).cloned())
    }

    async fn get_applications_for_club(&self, club_id: &str) -> Result<Vec<ClubApplication>> {
        let applications = self.applications.read().await;
        let mut result: Vec<ClubApplication> = applications
            .values()
            .filter(|a| a.club_id == club_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.application_start_time);
        Ok(result)
    }

    async fn create_application(&self, application: &ClubApplication) -> Result<()> {
        validate_application(application)?;

        let clubs = self.clubs.read().await;
        let mut applications = self.applications.write().await;
        if applications.contains_key(&application.id) {
            return Err(RepositoryError::already_exists(
                "ClubApplication",
                application.id,
            ));
        }
        if !clubs.contains_key(&application.club_id) {
            return Err(missing_reference("ClubApplication", application.id));
        }
        applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn delete_application(&self, id: Uuid) -> Result<()> {
        let mut applications = self.applications.write().await;
        if applications.remove(&id).is_none() {
            return Err(RepositoryError::not_found("ClubApplication", id));
        }
        Ok(())
    }
}
