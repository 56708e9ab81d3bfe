use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a membership when none is provided.
pub const DEFAULT_MEMBERSHIP_TITLE: &str = "Member";

/// A person known to the identity subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl Person {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Per-person profile data. At most one profile exists per person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub person_id: Uuid,
    /// Expected graduation year. Unknown years are never swept.
    pub graduation_year: Option<i32>,
}

impl Profile {
    pub fn new(person_id: Uuid, graduation_year: Option<i32>) -> Self {
        Self {
            person_id,
            graduation_year,
        }
    }
}

/// Seniority of a member within a club.
///
/// Variants are declared from most to least senior, so `Owner < Officer < Member`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipRole {
    Owner,
    Officer,
    #[default]
    Member,
}

impl MembershipRole {
    /// Returns the stored integer code. Lower codes are more senior.
    pub fn value(&self) -> i64 {
        match self {
            MembershipRole::Owner => 0,
            MembershipRole::Officer => 10,
            MembershipRole::Member => 20,
        }
    }

    /// Parses a stored integer code.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(MembershipRole::Owner),
            10 => Some(MembershipRole::Officer),
            20 => Some(MembershipRole::Member),
            _ => None,
        }
    }

    /// Returns true if this role is at least as senior as `other`.
    pub fn is_at_least(&self, other: MembershipRole) -> bool {
        *self <= other
    }
}

/// Association of a person with a club.
///
/// Memberships are never removed when someone leaves through graduation;
/// they are marked inactive so the club's history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub club_id: String,
    pub person_id: Uuid,
    pub title: String,
    pub role: MembershipRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Creates an active membership with the default title.
    pub fn new(club_id: impl Into<String>, person_id: Uuid, role: MembershipRole) -> Self {
        let now = Utc::now();
        Self {
            club_id: club_id.into(),
            person_id,
            title: DEFAULT_MEMBERSHIP_TITLE.to_string(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner(club_id: impl Into<String>, person_id: Uuid) -> Self {
        Self::new(club_id, person_id, MembershipRole::Owner)
    }

    pub fn officer(club_id: impl Into<String>, person_id: Uuid) -> Self {
        Self::new(club_id, person_id, MembershipRole::Officer)
    }

    pub fn member(club_id: impl Into<String>, person_id: Uuid) -> Self {
        Self::new(club_id, person_id, MembershipRole::Member)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Marks the membership inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
