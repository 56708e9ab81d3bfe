use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported headcount bracket of a club.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClubSize {
    #[default]
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl ClubSize {
    /// Returns the stored integer code for this size.
    pub fn value(&self) -> i64 {
        match self {
            ClubSize::Small => 1,
            ClubSize::Medium => 2,
            ClubSize::Large => 3,
            ClubSize::VeryLarge => 4,
        }
    }

    /// Parses a stored integer code.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(ClubSize::Small),
            2 => Some(ClubSize::Medium),
            3 => Some(ClubSize::Large),
            4 => Some(ClubSize::VeryLarge),
            _ => None,
        }
    }

    /// Human-readable member range.
    pub fn label(&self) -> &'static str {
        match self {
            ClubSize::Small => "1-20",
            ClubSize::Medium => "21-50",
            ClubSize::Large => "51-100",
            ClubSize::VeryLarge => "101+",
        }
    }
}

/// Public contact and social links for a club. Every link is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLinks {
    pub email: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

/// A student club listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Unique slug, used as the primary key.
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub description: String,
    pub founded: Option<NaiveDate>,
    pub size: ClubSize,
    pub links: ContactLinks,
    pub how_to_get_involved: String,
    pub application_required: bool,
    pub application_available: bool,
    pub listserv_available: bool,
    pub image_url: Option<String>,
    /// Calendar feed that events are imported from.
    pub ics_import_url: Option<String>,
}

impl Club {
    /// Creates a new club with the given slug and name and default settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subtitle: String::new(),
            description: String::new(),
            founded: None,
            size: ClubSize::default(),
            links: ContactLinks::default(),
            how_to_get_involved: String::new(),
            application_required: true,
            application_available: false,
            listserv_available: false,
            image_url: None,
            ics_import_url: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_size(mut self, size: ClubSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_founded(mut self, founded: NaiveDate) -> Self {
        self.founded = Some(founded);
        self
    }

    pub fn with_links(mut self, links: ContactLinks) -> Self {
        self.links = links;
        self
    }
}

/// A free-form label attached to clubs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// An event hosted by exactly one club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique slug, used as the primary key.
    pub id: String,
    pub club_id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: String,
    /// Set for events pulled in from the club's calendar feed.
    pub is_ics_event: bool,
    pub ics_uuid: Uuid,
}

impl Event {
    /// Creates a new event for a club.
    pub fn new(
        id: impl Into<String>,
        club_id: impl Into<String>,
        name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            club_id: club_id.into(),
            name: name.into(),
            start_time,
            end_time,
            location: None,
            url: None,
            image_url: None,
            description: String::new(),
            is_ics_event: false,
            ics_uuid: Uuid::new_v4(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An application cycle a club runs for prospective members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubApplication {
    pub id: Uuid,
    pub club_id: String,
    /// Optional display name, e.g. "Spring 2021 Analyst Application".
    pub name: Option<String>,
    pub application_start_time: DateTime<Utc>,
    pub application_end_time: DateTime<Utc>,
    pub result_release_time: DateTime<Utc>,
    pub application_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClubApplication {
    /// Creates a new application cycle. Timestamps are set to now.
    pub fn new(
        club_id: impl Into<String>,
        application_start_time: DateTime<Utc>,
        application_end_time: DateTime<Utc>,
        result_release_time: DateTime<Utc>,
        application_url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            club_id: club_id.into(),
            name: None,
            application_start_time,
            application_end_time,
            result_release_time,
            application_url: application_url.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true while submissions are being accepted.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.application_start_time <= now && now <= self.application_end_time
    }

    /// Returns true once results have been released.
    pub fn results_released(&self, now: DateTime<Utc>) -> bool {
        now >= self.result_release_time
    }
}
