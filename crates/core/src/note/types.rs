use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::membership::MembershipRole;

/// Lowest role in the creating club that may read a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatingClubPermission {
    Owner,
    Officers,
    #[default]
    Members,
}

impl CreatingClubPermission {
    pub fn value(&self) -> i64 {
        match self {
            CreatingClubPermission::Owner => 10,
            CreatingClubPermission::Officers => 20,
            CreatingClubPermission::Members => 30,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            10 => Some(CreatingClubPermission::Owner),
            20 => Some(CreatingClubPermission::Officers),
            30 => Some(CreatingClubPermission::Members),
            _ => None,
        }
    }
}

/// Who outside the creating club may read a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutsideClubPermission {
    None,
    SubjectOwner,
    SubjectOfficers,
    #[default]
    SubjectMembers,
    Public,
}

impl OutsideClubPermission {
    pub fn value(&self) -> i64 {
        match self {
            OutsideClubPermission::None => 0,
            OutsideClubPermission::SubjectOwner => 10,
            OutsideClubPermission::SubjectOfficers => 20,
            OutsideClubPermission::SubjectMembers => 30,
            OutsideClubPermission::Public => 100,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(OutsideClubPermission::None),
            10 => Some(OutsideClubPermission::SubjectOwner),
            20 => Some(OutsideClubPermission::SubjectOfficers),
            30 => Some(OutsideClubPermission::SubjectMembers),
            100 => Some(OutsideClubPermission::Public),
            _ => None,
        }
    }
}

/// A label attached to notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteTag {
    pub id: Uuid,
    pub name: String,
}

impl NoteTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A note written by a member of one club about another (or the same) club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub creating_club_id: String,
    pub subject_club_id: String,
    pub title: String,
    pub content: String,
    pub creating_club_permission: CreatingClubPermission,
    pub outside_club_permission: OutsideClubPermission,
    pub note_tags: Vec<NoteTag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with default title and permissions.
    pub fn new(
        creator_id: Uuid,
        creating_club_id: impl Into<String>,
        subject_club_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            creating_club_id: creating_club_id.into(),
            subject_club_id: subject_club_id.into(),
            title: "Note".to_string(),
            content: String::new(),
            creating_club_permission: CreatingClubPermission::default(),
            outside_club_permission: OutsideClubPermission::default(),
            note_tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_permissions(
        mut self,
        creating: CreatingClubPermission,
        outside: OutsideClubPermission,
    ) -> Self {
        self.creating_club_permission = creating;
        self.outside_club_permission = outside;
        self
    }

    pub fn with_tags(mut self, tags: Vec<NoteTag>) -> Self {
        self.note_tags = tags;
        self
    }

    /// Decides whether a viewer may read this note.
    ///
    /// `creating_role` is the viewer's active role in the creating club and
    /// `subject_role` their active role in the subject club; `None` means no
    /// membership. A role passes a threshold when its code is strictly below
    /// the permission code.
    pub fn visible_to(
        &self,
        creating_role: Option<MembershipRole>,
        subject_role: Option<MembershipRole>,
    ) -> bool {
        if self.outside_club_permission == OutsideClubPermission::Public {
            return true;
        }
        if creating_role.is_some_and(|role| role.value() < self.creating_club_permission.value()) {
            return true;
        }
        subject_role.is_some_and(|role| role.value() < self.outside_club_permission.value())
    }
}
