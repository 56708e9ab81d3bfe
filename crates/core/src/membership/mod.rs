mod roster;
mod types;

pub use roster::{active_roster, count_active};
pub use types::{Membership, MembershipRole, Person, Profile, DEFAULT_MEMBERSHIP_TITLE};
