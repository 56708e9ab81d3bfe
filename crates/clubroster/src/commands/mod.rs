//! Maintenance commands run from the command line.

pub mod graduate_users;
