//! Deactivates the club memberships of people who have graduated.
//!
//! Usage: clubroster graduate-users

use clubroster_core::graduation::{Clock, GraduationReport, GraduationSweep};
use clubroster_core::storage::MembershipRepository;

use crate::config::Config;

/// Graduate users command arguments.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GraduateUsersCommand {}

/// Run the graduate users command.
pub async fn run(
    _cmd: GraduateUsersCommand,
    repo: &dyn MembershipRepository,
    config: &Config,
    clock: &dyn Clock,
) -> anyhow::Result<GraduationReport> {
    let sweep = GraduationSweep::new(config.time_zone);

    tracing::info!(time_zone = %config.time_zone, "Starting graduation sweep");

    let report = sweep
        .run(repo, clock)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate graduated memberships: {e}"))?;

    tracing::info!(
        cutoff_year = report.cutoff_year,
        deactivated = report.deactivated,
        "Graduation sweep finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use clubroster_core::club::Club;
    use clubroster_core::graduation::FixedClock;
    use clubroster_core::membership::{Membership, Person, Profile};
    use clubroster_core::storage::{ClubRepository, PersonRepository};

    use super::*;
    use crate::storage::InMemoryRepository;

    async fn enroll(
        repo: &InMemoryRepository,
        club_id: &str,
        username: &str,
        graduation_year: Option<i32>,
        active: bool,
    ) -> Person {
        let person = Person::new(username, format!("{username}@example.edu"));
        repo.create_person(&person).await.unwrap();
        repo.save_profile(&Profile::new(person.id, graduation_year))
            .await
            .unwrap();
        let membership = Membership::member(club_id, person.id);
        let membership = if active {
            membership
        } else {
            membership.inactive()
        };
        repo.create_membership(&membership).await.unwrap();
        person
    }

    fn test_config() -> Config {
        Config {
            sqlite_path: ":memory:".to_string(),
            time_zone: chrono_tz::Tz::America__New_York,
        }
    }

    #[tokio::test]
    async fn test_graduate_users_reports_count() {
        let repo = InMemoryRepository::new();
        repo.create_club(&Club::new("penn-labs", "Penn Labs"))
            .await
            .unwrap();
        let a = enroll(&repo, "penn-labs", "a", Some(2023), true).await;
        let b = enroll(&repo, "penn-labs", "b", Some(2024), true).await;
        let c = enroll(&repo, "penn-labs", "c", Some(2022), false).await;
        let d = enroll(&repo, "penn-labs", "d", None, true).await;
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());

        let report = run(GraduateUsersCommand::default(), &repo, &test_config(), &clock)
            .await
            .unwrap();

        assert_eq!(report.cutoff_year, 2023);
        assert_eq!(report.deactivated, 1);
        assert_eq!(
            report.to_string(),
            "Updated the membership status of 1 student club relationships!"
        );

        let active = |id: uuid::Uuid| {
            let repo = repo.clone();
            async move {
                repo.get_membership("penn-labs", id)
                    .await
                    .unwrap()
                    .map(|m| m.active)
            }
        };
        assert_eq!(active(a.id).await, Some(false));
        assert_eq!(active(b.id).await, Some(true));
        assert_eq!(active(c.id).await, Some(false));
        assert_eq!(active(d.id).await, Some(true));
    }

    #[tokio::test]
    async fn test_graduate_users_with_nothing_to_do() {
        let repo = InMemoryRepository::new();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());

        let report = run(GraduateUsersCommand::default(), &repo, &test_config(), &clock)
            .await
            .unwrap();

        assert_eq!(report.deactivated, 0);
        assert_eq!(
            report.to_string(),
            "Updated the membership status of 0 student club relationships!"
        );
    }

    #[tokio::test]
    async fn test_new_year_boundary_uses_configured_zone() {
        let repo = InMemoryRepository::new();
        repo.create_club(&Club::new("penn-labs", "Penn Labs"))
            .await
            .unwrap();
        enroll(&repo, "penn-labs", "class-of-2024", Some(2024), true).await;
        // 02:00 UTC on New Year's Day is still Dec 31 in New York
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap());

        let report = run(GraduateUsersCommand::default(), &repo, &test_config(), &clock)
            .await
            .unwrap();

        assert_eq!(report.cutoff_year, 2023);
        assert_eq!(report.deactivated, 0);
    }

    #[tokio::test]
    async fn test_utc_zone_uses_utc_year() {
        let repo = InMemoryRepository::new();
        let config = Config {
            time_zone: chrono_tz::Tz::UTC,
            ..test_config()
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap());

        let report = run(GraduateUsersCommand::default(), &repo, &config, &clock)
            .await
            .unwrap();

        assert_eq!(report.cutoff_year, 2024);
    }
}
