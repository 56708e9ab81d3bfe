use super::error::{ApplicationError, ClubError, EventError};
use super::types::{Club, ClubApplication, Event};

const MAX_NAME_LEN: usize = 255;

/// Builds a URL slug from a display name.
///
/// Lowercases the name, drops punctuation, and joins words with single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    slug
}

/// Returns true if the slug is non-empty, short enough, and lowercase word characters or hyphens.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_NAME_LEN
        && slug
            .chars()
            .all(|c| (c.is_alphanumeric() && !c.is_uppercase()) || c == '-' || c == '_')
}

/// Validates a slug used as a club or event key.
pub fn validate_slug(slug: &str) -> Result<(), ClubError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ClubError::InvalidSlug(slug.to_string()))
    }
}

/// Validates a club before creation or update.
pub fn validate_club(club: &Club) -> Result<(), ClubError> {
    validate_slug(&club.id)?;
    if club.name.trim().is_empty() {
        return Err(ClubError::EmptyName);
    }
    if club.name.len() > MAX_NAME_LEN {
        return Err(ClubError::NameTooLong);
    }
    Ok(())
}

/// Validates an event before creation or update.
pub fn validate_event(event: &Event) -> Result<(), EventError> {
    if !is_valid_slug(&event.id) {
        return Err(EventError::InvalidSlug(event.id.clone()));
    }
    if event.name.trim().is_empty() {
        return Err(EventError::EmptyName);
    }
    if event.end_time < event.start_time {
        return Err(EventError::InvalidTimeRange);
    }
    Ok(())
}

/// Validates the ordering of an application cycle: start, then end, then result release.
pub fn validate_application(application: &ClubApplication) -> Result<(), ApplicationError> {
    if application.application_end_time < application.application_start_time {
        return Err(ApplicationError::EndsBeforeStart);
    }
    if application.result_release_time < application.application_end_time {
        return Err(ApplicationError::ReleaseBeforeEnd);
    }
    if application.application_url.trim().is_empty() {
        return Err(ApplicationError::MissingUrl);
    }
    Ok(())
}

/// Sorts clubs by name, the directory's listing order. Ties fall back to the slug.
pub fn sort_clubs_by_name(clubs: &mut [Club]) {
    clubs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Penn Labs"), "penn-labs");
        assert_eq!(slugify("  C++ Club  "), "c-club");
        assert_eq!(slugify("Wharton -- Investment & Trading"), "wharton-investment-trading");
        assert_eq!(slugify("snake_case_name"), "snake_case_name");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("penn-labs").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Penn Labs").is_err());
        assert!(validate_slug(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_club() {
        assert!(validate_club(&Club::new("penn-labs", "Penn Labs")).is_ok());
        assert_eq!(
            validate_club(&Club::new("penn-labs", "   ")),
            Err(ClubError::EmptyName)
        );
        assert_eq!(
            validate_club(&Club::new("penn-labs", "x".repeat(256))),
            Err(ClubError::NameTooLong)
        );
    }

    #[test]
    fn test_validate_event_time_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();

        let event = Event::new("gbm", "penn-labs", "General Body Meeting", start, end);
        assert!(validate_event(&event).is_ok());

        let backwards = Event::new("gbm", "penn-labs", "General Body Meeting", end, start);
        assert_eq!(validate_event(&backwards), Err(EventError::InvalidTimeRange));
    }

    #[test]
    fn test_validate_application_ordering() {
        let t = |day| Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap();

        let ok = ClubApplication::new("penn-labs", t(1), t(10), t(20), "https://apply");
        assert!(validate_application(&ok).is_ok());

        let same_instant = ClubApplication::new("penn-labs", t(1), t(1), t(1), "https://apply");
        assert!(validate_application(&same_instant).is_ok());

        let ends_early = ClubApplication::new("penn-labs", t(10), t(1), t(20), "https://apply");
        assert_eq!(
            validate_application(&ends_early),
            Err(ApplicationError::EndsBeforeStart)
        );

        let early_release = ClubApplication::new("penn-labs", t(1), t(10), t(5), "https://apply");
        assert_eq!(
            validate_application(&early_release),
            Err(ApplicationError::ReleaseBeforeEnd)
        );

        let no_url = ClubApplication::new("penn-labs", t(1), t(10), t(20), " ");
        assert_eq!(validate_application(&no_url), Err(ApplicationError::MissingUrl));
    }

    #[test]
    fn test_sort_clubs_by_name() {
        let mut clubs = vec![
            Club::new("b", "Zeta"),
            Club::new("a", "Alpha"),
            Club::new("c", "Mu"),
        ];

        sort_clubs_by_name(&mut clubs);

        let names: Vec<_> = clubs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mu", "Zeta"]);
    }
}
