use super::types::Membership;

/// Returns the active memberships, most senior first.
///
/// Ties within a role keep the order they were created in.
pub fn active_roster(memberships: &[Membership]) -> Vec<&Membership> {
    let mut roster: Vec<&Membership> = memberships.iter().filter(|m| m.active).collect();
    roster.sort_by(|a, b| a.role.cmp(&b.role).then(a.created_at.cmp(&b.created_at)));
    roster
}

/// Counts memberships that currently count toward a roster.
pub fn count_active(memberships: &[Membership]) -> usize {
    memberships.iter().filter(|m| m.active).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipRole;
    use uuid::Uuid;

    #[test]
    fn test_active_roster_excludes_inactive() {
        let memberships = vec![
            Membership::member("penn-labs", Uuid::new_v4()),
            Membership::owner("penn-labs", Uuid::new_v4()).inactive(),
            Membership::officer("penn-labs", Uuid::new_v4()),
        ];

        let roster = active_roster(&memberships);

        assert_eq!(roster.len(), 2);
        assert_eq!(count_active(&memberships), 2);
        assert!(roster.iter().all(|m| m.active));
    }

    #[test]
    fn test_active_roster_orders_by_seniority() {
        let memberships = vec![
            Membership::member("penn-labs", Uuid::new_v4()),
            Membership::officer("penn-labs", Uuid::new_v4()),
            Membership::owner("penn-labs", Uuid::new_v4()),
        ];

        let roles: Vec<_> = active_roster(&memberships).iter().map(|m| m.role).collect();

        assert_eq!(
            roles,
            vec![
                MembershipRole::Owner,
                MembershipRole::Officer,
                MembershipRole::Member
            ]
        );
    }
}
