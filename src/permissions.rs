use std::collections::HashSet;
use serde::Deserialize;

/// Name of a role on the platform, as configured and as seen on a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// True if the actor holds at least one of the required roles.
/// An empty requirement grants nothing.
pub fn has_access(actor_roles: &HashSet<RoleName>, required_roles: &[RoleName]) -> bool {
    required_roles.iter().any(|role| actor_roles.contains(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> HashSet<RoleName> {
        names.iter().map(|n| RoleName::from(*n)).collect()
    }

    #[test]
    fn access_needs_a_shared_role() {
        let required = vec![RoleName::from("Tutor"), RoleName::from("Admin")];
        assert!(has_access(&roles(&["Student", "Admin"]), &required));
        assert!(!has_access(&roles(&["Student"]), &required));
        assert!(!has_access(&roles(&[]), &required));
    }

    #[test]
    fn empty_requirement_denies_everyone() {
        assert!(!has_access(&roles(&["Tutor", "Admin"]), &[]));
    }

    #[test]
    fn role_names_are_case_sensitive() {
        assert!(!has_access(&roles(&["tutor"]), &[RoleName::from("Tutor")]));
    }

    #[test]
    fn role_names_deserialize_from_plain_strings() {
        let configured: Vec<RoleName> = serde_json::from_str(r#"["Tutor", "Admin"]"#).unwrap();
        assert!(has_access(&roles(&["Admin"]), &configured));
    }
}
