//! Staff role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available to bar staff.
///
/// Roles are ordered by privilege level: Admin > Manager > Bartender > Trainee.
/// Only admins receive notification-center events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Full administrator: user management, content management, notifications.
    Admin,
    /// Shift manager: can edit procedures and cocktail content.
    Manager,
    /// Regular bar staff.
    Bartender,
    /// Staff in training; test sections only.
    Trainee,
}

impl StaffRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 4,
            Self::Manager => 3,
            Self::Bartender => 2,
            Self::Trainee => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &StaffRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Bartender => "bartender",
            Self::Trainee => "trainee",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = barkeep_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "bartender" => Ok(Self::Bartender),
            "trainee" => Ok(Self::Trainee),
            _ => Err(barkeep_core::AppError::validation(format!(
                "Invalid staff role: '{s}'. Expected one of: admin, manager, bartender, trainee"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(StaffRole::Admin.has_at_least(&StaffRole::Trainee));
        assert!(StaffRole::Admin.has_at_least(&StaffRole::Admin));
        assert!(StaffRole::Manager.has_at_least(&StaffRole::Bartender));
        assert!(!StaffRole::Trainee.has_at_least(&StaffRole::Bartender));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<StaffRole>().unwrap(), StaffRole::Admin);
        assert_eq!("TRAINEE".parse::<StaffRole>().unwrap(), StaffRole::Trainee);
        assert!("barback".parse::<StaffRole>().is_err());
    }
}
