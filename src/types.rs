use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Permission class attached to every identity.
///
/// A closed enum: tokens carrying any other role string fail verification
/// instead of falling through a conditional. There is **no hierarchy** —
/// `SuperAdmin` is not implicitly a member of any other allow-list, and every
/// gate call site enumerates every role it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    /// Head of a jamia (institution director).
    Mudeer,
    /// Hostel/mess administrator.
    Nazim,
    Teacher,
    Staff,
    Student,
}

impl Role {
    /// Every role, in privilege order. Handy for tests and admin UIs.
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Mudeer,
        Role::Nazim,
        Role::Teacher,
        Role::Staff,
        Role::Student,
    ];

    /// Wire name of the role (matches the serde representation).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Mudeer => "mudeer",
            Self::Nazim => "nazim",
            Self::Teacher => "teacher",
            Self::Staff => "staff",
            Self::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "mudeer" => Ok(Self::Mudeer),
            "nazim" => Ok(Self::Nazim),
            "teacher" => Ok(Self::Teacher),
            "staff" => Ok(Self::Staff),
            "student" => Ok(Self::Student),
            other => Err(Error::Token(format!("unknown role: {other}"))),
        }
    }
}

/// Subject identifier carried in the session credential (opaque string).
///
/// The consumer chooses the format (ULID, ObjectId hex, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tenant identifier: the individual institution a record is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct JamiaId(pub String);

/// Feature-module name used in license allow-lists (e.g. "attendance",
/// "fees", "hostel").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct ModuleKey(pub String);

impl From<&str> for ModuleKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_name() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert!("principal".parse::<Role>().is_err());
        assert!("SUPER_ADMIN".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let parsed: Role = serde_json::from_str("\"mudeer\"").unwrap();
        assert_eq!(parsed, Role::Mudeer);
    }

    #[test]
    fn newtypes_prevent_mixing() {
        fn takes_user_id(_: &UserId) {}
        fn takes_jamia_id(_: &JamiaId) {}

        let user = UserId::from("id".to_string());
        let jamia = JamiaId::from("id".to_string());

        takes_user_id(&user);
        takes_jamia_id(&jamia);
        // takes_user_id(&jamia);  // Compile error!
        // takes_jamia_id(&user);  // Compile error!
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = JamiaId::from("jamia-042".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"jamia-042\"");
    }
}
