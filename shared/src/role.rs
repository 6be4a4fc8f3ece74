use serde::{Deserialize, Serialize};

/// Route of the fixed Settings button, shared by every role.
pub const SETTINGS_ROUTE: &str = "/settings";

/// Ids reserved for the fixed Home/Settings buttons. Never user-assignable.
pub const STRUCTURAL_IDS: [&str; 2] = ["dashboard", "settings"];

/// Role the user picked on the role-selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Abiturient,
    Student,
    Staff,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Abiturient, Role::Student, Role::Staff, Role::Admin];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "abiturient" => Some(Self::Abiturient),
            "student" => Some(Self::Student),
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Abiturient => "abiturient",
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Abiturient => "Абитуриент",
            Self::Student => "Студент",
            Self::Staff => "Сотрудник",
            Self::Admin => "Руководитель",
        }
    }

    /// Home route of the role's dashboard.
    pub fn dashboard_route(self) -> &'static str {
        match self {
            Self::Abiturient => "/dashboard/abiturient",
            Self::Student => "/dashboard/student",
            Self::Staff => "/dashboard/staff",
            Self::Admin => "/dashboard/admin",
        }
    }
}

/// How much of a role's catalog the caller may see.
///
/// Only the student catalog is gated; other roles ignore this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Auth state not resolved (or not applicable). Treated as full access.
    #[default]
    Unknown,
    Public,
    Authenticated,
}

impl Access {
    pub fn from_authenticated(authenticated: Option<bool>) -> Self {
        match authenticated {
            Some(true) => Self::Authenticated,
            Some(false) => Self::Public,
            None => Self::Unknown,
        }
    }

    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

pub fn is_structural_id(id: &str) -> bool {
    STRUCTURAL_IDS.contains(&id)
}
