use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles as an explicit total order. Authorization rules compare
/// ranks instead of checking membership lists per call site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    GolfCourse,
    Partner,
    ExternalManager,
    InternalManager,
    TeamLeader,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn rank(&self) -> u8 {
        match self {
            Role::Member => 0,
            Role::GolfCourse => 1,
            Role::Partner => 2,
            Role::ExternalManager => 3,
            Role::InternalManager => 4,
            Role::TeamLeader => 5,
            Role::Admin => 6,
            Role::SuperAdmin => 7,
        }
    }

    /// True when this role sits at or above `required` in the hierarchy.
    pub fn at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Partner and every sales/operations role above it may work the
    /// reservation sheet.
    pub fn is_manager(&self) -> bool {
        self.at_least(Role::Partner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "MEMBER",
            Role::GolfCourse => "GOLF_COURSE",
            Role::Partner => "PARTNER",
            Role::ExternalManager => "EXTERNAL_MANAGER",
            Role::InternalManager => "INTERNAL_MANAGER",
            Role::TeamLeader => "TEAM_LEADER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "MEMBER" => Some(Role::Member),
            "GOLF_COURSE" => Some(Role::GolfCourse),
            "PARTNER" => Some(Role::Partner),
            "EXTERNAL_MANAGER" => Some(Role::ExternalManager),
            "INTERNAL_MANAGER" => Some(Role::InternalManager),
            "TEAM_LEADER" => Some(Role::TeamLeader),
            "ADMIN" => Some(Role::Admin),
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor behind an operation. Session handling is the
/// web layer's concern; the core only reads identity, role and team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

impl Principal {
    pub fn new(id: Uuid, role: Role, team_id: Option<Uuid>) -> Self {
        Self { id, role, team_id }
    }
}
