use serde::{Deserialize, Serialize};

/// Staff role catalog. The numeric ids are part of the token contract and
/// are stored in the `roles` table; this enum is the only place they are
/// given meaning.
///
/// | id | role       | tenant binding                              |
/// |----|------------|---------------------------------------------|
/// | 1  | OrgAdmin   | bound to one academy for the token lifetime |
/// | 2  | Staff      | bound to one academy for the token lifetime |
/// | 3  | SuperAdmin | cross-academy, selects one per request      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    OrgAdmin = 1,
    Staff = 2,
    SuperAdmin = 3,
}

impl Role {
    pub fn from_id(id: i64) -> Option<Role> {
        match id {
            1 => Some(Role::OrgAdmin),
            2 => Some(Role::Staff),
            3 => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_id(self) -> i64 {
        self as i64
    }

    /// Roles 1 and 2 carry their academy in the token; role 3 must select
    /// one explicitly on every request.
    pub fn is_tenant_bound(self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::OrgAdmin => "org_admin",
            Role::Staff => "staff",
            Role::SuperAdmin => "super_admin",
        }
    }
}
