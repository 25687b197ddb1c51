use super::principal::{AuthContext, StaffPrincipal};
use super::roles::Role;
use super::AuthError;

/// Header a cross-academy principal uses to select the academy a request
/// operates on. Ignored for every other role.
pub const TENANT_HEADER: &str = "x-academia-id";

/// Which principal shape a route accepts.
#[derive(Debug, Clone, Copy)]
pub enum PrincipalRule {
    /// Staff principal whose role is a member of the set.
    Staff(&'static [Role]),
    /// Guardian principal only; role-like claims are never consulted.
    Guardian,
}

/// How the effective academy id is produced for the route.
#[derive(Debug, Clone, Copy)]
pub enum TenantRule {
    /// Role-dependent resolution: token claim for bound roles, selection
    /// header for the cross-academy role.
    Scoped,
    /// No academy resolution. Guardian routes scope by the caller's own
    /// rut; a few staff routes (e.g. whoami) need no scope at all.
    None,
}

/// Declarative per-route authorization: role set plus scoping mode. Each
/// route attaches exactly one policy and `middleware::authorize` is the
/// only evaluator, so no route can forget a guard or order guards wrong.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationPolicy {
    pub principal: PrincipalRule,
    pub tenant: TenantRule,
}

impl AuthorizationPolicy {
    pub const fn staff(allowed: &'static [Role]) -> Self {
        Self {
            principal: PrincipalRule::Staff(allowed),
            tenant: TenantRule::None,
        }
    }

    pub const fn guardian() -> Self {
        Self {
            principal: PrincipalRule::Guardian,
            tenant: TenantRule::None,
        }
    }

    pub const fn tenant_scoped(mut self) -> Self {
        self.tenant = TenantRule::Scoped;
        self
    }

    /// Pure predicate over the resolved context. Denials are logged with
    /// the attempted role and the allowed set for audit.
    pub fn check_principal(&self, context: &AuthContext) -> Result<(), AuthError> {
        match (self.principal, context) {
            (PrincipalRule::Staff(allowed), AuthContext::Staff(staff)) => {
                match staff.role() {
                    Some(role) if allowed.contains(&role) => Ok(()),
                    _ => {
                        tracing::warn!(
                            attempted_role = ?staff.role_id,
                            allowed = ?allowed,
                            user_id = ?staff.user_id,
                            "staff role denied"
                        );
                        Err(AuthError::RoleForbidden)
                    }
                }
            }
            (PrincipalRule::Staff(allowed), AuthContext::Guardian(_)) => {
                tracing::warn!(allowed = ?allowed, "guardian principal on staff route");
                Err(AuthError::RoleForbidden)
            }
            (PrincipalRule::Guardian, AuthContext::Guardian(_)) => Ok(()),
            (PrincipalRule::Guardian, AuthContext::Staff(_)) => Err(AuthError::RoleForbidden),
        }
    }

    /// Role-dependent academy resolution. `header` is the raw value of
    /// [`TENANT_HEADER`] when present; only the cross-academy role reads it.
    pub fn resolve_tenant(
        &self,
        context: &AuthContext,
        header: Option<&str>,
    ) -> Result<Option<EffectiveTenant>, AuthError> {
        match self.tenant {
            TenantRule::None => Ok(None),
            TenantRule::Scoped => match context {
                AuthContext::Staff(staff) => resolve_staff_tenant(staff, header).map(Some),
                // Scoped policies are staff-only; guardian resources use
                // per-resource self-ownership instead of an academy id.
                AuthContext::Guardian(_) => Err(AuthError::RoleForbidden),
            },
        }
    }
}

/// Effective academy id for one request, resolved once by the policy
/// executor and passed explicitly to every downstream query and ownership
/// check. Computed fresh per request, never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveTenant(pub i64);

fn resolve_staff_tenant(
    staff: &StaffPrincipal,
    header: Option<&str>,
) -> Result<EffectiveTenant, AuthError> {
    match staff.role() {
        // Cross-academy role must pick one explicitly; denying here is
        // deliberate, not a fallback to "all academies".
        Some(Role::SuperAdmin) => header
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(EffectiveTenant)
            .ok_or(AuthError::TenantSelectionRequired),
        // Bound roles use the token claim; the selection header has no
        // effect on them.
        _ => staff
            .tenant_id
            .map(EffectiveTenant)
            .ok_or(AuthError::TenantRequired),
    }
}
