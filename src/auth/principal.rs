use serde_json::Value;

use super::roles::Role;
use super::AuthError;

/// Ordered alias tables for the logical claim fields. Token issuers have
/// shipped several spellings over the years; the first alias that yields a
/// usable value wins. Alias tolerance lives here as data so it stays
/// independently testable.
const ROLE_ALIASES: &[&str] = &["rol_id", "role_id", "roleId", "rol", "role"];
const TENANT_ALIASES: &[&str] = &[
    "academia_id",
    "academy_id",
    "academiaId",
    "academyId",
    "academia",
];
const USER_ID_ALIASES: &[&str] = &["usuario_id", "user_id", "userId", "sub", "id"];
const NAME_ALIASES: &[&str] = &["nombre", "name", "display_name", "username"];
const GUARDIAN_ID_ALIASES: &[&str] = &["apoderado_id", "apoderadoId", "id"];

/// Older issuer versions nest the principal under one of these keys.
const NESTING_KEYS: &[&str] = &["user", "payload"];

/// Principal-type discriminator value marking a guardian token. Absent or
/// anything else means staff.
const GUARDIAN_TYPE: &str = "apoderado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffPrincipal {
    pub user_id: Option<i64>,
    /// Raw role id from the token. Absence does not fail resolution; the
    /// role guard rejects such principals on every staff route.
    pub role_id: Option<i64>,
    /// Embedded academy id for tenant-bound roles. Invalid values read as
    /// absent, never as an error.
    pub tenant_id: Option<i64>,
    pub display_name: String,
}

impl StaffPrincipal {
    pub fn role(&self) -> Option<Role> {
        self.role_id.and_then(Role::from_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianPrincipal {
    /// Exactly 8 ASCII digits, validated at resolution time.
    pub rut: String,
    pub guardian_id: Option<i64>,
}

/// Canonical principal for one request, attached to the request extensions
/// by the auth middleware and immutable for the request's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Staff(StaffPrincipal),
    Guardian(GuardianPrincipal),
}

impl AuthContext {
    pub fn staff(&self) -> Option<&StaffPrincipal> {
        match self {
            AuthContext::Staff(staff) => Some(staff),
            AuthContext::Guardian(_) => None,
        }
    }

    pub fn guardian(&self) -> Option<&GuardianPrincipal> {
        match self {
            AuthContext::Guardian(guardian) => Some(guardian),
            AuthContext::Staff(_) => None,
        }
    }
}

/// Normalize a raw claim set into an `AuthContext`. Never performs I/O;
/// the only failure mode is a guardian token with a malformed rut.
pub fn resolve(claims: &Value) -> Result<AuthContext, AuthError> {
    let claims = unwrap_nesting(claims);

    if is_guardian(claims) {
        let rut = claim_string(claims, &["rut"])
            .ok_or_else(|| AuthError::UnrecognizedGuardianShape("missing rut".into()))?;

        if !is_valid_rut(&rut) {
            return Err(AuthError::UnrecognizedGuardianShape(
                "rut must be exactly 8 digits".into(),
            ));
        }

        return Ok(AuthContext::Guardian(GuardianPrincipal {
            rut,
            guardian_id: claim_int(claims, GUARDIAN_ID_ALIASES),
        }));
    }

    Ok(AuthContext::Staff(StaffPrincipal {
        user_id: claim_int(claims, USER_ID_ALIASES),
        role_id: claim_int(claims, ROLE_ALIASES),
        tenant_id: claim_int(claims, TENANT_ALIASES),
        display_name: claim_string(claims, NAME_ALIASES).unwrap_or_default(),
    }))
}

fn unwrap_nesting(claims: &Value) -> &Value {
    for key in NESTING_KEYS {
        if let Some(inner) = claims.get(key) {
            if inner.is_object() {
                return inner;
            }
        }
    }
    claims
}

fn is_guardian(claims: &Value) -> bool {
    claims
        .get("type")
        .and_then(Value::as_str)
        .map(|t| t.trim().eq_ignore_ascii_case(GUARDIAN_TYPE))
        .unwrap_or(false)
}

/// First alias with a usable string value. Numbers are stringified so
/// issuers that emit the rut as a number still resolve.
fn claim_string(claims: &Value, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        match claims.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// First alias that coerces to a finite integer > 0. Values that fail
/// coercion are skipped, so one garbled alias does not mask a later one.
fn claim_int(claims: &Value, aliases: &[&str]) -> Option<i64> {
    aliases
        .iter()
        .filter_map(|key| claims.get(*key))
        .find_map(coerce_positive_int)
}

fn coerce_positive_int(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        })?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (n > 0).then_some(n)
}

fn is_valid_rut(rut: &str) -> bool {
    rut.len() == 8 && rut.bytes().all(|b| b.is_ascii_digit())
}
