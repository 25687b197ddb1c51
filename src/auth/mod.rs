use thiserror::Error;

pub mod policy;
pub mod principal;
pub mod roles;
pub mod token;

pub use policy::{AuthorizationPolicy, EffectiveTenant, PrincipalRule, TenantRule, TENANT_HEADER};
pub use principal::{AuthContext, GuardianPrincipal, StaffPrincipal};
pub use roles::Role;
pub use token::TokenVerifier;

/// Typed failures from the verification/resolution/guard chain. Guards and
/// resolvers return these instead of throwing; the single boundary in
/// `crate::error` turns each one into its HTTP status and JSON body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Kept distinct from `InvalidToken` for logs and tests; responds with
    /// the same 401 so clients get no token-freshness oracle.
    #[error("invalid token: expired")]
    ExpiredToken,

    #[error("unrecognized guardian token shape: {0}")]
    UnrecognizedGuardianShape(String),

    #[error("role not permitted for this resource")]
    RoleForbidden,

    #[error("token does not carry an academy id")]
    TenantRequired,

    #[error("an academy must be selected via the x-academia-id header")]
    TenantSelectionRequired,
}
