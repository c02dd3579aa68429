use super::jwt::{AuthError, AuthErrorKind, Claims};

/* Permission strings carried in the `permissions` claim. */

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Checks that the verified claims grant `required`.
pub fn check(claims: &Claims, required: &str) -> Result<(), AuthError> {
    let permissions = claims.permissions.as_ref().ok_or_else(|| {
        AuthErrorKind::InvalidClaims.with_status(400, "Permissions not included in JWT")
    })?;

    if !permissions.iter().any(|p| p == required) {
        return Err(AuthErrorKind::Unauthorized.new("Permission not found"));
    }

    Ok(())
}
