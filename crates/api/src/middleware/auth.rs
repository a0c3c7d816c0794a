//! Role guard for mutating routes

use axum::{extract::Request, middleware::Next, response::Response};
use pressroom_common::{
    auth::{AuthContext, Role},
    errors::Result,
};

/// Roles allowed to create, change or delete content
pub const EDITORIAL_ROLES: &[Role] = &[Role::Admin];

/// Reject the request unless the bearer token carries an admin role.
///
/// Missing or invalid tokens fail in the `AuthContext` extractor with 401;
/// a valid token with another role gets 403.
pub async fn admin_only(auth: AuthContext, request: Request, next: Next) -> Result<Response> {
    if let Err(e) = auth.require_role(EDITORIAL_ROLES) {
        tracing::warn!(
            user_id = %auth.user_id,
            role = %auth.role,
            method = %request.method(),
            path = %request.uri().path(),
            "Mutation rejected"
        );
        return Err(e);
    }

    Ok(next.run(request).await)
}
