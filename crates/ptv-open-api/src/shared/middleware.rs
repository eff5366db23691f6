//! API Middleware
//!
//! Access requirements from the dispatch table are applied per route as
//! middleware. A passing request carries its [`AuthContext`] in the
//! extensions, where the [`Authenticated`] extractor picks it up.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::auth::{extract_bearer_token, AuthContext, TokenValidator};
use crate::shared::error::ApiError;
use crate::version::AccessRequirement;

/// Token validator paired with the requirement of one route.
#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<TokenValidator>,
    requirement: AccessRequirement,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenValidator>, requirement: AccessRequirement) -> Self {
        Self { tokens, requirement }
    }

    /// 401 for a missing or invalid token, 403 for a missing role or right.
    pub fn admit(&self, authorization: Option<&str>) -> Result<Option<AuthContext>, ApiError> {
        if !self.requirement.needs_token() {
            return Ok(None);
        }

        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;
        let claims = self.tokens.validate_token(token)?;
        let ctx = AuthContext::from_claims(&claims);
        self.requirement.authorize(&ctx)?;
        Ok(Some(ctx))
    }
}

pub async fn require_access(
    State(gate): State<AccessGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Some(ctx) = gate.admit(authorization)? {
        tracing::debug!(subject = %ctx.subject, "Caller admitted");
        request.extensions_mut().insert(ctx);
    }

    Ok(next.run(request).await)
}

/// Wrap the methods of `route` with the gate.
pub fn guarded<S>(route: MethodRouter<S>, gate: AccessGate) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(gate, require_access))
}

/// Authenticated caller extractor
pub struct Authenticated(pub AuthContext);

impl std::ops::Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessRight, AccessTokenClaims, Role};
    use ptv_config::AuthConfig;

    fn validator() -> Arc<TokenValidator> {
        Arc::new(TokenValidator::new(&AuthConfig {
            jwt_secret: "secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
        }))
    }

    fn token(validator: &TokenValidator, role: &str) -> String {
        validator
            .sign(&AccessTokenClaims {
                sub: "user".into(),
                iss: "iss".into(),
                aud: "aud".into(),
                exp: chrono::Utc::now().timestamp() + 600,
                iat: 0,
                role: Some(role.into()),
                organization: None,
                delegated_organizations: vec![],
                access_rights: vec![],
            })
            .unwrap()
    }

    #[test]
    fn test_anonymous_gate_admits_without_token() {
        let gate = AccessGate::new(validator(), AccessRequirement::Anonymous);
        assert!(gate.admit(None).unwrap().is_none());
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let gate = AccessGate::new(validator(), AccessRequirement::Bearer);
        assert!(matches!(gate.admit(None), Err(ApiError::Unauthorized(_))));
        assert!(matches!(gate.admit(Some("Basic abc")), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_role_gate() {
        let tokens = validator();
        let gate = AccessGate::new(
            tokens.clone(),
            AccessRequirement::Roles { roles: &[Role::Eeva], access_right: None },
        );

        let header = format!("Bearer {}", token(&tokens, "Eeva"));
        let ctx = gate.admit(Some(&header)).unwrap().unwrap();
        assert_eq!(ctx.role, Some(Role::Eeva));

        let header = format!("Bearer {}", token(&tokens, "Pete"));
        assert!(matches!(gate.admit(Some(&header)), Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_access_right_gate() {
        let tokens = validator();
        let gate = AccessGate::new(
            tokens.clone(),
            AccessRequirement::Roles {
                roles: &[Role::Pete],
                access_right: Some(AccessRight::OpenApiWrite),
            },
        );
        let header = format!("Bearer {}", token(&tokens, "Pete"));
        assert!(matches!(gate.admit(Some(&header)), Err(ApiError::Forbidden(_))));
    }
}
