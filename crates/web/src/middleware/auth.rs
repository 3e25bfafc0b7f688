use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use storage::models::{ROLE_ADMIN, ROLE_USER};
use uuid::Uuid;

use crate::error::WebError;

/// Claims carried by tokens issued by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

/// The verified caller, available to handlers behind `require_auth`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn require_admin(&self) -> Result<(), WebError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(WebError::Forbidden("Administrator role required".to_string()))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// HS256 verification keys
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Check signature and expiry; only the two known roles are accepted.
    pub fn verify(&self, token: &str) -> Result<AuthUser, WebError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| WebError::Unauthorized(format!("Invalid token: {}", e)))?
            .claims;

        if claims.role != ROLE_ADMIN && claims.role != ROLE_USER {
            return Err(WebError::Unauthorized(format!(
                "Unknown role: {}",
                claims.role
            )));
        }

        Ok(AuthUser::from(claims))
    }
}

pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| WebError::Unauthorized("Missing bearer token".to_string()))?;

    let user = keys.verify(token.trim())?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use tower::ServiceExt;

    use super::*;

    pub(crate) const TEST_SECRET: &str = "test-secret";

    pub(crate) fn token_for(user_id: Uuid, role: &str, secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: user_id,
            username: "tester".to_string(),
            role: role.to_string(),
            exp: exp as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub(crate) fn valid_token(role: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        token_for(Uuid::from_u128(42), role, TEST_SECRET, exp)
    }

    #[test]
    fn test_valid_token_yields_caller() {
        let keys = JwtKeys::from_secret(TEST_SECRET);
        let user = keys.verify(&valid_token(ROLE_ADMIN)).unwrap();

        assert_eq!(user.user_id, Uuid::from_u128(42));
        assert_eq!(user.username, "tester");
        assert!(user.is_admin());
        assert!(user.require_admin().is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let keys = JwtKeys::from_secret(TEST_SECRET);
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = token_for(Uuid::new_v4(), ROLE_USER, "other-secret", exp);

        assert!(matches!(keys.verify(&token), Err(WebError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = JwtKeys::from_secret(TEST_SECRET);
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = token_for(Uuid::new_v4(), ROLE_USER, TEST_SECRET, exp);

        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let keys = JwtKeys::from_secret(TEST_SECRET);

        assert!(matches!(
            keys.verify(&valid_token("GUEST")),
            Err(WebError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_regular_user_is_not_admin() {
        let user = JwtKeys::from_secret(TEST_SECRET)
            .verify(&valid_token(ROLE_USER))
            .unwrap();
        assert!(matches!(user.require_admin(), Err(WebError::Forbidden(_))));
    }

    fn protected_app() -> Router {
        async fn whoami(Extension(user): Extension<AuthUser>) -> String {
            user.username
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                JwtKeys::from_secret(TEST_SECRET),
                require_auth,
            ))
    }

    #[tokio::test]
    async fn test_middleware_requires_bearer_token() {
        let response = protected_app()
            .oneshot(HttpRequest::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_passes_verified_caller() {
        let response = protected_app()
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", valid_token(ROLE_USER)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
