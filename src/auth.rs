use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::{Payload, ServiceResponse};
use actix_web::error::ErrorUnauthorized;
use actix_web::http::header;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Server-wide configuration shared with every handler.
#[derive(Clone)]
pub struct ServerConfig {
    /// HS256 secret shared with the identity provider.
    pub secret: String,
    /// Base URL of the external identity provider.
    pub auth_service_url: String,
}

/// Claims issued by the external identity provider.
///
/// The decoded claims are stored verbatim in the identity session after the
/// sign-in handoff, so extraction on later requests does not re-verify the
/// JWT signature, only the expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject identifier assigned by the identity provider.
    pub sub: String,
    pub email: String,
    /// Hub the user operates on; scopes every repository query.
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Verify a JWT handed over by the identity provider.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    /// Whether the claims' expiry timestamp has passed.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        (self.exp as i64) <= now
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = Identity::from_request(req, payload)
            .into_inner()
            .map_err(|_| ErrorUnauthorized("not signed in"))
            .and_then(|identity| {
                let id = identity
                    .id()
                    .map_err(|_| ErrorUnauthorized("no identity"))?;
                let user: AuthenticatedUser = serde_json::from_str(&id)
                    .map_err(|_| ErrorUnauthorized("malformed identity"))?;
                if user.is_expired() {
                    return Err(ErrorUnauthorized("session expired"));
                }
                Ok(user)
            });
        ready(result)
    }
}

/// Check whether `role` is present in the user's role list.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Error handler that rewrites `401 Unauthorized` into a redirect to the
/// sign-in handoff page. Registered with `ErrorHandlers` in `main`.
pub fn redirect_unauthorized<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/na"))
        .finish()
        .map_into_right_body::<B>();
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
        req, response,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["viewer".to_string(), "admin".to_string()];

        assert!(check_role("admin", &roles));
        assert!(!check_role("adm", &roles));
        assert!(!check_role("admin", &[]));
    }

    #[test]
    fn expired_claims_are_rejected() {
        let user = AuthenticatedUser {
            sub: "u1".into(),
            email: "u@example.com".into(),
            hub_id: 1,
            name: "U".into(),
            roles: vec![],
            exp: 0,
        };

        assert!(user.is_expired());
    }
}
