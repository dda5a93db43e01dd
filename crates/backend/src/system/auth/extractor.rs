use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::system::auth::TokenClaims;

use crate::shared::error::ApiError;

/// Caller of an authenticated route, as verified by `require_auth`.
/// Row ownership on entity tables is checked against `claims.sub`.
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().cloned().ok_or_else(|| {
            ApiError::Unauthorized("No verified session on this request".to_string())
        })?;
        Ok(CurrentUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims() -> TokenClaims {
        TokenClaims {
            sub: "u1".to_string(),
            email: "jane@acme.com".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn verified_claims_become_the_caller() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(claims());
        let user = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id(), "u1");
    }

    #[tokio::test]
    async fn missing_claims_are_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
