use std::sync::Arc;

use warp::{
    reject::{self, Rejection},
    Filter,
};

use crate::server::reply::ApiError;

use super::jwt::{Claims, TokenVerifier};

/// Guards a route behind `permission`. The wrapped handler only runs once
/// the full credential check has passed, and receives the verified claims.
pub fn with_permission(
    permission: &'static str,
    verifier: Arc<TokenVerifier>,
) -> impl Filter<Extract = (Claims,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let verifier = verifier.clone();
        async move {
            verifier
                .authorize(header.as_deref(), permission)
                .map_err(|e| reject::custom(ApiError::from(e)))
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;

    use crate::jwt::generate_token;
    use crate::permissions;

    use super::*;

    const KID: &str = "main";
    const SECRET: &str = "filter-test-secret";
    const ISSUER: &str = "https://issuer.test/";
    const AUDIENCE: &str = "drinks";

    fn verifier() -> Arc<TokenVerifier> {
        let mut secrets = HashMap::new();
        secrets.insert(KID.to_string(), SECRET.to_string());
        Arc::new(TokenVerifier::new(ISSUER.to_string(), AUDIENCE.to_string(), &secrets).unwrap())
    }

    fn token(permission_set: &[&str]) -> String {
        let claims = Claims::new(
            ISSUER.to_string(),
            "tester".to_string(),
            AUDIENCE.to_string(),
            Duration::hours(1),
            Some(permission_set.iter().map(|p| p.to_string()).collect()),
        );
        generate_token(KID, SECRET, claims)
    }

    #[tokio::test]
    async fn passes_claims_through_on_success() {
        let filter = with_permission(permissions::GET_DRINKS_DETAIL, verifier());

        let claims = warp::test::request()
            .header(
                "authorization",
                format!("Bearer {}", token(&[permissions::GET_DRINKS_DETAIL])),
            )
            .filter(&filter)
            .await
            .unwrap();

        assert_eq!(claims.sub, "tester");
    }

    #[tokio::test]
    async fn rejects_with_401_when_header_is_missing() {
        let filter = with_permission(permissions::GET_DRINKS_DETAIL, verifier());

        let err = warp::test::request().filter(&filter).await.unwrap_err();
        assert_eq!(err.find::<ApiError>().unwrap().code, 401);
    }

    #[tokio::test]
    async fn rejects_with_403_when_permission_is_missing() {
        let filter = with_permission(permissions::DELETE_DRINKS, verifier());

        let err = warp::test::request()
            .header(
                "authorization",
                format!("Bearer {}", token(&[permissions::PATCH_DRINKS])),
            )
            .filter(&filter)
            .await
            .unwrap_err();

        assert_eq!(err.find::<ApiError>().unwrap().code, 403);
    }
}
