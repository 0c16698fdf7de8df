use async_trait::async_trait;
use kernel::model::identity::{AccessToken, VerifiedIdentity};
use kernel::repository::identity::{TokenVerifier, VerificationFailure};
use serde::{Deserialize, Serialize};
use shared::{
    config::IdentityConfig,
    error::{AppError, AppResult},
};

/// Verifies bearer tokens against the external identity service over HTTP.
pub struct HttpTokenVerifier {
    client: reqwest::Client,
    verify_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    uid: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
struct VerifyErrorResponse {
    code: Option<String>,
}

impl HttpTokenVerifier {
    pub fn new(cfg: &IdentityConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;
        Ok(Self {
            client,
            verify_url: cfg.verify_url.clone(),
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &AccessToken) -> Result<VerifiedIdentity, VerificationFailure> {
        let res = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest {
                id_token: token.as_str(),
            })
            .send()
            .await
            .map_err(|e| VerificationFailure::Unavailable(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let code = res
                .json::<VerifyErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.code);
            tracing::debug!(%status, code = code.as_deref(), "Identity service rejected token");
            return Err(classify(code.as_deref()));
        }

        let body = res
            .json::<VerifyResponse>()
            .await
            .map_err(|e| VerificationFailure::Unavailable(e.to_string()))?;

        // a token without an email cannot be tied to listings or bookings
        let email = body
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(VerificationFailure::Invalid)?;

        Ok(VerifiedIdentity {
            subject: body.uid,
            email,
            name: body.name,
            picture: body.picture,
        })
    }
}

fn classify(code: Option<&str>) -> VerificationFailure {
    match code {
        Some("auth/id-token-expired") => VerificationFailure::Expired,
        Some("auth/id-token-revoked") => VerificationFailure::Revoked,
        _ => VerificationFailure::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn stub(status: StatusCode, body: Value) -> HttpTokenVerifier {
        let app = Router::new().route(
            "/verify",
            post(move |Json(req): Json<Value>| async move {
                assert!(req["idToken"].is_string());
                (status, Json(body))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        HttpTokenVerifier::new(&IdentityConfig {
            verify_url: format!("http://{addr}/verify"),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    fn token() -> AccessToken {
        AccessToken("eyJhbGciOiJSUzI1NiJ9.payload.signature".into())
    }

    #[test]
    fn error_codes_map_to_failures() {
        assert_eq!(classify(Some("auth/id-token-expired")), VerificationFailure::Expired);
        assert_eq!(classify(Some("auth/id-token-revoked")), VerificationFailure::Revoked);
        assert_eq!(classify(Some("auth/argument-error")), VerificationFailure::Invalid);
        assert_eq!(classify(None), VerificationFailure::Invalid);
    }

    #[tokio::test]
    async fn accepted_token_yields_claims() {
        let verifier = stub(
            StatusCode::OK,
            json!({
                "uid": "MtbnZOeu1YUoYL07U1DciWu3OcH3",
                "email": "fahim@example.com",
                "name": "Fahim Faysal",
            }),
        )
        .await;

        let identity = verifier.verify(&token()).await.unwrap();
        assert_eq!(identity.subject, "MtbnZOeu1YUoYL07U1DciWu3OcH3");
        assert_eq!(identity.email, "fahim@example.com");
        assert_eq!(identity.name.as_deref(), Some("Fahim Faysal"));
        assert_eq!(identity.picture, None);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let verifier = stub(
            StatusCode::UNAUTHORIZED,
            json!({ "code": "auth/id-token-expired" }),
        )
        .await;

        let err = verifier.verify(&token()).await.unwrap_err();
        assert_eq!(err, VerificationFailure::Expired);
    }

    #[tokio::test]
    async fn claims_without_email_are_invalid() {
        let verifier = stub(StatusCode::OK, json!({ "uid": "abc" })).await;

        let err = verifier.verify(&token()).await.unwrap_err();
        assert_eq!(err, VerificationFailure::Invalid);
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let verifier = HttpTokenVerifier::new(&IdentityConfig {
            verify_url: "http://127.0.0.1:9/verify".into(),
            timeout: Duration::from_millis(500),
        })
        .unwrap();

        let err = verifier.verify(&token()).await.unwrap_err();
        assert!(matches!(err, VerificationFailure::Unavailable(_)));
    }
}
