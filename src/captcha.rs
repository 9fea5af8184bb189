//! CAPTCHA verification for the login throttle.
//!
//! The throttle only depends on the `verify(token) -> bool` contract; the
//! provider's HTTP protocol stays behind [`RecaptchaVerifier`]. Transport
//! failures verify as `false` (fail closed).

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::warn;

/// Contract the login throttle consumes.
pub trait CaptchaVerifier: Send + Sync {
    /// Verify a challenge token. `false` on any failure.
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, bool>;
}

/// Verifier backed by a reCAPTCHA-style siteverify endpoint.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl RecaptchaVerifier {
    /// Create a verifier for the given endpoint and shared secret.
    pub fn new(verify_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret: secret.into(),
            verify_url: verify_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
}

impl CaptchaVerifier for RecaptchaVerifier {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let params = [("secret", self.secret.as_str()), ("response", token)];

            let response = match self.client.post(&self.verify_url).form(&params).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "captcha siteverify request failed");
                    return false;
                }
            };

            match response.json::<SiteVerifyResponse>().await {
                Ok(body) => body.success,
                Err(e) => {
                    warn!(error = %e, "captcha siteverify response unreadable");
                    false
                }
            }
        })
    }
}

/// Verifier with a fixed answer.
///
/// Used when remote verification is disabled (any non-empty token passes)
/// and throughout the tests.
pub struct StaticVerifier(pub bool);

impl CaptchaVerifier for StaticVerifier {
    fn verify<'a>(&'a self, _token: &'a str) -> BoxFuture<'a, bool> {
        let answer = self.0;
        Box::pin(async move { answer })
    }
}
