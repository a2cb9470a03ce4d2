use std::sync::Arc;

use account_service::domain::user::service::OnboardingService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserStore;
use async_trait::async_trait;
use auth::IdentityVerifier;
use auth::Provider;
use auth::TokenIssuer;
use auth::VerifyError;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Stand-in identity verifier.
///
/// Accepts Google tokens of the form `idtoken:<email>` and returns the email
/// as the verified claim; everything else is rejected the way a real
/// signature/expiry failure would be.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify_email(&self, token: &str, provider: Provider) -> Result<String, VerifyError> {
        match provider {
            Provider::Facebook => Err(VerifyError::UnsupportedProvider(provider)),
            Provider::Google => token
                .strip_prefix("idtoken:")
                .map(str::to_string)
                .ok_or_else(|| VerifyError::InvalidToken("signature mismatch".to_string())),
        }
    }
}

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryUserStore::new());
        let verifier = Arc::new(StubVerifier);
        let token_issuer = Arc::new(TokenIssuer::new(TEST_SECRET, "account-service"));

        let onboarding = Arc::new(OnboardingService::new(store, verifier, token_issuer));
        let router = create_router(onboarding);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Bearer value the stub verifier resolves to `email`.
    pub fn idp_token_for(email: &str) -> String {
        format!("Bearer idtoken:{email}")
    }
}
