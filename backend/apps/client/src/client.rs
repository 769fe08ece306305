//! Quote client
//!
//! Fetches quotes and, when the server answers 401, runs the
//! challenge-response handshake and retries once.

use platform::bearer::bearer_header_value;
use pow::PowJob;
use pow::presentation::dto::{ChallengeResponse, RedeemRequest, RedeemResponse};
use reqwest::header::{AUTHORIZATION, InvalidHeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;

const CHALLENGE_PATH: &str = "/challenge";
const QUOTE_PATH: &str = "/quote";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {path}")]
    UnexpectedStatus {
        path: &'static str,
        status: StatusCode,
    },

    #[error("no proof of work found within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("solver task failed: {0}")]
    Solver(#[from] tokio::task::JoinError),

    #[error("token cannot be sent as a header: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug)]
pub struct QuoteClient {
    http: Client,
    base_url: String,
    pow_deadline: Duration,
    /// Single-use; taken by the next quote request
    access_token: Option<String>,
}

impl QuoteClient {
    pub fn new(http: Client, base_url: impl Into<String>, pow_deadline: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pow_deadline,
            access_token: None,
        }
    }

    /// GET /quote, authenticating and retrying once on 401
    pub async fn get_quote(&mut self) -> ClientResult<String> {
        let mut response = self.send_quote_request().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Quote request unauthorized, solving a challenge");
            self.authenticate().await?;
            response = self.send_quote_request().await?;
        }

        let response = expect_ok(response, QUOTE_PATH)?;
        Ok(response.text().await?)
    }

    /// Fetch a challenge, solve it and redeem it for an access token
    pub async fn authenticate(&mut self) -> ClientResult<()> {
        let response = self.http.get(self.url(CHALLENGE_PATH)).send().await?;
        let challenge: ChallengeResponse = expect_ok(response, CHALLENGE_PATH)?.json().await?;

        let started = Instant::now();
        let nonce = self.solve(&challenge).await?;
        tracing::debug!(
            token = %challenge.token,
            target_bits = %challenge.target_bits,
            nonce,
            elapsed = ?started.elapsed(),
            "Solved challenge"
        );

        let response = self
            .http
            .post(self.url(CHALLENGE_PATH))
            .header(AUTHORIZATION, bearer_header_value(&challenge.jwt)?)
            .json(&RedeemRequest { nonce })
            .send()
            .await?;
        let redeemed: RedeemResponse = expect_ok(response, CHALLENGE_PATH)?.json().await?;

        self.access_token = Some(redeemed.jwt);
        Ok(())
    }

    async fn send_quote_request(&mut self) -> ClientResult<Response> {
        let mut request = self.http.get(self.url(QUOTE_PATH));
        if let Some(token) = self.access_token.take() {
            request = request.header(AUTHORIZATION, bearer_header_value(&token)?);
        }
        Ok(request.send().await?)
    }

    /// Run the search on a blocking thread, bounded by the configured deadline
    async fn solve(&self, challenge: &ChallengeResponse) -> ClientResult<u64> {
        let deadline = Instant::now() + self.pow_deadline;
        let payload = challenge.token.clone().into_bytes();
        let timestamp = challenge.timestamp;
        let target_bits = challenge.target_bits;

        let outcome = tokio::task::spawn_blocking(move || {
            PowJob::new(&payload, timestamp, target_bits).calculate(deadline)
        })
        .await?;

        if !outcome.solved {
            return Err(ClientError::DeadlineExceeded(self.pow_deadline));
        }
        Ok(outcome.nonce)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn expect_ok(response: Response, path: &'static str) -> ClientResult<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(ClientError::UnexpectedStatus { path, status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use pow::{GenerationalStore, PowAppState, PowConfig, TargetBits, pow_router, protect};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    const QUOTE: &str = "A smile is a free way to brighten someone's day.";

    async fn spawn_server(app: Router) -> String {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_quote_server(bits: u64) -> String {
        let config = PowConfig {
            target_bits: TargetBits::new(bits).unwrap(),
            ..PowConfig::with_random_secret()
        };
        let state = PowAppState::new(GenerationalStore::new(Duration::from_secs(60)), config)
            .unwrap();
        let quote = Router::new().route("/quote", get(|| async { QUOTE }));
        spawn_server(protect(quote, state.clone()).merge(pow_router(state))).await
    }

    fn client(base_url: &str, deadline: Duration) -> QuoteClient {
        QuoteClient::new(Client::new(), base_url, deadline)
    }

    #[tokio::test]
    async fn test_get_quote_authenticates_on_401() {
        let base_url = spawn_quote_server(8).await;
        let mut client = client(&base_url, Duration::from_secs(30));

        assert_eq!(client.get_quote().await.unwrap(), QUOTE);
        // Access tokens are single-use, so every quote needs a fresh solution
        assert_eq!(client.get_quote().await.unwrap(), QUOTE);
    }

    #[tokio::test]
    async fn test_authenticate_stores_access_token() {
        let base_url = spawn_quote_server(8).await;
        let mut client = client(&base_url, Duration::from_secs(30));

        client.authenticate().await.unwrap();
        assert!(client.access_token.is_some());
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let base_url = spawn_quote_server(64).await;
        let mut client = client(&base_url, Duration::from_millis(1));

        assert!(matches!(
            client.get_quote().await,
            Err(ClientError::DeadlineExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_challenge_failure_surfaces_status() {
        let app = Router::new()
            .route("/quote", get(|| async { AxumStatus::UNAUTHORIZED }))
            .route(
                "/challenge",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            );
        let base_url = spawn_server(app).await;
        let mut client = client(&base_url, Duration::from_secs(1));

        match client.get_quote().await {
            Err(ClientError::UnexpectedStatus { path, status }) => {
                assert_eq!(path, CHALLENGE_PATH);
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_public_resource_needs_no_handshake() {
        let app = Router::new().route("/quote", get(|| async { QUOTE }));
        let base_url = spawn_server(app).await;
        let mut client = client(&format!("{base_url}/"), Duration::from_secs(1));

        assert_eq!(client.get_quote().await.unwrap(), QUOTE);
    }
}
