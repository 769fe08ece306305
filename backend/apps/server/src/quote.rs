//! Quote resource served behind the PoW gate

use axum::{Router, routing::get};
use rand::seq::IndexedRandom;

pub const QUOTES: [&str; 8] = [
    "You are perfect because of your imperfections.",
    "Do what inspires you. Life is too short not to love the job you do every day.",
    "Complaining will not get anything done.",
    "At the end of your day, you’ve done your best. Even if you haven’t accomplished all that’s on your list. You’ve given it you’re all.",
    "You don’t need to have it figured all out. Taking the wrong path is part of the process.",
    "Never lose yourself because of someone else. You are perfect just the way you are.",
    "Trust your gut. If you ever feel it's not right, then it's not.",
    "A smile is a free way to brighten someone’s day.",
];

/// GET /quote
async fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
}

pub fn quote_router() -> Router {
    Router::new().route("/quote", get(random_quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_serves_a_known_quote() {
        let response = quote_router()
            .oneshot(Request::builder().uri("/quote").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let quote = std::str::from_utf8(&body).unwrap();
        assert!(QUOTES.contains(&quote));
    }
}
