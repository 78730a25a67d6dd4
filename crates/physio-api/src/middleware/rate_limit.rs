//! Per-user sliding-window limits on AI suggestion calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Two tiers: a short burst window and a longer sustained window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub burst_requests: usize,
    pub burst_window: Duration,
    pub sustained_requests: usize,
    pub sustained_window: Duration,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            burst_requests: 5,
            burst_window: Duration::from_secs(60),
            sustained_requests: 60,
            sustained_window: Duration::from_secs(3600),
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    limits: RateLimits,
    requests: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a request for `key` if it is within both tiers.
    ///
    /// Rejected requests are not recorded, so a client that backs off
    /// regains access once its oldest accepted request leaves the window.
    pub async fn check(&self, key: &str) -> bool {
        let mut requests = self.requests.write().await;
        let seen = requests.entry(key.to_string()).or_default();
        let now = Instant::now();

        let burst_count = seen
            .iter()
            .filter(|&&t| now.duration_since(t) < self.limits.burst_window)
            .count();
        if burst_count >= self.limits.burst_requests {
            warn!(user = key, burst_count, limit = self.limits.burst_requests, "burst rate limit exceeded");
            return false;
        }

        let sustained_count = seen
            .iter()
            .filter(|&&t| now.duration_since(t) < self.limits.sustained_window)
            .count();
        if sustained_count >= self.limits.sustained_requests {
            warn!(
                user = key,
                sustained_count,
                limit = self.limits.sustained_requests,
                "sustained rate limit exceeded"
            );
            return false;
        }

        let horizon = self.horizon();
        seen.retain(|&t| now.duration_since(t) < horizon);
        seen.push(now);
        true
    }

    /// Drop users with no requests inside either window.
    pub async fn cleanup(&self) {
        let mut requests = self.requests.write().await;
        let now = Instant::now();
        let horizon = self.horizon();

        requests.retain(|_, seen| {
            seen.retain(|&t| now.duration_since(t) < horizon);
            !seen.is_empty()
        });
        debug!(tracked_users = requests.len(), "rate limiter cleanup");
    }

    pub async fn tracked_users(&self) -> usize {
        self.requests.read().await.len()
    }

    fn horizon(&self) -> Duration {
        self.limits.burst_window.max(self.limits.sustained_window)
    }
}

/// Rejects AI calls over the caller's limit with 429. Runs after
/// `require_auth`, so the caller is known.
pub async fn limit_ai_calls(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let sub = req
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.sub.clone())
        .ok_or_else(|| ApiError::Unauthorized("missing credentials".to_string()))?;

    if !state.rate_limiter.check(&sub).await {
        return Err(ApiError::TooManyRequests(
            "AI suggestion limit reached, try again shortly".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
