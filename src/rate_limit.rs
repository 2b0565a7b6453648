use rocket::http::Header;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Limits for the anonymous livechat endpoints (visitor registration, room opening).
/// Authenticated agent endpoints are not rate limited.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub visitors_max: usize,
    pub visitors_window_secs: u64,
    pub rooms_max: usize,
    pub rooms_window_secs: u64,
    /// Key clients by the first `X-Forwarded-For` hop instead of the socket
    /// address. Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            visitors_max: 30,
            visitors_window_secs: 60,
            rooms_max: 10,
            rooms_window_secs: 60,
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    /// Read overrides from `RATE_LIMIT_*` env vars; unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }
        let d = RateLimitConfig::default();
        RateLimitConfig {
            visitors_max: var("RATE_LIMIT_VISITORS", d.visitors_max),
            visitors_window_secs: var("RATE_LIMIT_VISITORS_WINDOW_SECS", d.visitors_window_secs),
            rooms_max: var("RATE_LIMIT_ROOMS", d.rooms_max),
            rooms_window_secs: var("RATE_LIMIT_ROOMS_WINDOW_SECS", d.rooms_window_secs),
            trust_forwarded_for: var("TRUST_FORWARDED_FOR", d.trust_forwarded_for),
        }
    }
}

/// Outcome of a rate limit check, used for both the 429 body and the `X-RateLimit-*` headers.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub allowed: bool,
    pub limit: usize,
    pub remaining: usize,
    pub retry_after_secs: u64,
}

/// Idle keys are swept at most this often.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Hits recorded for one key, with the window they were checked against.
struct Window {
    span: Duration,
    hits: Vec<Instant>,
}

impl Window {
    fn expire(&mut self, now: Instant) {
        let span = self.span;
        self.hits.retain(|t| now.duration_since(*t) < span);
    }
}

struct Limits {
    windows: HashMap<String, Window>,
    last_sweep: Instant,
}

pub struct RateLimiter {
    limits: Mutex<Limits>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            limits: Mutex::new(Limits {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Drop every key whose hits have all expired.
    pub fn sweep_idle(&self) {
        let mut limits = self.limits.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut limits, Instant::now());
    }

    fn sweep(limits: &mut Limits, now: Instant) {
        let before = limits.windows.len();
        limits.windows.retain(|_, w| {
            w.expire(now);
            !w.hits.is_empty()
        });
        limits.last_sweep = now;
        let dropped = before - limits.windows.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = limits.windows.len(), "rate limit keys swept");
        }
    }

    /// Number of keys currently held.
    pub fn tracked_keys(&self) -> usize {
        self.limits.lock().unwrap_or_else(|e| e.into_inner()).windows.len()
    }

    /// Sliding-window check. `key` is typically "action:ip".
    pub fn check_with_info(&self, key: &str, max: usize, window_secs: u64) -> RateLimitInfo {
        let mut limits = self.limits.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);

        if now.duration_since(limits.last_sweep) >= SWEEP_INTERVAL {
            Self::sweep(&mut limits, now);
        }

        let state = limits.windows.entry(key.to_string()).or_insert_with(|| Window {
            span: window,
            hits: Vec::new(),
        });
        state.span = window;
        state.expire(now);
        let entries = &mut state.hits;

        if entries.len() >= max {
            let retry_after_secs = entries
                .first()
                .map(|oldest| window.saturating_sub(now.duration_since(*oldest)).as_secs().max(1))
                .unwrap_or(1);
            return RateLimitInfo {
                allowed: false,
                limit: max,
                remaining: 0,
                retry_after_secs,
            };
        }

        entries.push(now);
        RateLimitInfo {
            allowed: true,
            limit: max,
            remaining: max - entries.len(),
            retry_after_secs: 0,
        }
    }
}

/// JSON response carrying `X-RateLimit-Limit` / `X-RateLimit-Remaining` headers.
pub struct RateLimited<T> {
    body: Json<T>,
    info: RateLimitInfo,
}

impl<T> RateLimited<T> {
    pub fn new(body: Json<T>, info: RateLimitInfo) -> Self {
        RateLimited { body, info }
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for RateLimited<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut res = self.body.respond_to(req)?;
        res.set_header(Header::new("X-RateLimit-Limit", self.info.limit.to_string()));
        res.set_header(Header::new(
            "X-RateLimit-Remaining",
            self.info.remaining.to_string(),
        ));
        Ok(res)
    }
}
