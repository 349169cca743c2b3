use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const HEALTH_PATH: &str = "/voters/health";

/// Call and error counters reported by the health route.
#[derive(Debug)]
pub struct ApiMetrics {
    started: Instant,
    calls: AtomicU64,
    errors: AtomicU64,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

impl ApiMetrics {
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Counts every request except health checks, and every response with a
/// 4xx or 5xx status.
pub struct RequestCounter(pub Arc<ApiMetrics>);

#[rocket::async_trait]
impl Fairing for RequestCounter {
    fn info(&self) -> Info {
        Info {
            name: "Request counter",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        if req.uri().path().as_str() != HEALTH_PATH {
            self.0.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        if req.uri().path().as_str() != HEALTH_PATH && res.status().code >= 400 {
            self.0.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}
