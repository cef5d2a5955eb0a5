//! Integration Tests for the Lookup Flow
//!
//! Exercises the public surface end to end: controllers driving a fake
//! transport, the shared cache between them, and the clock rendering
//! fetched timezones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use ipmeta::cache::shared_store;
use ipmeta::clock::SharedClock;
use ipmeta::fetch::{CancelToken, FetchController, FetchStatus, Transport, TransportResponse};
use ipmeta::models::IpMetadata;
use ipmeta::{is_valid_ip, Config, LookupError};

const LONG_TTL: Duration = Duration::from_secs(300);

// == Helper Functions ==

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

fn metadata_body(ip: &str, country: &str) -> String {
    serde_json::json!({
        "success": true,
        "ip": ip,
        "country": country,
        "country_code": "US",
        "timezone": { "id": "America/New_York", "offset": -18000 },
        "flag": { "emoji": "🇺🇸" }
    })
    .to_string()
}

// == Fake Server ==

/// Per-address scripted response.
#[derive(Clone)]
struct Route {
    status_code: u16,
    body: String,
    delay: Duration,
    honors_cancel: bool,
}

impl Route {
    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
            delay: Duration::ZERO,
            honors_cancel: true,
        }
    }

    fn status(code: u16) -> Self {
        Self {
            status_code: code,
            body: String::new(),
            delay: Duration::ZERO,
            honors_cancel: true,
        }
    }

    /// A slow response from a server that keeps going after cancellation.
    fn unstoppable(body: String, delay: Duration) -> Self {
        Self {
            delay,
            honors_cancel: false,
            ..Self::ok(body)
        }
    }
}

/// In-process stand-in for the metadata endpoint. Unrouted addresses
/// answer 404, like the real service would for garbage paths.
struct FakeServer {
    routes: Mutex<HashMap<String, Route>>,
    hits: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeServer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        })
    }

    fn route(&self, ip: &str, route: Route) {
        self.routes.lock().insert(ip.to_string(), route);
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn requested(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn request(&self, key: &str, cancel: CancelToken) -> ipmeta::Result<TransportResponse> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(key.to_string());

        let route = match self.routes.lock().get(key) {
            Some(route) => route.clone(),
            None => Route::status(404),
        };

        if route.honors_cancel {
            tokio::select! {
                _ = tokio::time::sleep(route.delay) => {}
                _ = cancel.cancelled() => return Err(LookupError::Cancelled),
            }
        } else {
            tokio::time::sleep(route.delay).await;
        }

        Ok(TransportResponse {
            ok: (200..300).contains(&route.status_code),
            status_code: route.status_code,
            body: route.body,
        })
    }
}

// == Lookup Flow Tests ==

#[tokio::test]
async fn test_lookup_then_cached_repeat() {
    init_tracing();
    let server = FakeServer::new();
    server.route("8.8.8.8", Route::ok(metadata_body("8.8.8.8", "United States")));

    let cache = shared_store::<IpMetadata>(10, LONG_TTL);
    let ctl = FetchController::with_cache(server.clone(), cache.clone());

    ctl.execute("8.8.8.8").await;

    assert_eq!(ctl.status(), FetchStatus::Success);
    let value = ctl.value().unwrap();
    assert_eq!(value.ip, "8.8.8.8");
    assert_eq!(value.country, "United States");
    assert_eq!(value.timezone.id, "America/New_York");
    assert_eq!(value.timezone.offset, -18000);

    // Second lookup is served from the cache
    ctl.execute("8.8.8.8").await;

    assert_eq!(server.hits(), 1);
    assert_eq!(ctl.status(), FetchStatus::Success);

    let stats = cache.read().await.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_controllers_share_one_cache() {
    init_tracing();
    let server = FakeServer::new();
    server.route("1.1.1.1", Route::ok(metadata_body("1.1.1.1", "Australia")));

    let cache = shared_store::<IpMetadata>(10, LONG_TTL);
    let first = FetchController::with_cache(server.clone(), cache.clone());
    let second = FetchController::with_cache(server.clone(), cache.clone());

    first.execute("1.1.1.1").await;
    second.execute("1.1.1.1").await;

    // One network round trip feeds both controllers
    assert_eq!(server.hits(), 1);
    assert_eq!(first.value().unwrap(), second.value().unwrap());
}

#[tokio::test]
async fn test_capacity_bounds_the_shared_cache() {
    init_tracing();
    let server = FakeServer::new();
    let ips = ["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4", "5.5.5.5"];
    for ip in ips {
        server.route(ip, Route::ok(metadata_body(ip, "Test")));
    }

    let cache = shared_store::<IpMetadata>(3, LONG_TTL);
    let ctl = FetchController::with_cache(server.clone(), cache.clone());

    for ip in ips {
        ctl.execute(ip).await;
    }

    assert_eq!(server.hits(), 5);
    assert_eq!(cache.read().await.len(), 3);

    // The most recent address is still cached
    ctl.execute("5.5.5.5").await;
    assert_eq!(server.hits(), 5);

    // The oldest was evicted and needs the network again
    ctl.execute("1.1.1.1").await;
    assert_eq!(server.hits(), 6);
}

#[tokio::test]
async fn test_config_assembled_stack_serves_lookups() {
    init_tracing();
    let config = Config::default();
    let server = FakeServer::new();
    server.route("8.8.4.4", Route::ok(metadata_body("8.8.4.4", "United States")));

    let cache = config.build_store::<IpMetadata>();
    let ctl = FetchController::with_cache(server.clone(), cache.clone());

    ctl.execute("8.8.4.4").await;
    ctl.execute("8.8.4.4").await;

    assert_eq!(server.hits(), 1);
    assert_eq!(cache.read().await.capacity(), config.cache_capacity);
}

// == Error Handling Tests ==

#[tokio::test]
async fn test_http_error_then_recovery() {
    init_tracing();
    let server = FakeServer::new();
    server.route("9.9.9.9", Route::status(429));

    let ctl: FetchController<IpMetadata> = FetchController::new(server.clone());

    ctl.execute("9.9.9.9").await;
    assert_eq!(ctl.status(), FetchStatus::Error);
    assert!(ctl.error_message().unwrap().contains("429"));

    // The endpoint recovers; the next attempt succeeds
    server.route("9.9.9.9", Route::ok(metadata_body("9.9.9.9", "Switzerland")));
    ctl.execute("9.9.9.9").await;

    assert_eq!(ctl.status(), FetchStatus::Success);
    assert!(ctl.error_message().is_none());
    assert_eq!(ctl.value().unwrap().country, "Switzerland");
}

#[tokio::test]
async fn test_non_json_body_reports_error() {
    init_tracing();
    let server = FakeServer::new();
    server.route("7.7.7.7", Route::ok("<!doctype html><title>oops</title>".to_string()));

    let ctl: FetchController<IpMetadata> = FetchController::new(server.clone());

    ctl.execute("7.7.7.7").await;

    assert_eq!(ctl.status(), FetchStatus::Error);
    assert!(!ctl.error_message().unwrap().is_empty());
    assert!(ctl.value().is_none());
}

#[tokio::test]
async fn test_abort_and_blank_keys_leave_controller_usable() {
    init_tracing();
    let server = FakeServer::new();
    server.route("4.4.4.4", Route::ok(metadata_body("4.4.4.4", "Germany")));

    let ctl: FetchController<IpMetadata> = FetchController::new(server.clone());

    // Teardown with nothing in flight, then inputs that never dispatch
    ctl.abort();
    ctl.execute("").await;
    ctl.execute("   ").await;
    assert_eq!(ctl.status(), FetchStatus::Idle);
    assert_eq!(server.hits(), 0);

    ctl.execute("4.4.4.4").await;

    assert_eq!(ctl.status(), FetchStatus::Success);
    assert_eq!(server.hits(), 1);
}

// == Supersession Tests ==

#[tokio::test]
async fn test_rapid_resubmission_applies_last_result() {
    init_tracing();
    let server = FakeServer::new();
    server.route(
        "2.2.2.2",
        Route::unstoppable(metadata_body("2.2.2.2", "Stale"), Duration::from_millis(150)),
    );
    server.route("3.3.3.3", Route::ok(metadata_body("3.3.3.3", "Fresh")));

    let ctl: Arc<FetchController<IpMetadata>> = Arc::new(FetchController::new(server.clone()));

    let slow = {
        let ctl = ctl.clone();
        tokio::spawn(async move { ctl.execute("2.2.2.2").await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    ctl.execute("3.3.3.3").await;
    slow.await.unwrap();

    // The older settlement lost the race and was discarded
    assert_eq!(server.hits(), 2);
    assert_eq!(ctl.status(), FetchStatus::Success);
    assert_eq!(ctl.value().unwrap().country, "Fresh");
}

#[tokio::test]
async fn test_abort_mid_flight_settles_idle() {
    init_tracing();
    let server = FakeServer::new();
    server.route(
        "6.6.6.6",
        Route {
            delay: Duration::from_millis(120),
            ..Route::ok(metadata_body("6.6.6.6", "Nowhere"))
        },
    );

    let ctl: Arc<FetchController<IpMetadata>> = Arc::new(FetchController::new(server.clone()));

    let runner = {
        let ctl = ctl.clone();
        tokio::spawn(async move { ctl.execute("6.6.6.6").await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(ctl.status(), FetchStatus::Loading);

    ctl.abort();
    runner.await.unwrap();

    // Cancellation is not an error
    assert_eq!(ctl.status(), FetchStatus::Idle);
    assert!(ctl.error_message().is_none());
}

// == Validation Tests ==

#[tokio::test]
async fn test_only_valid_addresses_are_dispatched() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::new();
    server.route("8.8.8.8", Route::ok(metadata_body("8.8.8.8", "United States")));
    server.route(
        "2001:4860:4860::8888",
        Route::ok(metadata_body("2001:4860:4860::8888", "United States")),
    );

    let ctl: FetchController<IpMetadata> = FetchController::new(server.clone());

    let candidates = [
        "8.8.8.8",
        "256.1.1.1",
        "not-an-ip",
        "2001:4860:4860::8888",
        "",
    ];
    for candidate in candidates {
        if is_valid_ip(candidate.trim()) {
            ctl.execute(candidate).await;
        }
    }

    assert_eq!(
        server.requested(),
        vec!["8.8.8.8".to_string(), "2001:4860:4860::8888".to_string()]
    );
    assert_eq!(ctl.status(), FetchStatus::Success);
    Ok(())
}

// == Clock Tests ==

#[tokio::test]
async fn test_clock_lifecycle_follows_subscriptions() {
    init_tracing();
    let clock = SharedClock::with_period(Duration::from_millis(25));

    let mut sub = clock.attach();
    let joined = clock.attach();
    assert_eq!(clock.subscriber_count(), 2);

    let tick = tokio::time::timeout(Duration::from_millis(250), sub.changed()).await;
    assert!(tick.is_ok(), "tick should arrive while subscribed");
    assert_eq!(sub.now(), joined.now());

    drop(sub);
    joined.detach();
    assert_eq!(clock.subscriber_count(), 0);
    assert!(!clock.is_ticking());
}

#[tokio::test]
async fn test_clock_renders_fetched_timezone() -> anyhow::Result<()> {
    init_tracing();
    let server = FakeServer::new();
    server.route("8.8.8.8", Route::ok(metadata_body("8.8.8.8", "United States")));

    let ctl: FetchController<IpMetadata> = FetchController::new(server.clone());
    ctl.execute("8.8.8.8").await;

    let value = ctl
        .value()
        .ok_or_else(|| anyhow::anyhow!("lookup did not settle with a value"))?;

    let clock = SharedClock::with_period(Duration::from_millis(25));
    let sub = clock.attach();

    let rendered = sub.zone_time(Some(&value.timezone.id));
    assert_eq!(rendered.len(), 8);
    assert_eq!(&rendered[2..3], ":");
    assert_eq!(&rendered[5..6], ":");

    // A corrupted zone id renders as empty rather than panicking
    assert_eq!(sub.zone_time(Some("Not/A_Zone")), "");

    sub.detach();
    Ok(())
}
