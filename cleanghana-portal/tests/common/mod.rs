//! Common test utilities for portal integration tests

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{json, Value};

use cleanghana_portal::{
    routes, AppState, Config, GeocodeError, Identity, InMemoryRecordStore, LocationResolver,
    Position, PositionError, PositionSource, ReverseGeocoder,
};

pub use cleanghana_portal::routes::SESSION_COOKIE;

/// Display name the default test geocoder hands back
pub const TEST_DISPLAY_NAME: &str =
    "Accra Sports Stadium, Accra Central, Greater Accra Region, Ghana";

/// Position source with scriptable capability and outcome
pub struct TestPositionSource {
    supported: bool,
    result: Result<Position, PositionError>,
}

impl TestPositionSource {
    pub fn fixed(latitude: f64, longitude: f64) -> Self {
        Self {
            supported: true,
            result: Ok(Position {
                latitude,
                longitude,
            }),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            result: Err(PositionError::Unavailable),
        }
    }

    pub fn failing(error: PositionError) -> Self {
        Self {
            supported: true,
            result: Err(error),
        }
    }
}

impl PositionSource for TestPositionSource {
    fn supported(&self) -> bool {
        self.supported
    }

    async fn current_position(&self) -> Result<Position, PositionError> {
        self.result
    }
}

/// Geocoder answering from a canned display name, or failing when none
/// is configured
pub struct TestGeocoder {
    display_name: Option<String>,
}

impl TestGeocoder {
    pub fn answering(display_name: &str) -> Self {
        Self {
            display_name: Some(display_name.to_string()),
        }
    }

    pub fn offline() -> Self {
        Self { display_name: None }
    }
}

impl ReverseGeocoder for TestGeocoder {
    async fn reverse(&self, _lat: f64, _lng: f64) -> Result<String, GeocodeError> {
        match &self.display_name {
            Some(name) => Ok(name.clone()),
            None => Err(GeocodeError::Request("test geocoder offline".to_string())),
        }
    }
}

/// Create a test server with explicit geolocation collaborators
pub fn create_test_server_with(
    position: TestPositionSource,
    geocoder: TestGeocoder,
) -> TestServer {
    let config = Config::resolve(None, |_| None);
    let identity = Identity("anon-test".to_string());
    let store = InMemoryRecordStore::new();
    let resolver = LocationResolver::new(position, geocoder);

    let state = Arc::new(AppState::new(config, identity, store, resolver));
    let app = routes::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Create a test server with a working position source and geocoder
pub fn create_test_server() -> TestServer {
    create_test_server_with(
        TestPositionSource::fixed(5.55, -0.1969),
        TestGeocoder::answering(TEST_DISPLAY_NAME),
    )
}

/// Log in with the given role and return the session cookie
pub async fn login(server: &TestServer, role: &str) -> String {
    let response = server.post("/api/login").json(&json!({ "role": role })).await;
    assert_eq!(response.status_code(), 200);

    response
        .maybe_cookie(SESSION_COOKIE)
        .expect("No session cookie")
        .value()
        .to_string()
}

/// Demo location payload for form submissions
pub fn demo_location() -> Value {
    json!({ "lat": 5.6037, "lng": -0.1870, "displayAddress": "Legon, Accra" })
}

/// Submit a waste report as the given citizen session
pub async fn submit_report(server: &TestServer, cookie: &str, description: &str) -> Value {
    let response = server
        .post("/api/reports")
        .add_cookie(cookie::Cookie::new(SESSION_COOKIE, cookie.to_string()))
        .json(&json!({
            "description": description,
            "wasteCategory": "General",
            "location": demo_location(),
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

/// Submit a recycling pickup request as the given citizen session
pub async fn submit_request(server: &TestServer, cookie: &str, quantity: &str) -> Value {
    let response = server
        .post("/api/recycling")
        .add_cookie(cookie::Cookie::new(SESSION_COOKIE, cookie.to_string()))
        .json(&json!({
            "materialType": "Plastic Bottles (PET)",
            "quantityEstimate": quantity,
            "location": demo_location(),
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

/// Poll a dashboard until the live projection satisfies the predicate
///
/// Subscriptions are eventually consistent; the dashboard catches up a
/// few milliseconds after a write commits.
pub async fn dashboard_eventually<F>(
    server: &TestServer,
    path: &str,
    cookie: &str,
    predicate: F,
) -> Value
where
    F: Fn(&Value) -> bool,
{
    for _ in 0..200 {
        let response = server
            .get(path)
            .add_cookie(cookie::Cookie::new(SESSION_COOKIE, cookie.to_string()))
            .await;
        if response.status_code() == 200 {
            let body: Value = response.json();
            if predicate(&body) {
                return body;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("dashboard at {path} never reached the expected state");
}
