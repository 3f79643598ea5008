//! End-to-end tests: the full router against mock aviationstack and
//! weatherstack servers, with a real fjall cache in a temporary directory.

use std::sync::Arc;
use std::time::Duration;

use airport_profile::api::{self, AppState};
use airport_profile::cache::{FjallStore, ResponseCache};
use airport_profile::profile::ProfileAssembler;
use airport_profile::providers::{
    self, AviationstackClient, ProviderClient, WeatherstackClient,
};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    _cache_dir: TempDir,
}

fn build_app(server: &MockServer) -> TestApp {
    let cache_dir = TempDir::new().unwrap();
    let store = FjallStore::open(cache_dir.path()).unwrap();
    let cache = ResponseCache::new(Arc::new(store), Duration::from_secs(3600));
    let http = providers::http_client(Duration::from_secs(5)).unwrap();
    let client = ProviderClient::new(http, cache);

    let base = server.uri();
    let airports = AviationstackClient::new(client.clone(), &format!("{base}/v1"), "aviation-key");
    let weather = WeatherstackClient::new(client, &base, "weather-key");
    let state = AppState::new(ProfileAssembler::new(Arc::new(airports), Arc::new(weather)));

    TestApp {
        router: api::router(state),
        _cache_dir: cache_dir,
    }
}

fn jfk_airport() -> Value {
    json!({
        "airport_name": "John F Kennedy International",
        "iata_code": "JFK",
        "icao_code": "KJFK",
        "latitude": "40.642334",
        "longitude": "-73.78817",
        "timezone": "America/New_York",
        "gmt": "-5",
        "country_name": "United States"
    })
}

fn jfk_weather() -> Value {
    json!({
        "request": {"type": "LatLon", "query": "Lat 40.64 and Lon -73.79"},
        "location": {
            "name": "Jamaica",
            "country": "United States of America",
            "region": "New York",
            "timezone_id": "America/New_York",
            "utc_offset": "-4.0"
        },
        "current": {
            "observation_time": "03:40 PM",
            "temperature": 22,
            "weather_descriptions": ["Partly cloudy"],
            "weather_icons": ["https://cdn.worldweatheronline.com/images/wsymbols01_png_64/wsymbol_0002_sunny_intervals.png"],
            "wind_speed": 12,
            "wind_degree": 200,
            "wind_dir": "SSW",
            "pressure": 1025,
            "precip": 0,
            "humidity": 78,
            "cloudcover": 75,
            "visibility": 16
        }
    })
}

async fn mount_jfk(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .and(query_param("iata_code", "JFK"))
        .and(query_param("access_key", "aviation-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pagination": {"offset": 0, "limit": 100, "count": 1, "total": 1},
            "data": [jfk_airport()]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("query", "40.642334,-73.78817"))
        .and(query_param("access_key", "weather-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jfk_weather()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_jfk_profile_end_to_end() {
    let server = MockServer::start().await;
    mount_jfk(&server, 1).await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/JFK").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let airport = &body["airport"];
    assert_eq!(airport["iata_code"], "JFK");
    assert_eq!(airport["icao_code"], "KJFK");
    assert_eq!(airport["city"], "Jamaica");
    assert_eq!(airport["timezone"], "America/New_York");
    assert_eq!(airport["utc_offset_hours"], -5.0);
    assert!(airport["current_time_utc"].as_str().unwrap().ends_with('Z'));
    assert!(airport["current_time_local"].as_str().unwrap().ends_with("-05:00"));

    let weather = &body["weather"];
    assert_eq!(weather["cloud_cover_okta"], 6);
    assert_eq!(weather["weather_rating"], 2);
    assert_eq!(weather["pressure_inhg"], 30.27);
    assert_eq!(weather["visibility_mi"], 10);
    assert_eq!(weather["wind_speed_kts"], 6);
    assert_eq!(weather["dew_point_c"], 18);
    assert_eq!(weather["wind_direction"], "SSW");
    assert_eq!(weather["description"], "Partly cloudy");
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_jfk(&server, 1).await;
    let app = build_app(&server);

    let (first_status, first) = get(&app.router, "/airport/JFK").await;
    let (second_status, second) = get(&app.router, "/airport/jfk").await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["weather"], second["weather"]);
    // `expect(1)` on both mocks is verified when the server drops
}

#[tokio::test]
async fn test_icao_code_queries_icao_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .and(query_param("icao_code", "KJFK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [jfk_airport()]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jfk_weather()))
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/KJFK").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["airport"]["icao_code"], "KJFK");
}

#[tokio::test]
async fn test_ambiguous_code_is_rejected() {
    let server = MockServer::start().await;
    let mut other = jfk_airport();
    other["airport_name"] = json!("Beaufort County");
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [jfk_airport(), other]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jfk_weather()))
        .expect(0)
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/BFT").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("BFT"), "{detail}");
    assert!(detail.contains("ambiguous"), "{detail}");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/ZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Airport code ZZZ not found");
}

#[tokio::test]
async fn test_invalid_code_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/JFKXX").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Airport code must be 3 or 4 characters long");
}

#[tokio::test]
async fn test_provider_error_body_is_bad_gateway_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "usage_limit_reached", "message": "Your monthly usage limit has been reached."}
        })))
        .expect(2)
        .mount(&server)
        .await;
    let app = build_app(&server);

    for _ in 0..2 {
        let (status, body) = get(&app.router, "/airport/JFK").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("usage limit"), "{detail}");
        assert!(!detail.contains("aviation-key"));
    }
}

#[tokio::test]
async fn test_upstream_http_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    mount_jfk_airport_only(&server).await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/JFK").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("weatherstack"));
}

#[tokio::test]
async fn test_malformed_weather_fields_degrade_to_null() {
    let server = MockServer::start().await;
    mount_jfk_airport_only(&server).await;
    let mut weather = jfk_weather();
    weather["current"]["pressure"] = json!("n/a");
    weather["current"]["humidity"] = json!(140);
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather))
        .mount(&server)
        .await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/airport/JFK").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather"]["pressure_inhg"], Value::Null);
    assert_eq!(body["weather"]["dew_point_c"], Value::Null);
    assert_eq!(body["weather"]["weather_rating"], 2);
}

async fn mount_jfk_airport_only(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/airports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [jfk_airport()]})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let server = MockServer::start().await;
    let app = build_app(&server);

    let (status, body) = get(&app.router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get(&app.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found"}));
}
