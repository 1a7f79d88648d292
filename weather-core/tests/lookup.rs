use std::time::Duration;

use weather_lookup_core::{
    ClientSettings, LookupError, WeatherLookup, WeatherLookupClient, WeatherRecord,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, method, path, query_param},
};

const WEATHER_PATH: &str = "/data/2.5/weather";

const LONDON: &str = r#"{"name":"London","main":{"temp":15.0,"feels_like":14.2,"humidity":70},"weather":[{"description":"light rain"}],"wind":{"speed":3.1}}"#;

fn client_for(server: &MockServer) -> WeatherLookupClient {
    let settings = ClientSettings::new("TEST_KEY")
        .with_base_url(format!("{}{WEATHER_PATH}", server.uri()));
    WeatherLookupClient::new(settings).expect("client")
}

#[tokio::test]
async fn successful_lookup_copies_upstream_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LONDON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).lookup("London").await.expect("lookup succeeds");

    assert_eq!(
        record,
        WeatherRecord {
            city: "London".into(),
            temperature_celsius: 15.0,
            feels_like_celsius: 14.2,
            description: "light rain".into(),
            humidity_percent: 70,
            wind_speed_mps: 3.1,
            weather_type: None,
        }
    );
}

#[tokio::test]
async fn city_is_trimmed_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LONDON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).lookup("  London  ").await.expect("lookup succeeds");
    assert_eq!(record.city, "London");
}

#[tokio::test]
async fn not_found_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("Nonexistentville").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound);

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("Nonexistentville").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound);
}

#[tokio::test]
async fn other_error_statuses_carry_exact_code() {
    for status in [400u16, 401, 429, 500, 503] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .mount(&server)
            .await;

        let err = client_for(&server).lookup("London").await.unwrap_err();
        match err {
            LookupError::UpstreamHttpError { status: got, message } => {
                assert_eq!(got, status);
                assert_eq!(message, "upstream says no");
            }
            other => panic!("status {status}: unexpected error {other:?}"),
        }
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("London").await.unwrap_err();
    assert_eq!(
        err,
        LookupError::UpstreamHttpError { status: 401, message: "Unauthorized".into() }
    );
}

#[tokio::test]
async fn blank_city_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_raw(LONDON, "application/json"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for input in ["", "   ", "\t"] {
        let err = client.lookup(input).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput(_)), "input {input:?}");
    }

    let received = server.received_requests().await.expect("request recording enabled");
    assert!(received.is_empty());
}

#[tokio::test]
async fn missing_api_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        api_key: None,
        ..ClientSettings::new("unused").with_base_url(server.uri())
    };
    let client = WeatherLookupClient::new(settings).expect("client");

    let err = client.lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::ConfigurationMissing(_)));
}

#[tokio::test]
async fn missing_fields_are_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"name":"London","main":{"temp":15.0}}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::MalformedResponse(_)));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Bind then drop so the port is very likely closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("bind ephemeral port");

    let settings =
        ClientSettings::new("TEST_KEY").with_base_url(format!("http://{addr}{WEATHER_PATH}"));
    let client = WeatherLookupClient::new(settings).expect("client");

    let err = client.lookup("London").await.unwrap_err();
    match err {
        LookupError::NetworkError(msg) => assert!(!msg.contains("TEST_KEY")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn slow_upstream_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(LONDON, "application/json")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings::new("TEST_KEY")
        .with_base_url(format!("{}{WEATHER_PATH}", server.uri()))
        .with_timeout(Duration::from_millis(100));
    let client = WeatherLookupClient::new(settings).expect("client");

    let err = client.lookup("London").await.unwrap_err();
    match err {
        LookupError::NetworkError(msg) => assert!(msg.contains("timed out")),
        other => panic!("unexpected error {other:?}"),
    }
}
