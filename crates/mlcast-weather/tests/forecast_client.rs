//! Integration tests for ForecastClient using wiremock.

use std::time::Duration;

use mlcast_weather::{ForecastClient, ForecastError, VarianceLevel};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "current": {
            "temp": 14.2,
            "condition": "scattered clouds",
            "humidity": 65,
            "windSpeed": 12.0,
            "pressure": 1015,
            "highTemp": 16.0,
            "lowTemp": 9.5
        },
        "forecast": [
            {"date": "2024-05-01", "mlTemp": 14.0, "apiTemp": 14.5,
             "varianceClass": "low", "varianceText": "0.5°C"},
            {"date": "2024-05-02", "mlTemp": 17.5, "apiTemp": 15.0,
             "varianceClass": "medium", "varianceText": "2.5°C"}
        ]
    })
}

fn client(server: &MockServer) -> ForecastClient {
    ForecastClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/ml_whether/"))
        .and(query_param("location", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch_forecast("New York").await.unwrap();

    assert_eq!(result.current.temp, Some(14.2));
    assert_eq!(result.current.condition, "scattered clouds");
    assert_eq!(result.forecast.len(), 2);
    assert_eq!(result.forecast[1].variance_text, "2.5°C");
    assert_eq!(result.max_variance(), 2.5);
    assert_eq!(result.variance_level(), VarianceLevel::Medium);
}

#[tokio::test]
async fn test_location_is_trimmed_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/ml_whether/"))
        .and(query_param("location", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server).fetch_forecast("  Paris ").await.unwrap();
}

#[tokio::test]
async fn test_empty_location_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch_forecast("").await;
    assert_eq!(result, Err(ForecastError::InvalidInput));
}

#[tokio::test]
async fn test_not_found_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/ml_whether/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "Forecast API request failed"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_forecast("Atlantis").await.unwrap_err();
    assert_eq!(err, ForecastError::NotFound);
    assert_eq!(err.to_string(), "City not found or API error");
}

#[tokio::test]
async fn test_server_error_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_forecast("Oslo").await.unwrap_err();
    assert_eq!(err, ForecastError::NotFound);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_forecast("Oslo").await.unwrap_err();
    assert!(matches!(err, ForecastError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    // Reserve a port, then free it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ForecastClient::new(&uri, Duration::from_secs(2)).unwrap();
    let err = client.fetch_forecast("Oslo").await.unwrap_err();
    assert!(matches!(err, ForecastError::NetworkError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = ForecastClient::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
    let err = client.fetch_forecast("Oslo").await.unwrap_err();
    assert!(matches!(err, ForecastError::NetworkError(_)), "got {err:?}");
}
