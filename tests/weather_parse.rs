use chrono::NaiveDate;
use codash::fetch::FetchError;
use codash::providers::weather::{parse_forecast, parse_geocode, weather_description, GeoMatch};

fn geo() -> GeoMatch {
    GeoMatch {
        latitude: 50.87,
        longitude: 8.02,
        name: "Siegen".into(),
        country: "Germany".into(),
    }
}

#[test]
fn geocode_takes_the_first_match() {
    let body = r#"{
        "results": [
            { "latitude": 50.87, "longitude": 8.02, "name": "Siegen", "country": "Germany" },
            { "latitude": 1.0, "longitude": 2.0, "name": "Siegen-Wittgenstein" }
        ]
    }"#;
    let geo = parse_geocode(body, "siegen").unwrap();
    assert_eq!(geo.name, "Siegen");
    assert_eq!(geo.country, "Germany");
}

#[test]
fn empty_geocode_results_are_not_found() {
    let err = parse_geocode(r#"{ "results": [] }"#, "Atlantis").unwrap_err();
    assert_eq!(err, FetchError::NotFound("Atlantis".into()));
}

#[test]
fn absent_results_field_is_not_found() {
    let err = parse_geocode("{}", "Nowhere").unwrap_err();
    assert_eq!(err, FetchError::NotFound("Nowhere".into()));
}

#[test]
fn forecast_assembles_daily_rows() {
    let body = r#"{
        "current_weather": { "temperature": 11.3 },
        "daily": {
            "time": ["2026-03-02", "2026-03-03"],
            "weather_code": [3, 61],
            "temperature_2m_max": [12.0, 9.5],
            "temperature_2m_min": [4.0, 2.5]
        }
    }"#;
    let snapshot = parse_forecast(body, &geo()).unwrap();
    assert_eq!(snapshot.city, "Siegen");
    assert_eq!(snapshot.current_temp, 11.3);
    assert_eq!(snapshot.daily.len(), 2);
    assert_eq!(
        snapshot.daily[0].date,
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    );
    assert_eq!(snapshot.daily[0].weather_code, 3);
    assert_eq!(snapshot.daily[1].max, 9.5);
    assert_eq!(snapshot.daily[1].min, 2.5);
}

#[test]
fn provider_error_flag_is_surfaced() {
    let body = r#"{ "error": true, "reason": "latitude out of range" }"#;
    let err = parse_forecast(body, &geo()).unwrap_err();
    assert_eq!(err, FetchError::Upstream("latitude out of range".into()));
}

#[test]
fn missing_current_weather_is_an_error() {
    let err = parse_forecast(r#"{ "daily": { "time": [] } }"#, &geo()).unwrap_err();
    assert!(matches!(err, FetchError::Upstream(_)));
}

#[test]
fn forecast_without_daily_series_still_succeeds() {
    let body = r#"{ "current_weather": { "temperature": -2.0 } }"#;
    let snapshot = parse_forecast(body, &geo()).unwrap();
    assert_eq!(snapshot.current_temp, -2.0);
    assert!(snapshot.daily.is_empty());
}

#[test]
fn weather_codes_map_to_descriptions() {
    assert_eq!(weather_description(0), "Clear sky");
    assert_eq!(weather_description(61), "Slight rain");
    assert_eq!(weather_description(99), "Thunderstorm with heavy hail");
    assert_eq!(weather_description(42), "Unknown");
}
