use crate::fetch::FetchError;
use crate::providers::get_text;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

/// Result of resolving a city name against the Open-Meteo geocoder.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max: f64,
    pub min: f64,
    pub weather_code: u8,
}

/// One complete weather reading. Replaced wholesale on every fetch; never
/// merged with a previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub current_temp: f64,
    pub daily: Vec<DailyForecast>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
    current_weather: Option<CurrentWeather>,
    daily: Option<DailySeries>,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[derive(Deserialize)]
struct DailySeries {
    #[serde(default)]
    time: Vec<NaiveDate>,
    #[serde(default)]
    weather_code: Vec<u8>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
}

/// Resolve a city name to coordinates. Zero results is `NotFound`.
pub fn geocode(client: &Client, city: &str) -> Result<GeoMatch, FetchError> {
    let url = format!(
        "https://geocoding-api.open-meteo.com/v1/search?name={}&count=1&language=en&format=json",
        urlencoding::encode(city)
    );
    let body = get_text(client, &url)?;
    parse_geocode(&body, city)
}

pub fn parse_geocode(body: &str, city: &str) -> Result<GeoMatch, FetchError> {
    let resp: GeoResponse = serde_json::from_str(body)
        .map_err(|err| FetchError::Upstream(format!("geocoding response: {err}")))?;
    resp.results
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::NotFound(city.to_string()))
}

pub fn forecast(client: &Client, geo: &GeoMatch, days: u8) -> Result<WeatherSnapshot, FetchError> {
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}&current_weather=true\
         &daily=weather_code,temperature_2m_max,temperature_2m_min&timezone=auto&forecast_days={}",
        geo.latitude, geo.longitude, days
    );
    let body = get_text(client, &url)?;
    parse_forecast(&body, geo)
}

pub fn parse_forecast(body: &str, geo: &GeoMatch) -> Result<WeatherSnapshot, FetchError> {
    let resp: ForecastResponse = serde_json::from_str(body)
        .map_err(|err| FetchError::Upstream(format!("forecast response: {err}")))?;
    if resp.error {
        return Err(FetchError::Upstream(
            resp.reason.unwrap_or_else(|| "forecast rejected".into()),
        ));
    }
    let current = resp
        .current_weather
        .ok_or_else(|| FetchError::Upstream("forecast response missing current weather".into()))?;

    let mut daily = Vec::new();
    if let Some(series) = resp.daily {
        for (((date, code), max), min) in series
            .time
            .into_iter()
            .zip(series.weather_code)
            .zip(series.temperature_2m_max)
            .zip(series.temperature_2m_min)
        {
            daily.push(DailyForecast {
                date,
                max,
                min,
                weather_code: code,
            });
        }
    }

    Ok(WeatherSnapshot {
        city: geo.name.clone(),
        country: geo.country.clone(),
        current_temp: current.temperature,
        daily,
    })
}

/// Geocode a city and fetch its forecast in one step, the unit of work one
/// weather refresh performs.
pub fn fetch_city_weather(
    client: &Client,
    city: &str,
    days: u8,
) -> Result<WeatherSnapshot, FetchError> {
    let geo = geocode(client, city)?;
    forecast(client, &geo, days)
}

/// WMO weather interpretation codes, keyed to translation entries.
pub fn weather_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
