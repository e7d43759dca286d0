//! Place lookup and current conditions.
//!
//! A place name is geocoded first and the coordinates are then used for
//! the forecast; the two calls are sequential.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::settings::WeatherConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

/// Maximum place suggestions offered while typing.
pub const MAX_SUGGESTIONS: usize = 5;

const CITY_NOT_FOUND: &str = "City not found. Please enter a valid city name.";
const FETCH_FAILED: &str = "Unable to fetch weather data. Please try again later.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSuggestion {
    pub place_id: u64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    /// Local time as `YYYY-MM-DD HH:MM`.
    pub time: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: Location,
    /// Degrees Celsius.
    pub temperature: f64,
    /// km/h.
    pub wind_speed: f64,
    pub hourly: Vec<HourlyPoint>,
}

#[derive(Deserialize)]
struct GeocodeHit {
    place_id: u64,
    display_name: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
}

#[derive(Deserialize)]
struct ForecastBody {
    current_weather: CurrentWeather,
    #[serde(default)]
    hourly: Hourly,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
}

#[derive(Default, Deserialize)]
struct Hourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
}

pub struct WeatherProvider {
    client: Arc<dyn HttpClient>,
    config: WeatherConfig,
}

impl WeatherProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: WeatherConfig) -> Self {
        Self { client, config }
    }

    /// Places matching a partial name, at most [`MAX_SUGGESTIONS`].
    pub async fn suggest(&self, query: &str) -> CoreResult<Vec<PlaceSuggestion>> {
        let request = HttpRequest::get(&self.config.geocode_url)
            .query("format", "json")
            .query("q", query.trim());
        let hits: Vec<GeocodeHit> = fetch_json(self.client.as_ref(), request).await?;
        Ok(hits
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|hit| PlaceSuggestion {
                place_id: hit.place_id,
                display_name: hit.display_name,
            })
            .collect())
    }

    /// Resolves `place` to its best match.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] for a blank name (no request is made),
    /// [`CoreError::Empty`] when the geocoder knows no such place.
    pub async fn geocode(&self, place: &str) -> CoreResult<Location> {
        let place = place.trim();
        if place.is_empty() {
            return Err(CoreError::InvalidInput(
                "Please enter a city name.".to_string(),
            ));
        }
        let request = HttpRequest::get(&self.config.geocode_url)
            .query("q", place)
            .query("format", "json")
            .query("limit", 1);
        let hits: Vec<GeocodeHit> = fetch_json(self.client.as_ref(), request).await?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Empty(CITY_NOT_FOUND.to_string()))?;
        Ok(Location {
            latitude: parse_coordinate(&hit.lat)?,
            longitude: parse_coordinate(&hit.lon)?,
            display_name: hit.display_name,
        })
    }

    /// Current conditions and the hourly temperature series at `location`.
    pub async fn report_for(&self, location: Location) -> CoreResult<WeatherReport> {
        let request = HttpRequest::get(&self.config.forecast_url)
            .query("latitude", location.latitude)
            .query("longitude", location.longitude)
            .query("current_weather", "true")
            .query("hourly", "temperature_2m,wind_speed_10m");
        let body: ForecastBody = fetch_json(self.client.as_ref(), request).await?;
        let hourly = body
            .hourly
            .time
            .iter()
            .zip(body.hourly.temperature_2m.iter())
            .filter_map(|(time, temp)| {
                temp.map(|temperature| HourlyPoint {
                    time: time.replacen('T', " ", 1),
                    temperature,
                })
            })
            .collect();
        Ok(WeatherReport {
            location,
            temperature: body.current_weather.temperature,
            wind_speed: body.current_weather.windspeed,
            hourly,
        })
    }

    /// Geocodes `place`, then fetches its report.
    pub async fn report(&self, place: &str) -> CoreResult<WeatherReport> {
        let location = self.geocode(place).await?;
        tracing::debug!(
            "Geocoded {place:?} to {}, {}",
            location.latitude,
            location.longitude
        );
        self.report_for(location).await
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, FETCH_FAILED)
    }
}

fn parse_coordinate(raw: &str) -> CoreResult<f64> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Decode(format!("bad coordinate: {raw:?}")))
}
