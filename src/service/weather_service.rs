use async_trait::async_trait;

use crate::config::Settings;
use crate::error::AppError;
use crate::models::weather::{
    Coordinates, CurrentConditions, GeocodingResult, Units, WeatherReport, ZipGeocodingResult,
};

pub const COUNTRY_SUFFIX: &str = "US";

#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// `Ok(None)` when the provider knows no such postal code.
    async fn geocode_zip(&self, zip: &str) -> Result<Option<ZipGeocodingResult>, AppError>;
    async fn geocode_direct(&self, query: &str) -> Result<Vec<GeocodingResult>, AppError>;
    async fn current(&self, coords: Coordinates, units: Units) -> Result<CurrentConditions, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    Zip(String),
    Text(String),
}

impl LocationQuery {
    pub fn from_args(zip: Option<&str>, location: Option<&str>) -> Result<Self, AppError> {
        let zip = zip.map(str::trim).filter(|v| !v.is_empty());
        let location = location.map(str::trim).filter(|v| !v.is_empty());
        match (zip, location) {
            (Some(_), Some(_)) => Err(AppError::input(
                "Please provide either a zip code (-z) or a location (-l), not both.",
            )),
            (Some(zip), None) => Ok(Self::Zip(zip.to_string())),
            (None, Some(text)) => Ok(Self::Text(text.to_string())),
            (None, None) => Err(AppError::input(
                "Please provide a zip code (-z) or a location (-l).",
            )),
        }
    }

    pub fn progress_line(&self) -> String {
        match self {
            Self::Zip(zip) => format!("Fetching weather for zip code {}...", zip),
            Self::Text(text) => format!("Fetching weather for {}...", text),
        }
    }
}

pub struct WeatherService;

impl WeatherService {
    /// The `--api-key` flag wins over the environment and config file.
    pub fn resolve_api_key(flag: Option<&str>, settings: &Settings) -> Result<String, AppError> {
        flag.map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| settings.weather_api_key.clone())
            .ok_or_else(|| {
                AppError::input(
                    "OpenWeatherMap API key not provided.\n\
                     Please provide it using the --api-key flag or by setting the WEATHER_API_KEY environment variable.\n\
                     You can get a free API key from https://openweathermap.org/",
                )
            })
    }

    /// Coordinates plus the name to show in the report.
    pub async fn resolve_location<A: WeatherApi + ?Sized>(
        api: &A,
        query: &LocationQuery,
    ) -> Result<(Coordinates, String), AppError> {
        match query {
            LocationQuery::Zip(zip) => {
                let found = api.geocode_zip(zip).await?.ok_or_else(|| {
                    AppError::service("geocoding", format!("Could not find location for zip code: {}", zip))
                })?;
                let display = if found.name.is_empty() {
                    zip.clone()
                } else {
                    found.name.clone()
                };
                Ok((
                    Coordinates {
                        lat: found.lat,
                        lon: found.lon,
                    },
                    display,
                ))
            }
            LocationQuery::Text(text) => {
                if text.contains(',') {
                    let scoped = format!("{},{}", text, COUNTRY_SUFFIX);
                    tracing::info!(query = %scoped, "geocoding with country suffix");
                    match api.geocode_direct(&scoped).await {
                        Ok(results) => {
                            if let Some(first) = results.first() {
                                return Ok((coordinates_of(first), text.clone()));
                            }
                        }
                        Err(err) => {
                            tracing::warn!(query = %scoped, error = %err, "scoped geocoding failed, retrying with original text");
                        }
                    }
                }
                tracing::info!(query = %text, "geocoding original location name");
                let results = api.geocode_direct(text).await?;
                let first = results.first().ok_or_else(|| {
                    AppError::service("geocoding", format!("Could not find location: {}", text))
                })?;
                Ok((coordinates_of(first), text.clone()))
            }
        }
    }

    // One request per unit system, so no conversion math is needed for display.
    pub async fn report<A: WeatherApi + ?Sized>(
        api: &A,
        query: &LocationQuery,
    ) -> Result<WeatherReport, AppError> {
        let (coords, location) = Self::resolve_location(api, query).await?;
        let imperial = api.current(coords, Units::Imperial).await?;
        let metric = api.current(coords, Units::Metric).await?;
        Ok(WeatherReport {
            location,
            imperial,
            metric,
        })
    }
}

fn coordinates_of(result: &GeocodingResult) -> Coordinates {
    Coordinates {
        lat: result.lat,
        lon: result.lon,
    }
}
