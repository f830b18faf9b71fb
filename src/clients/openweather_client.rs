use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::weather::{
    Coordinates, CurrentConditions, GeocodingResult, Units, ZipGeocodingResult,
};
use crate::service::weather_service::{COUNTRY_SUFFIX, WeatherApi};

pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn geocode_zip(&self, zip: &str) -> Result<Option<ZipGeocodingResult>, AppError> {
        let context = format!("geocoding zip code {}", zip);
        let response = self
            .http
            .get(self.url("/geo/1.0/zip"))
            .query(&[
                ("zip", format!("{},{}", zip, COUNTRY_SUFFIX)),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::service(&context, e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let found: ZipGeocodingResult = read_json(response, &context).await?;
        if found.zip.is_empty() {
            return Ok(None);
        }
        Ok(Some(found))
    }

    async fn geocode_direct(&self, query: &str) -> Result<Vec<GeocodingResult>, AppError> {
        let context = format!("geocoding '{}'", query);
        let response = self
            .http
            .get(self.url("/geo/1.0/direct"))
            .query(&[
                ("q", query.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::service(&context, e))?;
        read_json(response, &context).await
    }

    async fn current(&self, coords: Coordinates, units: Units) -> Result<CurrentConditions, AppError> {
        let context = format!("fetching {} weather data", units.as_param());
        tracing::debug!(lat = coords.lat, lon = coords.lon, units = units.as_param(), "requesting current weather");
        let response = self
            .http
            .get(self.url("/data/2.5/weather"))
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", units.as_param().to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::service(&context, e))?;
        read_json(response, &context).await
    }
}

// Reads the body once so a decode failure can show what the provider actually sent.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response, context: &str) -> Result<T, AppError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::service(context, e))?;
    if !status.is_success() {
        return Err(AppError::service(
            context,
            format!("request failed with status {}: {}", status, text),
        ));
    }
    serde_json::from_str(&text).map_err(|e| {
        AppError::service(context, format!("failed to decode response: {}\nRaw response: {}", e, text))
    })
}
