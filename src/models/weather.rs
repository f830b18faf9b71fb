use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Imperial,
    Metric,
}

impl Units {
    pub fn as_param(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }
}

/// Entry of the direct geocoding response (a JSON array of these).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipGeocodingResult {
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub imperial: CurrentConditions,
    pub metric: CurrentConditions,
}

impl WeatherReport {
    pub fn render(&self) -> String {
        let mut body = format!(
            "Weather in {}:\nTemperature: {:.1}°F (Feels like {:.1}°F) | {:.1}°C (Feels like {:.1}°C)\n",
            self.location,
            self.imperial.main.temp,
            self.imperial.main.feels_like,
            self.metric.main.temp,
            self.metric.main.feels_like,
        );
        if let Some(condition) = self.imperial.weather.first() {
            body.push_str(&format!(
                "Condition: {} ({})\n",
                condition.main, condition.description
            ));
        }
        body.push_str(&format!("Humidity: {}%\n", self.imperial.main.humidity));
        body.push_str(&format!(
            "Wind Speed: {:.1} mph | {:.1} m/s",
            self.imperial.wind.speed, self.metric.wind.speed
        ));
        body
    }
}
