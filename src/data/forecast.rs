//! AEMET OpenData hourly-forecast client
//!
//! This module implements the two-hop fetch protocol used by AEMET: the
//! primary endpoint returns a small envelope whose `datos` field points at
//! the real payload URL, which is fetched separately. The payload is then
//! normalized from five parallel, independently indexed per-day arrays into
//! clean [`DailyForecast`]/[`HourlyForecast`] records.
//!
//! Parsing is deliberately defensive: the upstream arrays are not guaranteed
//! equal length or period alignment, so the usable index range is truncated
//! to the shortest array and any single malformed hour is skipped without
//! aborting its day.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::transport::{HttpTransport, Transport, DEFAULT_TIMEOUT};
use super::{DailyForecast, ForecastSeries, HourlyForecast};

/// Base URL for the AEMET OpenData API
const AEMET_BASE_URL: &str = "https://opendata.aemet.es/opendata/api";

/// Errors that can occur when fetching a forecast
///
/// Every variant is a terminal outcome for one fetch; per-hour and per-field
/// problems are absorbed inside the parser and never surface here.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Transport-level failure (DNS, connect, timeout, TLS) on either hop
    #[error("Connection failed: {0}")]
    Transport(String),

    /// Primary endpoint answered with a non-200 status
    #[error("Initial API request failed with status {0}")]
    PrimaryRequestFailed(u16),

    /// Primary body was not JSON or lacked the `datos` field
    #[error("Invalid response format from the forecast API")]
    InvalidEnvelope,

    /// Secondary data endpoint answered with a non-200 status
    #[error("Forecast data request failed with status {0}")]
    SecondaryRequestFailed(u16),

    /// Payload parsed but no day produced a single valid hour
    #[error("No valid weather data found")]
    NoUsableData,
}

/// Primary API response: a pointer to the real payload
#[derive(Debug, Deserialize)]
struct Envelope {
    /// URL of the secondary data payload
    datos: String,
}

/// Client for fetching hourly municipal forecasts from AEMET OpenData
///
/// Generic over [`Transport`] so the two-hop protocol can be exercised in
/// tests without a network. Each call is independent: no state is shared and
/// nothing is cached across invocations. Dropping the returned future aborts
/// the in-flight request.
#[derive(Debug, Clone)]
pub struct ForecastClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ForecastClient<HttpTransport> {
    /// Creates a client with the default HTTP transport and base URL
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(), api_key)
    }
}

impl<T: Transport> ForecastClient<T> {
    /// Creates a client over a custom transport
    pub fn with_transport(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: AEMET_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout (default 15s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches and normalizes the hourly forecast for a municipality
    ///
    /// # Arguments
    /// * `location_code` - 5-digit zero-padded province+municipality code
    ///   (e.g. "08019" for Barcelona)
    ///
    /// # Returns
    /// * `Ok(ForecastSeries)` - at least one day with at least one hour each
    /// * `Err(ForecastError)` - a typed failure the caller can render directly
    pub async fn get_forecast(
        &self,
        location_code: &str,
    ) -> Result<ForecastSeries, ForecastError> {
        let data_url = self.fetch_envelope(location_code).await?;
        let payload = self.fetch_payload(&data_url).await?;
        parse_payload(location_code, &payload)
    }

    /// First hop: resolve the payload URL from the envelope endpoint
    async fn fetch_envelope(&self, location_code: &str) -> Result<String, ForecastError> {
        let url = format!(
            "{}/prediccion/especifica/municipio/horaria/{}?api_key={}",
            self.base_url, location_code, self.api_key
        );
        debug!(location_code, "requesting forecast envelope");

        let response = self.transport.fetch(&url, self.timeout).await;
        if response.is_transport_failure() {
            return Err(ForecastError::Transport(response.body));
        }
        if response.status != 200 {
            warn!(
                status = response.status,
                body = %response.body,
                "envelope request rejected"
            );
            return Err(ForecastError::PrimaryRequestFailed(response.status));
        }

        let envelope: Envelope =
            serde_json::from_str(&response.body).map_err(|_| ForecastError::InvalidEnvelope)?;
        debug!(data_url = %envelope.datos, "resolved payload URL");
        Ok(envelope.datos)
    }

    /// Second hop: fetch the raw payload the envelope pointed at
    async fn fetch_payload(&self, data_url: &str) -> Result<String, ForecastError> {
        let response = self.transport.fetch(data_url, self.timeout).await;
        if response.is_transport_failure() {
            return Err(ForecastError::Transport(response.body));
        }
        if response.status != 200 {
            warn!(
                status = response.status,
                body = %response.body,
                "payload request rejected"
            );
            return Err(ForecastError::SecondaryRequestFailed(response.status));
        }
        Ok(response.body)
    }
}

/// Normalizes the raw payload into a forecast series
///
/// The payload is a JSON array whose first element carries `prediccion.dia`,
/// an array of day blocks. A structurally unusable payload yields
/// [`ForecastError::NoUsableData`], the same as one whose days all come up
/// empty.
fn parse_payload(location_code: &str, raw: &str) -> Result<ForecastSeries, ForecastError> {
    let root: Value = serde_json::from_str(raw).unwrap_or(Value::Null);
    let day_blocks = root
        .get(0)
        .and_then(|v| v.get("prediccion"))
        .and_then(|v| v.get("dia"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let days: Vec<DailyForecast> = day_blocks.iter().filter_map(parse_day).collect();

    if days.is_empty() {
        return Err(ForecastError::NoUsableData);
    }
    Ok(ForecastSeries {
        location_code: location_code.to_string(),
        days,
    })
}

/// Normalizes one day block, or drops it when no hour survives
fn parse_day(block: &Value) -> Option<DailyForecast> {
    let block = block.as_object()?;
    let api_date = block.get("fecha").and_then(Value::as_str).unwrap_or("");

    let sky = array_field(block, "estadoCielo");
    let temperature = array_field(block, "temperatura");
    let humidity = array_field(block, "humedadRelativa");
    let wind = array_field(block, "vientoAndRachaMax");
    let precipitation = array_field(block, "precipitacion");

    // The five arrays are independently indexed and may disagree in length;
    // only the range covered by all of them is usable.
    let usable = [
        sky.len(),
        temperature.len(),
        humidity.len(),
        wind.len(),
        precipitation.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    let hours: Vec<HourlyForecast> = (0..usable)
        .filter_map(|i| {
            let hour = build_hour(
                &sky[i],
                &temperature[i],
                &humidity[i],
                &wind[i],
                &precipitation[i],
            );
            if hour.is_none() {
                debug!(date = api_date, index = i, "skipping malformed hourly entry");
            }
            hour
        })
        .collect();

    if hours.is_empty() {
        return None;
    }
    Some(DailyForecast {
        date: format_date(api_date),
        hours,
    })
}

/// Builds one hourly record from the five parallel entries at one index
///
/// Returns `None` when any entry is not a JSON object; individual missing or
/// malformed fields inside an object entry default instead of skipping.
fn build_hour(
    sky: &Value,
    temperature: &Value,
    humidity: &Value,
    wind: &Value,
    precipitation: &Value,
) -> Option<HourlyForecast> {
    let sky = sky.as_object()?;
    let temperature = temperature.as_object()?;
    let humidity = humidity.as_object()?;
    let wind = wind.as_object()?;
    let precipitation = precipitation.as_object()?;

    let raw_period = sky.get("periodo").and_then(Value::as_str).unwrap_or("");
    let description = sky
        .get("descripcion")
        .and_then(Value::as_str)
        .unwrap_or("");

    let wind_speed = wind
        .get("velocidad")
        .and_then(Value::as_array)
        .and_then(|v| v.first())
        .and_then(lenient_f64)
        .unwrap_or(0.0);

    Some(HourlyForecast {
        hour: format_hour_label(raw_period),
        temperature: temperature
            .get("value")
            .and_then(lenient_f64)
            .unwrap_or(0.0),
        humidity: humidity.get("value").and_then(lenient_i32).unwrap_or(0),
        wind_speed,
        precipitation: precipitation
            .get("value")
            .and_then(lenient_i32)
            .unwrap_or(0),
        description: capitalize_first(description),
    })
}

/// Returns a named array field, treating a missing or non-array value as empty
fn array_field<'a>(block: &'a serde_json::Map<String, Value>, key: &str) -> &'a [Value] {
    block
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Reads a number that may arrive as a JSON number or a numeric string
///
/// AEMET occasionally types numeric fields as strings; anything else (e.g.
/// the "Ip" marker for trace precipitation) is treated as absent.
fn lenient_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Integer variant of [`lenient_f64`]; float-typed values are truncated
fn lenient_i32(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .map(|n| n as i32)
        .or_else(|| lenient_f64(value).map(|f| f as i32))
}

/// Formats a raw `periodo` value as an "HH:00" label
///
/// The rule is lossy on purpose: the first two characters are taken verbatim
/// (even if non-numeric), and anything shorter than two characters falls back
/// to "00:00".
fn format_hour_label(raw_period: &str) -> String {
    if raw_period.chars().count() >= 2 {
        let prefix: String = raw_period.chars().take(2).collect();
        format!("{prefix}:00")
    } else {
        "00:00".to_string()
    }
}

/// Upper-cases the first character, leaving the rest untouched
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Reformats "yyyy-MM-dd" as "dd/MM/yyyy"; anything unparseable passes through
fn format_date(api_date: &str) -> String {
    match chrono::NaiveDate::parse_from_str(api_date, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => api_date.to_string(),
    }
}
