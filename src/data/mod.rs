//! Core data models for MeteoSpain CLI
//!
//! This module contains the canonical forecast types produced by the
//! normalization pipeline, plus the transport, forecast and reference-data
//! submodules.

pub mod forecast;
pub mod reference;
pub mod transport;

pub use forecast::{ForecastClient, ForecastError};
#[allow(unused_imports)]
pub use reference::{location_code, Municipality, Province};
#[allow(unused_imports)]
pub use transport::{FetchResponse, HttpTransport, Transport};

use serde::Serialize;

/// Normalized forecast for a single hour of a day
///
/// One of these is produced per usable index of the upstream day block's five
/// parallel arrays. Values that the upstream omits or garbles are defaulted
/// rather than rejected, so a record is always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    /// Hour label in "HH:00" form
    pub hour: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: i32,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation probability percentage (0-100)
    pub precipitation: i32,
    /// Sky state description, first letter capitalized
    pub description: String,
}

/// Normalized forecast for one calendar day
///
/// Hours keep the order of the upstream arrays, not the order of their parsed
/// hour labels. A day with no usable hours is dropped before it gets here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    /// Display date in "dd/MM/yyyy" form; an unparseable upstream date
    /// passes through unchanged
    pub date: String,
    /// Hourly entries in original array order, never empty
    pub hours: Vec<HourlyForecast>,
}

/// Complete normalized forecast for one municipality
///
/// Invariant: every contained [`DailyForecast`] has at least one hour. A fetch
/// that would produce an empty series fails with
/// [`ForecastError::NoUsableData`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    /// 5-digit province+municipality location code the forecast was fetched for
    pub location_code: String,
    /// Daily forecasts in original upstream order
    pub days: Vec<DailyForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hour() -> HourlyForecast {
        HourlyForecast {
            hour: "14:00".to_string(),
            temperature: 21.5,
            humidity: 60,
            wind_speed: 12.0,
            precipitation: 5,
            description: "Poco nuboso".to_string(),
        }
    }

    #[test]
    fn test_hourly_forecast_creation() {
        let hour = sample_hour();
        assert_eq!(hour.hour, "14:00");
        assert!((hour.temperature - 21.5).abs() < 0.01);
        assert_eq!(hour.humidity, 60);
        assert!((hour.wind_speed - 12.0).abs() < 0.01);
        assert_eq!(hour.precipitation, 5);
        assert_eq!(hour.description, "Poco nuboso");
    }

    #[test]
    fn test_series_serializes_to_json() {
        let series = ForecastSeries {
            location_code: "08019".to_string(),
            days: vec![DailyForecast {
                date: "05/03/2024".to_string(),
                hours: vec![sample_hour()],
            }],
        };

        let json = serde_json::to_value(&series).expect("Failed to serialize series");
        assert_eq!(json["location_code"], "08019");
        assert_eq!(json["days"][0]["date"], "05/03/2024");
        assert_eq!(json["days"][0]["hours"][0]["hour"], "14:00");
        assert_eq!(json["days"][0]["hours"][0]["humidity"], 60);
    }
}
