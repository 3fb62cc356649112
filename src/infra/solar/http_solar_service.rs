use crate::domain::ports::{SolarTimeService, SolarTimes};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Client for a sunrise-sunset.org compatible API. Times are requested in UTC
/// (`formatted=0`) and converted to the course clock here.
pub struct HttpSolarService {
    client: Client,
    api_url: String,
    timezone: Tz,
}

impl HttpSolarService {
    pub fn new(api_url: String, timezone: Tz) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to build solar API client: {}", e)))?;
        Ok(Self { client, api_url, timezone })
    }
}

#[derive(Deserialize)]
struct SolarResults {
    sunrise: String,
    sunset: String,
}

#[derive(Deserialize)]
struct SolarResponse {
    results: Option<SolarResults>,
    status: String,
}

fn parse_local(raw: &str, tz: Tz) -> Result<NaiveTime, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&tz).time())
        .map_err(|e| AppError::Unavailable(format!("Unreadable solar time '{}': {}", raw, e)))
}

fn into_solar_times(body: SolarResponse, tz: Tz) -> Result<SolarTimes, AppError> {
    if body.status != "OK" {
        return Err(AppError::Unavailable(format!("Solar API returned status {}", body.status)));
    }
    let results = body.results.ok_or(AppError::Unavailable("Solar API returned no results".into()))?;

    Ok(SolarTimes {
        sunrise: parse_local(&results.sunrise, tz)?,
        sunset: parse_local(&results.sunset, tz)?,
    })
}

#[async_trait]
impl SolarTimeService for HttpSolarService {
    async fn sunrise_sunset(&self, date: NaiveDate, lat: f64, lon: f64) -> Result<SolarTimes, AppError> {
        let res = self.client.get(&self.api_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lng", lon.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
                ("formatted", "0".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Solar API connection error: {}", e);
                error!("{}", msg);
                AppError::Unavailable(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Solar API failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Unavailable(msg));
        }

        let body: SolarResponse = res.json().await
            .map_err(|e| AppError::Unavailable(format!("Solar API sent an unreadable body: {}", e)))?;
        let times = into_solar_times(body, self.timezone)?;
        debug!("Solar times for {}: sunrise {} sunset {}", date, times.sunrise, times.sunset);
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> SolarResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_converts_utc_to_course_clock() {
        let body = response(r#"{
            "results": {
                "sunrise": "2025-07-16T09:58:31+00:00",
                "sunset": "2025-07-17T00:45:12+00:00",
                "day_length": 53201
            },
            "status": "OK"
        }"#);

        let times = into_solar_times(body, chrono_tz::America::New_York).unwrap();
        assert_eq!(times.sunrise, NaiveTime::from_hms_opt(5, 58, 31).unwrap());
        assert_eq!(times.sunset, NaiveTime::from_hms_opt(20, 45, 12).unwrap());
    }

    #[test]
    fn test_client_builds_with_timeout() {
        let service = HttpSolarService::new("http://localhost:9/json".into(), chrono_tz::America::New_York).unwrap();
        assert_eq!(service.timezone, chrono_tz::America::New_York);
        assert_eq!(service.api_url, "http://localhost:9/json");
    }

    #[test]
    fn test_non_ok_status_is_unavailable() {
        let body = response(r#"{"results": null, "status": "INVALID_REQUEST"}"#);
        let err = into_solar_times(body, chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[test]
    fn test_garbled_time_is_unavailable() {
        let body = response(r#"{"results": {"sunrise": "5:58:31 AM", "sunset": "8:45:12 PM"}, "status": "OK"}"#);
        assert!(matches!(into_solar_times(body, chrono_tz::UTC), Err(AppError::Unavailable(_))));
    }
}
