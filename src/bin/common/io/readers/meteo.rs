use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use itertools::izip;
use log::{debug, info, warn};
use ndarray::Array1;
use serde_derive::{Deserialize, Serialize};

use rusle::constants::NODATAVAL;
use rusle::models::input::{InputVariableName, PrecipitationSeries};

use crate::common::helpers::RusleError;

use super::prelude::InputHandler;

// Open-Meteo endpoints: reanalysis archive for the past,
// climate projections when the period reaches into the future
pub const ARCHIVE_API_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const CLIMATE_API_URL: &str = "https://climate-api.open-meteo.com/v1/climate";

const MAX_RETRIES: u32 = 5;
const BACKOFF_FACTOR: f32 = 0.2; // seconds

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoInputConfiguration {
    /// climate projection model used for future periods
    pub climate_model: String,
    /// response cache directory; None disables caching
    pub cache_path: Option<String>,
}

impl Default for OpenMeteoInputConfiguration {
    fn default() -> Self {
        Self {
            climate_model: "HiRAM_SIT_HR".to_string(),
            cache_path: Some(".cache".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<String>,
    precipitation_sum: Vec<Option<f32>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: OpenMeteoDaily,
}

/// Unpack an Open-Meteo daily response body into a precipitation series
pub fn parse_response(body: &str) -> Result<PrecipitationSeries, RusleError> {
    let response: OpenMeteoResponse =
        serde_json::from_str(body).map_err(|err| format!("malformed weather response: {err}"))?;
    let dates = response
        .daily
        .time
        .iter()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("malformed date in weather response: {err}"))?;
    let values = response
        .daily
        .precipitation_sum
        .iter()
        .map(|v| v.unwrap_or(NODATAVAL))
        .collect();
    PrecipitationSeries::new(dates, values).map_err(RusleError::from)
}

pub struct OpenMeteoInputHandler {
    start_date: NaiveDate,
    end_date: NaiveDate,
    config: OpenMeteoInputConfiguration,
    agent: ureq::Agent,
    timeline: Vec<DateTime<Utc>>,
    data: HashMap<NaiveDate, Array1<f32>>,
}

impl OpenMeteoInputHandler {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        config: &OpenMeteoInputConfiguration,
    ) -> Result<Self, RusleError> {
        if start_date > end_date {
            return Err(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )
            .into());
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(60))
            .build();
        Ok(Self {
            start_date,
            end_date,
            config: config.clone(),
            agent,
            timeline: vec![],
            data: HashMap::new(),
        })
    }

    /// Periods ending before today are served by the reanalysis archive
    fn endpoint(&self, today: NaiveDate) -> (&'static str, bool) {
        if self.end_date < today {
            (ARCHIVE_API_URL, false)
        } else {
            (CLIMATE_API_URL, true)
        }
    }

    fn cache_file(&self, url: &str, lat: f32, lon: f32) -> Option<PathBuf> {
        self.config.cache_path.as_ref().map(|dir| {
            let tag = if url == ARCHIVE_API_URL {
                "archive"
            } else {
                "climate"
            };
            Path::new(dir).join(format!(
                "{}_{:.4}_{:.4}_{}_{}.json",
                tag, lat, lon, self.start_date, self.end_date
            ))
        })
    }

    fn request(&self, url: &str, is_climate: bool, lat: f32, lon: f32) -> Result<String, RusleError> {
        let mut last_error = String::new();
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // same backoff progression as the provider's reference clients
                let backoff = BACKOFF_FACTOR * 2.0_f32.powi(attempt as i32 - 1);
                thread::sleep(Duration::from_secs_f32(backoff));
            }
            let mut request = self
                .agent
                .get(url)
                .query("latitude", &lat.to_string())
                .query("longitude", &lon.to_string())
                .query("start_date", &self.start_date.to_string())
                .query("end_date", &self.end_date.to_string())
                .query("daily", "precipitation_sum")
                .query("timezone", "GMT");
            if is_climate {
                request = request.query("models", &self.config.climate_model);
            }
            match request.call() {
                Ok(response) => {
                    return response
                        .into_string()
                        .map_err(|err| format!("cannot read weather response: {err}").into())
                }
                Err(ureq::Error::Status(code, _)) if code < 500 => {
                    return Err(format!("weather request failed with status {code}").into())
                }
                Err(err) => {
                    warn!("weather request attempt {} failed: {}", attempt + 1, err);
                    last_error = err.to_string();
                }
            }
        }
        Err(format!("weather request failed after {MAX_RETRIES} attempts: {last_error}").into())
    }

    fn fetch_series(&self, lat: f32, lon: f32) -> Result<PrecipitationSeries, RusleError> {
        let (url, is_climate) = self.endpoint(Utc::now().date_naive());
        let cache_file = self.cache_file(url, lat, lon);
        let body = match &cache_file {
            Some(file) if file.is_file() => {
                debug!("[meteo] cache hit: {}", file.display());
                fs::read_to_string(file)
                    .map_err(|err| format!("cannot read cache file {}: {err}", file.display()))?
            }
            _ => {
                info!(
                    "[meteo] fetching daily precipitation for ({:.4}, {:.4}) from {}",
                    lat, lon, url
                );
                let body = self.request(url, is_climate, lat, lon)?;
                if let Some(file) = &cache_file {
                    if let Some(parent) = file.parent() {
                        let _ = fs::create_dir_all(parent);
                    }
                    if let Err(err) = fs::write(file, &body) {
                        warn!("cannot write cache file {}: {}", file.display(), err);
                    }
                }
                body
            }
        };
        parse_response(&body)
    }
}

impl InputHandler for OpenMeteoInputHandler {
    fn set_coordinates(&mut self, lats: &[f32], lons: &[f32]) -> Result<(), Box<dyn Error>> {
        let n_sites = lats.len();
        let mut data: HashMap<NaiveDate, Array1<f32>> = HashMap::new();

        for (idx, (lat, lon)) in izip!(lats, lons).enumerate() {
            let series = self
                .fetch_series(*lat, *lon)
                .map_err(String::from)?;
            for (date, value) in series.iter() {
                let values = data
                    .entry(*date)
                    .or_insert_with(|| Array1::ones(n_sites) * NODATAVAL);
                values[idx] = *value;
            }
        }

        let mut dates: Vec<NaiveDate> = data.keys().copied().collect();
        dates.sort();
        self.timeline = dates
            .iter()
            .map(|d| {
                Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("midnight always exists"))
            })
            .collect();
        self.data = data;
        Ok(())
    }

    fn get_values(&self, var: InputVariableName, date: &DateTime<Utc>) -> Option<Array1<f32>> {
        match var {
            InputVariableName::P => self.data.get(&date.date_naive()).cloned(),
        }
    }

    fn get_timeline(&self) -> Vec<DateTime<Utc>> {
        self.timeline.clone()
    }
}
