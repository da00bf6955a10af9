use chrono::{DateTime, NaiveDate, Utc};

use rusle::modules::erosivity::config::ErosivityModelConfig;
use rusle::modules::rusle::models::{RusleProperties, RusleState};

use crate::common::helpers::RusleError;
use crate::common::io::models::output::OutputType;
use crate::common::io::models::palette::Palette;
use crate::common::io::readers::meteo::{OpenMeteoInputConfiguration, OpenMeteoInputHandler};
use crate::common::io::writers::csv::CsvWriter;
use crate::common::io::writers::json::JsonWriter;
use crate::common::io::writers::prelude::OutputSink;
use crate::common::projection::DemCrs;

use super::builder::{build_output_variables, OutputTypeConfig, SiteConfig};

/// A runnable RUSLE model configuration
pub struct RusleConfig {
    pub model_name: String,
    pub run_date: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    properties: RusleProperties,
    site_names: Vec<String>,
    erosivity_config: ErosivityModelConfig,
    meteo_config: OpenMeteoInputConfiguration,
    output_types: Vec<OutputTypeConfig>,
}

impl RusleConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model_name: &str,
        run_date: DateTime<Utc>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        properties: RusleProperties,
        site_names: Vec<String>,
        erosivity_config: ErosivityModelConfig,
        meteo_config: OpenMeteoInputConfiguration,
        output_types: Vec<OutputTypeConfig>,
    ) -> Self {
        Self {
            model_name: model_name.to_string(),
            run_date,
            start_date,
            end_date,
            properties,
            site_names,
            erosivity_config,
            meteo_config,
            output_types,
        }
    }

    pub fn get_properties(&self) -> &RusleProperties {
        &self.properties
    }

    pub fn get_site_names(&self) -> &[String] {
        &self.site_names
    }

    pub fn new_state(&self) -> RusleState {
        RusleState::new(
            &self.run_date,
            self.properties.len,
            self.erosivity_config.clone(),
        )
    }

    pub fn get_input_handler(&self) -> Result<OpenMeteoInputHandler, RusleError> {
        OpenMeteoInputHandler::new(self.start_date, self.end_date, &self.meteo_config)
    }

    pub fn get_output_writers(&self) -> Result<Vec<OutputType>, RusleError> {
        self.output_types
            .iter()
            .map(|config| {
                let sink: Box<dyn OutputSink> = match config.format.to_uppercase().as_str() {
                    "CSV" => Box::new(CsvWriter::new(
                        &config.path,
                        &self.model_name,
                        &self.run_date,
                    )),
                    "JSON" => Box::new(JsonWriter::new(
                        &config.path,
                        &self.model_name,
                        &self.run_date,
                    )),
                    other => return Err(format!("unsupported output format {other}").into()),
                };
                Ok(OutputType::new(sink, build_output_variables(config)))
            })
            .collect()
    }
}

/// A runnable elevation extraction configuration
pub struct ElevationConfig {
    pub model_name: String,
    pub run_date: DateTime<Utc>,
    pub dem_path: String,
    pub crs: DemCrs,
    pub window_size: usize,
    pub sites: Vec<SiteConfig>,
    pub output_path: String,
    pub palette: Option<Palette>,
}
