use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde_derive::{Deserialize, Serialize};

use rusle::models::output::OutputVariableName;
use rusle::modules::erosivity::config::ErosivityModelConfig;
use rusle::modules::rusle::models::{RusleCellPropertiesContainer, RusleProperties};
use rusle::modules::soil::models::SoilProperties;
use rusle::modules::topography::models::SlopeProperties;

use crate::common::helpers::RusleError;
use crate::common::io::models::output::OutputVariable;
use crate::common::io::models::palette::Palette;
use crate::common::io::readers::meteo::OpenMeteoInputConfiguration;
use crate::common::projection::DemCrs;

use super::models::{ElevationConfig, RusleConfig};

pub const DEFAULT_MODEL_VERSION: &str = "loureiro-coutinho";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn default_practice_factor() -> f32 {
    1.0
}

fn default_precision() -> i32 {
    4
}

fn default_window_size() -> usize {
    50
}

/// A site where the erosion model is evaluated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RusleSiteConfig {
    pub name: String,
    pub latitude: f32,
    pub longitude: f32,
    pub soil: SoilProperties,
    pub slope: SlopeProperties,
    pub cover_factor: f32,
    #[serde(default = "default_practice_factor")]
    pub practice_factor: f32,
}

/// A site where an elevation window is extracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub latitude: f32,
    pub longitude: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputVariableConfig {
    pub variable: OutputVariableName,
    pub name: String,
    #[serde(default = "default_precision")]
    pub precision: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputTypeConfig {
    pub format: String,
    pub path: String,
    pub variables: Vec<OutputVariableConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RusleConfigBuilder {
    pub model_name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub climate_model: Option<String>,
    pub sites: Vec<RusleSiteConfig>,
    pub outputs: Vec<OutputTypeConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ElevationConfigBuilder {
    pub model_name: String,
    pub dem_path: String,
    #[serde(default)]
    pub dem_crs: Option<String>,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    pub sites: Vec<SiteConfig>,
    pub output_path: String,
    #[serde(default)]
    pub palette_path: Option<String>,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigBuilderType {
    RUSLE(RusleConfigBuilder),
    ELEVATION(ElevationConfigBuilder),
}

impl ConfigBuilderType {
    pub fn get_model_name(&self) -> &str {
        match self {
            ConfigBuilderType::RUSLE(builder) => &builder.model_name,
            ConfigBuilderType::ELEVATION(builder) => &builder.model_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigContainer {
    #[serde(default)]
    pub cache_path: Option<String>,
    pub models: Vec<ConfigBuilderType>,
}

impl ConfigContainer {
    pub fn from_file(config_file: &str) -> Result<ConfigContainer, RusleError> {
        let mut file = File::open(config_file)
            .map_err(|err| format!("error opening config file {config_file}: {err}"))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| format!("error reading config file {config_file}: {err}"))?;

        let conf: ConfigContainer = serde_yaml::from_str(&contents)
            .map_err(|err| format!("error parsing config file {config_file}: {err}"))?;
        Ok(conf)
    }
}

fn parse_date(date: &str, what: &str) -> Result<NaiveDate, RusleError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| format!("could not parse {what} '{date}', expected YYYY-MM-DD").into())
}

impl RusleConfigBuilder {
    pub fn build(
        &self,
        run_date: &DateTime<Utc>,
        cache_path: &Option<String>,
    ) -> Result<RusleConfig, RusleError> {
        let start_date = parse_date(&self.start_date, "start date")?;
        let end_date = parse_date(&self.end_date, "end date")?;
        if start_date > end_date {
            return Err(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )
            .into());
        }
        if self.sites.is_empty() {
            return Err("no sites configured".into());
        }
        if self.outputs.is_empty() {
            return Err("no outputs configured".into());
        }

        let mut lons: Vec<f32> = Vec::with_capacity(self.sites.len());
        let mut lats: Vec<f32> = Vec::with_capacity(self.sites.len());
        let mut names: Vec<String> = Vec::with_capacity(self.sites.len());
        let mut soils: Vec<SoilProperties> = Vec::with_capacity(self.sites.len());
        let mut slopes: Vec<SlopeProperties> = Vec::with_capacity(self.sites.len());
        let mut cover_factors: Vec<f32> = Vec::with_capacity(self.sites.len());
        let mut practice_factors: Vec<f32> = Vec::with_capacity(self.sites.len());

        for site in &self.sites {
            site.soil
                .validate()
                .map_err(|err| format!("site {}: {err}", site.name))?;
            site.slope
                .validate()
                .map_err(|err| format!("site {}: {err}", site.name))?;
            if !(0.0..=1.0).contains(&site.cover_factor) {
                return Err(format!(
                    "site {}: cover factor {} is outside [0, 1]",
                    site.name, site.cover_factor
                )
                .into());
            }
            if !(0.0..=1.0).contains(&site.practice_factor) {
                return Err(format!(
                    "site {}: practice factor {} is outside [0, 1]",
                    site.name, site.practice_factor
                )
                .into());
            }
            let texture_sum = site.soil.texture_sum();
            if (texture_sum - 100.0).abs() > 5.0 {
                warn!(
                    "site {}: soil texture fractions add up to {}%",
                    site.name, texture_sum
                );
            }

            lons.push(site.longitude);
            lats.push(site.latitude);
            names.push(site.name.clone());
            soils.push(site.soil);
            slopes.push(site.slope);
            cover_factors.push(site.cover_factor);
            practice_factors.push(site.practice_factor);
        }

        let properties = RusleProperties::new(RusleCellPropertiesContainer {
            lons,
            lats,
            soils,
            slopes,
            cover_factors,
            practice_factors,
        });

        let model_version = self
            .model_version
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());

        let mut meteo_config = OpenMeteoInputConfiguration {
            cache_path: cache_path.clone(),
            ..Default::default()
        };
        if let Some(climate_model) = &self.climate_model {
            meteo_config.climate_model = climate_model.clone();
        }

        let output_types = self
            .outputs
            .iter()
            .map(|output| {
                let format = output.format.to_uppercase();
                if format != "CSV" && format != "JSON" {
                    return Err(format!("unsupported output format {}", output.format).into());
                }
                Ok(output.clone())
            })
            .collect::<Result<Vec<_>, RusleError>>()?;

        Ok(RusleConfig::new(
            &self.model_name,
            *run_date,
            start_date,
            end_date,
            properties,
            names,
            ErosivityModelConfig::new(&model_version),
            meteo_config,
            output_types,
        ))
    }
}

impl ElevationConfigBuilder {
    pub fn build(&self, run_date: &DateTime<Utc>) -> Result<ElevationConfig, RusleError> {
        if self.sites.is_empty() {
            return Err("no sites configured".into());
        }
        if self.window_size == 0 {
            return Err("window size must be positive".into());
        }
        let crs = match &self.dem_crs {
            Some(crs) => DemCrs::from_str(crs)
                .map_err(|_| format!("unsupported DEM coordinate system {crs}"))?,
            None => DemCrs::default(),
        };
        let palette = match &self.palette_path {
            Some(path) => Some(Palette::load_palette(path)?),
            None => None,
        };

        Ok(ElevationConfig {
            model_name: self.model_name.clone(),
            run_date: *run_date,
            dem_path: self.dem_path.clone(),
            crs,
            window_size: self.window_size,
            sites: self.sites.clone(),
            output_path: self.output_path.clone(),
            palette,
        })
    }
}

/// Build the OutputVariable list of an output type configuration
pub fn build_output_variables(config: &OutputTypeConfig) -> Vec<OutputVariable> {
    config
        .variables
        .iter()
        .map(|variable| OutputVariable::new(variable.variable, &variable.name, variable.precision))
        .collect()
}
