use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use itertools::izip;
use log::debug;
use rusle::constants::NODATAVAL;
use rusle::models::output::Output;
use serde_json::{json, Map, Value};
use strum::EnumProperty;

use crate::common::{helpers::RusleError, io::models::output::OutputVariable};

use super::prelude::OutputSink;

pub struct JsonWriter {
    path: PathBuf,
    name: String,
    run_date: DateTime<Utc>,
}

impl JsonWriter {
    pub fn new(path: &str, name: &str, run_date: &DateTime<Utc>) -> Self {
        Self {
            path: PathBuf::from(path),
            name: name.to_string(),
            run_date: *run_date,
        }
    }
}

fn json_value(value: f32) -> Value {
    if value <= (NODATAVAL + 1.0) {
        Value::Null
    } else {
        json!(value)
    }
}

impl OutputSink for JsonWriter {
    fn write(
        &mut self,
        output: &Output,
        lats: &[f32],
        lons: &[f32],
        names: &[String],
        variables: &[OutputVariable],
    ) -> Result<(), RusleError> {
        fs::create_dir_all(&self.path)
            .map_err(|err| format!("cannot create output path {:?}: {err}", self.path))?;

        let file = self.path.join(format!(
            "{}_{}.json",
            self.name,
            self.run_date.format("%Y%m%d%H%M")
        ));
        debug!("[JSON] Writing {} variables to {:?}", variables.len(), file);

        let mut sites: Vec<Value> = Vec::with_capacity(names.len());
        for (idx, (name, lat, lon)) in izip!(names, lats, lons).enumerate() {
            let mut site_variables = Map::new();
            for variable in variables {
                let mut entry = Map::new();
                if let Some(long_name) = variable.internal_name().get_str("long_name") {
                    entry.insert("long_name".to_string(), json!(long_name));
                }
                if let Some(units) = variable.internal_name().get_str("units") {
                    entry.insert("units".to_string(), json!(units));
                }
                if let Some(scalar) = variable.get_scalar(output) {
                    entry.insert("annual".to_string(), json_value(scalar[idx]));
                }
                if let Some(monthly) = variable.get_monthly(output) {
                    let months: Vec<Value> = (0..12)
                        .map(|month| json_value(monthly[[idx, month]]))
                        .collect();
                    entry.insert("monthly".to_string(), Value::Array(months));
                }
                site_variables.insert(variable.name().to_string(), Value::Object(entry));
            }
            sites.push(json!({
                "name": name,
                "latitude": lat,
                "longitude": lon,
                "variables": Value::Object(site_variables),
            }));
        }

        let document = json!({
            "model": self.name,
            "run_date": self.run_date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "sites": sites,
        });

        let contents = serde_json::to_string_pretty(&document)
            .map_err(|err| format!("cannot serialize output: {err}"))?;
        fs::write(&file, contents)
            .map_err(|err| format!("cannot write file {}: {err}", file.display()))?;
        Ok(())
    }
}
