use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use itertools::izip;
use log::debug;
use rusle::constants::NODATAVAL;
use rusle::models::output::Output;

use crate::common::{helpers::RusleError, io::models::output::OutputVariable};

use super::{helpers::extract_errors, prelude::OutputSink};

const MONTH_COLUMNS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub struct CsvWriter {
    path: PathBuf,
    name: String,
    run_date: DateTime<Utc>,
}

impl CsvWriter {
    pub fn new(path: &str, name: &str, run_date: &DateTime<Utc>) -> Self {
        Self {
            path: PathBuf::from(path),
            name: name.to_string(),
            run_date: *run_date,
        }
    }

    fn write_variable(
        &self,
        variable: &OutputVariable,
        output: &Output,
        lats: &[f32],
        lons: &[f32],
        names: &[String],
    ) -> Result<(), RusleError> {
        let run_date = self.run_date.format("%Y%m%d%H%M");
        let file = self
            .path
            .join(format!("{}_{}_{}.csv", self.name, run_date, variable.name()));

        debug!("[CSV] Writing variable {} to {:?}", variable.name(), file);

        let scalar = variable
            .get_scalar(output)
            .ok_or(format!("no values for variable {}", variable.name()))?;
        let monthly = variable.get_monthly(output);

        let mut out = fs::File::create(&file)
            .map_err(|err| format!("cannot create file {}: {err}", file.display()))?;

        let mut header = String::from("site,lat,lon");
        if monthly.is_some() {
            for month in MONTH_COLUMNS {
                header.push(',');
                header.push_str(month);
            }
            header.push_str(",annual");
        } else {
            header.push_str(",value");
        }
        writeln!(out, "{}", header)
            .map_err(|err| format!("cannot write to {}: {err}", file.display()))?;

        for (idx, (name, lat, lon)) in izip!(names, lats, lons).enumerate() {
            let mut row = format!("{},{:.6},{:.6}", name, lat, lon);
            if let Some(monthly) = &monthly {
                for month in 0..12 {
                    row.push(',');
                    row.push_str(&format_value(monthly[[idx, month]]));
                }
            }
            row.push(',');
            row.push_str(&format_value(scalar[idx]));
            writeln!(out, "{}", row)
                .map_err(|err| format!("cannot write to {}: {err}", file.display()))?;
        }
        Ok(())
    }
}

fn format_value(value: f32) -> String {
    if value <= (NODATAVAL + 1.0) {
        "NA".to_string()
    } else {
        format!("{}", value)
    }
}

impl OutputSink for CsvWriter {
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

        let results: Vec<Result<(), RusleError>> = variables
            .iter()
            .map(|variable| self.write_variable(variable, output, lats, lons, names))
            .collect();

        extract_errors("CSV Errors", results)
    }
}
