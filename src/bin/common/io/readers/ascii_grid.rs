use std::fs::File;
use std::io::{self, BufRead};

use ndarray::Array2;

use rusle::constants::NODATAVAL;

use crate::common::helpers::RusleError;
use crate::common::io::models::grid::{DemRaster, GeoTransform};

use super::prelude::DemReader;

/// Reader for DEMs in the ESRI ASCII grid format: a small text header
/// (ncols, nrows, corner or center origin, cellsize, optional nodata)
/// followed by one row of samples per line, north first.
pub struct AsciiGridReader {
    path: String,
}

impl AsciiGridReader {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    fn parse_lines(
        path: &str,
        lines: impl Iterator<Item = io::Result<String>>,
    ) -> Result<DemRaster, RusleError> {
        let mut ncols: Option<usize> = None;
        let mut nrows: Option<usize> = None;
        let mut xll: Option<f64> = None;
        let mut yll: Option<f64> = None;
        let mut center_origin = false;
        let mut cell_size: Option<f64> = None;
        let mut nodata = NODATAVAL;

        let mut values: Vec<f32> = Vec::new();

        for (i, line) in lines.enumerate() {
            let line = line.map_err(|err| format!("error reading {path} line {i}: {err}"))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let first = parts.next().expect("non-empty line has a first token");

            // header keys are case insensitive and precede the samples
            if values.is_empty() && first.chars().next().is_some_and(|c| c.is_alphabetic()) {
                let key = first.to_lowercase();
                let value = parts
                    .next()
                    .ok_or(format!("missing value for header {key} in {path}"))?;
                match key.as_str() {
                    "ncols" => ncols = Some(parse_header(value, &key, path)?),
                    "nrows" => nrows = Some(parse_header(value, &key, path)?),
                    "xllcorner" => xll = Some(parse_header(value, &key, path)?),
                    "yllcorner" => yll = Some(parse_header(value, &key, path)?),
                    "xllcenter" => {
                        xll = Some(parse_header(value, &key, path)?);
                        center_origin = true;
                    }
                    "yllcenter" => {
                        yll = Some(parse_header(value, &key, path)?);
                        center_origin = true;
                    }
                    "cellsize" => cell_size = Some(parse_header(value, &key, path)?),
                    "nodata_value" => nodata = parse_header(value, &key, path)?,
                    _ => return Err(format!("unknown header {key} in {path}").into()),
                }
                continue;
            }

            for token in std::iter::once(first).chain(parts) {
                let sample: f32 = token
                    .parse()
                    .map_err(|_| format!("invalid sample '{token}' in {path} line {i}"))?;
                values.push(sample);
            }
        }

        let ncols = ncols.ok_or(format!("missing ncols header in {path}"))?;
        let nrows = nrows.ok_or(format!("missing nrows header in {path}"))?;
        let mut xll = xll.ok_or(format!("missing xllcorner header in {path}"))?;
        let mut yll = yll.ok_or(format!("missing yllcorner header in {path}"))?;
        let cell_size = cell_size.ok_or(format!("missing cellsize header in {path}"))?;
        if center_origin {
            xll -= cell_size / 2.0;
            yll -= cell_size / 2.0;
        }

        if values.len() != ncols * nrows {
            return Err(format!(
                "{path} holds {} samples, expected {}x{}",
                values.len(),
                nrows,
                ncols
            )
            .into());
        }

        let data = Array2::from_shape_vec((nrows, ncols), values)
            .map_err(|err| format!("cannot shape {path} samples: {err}"))?;

        Ok(DemRaster {
            transform: GeoTransform {
                x_origin: xll,
                // the header origin is the lower-left corner, rows are stored north first
                y_origin: yll + nrows as f64 * cell_size,
                cell_size,
            },
            data,
            nodata,
        })
    }
}

fn parse_header<T: std::str::FromStr>(value: &str, key: &str, path: &str) -> Result<T, RusleError> {
    value
        .parse()
        .map_err(|_| format!("invalid {key} value '{value}' in {path}").into())
}

impl DemReader for AsciiGridReader {
    fn read(&self) -> Result<DemRaster, RusleError> {
        let file = File::open(&self.path)
            .map_err(|err| format!("cannot open DEM file {}: {err}", self.path))?;
        let reader = io::BufReader::new(file);
        Self::parse_lines(&self.path, reader.lines())
    }
}
