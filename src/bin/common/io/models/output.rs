use ndarray::{Array1, Array2};
use rusle::models::output::{Output, OutputVariableName};
use serde_derive::{Deserialize, Serialize};

use crate::common::helpers::RusleError;
use crate::common::io::writers::prelude::OutputSink;

use rusle::constants::NODATAVAL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputVariable {
    internal_name: OutputVariableName,
    name: String,
    precision: i32,
}

impl OutputVariable {
    pub fn new(internal_name: OutputVariableName, name: &str, precision: i32) -> Self {
        Self {
            internal_name,
            name: name.to_string(),
            precision,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal_name(&self) -> &OutputVariableName {
        &self.internal_name
    }

    /// Annual (or scalar) values per site, rounded to the configured precision
    pub fn get_scalar(&self, output: &Output) -> Option<Array1<f32>> {
        let values = output.get(&self.internal_name)?;
        Some(values.mapv(|v| self.round(v)))
    }

    /// Monthly values per site, shape (n_sites, 12), if the variable has them
    pub fn get_monthly(&self, output: &Output) -> Option<Array2<f32>> {
        let values = output.get_monthly(&self.internal_name)?;
        Some(values.mapv(|v| self.round(v)))
    }

    fn round(&self, value: f32) -> f32 {
        if value <= (NODATAVAL + 1.0) {
            return NODATAVAL;
        }
        let cutval = f32::powi(10.0, self.precision);
        (value * cutval).round() / cutval
    }
}

/// A configured output sink together with the variables it should persist
pub struct OutputType {
    sink: Box<dyn OutputSink>,
    variables: Vec<OutputVariable>,
}

impl OutputType {
    pub fn new(sink: Box<dyn OutputSink>, variables: Vec<OutputVariable>) -> Self {
        Self { sink, variables }
    }

    pub fn write(
        &mut self,
        output: &Output,
        lats: &[f32],
        lons: &[f32],
        names: &[String],
    ) -> Result<(), RusleError> {
        self.sink.write(output, lats, lons, names, &self.variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rusle::models::output::OutputElement;

    #[test]
    fn rounding_respects_precision_and_nodata() {
        let variable = OutputVariable::new(OutputVariableName::R, "erosivity", 1);
        let mut element = OutputElement::default();
        element.annual_erosivity = 104.16789;
        let output = Output::new(Utc::now(), Array1::from_vec(vec![element]));

        let values = variable.get_scalar(&output).expect("R has annual values");
        assert!((values[0] - 104.2).abs() < 1e-6);

        let monthly = variable.get_monthly(&output).expect("R has monthly values");
        assert_eq!(monthly[[0, 0]], NODATAVAL);
    }
}
