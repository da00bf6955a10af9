use chrono::{DateTime, NaiveDate, Utc};
use ndarray::Array1;

use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::NODATAVAL;

/// InputElement represents a single input element for the model
#[derive(Debug)]
pub struct InputElement {
    /// daily precipitation [mm]
    pub rain: f32,
}

impl Default for InputElement {
    fn default() -> Self {
        Self { rain: NODATAVAL }
    }
}

pub struct Input {
    pub time: DateTime<Utc>,
    pub data: Array1<InputElement>,
}

#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
#[derive(
    Debug, PartialEq, Eq, Hash, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize,
)]
pub enum InputVariableName {
    /// WEATHER VARIABLES IN INPUT

    /// Daily precipitation sum [mm]
    P,
}

/// Daily precipitation series for a single site, as unpacked from the
/// weather provider. One value per date, missing days are NODATAVAL.
#[derive(Debug, Clone)]
pub struct PrecipitationSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f32>,
}

impl PrecipitationSeries {
    /// Create a new series, rejecting mismatched date/value lengths
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f32>) -> Result<Self, String> {
        if dates.len() != values.len() {
            return Err(format!(
                "dates length {} does not match values length {}",
                dates.len(),
                values.len()
            ));
        }
        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f32)> {
        self.dates.iter().zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_length_mismatch() {
        let dates = vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()];
        let result = PrecipitationSeries::new(dates, vec![1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn series_iterates_pairs() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        ];
        let series = PrecipitationSeries::new(dates, vec![0.0, 12.5]).expect("should build");
        assert_eq!(series.len(), 2);
        let (date, value) = series.iter().nth(1).expect("should have two entries");
        assert_eq!(*date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(*value, 12.5);
    }
}
