use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumProperty, EnumString};

use crate::constants::NODATAVAL;

pub struct OutputElement {
    // ------------------- RUSLE factors ------------------- //
    /// Mean monthly rainfall erosivity, January..December [MJ mm ha-1 h-1 year-1]
    pub monthly_erosivity: [f32; 12],
    /// Annual rainfall erosivity [MJ mm ha-1 h-1 year-1]
    pub annual_erosivity: f32,
    /// Soil erodibility [t ha h ha-1 MJ-1 mm-1]
    pub soil_erodibility: f32,
    /// Slope length and steepness factor
    pub slope_factor: f32,
    /// Cover management factor
    pub cover_factor: f32,
    /// Support practice factor
    pub practice_factor: f32,

    // ------------------- Soil loss ------------------- //
    /// Monthly soil loss, January..December [t ha-1 year-1]
    pub monthly_erosion: [f32; 12],
    /// Annual soil loss [t ha-1 year-1]
    pub annual_erosion: f32,
}

impl Default for OutputElement {
    fn default() -> Self {
        Self {
            monthly_erosivity: [NODATAVAL; 12],
            annual_erosivity: NODATAVAL,
            soil_erodibility: NODATAVAL,
            slope_factor: NODATAVAL,
            cover_factor: NODATAVAL,
            practice_factor: NODATAVAL,
            monthly_erosion: [NODATAVAL; 12],
            annual_erosion: NODATAVAL,
        }
    }
}

#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    EnumString,
    EnumProperty,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum OutputVariableName {
    /// Rainfall erosivity
    #[strum(props(long_name = "Rainfall Erosivity", units = "MJ mm ha-1 h-1 year-1"))]
    R,
    /// Soil erodibility
    #[strum(props(long_name = "Soil Erodibility", units = "t ha h ha-1 MJ-1 mm-1"))]
    K,
    /// Slope length and steepness factor
    #[strum(props(long_name = "Slope Length and Steepness Factor", units = "-"))]
    LS,
    /// Cover management factor
    #[strum(props(long_name = "Cover Management Factor", units = "-"))]
    C,
    /// Support practice factor
    #[strum(props(long_name = "Support Practice Factor", units = "-"))]
    P,
    /// Soil loss
    #[strum(props(long_name = "Soil Loss", units = "t ha-1 year-1"))]
    A,
}

impl OutputVariableName {
    /// Variables carrying a per-month breakdown next to the annual value
    pub fn is_monthly(&self) -> bool {
        matches!(self, OutputVariableName::R | OutputVariableName::A)
    }
}

pub struct Output {
    pub time: DateTime<Utc>,
    pub data: Array1<OutputElement>,
}

impl Output {
    pub fn new(time: DateTime<Utc>, data: Array1<OutputElement>) -> Self {
        Self { time, data }
    }

    pub fn get_array(&self, func: fn(&OutputElement) -> f32) -> Array1<f32> {
        let vec = self.data.par_iter().map(func).collect::<Vec<_>>();
        Array1::from_vec(vec)
    }

    /// Annual (or scalar) value of a variable, one entry per site
    pub fn get(&self, variable: &OutputVariableName) -> Option<Array1<f32>> {
        use OutputVariableName::*;
        match variable {
            R => Some(self.get_array(|o| o.annual_erosivity)),
            K => Some(self.get_array(|o| o.soil_erodibility)),
            LS => Some(self.get_array(|o| o.slope_factor)),
            C => Some(self.get_array(|o| o.cover_factor)),
            P => Some(self.get_array(|o| o.practice_factor)),
            A => Some(self.get_array(|o| o.annual_erosion)),
        }
    }

    /// Monthly values of a variable, shape (n_sites, 12);
    /// None for variables without a monthly breakdown
    pub fn get_monthly(&self, variable: &OutputVariableName) -> Option<Array2<f32>> {
        use OutputVariableName::*;
        let values: Vec<f32> = match variable {
            R => self
                .data
                .iter()
                .flat_map(|o| o.monthly_erosivity.into_iter())
                .collect(),
            A => self
                .data
                .iter()
                .flat_map(|o| o.monthly_erosion.into_iter())
                .collect(),
            _ => return None,
        };
        Array2::from_shape_vec((self.data.len(), 12), values).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_breakdown_only_for_r_and_a() {
        let output = Output::new(Utc::now(), Array1::default(2));
        assert!(output.get_monthly(&OutputVariableName::R).is_some());
        assert!(output.get_monthly(&OutputVariableName::A).is_some());
        assert!(output.get_monthly(&OutputVariableName::K).is_none());
        assert!(output.get_monthly(&OutputVariableName::LS).is_none());
    }

    #[test]
    fn monthly_shape_is_sites_by_twelve() {
        let output = Output::new(Utc::now(), Array1::default(3));
        let monthly = output
            .get_monthly(&OutputVariableName::R)
            .expect("should have monthly values");
        assert_eq!(monthly.shape(), &[3, 12]);
    }
}
