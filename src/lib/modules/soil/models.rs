use serde_derive::{Deserialize, Serialize};

use super::functions::soil_erodibility;

/// Field-measured soil properties of a site
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoilProperties {
    /// soil pH
    pub ph: f32,
    /// sand content [%]
    pub sand: f32,
    /// silt content [%]
    pub silt: f32,
    /// clay content [%]
    pub clay: f32,
    /// organic matter content [%]
    pub organic_matter: f32,
}

impl SoilProperties {
    /// Reject parameter sets the erodibility regression cannot evaluate
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("sand", self.sand),
            ("silt", self.silt),
            ("clay", self.clay),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} content {} is not a percentage", name, value));
            }
        }
        if self.organic_matter <= 0.0 {
            return Err(format!(
                "organic matter content must be positive, got {}",
                self.organic_matter
            ));
        }
        if self.sand + self.silt <= 0.0 {
            return Err("sand and silt contents are both zero".to_string());
        }
        Ok(())
    }

    /// Texture fractions should add up to 100%
    pub fn texture_sum(&self) -> f32 {
        self.sand + self.silt + self.clay
    }

    pub fn erodibility(&self) -> f32 {
        soil_erodibility(self.ph, self.sand, self.clay, self.silt, self.organic_matter)
    }
}
