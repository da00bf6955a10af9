use serde_derive::{Deserialize, Serialize};

use super::functions::slope_length_factor;

/// Field-measured slope properties of a site
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlopeProperties {
    /// slope steepness [%]
    pub steepness: f32,
    /// slope length [m]
    pub length: f32,
}

impl SlopeProperties {
    pub fn validate(&self) -> Result<(), String> {
        if self.length <= 0.0 {
            return Err(format!("slope length must be positive, got {}", self.length));
        }
        if self.steepness < 0.0 {
            return Err(format!(
                "slope steepness must not be negative, got {}",
                self.steepness
            ));
        }
        Ok(())
    }

    pub fn slope_factor(&self) -> f32 {
        slope_length_factor(self.steepness, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slope_passes() {
        let slope = SlopeProperties {
            steepness: 9.0,
            length: 22.0,
        };
        assert!(slope.validate().is_ok());
        assert!((slope.slope_factor() - 0.9965).abs() < 1e-4);
    }

    #[test]
    fn rejects_non_positive_length() {
        let slope = SlopeProperties {
            steepness: 9.0,
            length: 0.0,
        };
        assert!(slope.validate().is_err());
    }

    #[test]
    fn rejects_negative_steepness() {
        let slope = SlopeProperties {
            steepness: -1.0,
            length: 22.0,
        };
        assert!(slope.validate().is_err());
    }
}
