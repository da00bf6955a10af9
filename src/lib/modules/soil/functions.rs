use super::constants::*;

// Soil erodibility (K factor) from field-measured soil properties
// Output units are t ha h / (ha MJ mm)
pub fn soil_erodibility(
    ph: f32,             // soil pH
    sand: f32,           // sand content [%]
    clay: f32,           // clay content [%]
    silt: f32,           // silt content [%]
    organic_matter: f32, // organic matter content [%]
) -> f32 {
    let clay_ratio = clay / (sand + silt);
    let silt_fraction = silt / 100.0;
    (K_PH_COEFF * ph + K_OM_COEFF / organic_matter + K_SAND_COEFF * sand
        - K_CLAY_RATIO_COEFF * clay_ratio)
        * silt_fraction
        * K_SI_CONVERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erodibility_of_sandy_loam() {
        // field values for a eucalyptus stand on sandy loam
        let k = soil_erodibility(5.5, 75.0, 19.0, 6.0, 2.4);
        assert!((k - 0.008758).abs() < 1e-5);
    }

    #[test]
    fn erodibility_grows_with_silt() {
        let low_silt = soil_erodibility(6.0, 70.0, 20.0, 10.0, 2.0);
        let high_silt = soil_erodibility(6.0, 60.0, 20.0, 20.0, 2.0);
        assert!(high_silt > low_silt);
    }
}
