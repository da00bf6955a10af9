use chrono::{DateTime, Utc};

use crate::constants::NODATAVAL;
use crate::models::output::OutputElement;

use super::super::erosivity::config::ErosivityModelConfig;
use super::models::{RuslePropertiesElement, RusleStateElement};

// A = R * K * LS * C * P  [t/ha/year]
pub fn soil_loss(r: f32, k: f32, ls: f32, c: f32, p: f32) -> f32 {
    for factor in [r, k, ls, c, p] {
        if factor <= (NODATAVAL + 1.0) {
            return NODATAVAL;
        }
    }
    r * k * ls * c * p
}

// Annual value as the sum of the defined monthly values
pub fn annual_from_monthly(monthly: &[f32; 12]) -> f32 {
    let defined: Vec<f32> = monthly
        .iter()
        .filter(|v| **v > (NODATAVAL + 1.0))
        .copied()
        .collect();
    if defined.is_empty() {
        return NODATAVAL;
    }
    defined.iter().sum()
}

pub fn store_day_fn(state: &mut RusleStateElement, rain: f32, time: &DateTime<Utc>) {
    state.history.store(time, rain);
}

pub fn get_output_fn(
    state: &RusleStateElement,
    props: &RuslePropertiesElement,
    config: &ErosivityModelConfig,
) -> OutputElement {
    let monthly_erosivity = state.history.monthly_erosivity(config);
    let annual_erosivity = annual_from_monthly(&monthly_erosivity);

    let mut monthly_erosion = [NODATAVAL; 12];
    for (erosion, erosivity) in monthly_erosion.iter_mut().zip(monthly_erosivity.iter()) {
        *erosion = soil_loss(
            *erosivity,
            props.soil_erodibility,
            props.slope_factor,
            props.cover_factor,
            props.practice_factor,
        );
    }
    let annual_erosion = soil_loss(
        annual_erosivity,
        props.soil_erodibility,
        props.slope_factor,
        props.cover_factor,
        props.practice_factor,
    );

    OutputElement {
        monthly_erosivity,
        annual_erosivity,
        soil_erodibility: props.soil_erodibility,
        slope_factor: props.slope_factor,
        cover_factor: props.cover_factor,
        practice_factor: props.practice_factor,
        monthly_erosion,
        annual_erosion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_loss_multiplies_factors() {
        let a = soil_loss(1000.0, 0.01, 1.0, 0.005, 1.0);
        assert!((a - 0.05).abs() < 1e-6);
    }

    #[test]
    fn soil_loss_propagates_nodata() {
        assert_eq!(soil_loss(NODATAVAL, 0.01, 1.0, 0.005, 1.0), NODATAVAL);
        assert_eq!(soil_loss(1000.0, NODATAVAL, 1.0, 0.005, 1.0), NODATAVAL);
    }

    #[test]
    fn annual_skips_undefined_months() {
        let mut monthly = [NODATAVAL; 12];
        monthly[0] = 100.0;
        monthly[5] = 50.0;
        assert_eq!(annual_from_monthly(&monthly), 150.0);
    }

    #[test]
    fn annual_of_empty_record_is_nodata() {
        let monthly = [NODATAVAL; 12];
        assert_eq!(annual_from_monthly(&monthly), NODATAVAL);
    }
}
