use super::constants::*;

// A day is erosive when its precipitation reaches the 10mm threshold
pub fn is_erosive_day(rain: f32) -> bool {
    rain >= EROSIVE_DAY_THRESHOLD
}

// Monthly rainfall erosivity (EI30) from the erosive-day rain total and count
// Negative regression results are clamped to zero
// Source: Loureiro N., Coutinho M. (2001). A new procedure to estimate the RUSLE
// EI30 index, based on monthly rainfall data. Journal of Hydrology, 250, 12-18.
pub fn monthly_ei30(
    erosive_rain: f32, // summed rain of the erosive days [mm]
    erosive_days: u32, // number of erosive days
) -> f32 {
    let ei30 = EI30_RAIN_COEFF * erosive_rain - EI30_DAYS_COEFF * erosive_days as f32;
    if ei30 <= 0.0 {
        0.0
    } else {
        ei30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_erosive_day(10.0));
        assert!(is_erosive_day(35.2));
        assert!(!is_erosive_day(9.99));
        assert!(!is_erosive_day(0.0));
    }

    #[test]
    fn ei30_applies_regression() {
        // one erosive day of 20mm: 7.05 * 20 - 88.92 * 1 = 52.08
        let ei30 = monthly_ei30(20.0, 1);
        assert!((ei30 - 52.08).abs() < 1e-3);
    }

    #[test]
    fn ei30_clamps_negative_results() {
        // a single 10mm day gives 70.5 - 88.92 < 0
        assert_eq!(monthly_ei30(10.0, 1), 0.0);
    }

    #[test]
    fn ei30_of_no_erosive_days_is_zero() {
        assert_eq!(monthly_ei30(0.0, 0), 0.0);
    }
}
