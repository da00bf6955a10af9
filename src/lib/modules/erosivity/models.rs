use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use crate::constants::NODATAVAL;

use super::{config::ErosivityModelConfig, functions::is_erosive_day};

// Per (month, year) rain accumulation
// The entry exists as soon as the month has one observed day, so a wet-less
// month still scores EI30 = 0 instead of being treated as unobserved
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthlyAccumulator {
    /// summed rain of the erosive days [mm]
    pub erosive_rain: f32,
    /// number of erosive days
    pub erosive_days: u32,
}

impl MonthlyAccumulator {
    pub fn observe(&mut self, rain: f32) {
        if is_erosive_day(rain) {
            self.erosive_rain += rain;
            self.erosive_days += 1;
        }
    }
}

/// Daily precipitation history grouped by (year, month)
#[derive(Debug, Default, Clone)]
pub struct ErosivityHistory {
    months: BTreeMap<(i32, u32), MonthlyAccumulator>,
}

impl ErosivityHistory {
    pub fn new() -> Self {
        Self {
            months: BTreeMap::new(),
        }
    }

    /// Store one day of rain; nodata never reaches the accumulators
    pub fn store(&mut self, time: &DateTime<Utc>, rain: f32) {
        if rain <= (NODATAVAL + 1.0) {
            return;
        }
        let key = (time.year(), time.month());
        self.months.entry(key).or_default().observe(rain);
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Mean EI30 per calendar month across all years present in the record.
    /// A month never observed stays NODATAVAL.
    pub fn monthly_erosivity(&self, config: &ErosivityModelConfig) -> [f32; 12] {
        let mut monthly = [NODATAVAL; 12];
        for month in 1..=12u32 {
            let values: Vec<f32> = self
                .months
                .iter()
                .filter(|((_, m), _)| *m == month)
                .map(|(_, acc)| config.ei30(acc.erosive_rain, acc.erosive_days))
                .collect();
            if !values.is_empty() {
                monthly[(month - 1) as usize] = values.iter().sum::<f32>() / values.len() as f32;
            }
        }
        monthly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn groups_by_month_and_year() {
        let config = ErosivityModelConfig::default();
        let mut history = ErosivityHistory::new();
        // January 2020: two erosive days (20 + 30 mm)
        history.store(&day(2020, 1, 3), 20.0);
        history.store(&day(2020, 1, 17), 30.0);
        // January 2021: one erosive day (40 mm)
        history.store(&day(2021, 1, 5), 40.0);

        let monthly = history.monthly_erosivity(&config);
        // 2020: 7.05 * 50 - 88.92 * 2 = 174.66; 2021: 7.05 * 40 - 88.92 = 193.08
        let expected = (174.66 + 193.08) / 2.0;
        assert!((monthly[0] - expected).abs() < 1e-2);
    }

    #[test]
    fn sub_threshold_days_mark_the_month_as_observed() {
        let config = ErosivityModelConfig::default();
        let mut history = ErosivityHistory::new();
        history.store(&day(2020, 6, 1), 2.0);
        history.store(&day(2020, 6, 2), 0.0);

        let monthly = history.monthly_erosivity(&config);
        // observed month with no erosive days scores zero, not nodata
        assert_eq!(monthly[5], 0.0);
    }

    #[test]
    fn unobserved_months_stay_nodata() {
        let config = ErosivityModelConfig::default();
        let mut history = ErosivityHistory::new();
        history.store(&day(2020, 1, 1), 25.0);

        let monthly = history.monthly_erosivity(&config);
        assert!(monthly[1] <= NODATAVAL + 1.0);
        assert!(monthly[11] <= NODATAVAL + 1.0);
    }

    #[test]
    fn nodata_days_are_ignored() {
        let config = ErosivityModelConfig::default();
        let mut history = ErosivityHistory::new();
        history.store(&day(2020, 3, 1), NODATAVAL);
        assert!(history.is_empty());

        // a nodata day inside an observed month does not perturb the total
        history.store(&day(2020, 3, 2), 15.0);
        history.store(&day(2020, 3, 3), NODATAVAL);
        let monthly = history.monthly_erosivity(&config);
        let expected = 7.05 * 15.0 - 88.92;
        assert!((monthly[2] - expected).abs() < 1e-3);
    }

    #[test]
    fn mean_only_covers_years_present_for_the_month() {
        let config = ErosivityModelConfig::default();
        let mut history = ErosivityHistory::new();
        // June observed in 2020 only, even though 2021 appears elsewhere
        history.store(&day(2020, 6, 10), 30.0);
        history.store(&day(2021, 7, 10), 30.0);

        let monthly = history.monthly_erosivity(&config);
        let expected = 7.05 * 30.0 - 88.92;
        assert!((monthly[5] - expected).abs() < 1e-3);
        assert!((monthly[6] - expected).abs() < 1e-3);
    }
}
