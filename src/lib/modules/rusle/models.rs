use crate::models::{input::Input, output::Output};
use chrono::prelude::*;
use ndarray::{Array1, Zip};

use super::super::erosivity::{config::ErosivityModelConfig, models::ErosivityHistory};
use super::super::soil::models::SoilProperties;
use super::super::topography::models::SlopeProperties;
use super::functions::{get_output_fn, store_day_fn};

// CELLS PROPERTIES
#[derive(Debug)]
pub struct RuslePropertiesElement {
    pub lon: f32,
    pub lat: f32,
    /// K factor [t ha h ha-1 MJ-1 mm-1]
    pub soil_erodibility: f32,
    /// LS factor
    pub slope_factor: f32,
    /// C factor
    pub cover_factor: f32,
    /// P factor
    pub practice_factor: f32,
}

#[derive(Debug)]
pub struct RusleProperties {
    pub data: Array1<RuslePropertiesElement>,
    pub len: usize,
}

pub struct RusleCellPropertiesContainer {
    pub lons: Vec<f32>,
    pub lats: Vec<f32>,
    pub soils: Vec<SoilProperties>,
    pub slopes: Vec<SlopeProperties>,
    pub cover_factors: Vec<f32>,
    pub practice_factors: Vec<f32>,
}

impl RusleProperties {
    pub fn new(props: RusleCellPropertiesContainer) -> Self {
        let data: Array1<RuslePropertiesElement> = props
            .lons
            .iter()
            .enumerate()
            .map(|(idx, lon)| RuslePropertiesElement {
                lon: *lon,
                lat: props.lats[idx],
                soil_erodibility: props.soils[idx].erodibility(),
                slope_factor: props.slopes[idx].slope_factor(),
                cover_factor: props.cover_factors[idx],
                practice_factor: props.practice_factors[idx],
            })
            .collect();

        let len = data.len();
        Self { data, len }
    }

    pub fn get_coords(&self) -> (Vec<f32>, Vec<f32>) {
        let lats: Vec<f32> = self.data.iter().map(|p| p.lat).collect();
        let lons: Vec<f32> = self.data.iter().map(|p| p.lon).collect();
        (lats, lons)
    }
}

// STATE
#[derive(Debug, Default)]
pub struct RusleStateElement {
    /// daily rain grouped by (year, month)
    pub history: ErosivityHistory,
}

#[derive(Debug)]
pub struct RusleState {
    pub time: DateTime<Utc>,
    pub data: Array1<RusleStateElement>,
    len: usize,
    config: ErosivityModelConfig,
}

impl RusleState {
    /// Create a new state.
    pub fn new(time: &DateTime<Utc>, n_cells: usize, config: ErosivityModelConfig) -> RusleState {
        let data: Array1<RusleStateElement> = Array1::from(
            (0..n_cells)
                .map(|_| RusleStateElement::default())
                .collect::<Vec<_>>(),
        );
        RusleState {
            time: *time,
            data,
            len: n_cells,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // store the daily rain of every site
    pub fn store(&mut self, input: &Input) {
        self.time = input.time;
        let time = self.time;
        Zip::from(&mut self.data)
            .and(&input.data)
            .par_for_each(|state, input_data| {
                store_day_fn(state, input_data.rain, &time);
            });
    }

    // compute the erosivity and soil loss factors and return the output
    pub fn get_output(&self, props: &RusleProperties) -> Output {
        let time = &self.time;
        let output_data = Zip::from(&self.data)
            .and(&props.data)
            .par_map_collect(|state, props_data| get_output_fn(state, props_data, &self.config));
        Output::new(*time, output_data)
    }

    pub fn output(&self, props: &RusleProperties) -> Output {
        self.get_output(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NODATAVAL;
    use crate::models::input::InputElement;

    fn test_properties() -> RusleProperties {
        let soil = SoilProperties {
            ph: 5.5,
            sand: 75.0,
            silt: 6.0,
            clay: 19.0,
            organic_matter: 2.4,
        };
        let slope = SlopeProperties {
            steepness: 9.0,
            length: 22.0,
        };
        RusleProperties::new(RusleCellPropertiesContainer {
            lons: vec![-8.826724, -7.516667],
            lats: vec![37.310764, 37.2],
            soils: vec![soil, soil],
            slopes: vec![slope, slope],
            cover_factors: vec![0.005, 1.0],
            practice_factors: vec![1.0, 1.0],
        })
    }

    fn input_for(date: DateTime<Utc>, rains: &[f32]) -> Input {
        let data: Array1<InputElement> = rains.iter().map(|r| InputElement { rain: *r }).collect();
        Input { time: date, data }
    }

    #[test]
    fn properties_compute_site_factors() {
        let props = test_properties();
        assert_eq!(props.len, 2);
        let element = &props.data[0];
        assert!((element.soil_erodibility - 0.008758).abs() < 1e-5);
        assert!((element.slope_factor - 0.9965).abs() < 1e-4);
    }

    #[test]
    fn state_accumulates_and_outputs_per_site() {
        let props = test_properties();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut state = RusleState::new(&start, props.len, ErosivityModelConfig::default());

        // two January days: 25mm at the first site, dry at the second
        for (day, rains) in [(1, [25.0, 0.0]), (2, [15.0, 0.0])] {
            let time = Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap();
            state.store(&input_for(time, &rains));
        }

        let output = state.output(&props);
        let first = &output.data[0];
        let second = &output.data[1];

        // site 1: one group, 7.05 * 40 - 88.92 * 2 = 104.16
        assert!((first.monthly_erosivity[0] - 104.16).abs() < 1e-2);
        assert!((first.annual_erosivity - 104.16).abs() < 1e-2);
        let expected_a = 104.16 * first.soil_erodibility * first.slope_factor * 0.005;
        assert!((first.annual_erosion - expected_a).abs() < 1e-4);

        // site 2 saw only dry observed days: erosivity zero, erosion zero
        assert_eq!(second.monthly_erosivity[0], 0.0);
        assert_eq!(second.annual_erosion, 0.0);

        // unobserved months stay nodata for both sites
        assert!(first.monthly_erosivity[6] <= NODATAVAL + 1.0);
        assert!(second.monthly_erosion[6] <= NODATAVAL + 1.0);
    }

    #[test]
    fn nodata_rain_does_not_create_observations() {
        let props = test_properties();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut state = RusleState::new(&start, props.len, ErosivityModelConfig::default());
        state.store(&input_for(start, &[NODATAVAL, NODATAVAL]));

        let output = state.output(&props);
        assert!(output.data[0].annual_erosivity <= NODATAVAL + 1.0);
        assert!(output.data[0].annual_erosion <= NODATAVAL + 1.0);
    }
}
