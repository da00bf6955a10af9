#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::common::config::builder::{ConfigBuilderType, ConfigContainer};
    use crate::common::projection::DemCrs;

    const CONFIG: &str = r#"
cache_path: .cache
models:
  - type: RUSLE
    model_name: algarve
    start_date: "2010-01-01"
    end_date: "2022-12-31"
    sites:
      - name: aljezur
        latitude: 37.310764
        longitude: -8.826724
        soil: { ph: 5.5, sand: 75.0, silt: 6.0, clay: 19.0, organic_matter: 2.4 }
        slope: { steepness: 9.0, length: 22.0 }
        cover_factor: 0.005
    outputs:
      - format: CSV
        path: output
        variables:
          - { variable: R, name: erosivity, precision: 2 }
          - { variable: A, name: soil_loss }
  - type: ELEVATION
    model_name: dem
    dem_path: data/dem_srtm_pt_25m.asc
    sites:
      - { name: aljezur, latitude: 37.289803, longitude: -8.858953 }
    output_path: output
"#;

    fn parse(yaml: &str) -> ConfigContainer {
        serde_yaml::from_str(yaml).expect("should parse config")
    }

    #[test]
    fn parses_both_model_types() {
        let container = parse(CONFIG);
        assert_eq!(container.cache_path.as_deref(), Some(".cache"));
        assert_eq!(container.models.len(), 2);
        assert_eq!(container.models[0].get_model_name(), "algarve");
        assert_eq!(container.models[1].get_model_name(), "dem");
    }

    #[test]
    fn rusle_defaults_are_applied() {
        let container = parse(CONFIG);
        let ConfigBuilderType::RUSLE(builder) = &container.models[0] else {
            panic!("first model should be RUSLE");
        };
        assert_eq!(builder.sites[0].practice_factor, 1.0);
        assert!(builder.model_version.is_none());

        let config = builder
            .build(&Utc::now(), &container.cache_path)
            .expect("should build");
        assert_eq!(config.get_properties().len, 1);
        assert_eq!(config.get_site_names(), ["aljezur".to_string()]);
        let writers = config.get_output_writers().expect("should build writers");
        assert_eq!(writers.len(), 1);
    }

    #[test]
    fn elevation_defaults_are_applied() {
        let container = parse(CONFIG);
        let ConfigBuilderType::ELEVATION(builder) = &container.models[1] else {
            panic!("second model should be ELEVATION");
        };
        assert_eq!(builder.window_size, 50);

        let config = builder.build(&Utc::now()).expect("should build");
        assert_eq!(config.crs, DemCrs::PtTm06);
        assert!(config.palette.is_none());
    }

    #[test]
    fn build_fails_for_inverted_period() {
        let yaml = CONFIG
            .replace("start_date: \"2010-01-01\"", "start_date: \"2023-01-01\"");
        let container = parse(&yaml);
        let ConfigBuilderType::RUSLE(builder) = &container.models[0] else {
            panic!("first model should be RUSLE");
        };
        assert!(builder.build(&Utc::now(), &None).is_err());
    }

    #[test]
    fn build_fails_for_malformed_dates() {
        let yaml = CONFIG.replace("2010-01-01", "01/01/2010");
        let container = parse(&yaml);
        let ConfigBuilderType::RUSLE(builder) = &container.models[0] else {
            panic!("first model should be RUSLE");
        };
        assert!(builder.build(&Utc::now(), &None).is_err());
    }

    #[test]
    fn build_fails_for_out_of_range_cover_factor() {
        let yaml = CONFIG.replace("cover_factor: 0.005", "cover_factor: 1.5");
        let container = parse(&yaml);
        let ConfigBuilderType::RUSLE(builder) = &container.models[0] else {
            panic!("first model should be RUSLE");
        };
        assert!(builder.build(&Utc::now(), &None).is_err());
    }

    #[test]
    fn build_fails_for_unsupported_output_format() {
        let yaml = CONFIG.replace("format: CSV", "format: NETCDF");
        let container = parse(&yaml);
        let ConfigBuilderType::RUSLE(builder) = &container.models[0] else {
            panic!("first model should be RUSLE");
        };
        assert!(builder.build(&Utc::now(), &None).is_err());
    }

    #[test]
    fn build_fails_for_unknown_crs() {
        let yaml = CONFIG.replace(
            "dem_path: data/dem_srtm_pt_25m.asc",
            "dem_path: data/dem_srtm_pt_25m.asc\n    dem_crs: \"EPSG:32629\"",
        );
        let container = parse(&yaml);
        let ConfigBuilderType::ELEVATION(builder) = &container.models[1] else {
            panic!("second model should be ELEVATION");
        };
        assert!(builder.build(&Utc::now()).is_err());
    }

    #[test]
    fn unknown_output_variables_are_rejected_at_parse_time() {
        let yaml = CONFIG.replace("variable: R", "variable: FWI");
        let result: Result<ConfigContainer, _> = serde_yaml::from_str(&yaml);
        assert!(result.is_err());
    }
}
