mod common;
use std::env::{set_var, var};
use std::error::Error;
use std::path::Path;

use chrono::prelude::*;
use clap::Parser;

use common::config::builder::{ConfigBuilderType, ConfigContainer, ElevationConfigBuilder, RusleConfigBuilder};
use common::helpers::{get_input, RusleError};
use common::io::models::grid::{DemRaster, Window};
use common::io::readers::ascii_grid::AsciiGridReader;
#[cfg(feature = "gdal")]
use common::io::readers::geotiff::GeoTiffReader;
use common::io::readers::prelude::{DemReader, InputHandler};
use common::io::writers::png::ElevationPngWriter;
use log::{info, warn};
use rusle::version::LONG_VERSION;

#[derive(Parser, Debug)]
#[command(
    author = "RUSLE model contributors",
    version,
    long_version = LONG_VERSION,
    about = "RUSLE Soil Erosion Risk Assessment Model",
    long_about = "RUSLE estimates the soil erosion risk of field sites from multi-decade \
daily precipitation records. It derives the rainfall erosivity factor (R) from the \
Open-Meteo archive and climate APIs, combines it with the soil (K), slope (LS), \
cover (C) and practice (P) factors, and can extract elevation windows from a DEM \
raster around the configured sites."
)]
struct Args {
    #[arg(required = true, help = "Path to the configuration file", index = 1)]
    config_path: String,
}

fn run_rusle(
    model_config: &RusleConfigBuilder,
    run_date: &DateTime<Utc>,
    cache_path: &Option<String>,
) -> Result<(), RusleError> {
    let config = model_config
        .build(run_date, cache_path)
        .map_err(|err| format!("Could not configure model: {err}"))?;

    let mut output_writers = config
        .get_output_writers()
        .map_err(|err| format!("Could not configure output writers: {err}"))?;

    let props = config.get_properties();
    let mut state = config.new_state();

    let (lats, lons) = props.get_coords();
    let (lats, lons) = (lats.as_slice(), lons.as_slice());

    let mut handler = config.get_input_handler()?;
    handler
        .set_coordinates(lats, lons)
        .map_err(|err| format!("Could not load input data: {err}"))?;

    let len = state.len();
    let timeline = handler.get_timeline();
    if timeline.is_empty() {
        return Err("the weather provider returned an empty timeline".into());
    }
    info!(
        "Processing {} days of precipitation from {} to {}",
        timeline.len(),
        config.start_date,
        config.end_date
    );

    for time in timeline {
        let input = get_input(&handler, &time, len);
        state.store(&input);
    }

    let output = state.output(props);
    let names = config.get_site_names();
    for writer in output_writers.iter_mut() {
        if let Err(err) = writer.write(&output, lats, lons, names) {
            warn!("Error writing output: {}", err);
        }
    }
    Ok(())
}

fn get_dem_reader(dem_path: &str) -> Result<Box<dyn DemReader>, RusleError> {
    let extension = Path::new(dem_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "asc" | "txt" => Ok(Box::new(AsciiGridReader::new(dem_path))),
        #[cfg(feature = "gdal")]
        "tif" | "tiff" | "geotiff" => Ok(Box::new(GeoTiffReader::new(dem_path))),
        #[cfg(not(feature = "gdal"))]
        "tif" | "tiff" | "geotiff" => {
            Err(format!("{dem_path}: GeoTIFF support requires the gdal feature").into())
        }
        _ => Err(format!("{dem_path}: unsupported DEM format").into()),
    }
}

fn run_elevation(
    model_config: &ElevationConfigBuilder,
    run_date: &DateTime<Utc>,
) -> Result<(), RusleError> {
    let config = model_config
        .build(run_date)
        .map_err(|err| format!("Could not configure model: {err}"))?;

    let reader = get_dem_reader(&config.dem_path)?;
    info!("Loading DEM from {}", config.dem_path);
    let raster = reader.read()?;
    let (nrows, ncols) = raster.shape();

    let writer = ElevationPngWriter::new(
        &config.output_path,
        &config.model_name,
        run_date,
        config.palette.clone(),
    );

    for site in &config.sites {
        let (x, y) = config
            .crs
            .project(site.latitude as f64, site.longitude as f64);
        let (row, col) = raster.transform.rowcol(x, y);
        let window = Window::centered(row, col, config.window_size)
            .clip(nrows, ncols)
            .map_err(|err| format!("site {}: {err}", site.name))?;

        let values = raster.window(&window);
        if let Some((min, max)) = DemRaster::window_range(&values) {
            info!(
                "Site {}: {}x{} window, elevation {:.1} to {:.1} m",
                site.name, window.height, window.width, min, max
            );
        } else {
            warn!("Site {}: elevation window holds no data", site.name);
        }
        writer.write_window(&site.name, &values, &raster.transform, &window)?;
    }
    Ok(())
}

/// main function
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path_str = args.config_path;

    if var("RUST_LOG").is_err() {
        set_var("RUST_LOG", "info")
    }
    pretty_env_logger::init();

    if !Path::new(&config_path_str).is_file() {
        return Err(format!("Config file {} is not a file", config_path_str).into());
    }

    let run_date = Utc::now();

    let configs = ConfigContainer::from_file(&config_path_str)
        .map_err(|err| format!("Failed to load config: {}", err))?;

    for model_config in &configs.models {
        info!("Running model: {}", model_config.get_model_name());
        let start_time = Utc::now();

        let model_run = match model_config {
            ConfigBuilderType::RUSLE(model_config) => {
                run_rusle(model_config, &run_date, &configs.cache_path)
            }
            ConfigBuilderType::ELEVATION(model_config) => run_elevation(model_config, &run_date),
        };

        if let Err(err) = model_run {
            warn!("Error running model: {}", err);
        }

        let elapsed_time = Utc::now() - start_time;
        info!("Elapsed time: {} seconds", elapsed_time.num_seconds());
    }

    Ok(())
}
