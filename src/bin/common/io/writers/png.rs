use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::debug;
use ndarray::Array2;
use serde_json::json;

use crate::common::{
    helpers::RusleError,
    io::models::{
        grid::{DemRaster, GeoTransform, Window},
        palette::Palette,
    },
};

use super::helpers::write_png;

/// Renders elevation windows to PNG files with a JSON georeferencing sidecar
pub struct ElevationPngWriter {
    path: PathBuf,
    name: String,
    run_date: DateTime<Utc>,
    palette: Option<Palette>,
}

impl ElevationPngWriter {
    pub fn new(
        path: &str,
        name: &str,
        run_date: &DateTime<Utc>,
        palette: Option<Palette>,
    ) -> Self {
        Self {
            path: PathBuf::from(path),
            name: name.to_string(),
            run_date: *run_date,
            palette,
        }
    }

    pub fn write_window(
        &self,
        site_name: &str,
        values: &Array2<f32>,
        transform: &GeoTransform,
        window: &Window,
    ) -> Result<(), RusleError> {
        fs::create_dir_all(&self.path)
            .map_err(|err| format!("cannot create output path {:?}: {err}", self.path))?;

        let run_date = self.run_date.format("%Y%m%d%H%M");
        let file = self
            .path
            .join(format!("{}_{}_{}.png", self.name, run_date, site_name));
        let file = file
            .to_str()
            .expect("Should be a valid path")
            .to_string();

        debug!("[PNG] Writing elevation window for {} to {:?}", site_name, file);

        let palette = match &self.palette {
            Some(palette) => palette.clone(),
            None => {
                let (min, max) = DemRaster::window_range(values)
                    .ok_or(format!("elevation window for site {site_name} holds no data"))?;
                Palette::elevation(min, max)
            }
        };

        let shape = values.shape();
        let (height, width) = (shape[0], shape[1]);
        let mut rgba: Vec<u8> = Vec::with_capacity(width * height * 4);
        for value in values.iter() {
            let color = palette.get_color(*value);
            rgba.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        write_png(&file, width as u32, height as u32, &rgba)
            .map_err(|err| format!("Cannot write file {}: error {err}", file))?;

        // georeferencing sidecar, world coordinates of the window's top-left corner
        let (west, north) = transform.xy(window.row_off, window.col_off);
        let sidecar = json!({
            "site": site_name,
            "west": west,
            "north": north,
            "cell_size": transform.cell_size,
            "rows": height,
            "cols": width,
        });
        let sidecar_file = file.replace(".png", ".json");
        fs::write(&sidecar_file, sidecar.to_string())
            .map_err(|err| format!("Cannot write file {}: error {err}", sidecar_file))?;

        debug!("[PNG] Done writing elevation window for {}", site_name);
        Ok(())
    }
}
