use gdal::Dataset;
use ndarray::Array2;

use rusle::constants::NODATAVAL;

use crate::common::helpers::RusleError;
use crate::common::io::models::grid::{DemRaster, GeoTransform};

use super::prelude::DemReader;

/// GDAL-backed reader for GeoTIFF DEMs; only north-up rasters with square
/// cells are supported
pub struct GeoTiffReader {
    path: String,
}

impl GeoTiffReader {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl DemReader for GeoTiffReader {
    fn read(&self) -> Result<DemRaster, RusleError> {
        let dataset = Dataset::open(&self.path)
            .map_err(|err| format!("cannot open DEM file {}: {err}", self.path))?;
        let gt = dataset
            .geo_transform()
            .map_err(|err| format!("cannot read geotransform of {}: {err}", self.path))?;

        if gt[2] != 0.0 || gt[4] != 0.0 {
            return Err(format!("{} is a rotated raster", self.path).into());
        }
        if (gt[1] + gt[5]).abs() > 1e-9 {
            return Err(format!("{} does not have square north-up cells", self.path).into());
        }

        let (ncols, nrows) = dataset.raster_size();
        let band = dataset
            .rasterband(1)
            .map_err(|err| format!("cannot open band 1 of {}: {err}", self.path))?;
        let nodata = band.no_data_value().unwrap_or(NODATAVAL as f64) as f32;
        let buffer = band
            .read_as::<f32>((0, 0), (ncols, nrows), (ncols, nrows), None)
            .map_err(|err| format!("cannot read {}: {err}", self.path))?;

        let data = Array2::from_shape_vec((nrows, ncols), buffer.data().to_vec())
            .map_err(|err| format!("cannot shape {} samples: {err}", self.path))?;

        Ok(DemRaster {
            transform: GeoTransform {
                x_origin: gt[0],
                y_origin: gt[3],
                cell_size: gt[1],
            },
            data,
            nodata,
        })
    }
}
