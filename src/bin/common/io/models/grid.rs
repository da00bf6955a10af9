use ndarray::{s, Array2};

use rusle::constants::NODATAVAL;

/// North-up affine georeferencing of a raster: world coordinates of the
/// top-left corner and the (square) cell size
#[derive(Debug, Clone, Copy)]
pub struct GeoTransform {
    pub x_origin: f64,
    pub y_origin: f64,
    pub cell_size: f64,
}

impl GeoTransform {
    /// Pixel indices containing the world coordinate; may fall outside the raster
    pub fn rowcol(&self, x: f64, y: f64) -> (i64, i64) {
        let row = ((self.y_origin - y) / self.cell_size).floor() as i64;
        let col = ((x - self.x_origin) / self.cell_size).floor() as i64;
        (row, col)
    }

    /// World coordinates of the top-left corner of a pixel
    pub fn xy(&self, row: i64, col: i64) -> (f64, f64) {
        let x = self.x_origin + col as f64 * self.cell_size;
        let y = self.y_origin - row as f64 * self.cell_size;
        (x, y)
    }
}

/// Pixel window of a raster, possibly extending beyond its bounds until clipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_off: i64,
    pub row_off: i64,
    pub width: usize,
    pub height: usize,
}

impl Window {
    /// Window of the given size centred on a pixel
    pub fn centered(row: i64, col: i64, size: usize) -> Self {
        let half = (size / 2) as i64;
        Window {
            col_off: col - half,
            row_off: row - half,
            width: size,
            height: size,
        }
    }

    /// Intersect with the raster bounds; an empty intersection is an error
    pub fn clip(&self, nrows: usize, ncols: usize) -> Result<Window, String> {
        let col_start = self.col_off.max(0);
        let row_start = self.row_off.max(0);
        let col_end = (self.col_off + self.width as i64).min(ncols as i64);
        let row_end = (self.row_off + self.height as i64).min(nrows as i64);
        if col_start >= col_end || row_start >= row_end {
            return Err(format!(
                "window at ({}, {}) falls outside the {}x{} raster",
                self.row_off, self.col_off, nrows, ncols
            ));
        }
        Ok(Window {
            col_off: col_start,
            row_off: row_start,
            width: (col_end - col_start) as usize,
            height: (row_end - row_start) as usize,
        })
    }
}

/// A DEM raster loaded in memory
#[derive(Debug)]
pub struct DemRaster {
    pub transform: GeoTransform,
    pub data: Array2<f32>,
    pub nodata: f32,
}

impl DemRaster {
    pub fn shape(&self) -> (usize, usize) {
        let shape = self.data.shape();
        (shape[0], shape[1])
    }

    /// Extract a clipped window as an owned array, nodata mapped to NODATAVAL
    pub fn window(&self, window: &Window) -> Array2<f32> {
        let rows = window.row_off as usize..window.row_off as usize + window.height;
        let cols = window.col_off as usize..window.col_off as usize + window.width;
        self.data
            .slice(s![rows, cols])
            .mapv(|v| if v == self.nodata { NODATAVAL } else { v })
    }

    /// Value range of a window, ignoring nodata cells
    pub fn window_range(values: &Array2<f32>) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for value in values.iter() {
            if *value <= (NODATAVAL + 1.0) {
                continue;
            }
            range = match range {
                None => Some((*value, *value)),
                Some((min, max)) => Some((min.min(*value), max.max(*value))),
            };
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn test_raster() -> DemRaster {
        // 4x4 grid, 25m cells, top-left corner at (0, 100)
        DemRaster {
            transform: GeoTransform {
                x_origin: 0.0,
                y_origin: 100.0,
                cell_size: 25.0,
            },
            data: array![
                [1.0, 2.0, 3.0, 4.0],
                [5.0, 6.0, 7.0, 8.0],
                [9.0, 10.0, 11.0, 12.0],
                [13.0, 14.0, -9999.0, 16.0],
            ],
            nodata: -9999.0,
        }
    }

    #[test]
    fn rowcol_addresses_cells_from_the_top_left() {
        let raster = test_raster();
        assert_eq!(raster.transform.rowcol(0.0, 100.0), (0, 0));
        assert_eq!(raster.transform.rowcol(12.5, 87.5), (0, 0));
        assert_eq!(raster.transform.rowcol(30.0, 40.0), (2, 1));
    }

    #[test]
    fn xy_inverts_rowcol_on_corners() {
        let raster = test_raster();
        let (x, y) = raster.transform.xy(2, 1);
        assert_eq!((x, y), (25.0, 50.0));
        assert_eq!(raster.transform.rowcol(x, y), (2, 1));
    }

    #[test]
    fn window_is_centred_on_the_pixel() {
        let window = Window::centered(10, 20, 4);
        assert_eq!(window.row_off, 8);
        assert_eq!(window.col_off, 18);
        assert_eq!(window.width, 4);
        assert_eq!(window.height, 4);
    }

    #[test]
    fn clip_trims_borders() {
        let window = Window::centered(0, 0, 4).clip(4, 4).expect("should clip");
        assert_eq!(window, Window { col_off: 0, row_off: 0, width: 2, height: 2 });
    }

    #[test]
    fn clip_rejects_disjoint_windows() {
        assert!(Window::centered(100, 100, 4).clip(4, 4).is_err());
        assert!(Window::centered(-100, 2, 4).clip(4, 4).is_err());
    }

    #[test]
    fn window_extracts_values_and_maps_nodata() {
        let raster = test_raster();
        let window = Window::centered(2, 2, 2).clip(4, 4).expect("should clip");
        let view = raster.window(&window);
        assert_eq!(view.shape(), &[2, 2]);
        assert_eq!(view[[0, 0]], 6.0);
        assert_eq!(view[[1, 1]], 11.0);

        let full = raster.window(&Window { col_off: 0, row_off: 0, width: 4, height: 4 });
        assert_eq!(full[[3, 2]], NODATAVAL);
        let (min, max) = DemRaster::window_range(&full).expect("should have values");
        assert_eq!(min, 1.0);
        assert_eq!(max, 16.0);
    }
}
