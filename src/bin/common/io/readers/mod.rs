pub mod ascii_grid;
#[cfg(feature = "gdal")]
pub mod geotiff;
pub mod meteo;
pub mod prelude;
