use strum_macros::{Display, EnumString};

// GRS80 ellipsoid
const GRS80_A: f64 = 6_378_137.0;
const GRS80_F: f64 = 1.0 / 298.257_222_101;

// ETRS89 / Portugal TM06 (EPSG:3763) natural origin: 39°40'05.73"N, 8°07'59.19"W
const TM06_LAT_ORIGIN: f64 = 39.668_258_333_333_33;
const TM06_LON_ORIGIN: f64 = -8.133_108_333_333_334;
const TM06_SCALE: f64 = 1.0;
const TM06_FALSE_EASTING: f64 = 0.0;
const TM06_FALSE_NORTHING: f64 = 0.0;

/// Coordinate reference system a DEM raster is georeferenced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum DemCrs {
    /// geographic coordinates, pixels addressed by (lon, lat) directly
    #[strum(serialize = "EPSG:4326", serialize = "WGS84")]
    Wgs84,
    /// ETRS89 / Portugal TM06
    #[strum(serialize = "EPSG:3763", serialize = "PT-TM06")]
    PtTm06,
}

impl Default for DemCrs {
    fn default() -> Self {
        DemCrs::PtTm06
    }
}

impl DemCrs {
    /// Map a WGS84 coordinate into the raster coordinate space, as (x, y)
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        match self {
            DemCrs::Wgs84 => (lon, lat),
            DemCrs::PtTm06 => wgs84_to_tm06(lat, lon),
        }
    }
}

// Meridian arc length from the equator (Snyder 1987, eq. 3-21)
fn meridian_arc(phi: f64) -> f64 {
    let e2 = GRS80_F * (2.0 - GRS80_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    GRS80_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

// Forward transverse Mercator projection onto the PT-TM06 grid
// Snyder (1987), Map Projections: A Working Manual, eqs. 8-9 to 8-13
pub fn wgs84_to_tm06(lat: f64, lon: f64) -> (f64, f64) {
    let phi = lat.to_radians();
    let lam = lon.to_radians();
    let phi0 = TM06_LAT_ORIGIN.to_radians();
    let lam0 = TM06_LON_ORIGIN.to_radians();

    let e2 = GRS80_F * (2.0 - GRS80_F);
    let ep2 = e2 / (1.0 - e2);

    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let tan_phi = phi.tan();

    let n = GRS80_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (lam - lam0) * cos_phi;

    let m = meridian_arc(phi);
    let m0 = meridian_arc(phi0);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = TM06_FALSE_EASTING
        + TM06_SCALE
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);
    let y = TM06_FALSE_NORTHING
        + TM06_SCALE
            * (m - m0
                + n * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn natural_origin_maps_to_zero() {
        let (x, y) = wgs84_to_tm06(TM06_LAT_ORIGIN, TM06_LON_ORIGIN);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn one_degree_north_of_origin() {
        let (x, y) = wgs84_to_tm06(TM06_LAT_ORIGIN + 1.0, TM06_LON_ORIGIN);
        assert!(x.abs() < 1e-3);
        // one degree of meridian arc at these latitudes
        assert!(y > 110_500.0 && y < 111_500.0);
    }

    #[test]
    fn one_degree_east_of_origin() {
        let (x, y) = wgs84_to_tm06(TM06_LAT_ORIGIN, TM06_LON_ORIGIN + 1.0);
        assert!(x > 85_000.0 && x < 86_500.0);
        // the projected parallel bends away from the base latitude
        assert!(y.abs() < 1_500.0);
        assert!(y > 0.0);
    }

    #[test]
    fn aljezur_falls_south_west_of_origin() {
        let (x, y) = wgs84_to_tm06(37.310764, -8.826724);
        assert!(x > -62_000.0 && x < -61_000.0);
        assert!(y > -263_000.0 && y < -260_000.0);
    }

    #[test]
    fn crs_parses_epsg_codes() {
        assert_eq!(DemCrs::from_str("EPSG:3763").unwrap(), DemCrs::PtTm06);
        assert_eq!(DemCrs::from_str("PT-TM06").unwrap(), DemCrs::PtTm06);
        assert_eq!(DemCrs::from_str("EPSG:4326").unwrap(), DemCrs::Wgs84);
        assert!(DemCrs::from_str("EPSG:32629").is_err());
    }

    #[test]
    fn wgs84_is_a_passthrough() {
        let (x, y) = DemCrs::Wgs84.project(37.5, -8.25);
        assert_eq!((x, y), (-8.25, 37.5));
    }
}
