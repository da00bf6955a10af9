// Daily rain at or above this threshold counts as an erosive day [mm]
pub const EROSIVE_DAY_THRESHOLD: f32 = 10.0;

// EI30 MONTHLY REGRESSION CONSTANTS
// Loureiro & Coutinho (2001), Journal of Hydrology 250
pub const EI30_RAIN_COEFF: f32 = 7.05;
pub const EI30_DAYS_COEFF: f32 = 88.92;
