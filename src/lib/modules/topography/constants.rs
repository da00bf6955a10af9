// SLOPE FACTOR CONSTANTS
// unit-plot reference slope length [m]
pub const REFERENCE_SLOPE_LENGTH: f32 = 22.0;

pub const LS_A0: f32 = 0.065;
pub const LS_A1: f32 = 0.045;
pub const LS_A2: f32 = 0.0065;
