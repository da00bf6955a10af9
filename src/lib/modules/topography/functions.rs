use super::constants::*;

// Slope length and steepness factor (LS), relative to the 22m unit plot
pub fn slope_length_factor(
    steepness: f32, // slope steepness [%]
    length: f32,    // slope length [m]
) -> f32 {
    (length / REFERENCE_SLOPE_LENGTH).sqrt()
        * (LS_A0 + LS_A1 * steepness + LS_A2 * steepness * steepness)
}
