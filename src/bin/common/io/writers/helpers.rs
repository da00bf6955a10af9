use std::fs::File;
use std::io::BufWriter;

use crate::common::helpers::RusleError;

/// Collect the errors of a batch of write operations into a single error
pub fn extract_errors(context: &str, results: Vec<Result<(), RusleError>>) -> Result<(), RusleError> {
    let errors: Vec<String> = results
        .into_iter()
        .filter_map(|result| result.err())
        .map(String::from)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{}: {}", context, errors.join("; ")).into())
    }
}

/// Encode an RGBA buffer as a PNG file
pub fn write_png(file: &str, width: u32, height: u32, rgba: &[u8]) -> Result<(), RusleError> {
    let out = File::create(file).map_err(|err| format!("cannot create file {file}: {err}"))?;
    let writer = BufWriter::new(out);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder
        .write_header()
        .map_err(|err| format!("cannot write png header to {file}: {err}"))?;
    png_writer
        .write_image_data(rgba)
        .map_err(|err| format!("cannot write png data to {file}: {err}"))?;
    Ok(())
}
