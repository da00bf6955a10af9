use rusle::models::output::Output;

use crate::common::{helpers::RusleError, io::models::output::OutputVariable};

/// Trait implemented by concrete output sinks (e.g. CSV, JSON) that persist model variables.
pub trait OutputSink: Send {
    fn write(
        &mut self,
        output: &Output,
        lats: &[f32],
        lons: &[f32],
        names: &[String],
        variables: &[OutputVariable],
    ) -> Result<(), RusleError>;
}
