//! Sample rate conversion for the analysis buffer.

use super::types::AudioError;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

/// Silent input frames appended so the delayed tail still comes out
const TAIL_PADDING: usize = 64;

/// Resamples a mono buffer from `input_rate` to `output_rate`.
///
/// The whole buffer is processed as one chunk. It is padded with silence so the
/// interpolator delay can be trimmed from the front without losing the tail,
/// and the result holds `round(len * ratio)` frames (at least one). If the
/// rates already match the input is returned unchanged.
pub fn resample_mono(
    input: &[f32],
    input_rate: u32,
    output_rate: u32,
) -> Result<Vec<f32>, AudioError> {
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    if input_rate == 0 || output_rate == 0 {
        return Err(AudioError::InvalidParams(format!(
            "Cannot resample from {} Hz to {} Hz",
            input_rate, output_rate
        )));
    }

    debug!(
        "Resampling {} frames from {} Hz to {} Hz",
        input.len(),
        input_rate,
        output_rate
    );

    let ratio = output_rate as f64 / input_rate as f64;
    let mut padded = Vec::with_capacity(input.len() + TAIL_PADDING);
    padded.extend_from_slice(input);
    padded.resize(input.len() + TAIL_PADDING, 0.0);

    let mut resampler =
        FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Septic, padded.len(), 1)
            .map_err(|e| AudioError::Processing(format!("Failed to create resampler: {}", e)))?;

    let delay = resampler.output_delay();
    let planar_input = vec![padded];
    let output = resampler
        .process(&planar_input, None)
        .map_err(|e| AudioError::Processing(format!("Resampling failed: {}", e)))?;
    let channel = output.into_iter().next().unwrap_or_default();

    let expected = ((input.len() as f64 * ratio).round() as usize).max(1);
    let start = delay.min(channel.len());
    let end = (delay + expected).min(channel.len());
    Ok(channel[start..end].to_vec())
}
