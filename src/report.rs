//! Plain-text rendering of metrics and recommendations.

use crate::audio::AudioMetrics;
use crate::recommend::{CompressorSettings, Recommendation, SettingsSource};

pub fn format_metrics(metrics: &AudioMetrics) -> String {
    format!(
        "Audio Metrics:\n\
         RMS: {:.2}\n\
         Peak: {:.2}\n\
         Dynamic Range: {:.2}\n\
         Spectral Centroid: {:.2} Hz\n\
         Spectral Rolloff: {:.2} Hz\n",
        metrics.rms,
        metrics.peak,
        metrics.dynamic_range,
        metrics.spectral_centroid,
        metrics.spectral_rolloff
    )
}

pub fn format_settings(settings: &CompressorSettings) -> String {
    format!(
        "Threshold: {}\nRatio: {}\nAttack: {}\nRelease: {}\nMakeup_gain: {}\n",
        settings.threshold, settings.ratio, settings.attack, settings.release, settings.makeup_gain
    )
}

/// Full report: metrics, settings and explanation.
pub fn format_report(metrics: &AudioMetrics, recommendation: &Recommendation) -> String {
    let mut out = format_metrics(metrics);

    out.push_str("\nCompressor Settings Recommendations:\n");
    match &recommendation.source {
        SettingsSource::Generated => {}
        SettingsSource::Fallback { .. } => {
            out.push_str("Error parsing JSON. Using fallback settings.\n");
        }
        SettingsSource::Preset { index, confidence } => {
            out.push_str(&format!("Preset: {} (confidence {:.2})\n", index, confidence));
        }
    }
    out.push_str(&format_settings(&recommendation.settings));

    out.push_str("\nExplanation:\n");
    out.push_str(&recommendation.explanation);
    out.push('\n');
    out
}
