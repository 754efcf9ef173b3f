/// Microseconds per quarter note for a tempo in beats per minute.
pub fn bpm_to_micros(bpm: u32) -> u32 {
    60_000_000 / bpm.max(1)
}

/// Beats per minute for a tempo in microseconds per quarter note.
pub fn micros_to_bpm(micros: u32) -> f64 {
    60_000_000.0 / micros.max(1) as f64
}

/// Converts a position in beats to ticks, negative values clamp to zero.
pub fn beats_to_ticks(beats: f32, ticks_per_quarter: u16) -> u32 {
    (beats as f64 * ticks_per_quarter as f64).round().max(0.0) as u32
}

pub fn ticks_to_ms(ticks: u64, tempo: u32, ticks_per_quarter: u32) -> u64 {
    // Calculate in microseconds first to maintain precision
    let time_us = ticks as u128 * tempo as u128 / ticks_per_quarter.max(1) as u128;
    (time_us / 1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waltz_tempo() {
        assert_eq!(bpm_to_micros(88), 681_818);
        assert!((micros_to_bpm(681_818) - 88.0).abs() < 0.01);
    }

    #[test]
    fn beats_round_to_ticks() {
        assert_eq!(beats_to_ticks(1.5, 960), 1440);
        assert_eq!(beats_to_ticks(-1.0, 960), 0);
        assert_eq!(ticks_to_ms(960, 500_000, 960), 500);
    }
}
