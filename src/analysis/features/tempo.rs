// Tempo module - Global tempo and beat estimation
//
// Algorithm:
// 1. Onset strength per frame: positive spectral flux on log-compressed magnitudes
// 2. Autocorrelation of the mean-removed onset envelope over the lag range
//    covering [min_bpm, max_bpm]
// 3. Weight each lag by a log-normal prior centred on PRIOR_BPM so that
//    octave errors lean towards common tempi
// 4. tempo = 60 * frame_rate / best_lag
// 5. Beats: the phase offset whose comb (offset + k * lag) collects the most
//    onset strength
//
// References:
// - Ellis, D. (2007). Beat tracking by dynamic programming
// - Scheirer, E. (1998). Tempo and beat analysis of acoustic musical signals

/// Tempo the lag prior is centred on (BPM)
const PRIOR_BPM: f32 = 120.0;

/// Width of the lag prior in octaves
const PRIOR_OCTAVE_WIDTH: f32 = 1.0;

/// Global tempo plus beat frame positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoEstimate {
    /// BPM, 0.0 when the envelope carries no periodicity
    pub bpm: f32,
    pub beat_frames: Vec<usize>,
}

/// Tempo estimator over an onset strength envelope
pub struct TempoEstimator {
    /// Onset envelope frames per second (sample_rate / hop_size)
    frame_rate: f32,
    min_bpm: f32,
    max_bpm: f32,
}

impl TempoEstimator {
    /// # Arguments
    /// * `frame_rate` - Onset envelope frames per second
    /// * `min_bpm` / `max_bpm` - Tempo search range
    pub fn new(frame_rate: f32, min_bpm: f32, max_bpm: f32) -> Self {
        let min_bpm = min_bpm.max(1.0);
        Self {
            frame_rate,
            min_bpm,
            max_bpm: max_bpm.max(min_bpm),
        }
    }

    /// Onset strength of `spectrum` relative to `previous`
    ///
    /// Sum over bins of max(0, log(1 + |X_t|) - log(1 + |X_t-1|)).
    pub fn onset_strength(previous: &[f32], spectrum: &[f32]) -> f32 {
        spectrum
            .iter()
            .zip(previous.iter())
            .map(|(cur, prev)| (cur.ln_1p() - prev.ln_1p()).max(0.0))
            .sum()
    }

    /// Estimate tempo and beats from an onset envelope
    pub fn estimate(&self, envelope: &[f32]) -> TempoEstimate {
        let Some(lag) = self.best_lag(envelope) else {
            return TempoEstimate::default();
        };

        let bpm = 60.0 * self.frame_rate / lag as f32;
        let beat_frames = Self::track_beats(envelope, lag);
        log::debug!(
            "[Tempo] lag {} frames -> {:.1} BPM, {} beats",
            lag,
            bpm,
            beat_frames.len()
        );

        TempoEstimate { bpm, beat_frames }
    }

    fn lag_range(&self, len: usize) -> Option<(usize, usize)> {
        let min_lag = ((60.0 * self.frame_rate / self.max_bpm).round() as usize).max(1);
        let max_lag = ((60.0 * self.frame_rate / self.min_bpm).round() as usize).min(len.saturating_sub(1));
        (min_lag <= max_lag).then_some((min_lag, max_lag))
    }

    fn best_lag(&self, envelope: &[f32]) -> Option<usize> {
        let (min_lag, max_lag) = self.lag_range(envelope.len())?;

        let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
        let centered: Vec<f32> = envelope.iter().map(|v| v - mean).collect();
        if centered.iter().all(|v| v.abs() < 1e-9) {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for lag in min_lag..=max_lag {
            let pairs = centered.len() - lag;
            let acf = centered[..pairs]
                .iter()
                .zip(centered[lag..].iter())
                .map(|(a, b)| a * b)
                .sum::<f32>()
                / pairs as f32;

            let bpm = 60.0 * self.frame_rate / lag as f32;
            let octaves = (bpm / PRIOR_BPM).log2() / PRIOR_OCTAVE_WIDTH;
            let score = acf * (-0.5 * octaves * octaves).exp();

            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((lag, score));
            }
        }

        best.map(|(lag, _)| lag)
    }

    fn track_beats(envelope: &[f32], lag: usize) -> Vec<usize> {
        let best_offset = (0..lag.min(envelope.len()))
            .map(|offset| {
                let strength: f32 = envelope.iter().skip(offset).step_by(lag).sum();
                (offset, strength)
            })
            .fold((0, f32::MIN), |acc, cur| if cur.1 > acc.1 { cur } else { acc })
            .0;

        (best_offset..envelope.len()).step_by(lag).collect()
    }
}
