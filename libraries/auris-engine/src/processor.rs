//! Stereo correction processor
//!
//! The per-block heart of the engine: drains queued control commands, feeds
//! the analysis tap, then runs the shared mono feed through both per-ear
//! correction chains and interleaves their outputs into the stereo block.
//!
//! "Two ears" means independent *correction* per output channel, not
//! independent capture: a stereo or multi-channel source is downmixed to one
//! mono feed before either chain sees it.

use crossbeam_channel::Receiver;

use auris_core::{CorrectionSettings, Ear};
use auris_dsp::{band_gains, EarChannel};

use crate::command::EngineCommand;
use crate::tap::AnalysisTap;

/// Downmix an interleaved multi-channel block to mono by averaging channels.
///
/// `mono` is reused between blocks; it only allocates while growing to the
/// largest block seen.
pub fn downmix_to_mono(input: &[f32], channels: usize, mono: &mut Vec<f32>) {
    if channels == 0 {
        mono.clear();
        return;
    }

    let frames = input.len() / channels;
    mono.resize(frames, 0.0);

    if channels == 1 {
        mono.copy_from_slice(&input[..frames]);
        return;
    }

    let scale = 1.0 / channels as f32;
    for (frame, out) in mono.iter_mut().enumerate() {
        let start = frame * channels;
        *out = input[start..start + channels].iter().sum::<f32>() * scale;
    }
}

/// Runtime correction graph for one session
///
/// Created when processing starts, destroyed when it stops. Owns exactly two
/// ear channels plus the command queue receiver and the tap handle.
pub struct CorrectionProcessor {
    left: EarChannel,
    right: EarChannel,
    commands: Receiver<EngineCommand>,
    tap: AnalysisTap,

    // Per-ear scratch blocks, grown once to the device block size
    scratch_l: Vec<f32>,
    scratch_r: Vec<f32>,
}

impl CorrectionProcessor {
    /// Build the session graph at the device sample rate, applying the
    /// current settings and ear-enable flags.
    pub fn new(
        sample_rate: u32,
        filter_q: f32,
        settings: &CorrectionSettings,
        left_enabled: bool,
        right_enabled: bool,
        commands: Receiver<EngineCommand>,
        tap: AnalysisTap,
    ) -> Self {
        let mut left = EarChannel::with_q(sample_rate, filter_q);
        let mut right = EarChannel::with_q(sample_rate, filter_q);

        left.apply_band_gains(&band_gains(&settings.left, &settings.tuning));
        right.apply_band_gains(&band_gains(&settings.right, &settings.tuning));
        left.set_enabled(left_enabled);
        right.set_enabled(right_enabled);

        Self {
            left,
            right,
            commands,
            tap,
            scratch_l: Vec::new(),
            scratch_r: Vec::new(),
        }
    }

    /// Borrow one ear's chain (status and tests).
    pub fn ear(&self, ear: Ear) -> &EarChannel {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    /// Apply a settings snapshot directly (bypassing the queue).
    pub fn apply_settings(&mut self, settings: &CorrectionSettings) {
        self.left
            .apply_band_gains(&band_gains(&settings.left, &settings.tuning));
        self.right
            .apply_band_gains(&band_gains(&settings.right, &settings.tuning));
    }

    /// Drain every queued command, in issuance order.
    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                EngineCommand::ApplyGains { left, right } => {
                    self.left.apply_band_gains(&left);
                    self.right.apply_band_gains(&right);
                }
                EngineCommand::SetEarEnabled(Ear::Left, enabled) => {
                    self.left.set_enabled(enabled);
                }
                EngineCommand::SetEarEnabled(Ear::Right, enabled) => {
                    self.right.set_enabled(enabled);
                }
            }
        }
    }

    /// Process one block: `mono` in, interleaved stereo out
    /// (channel 0 = left ear, channel 1 = right ear).
    ///
    /// Real-time safe apart from the first-block scratch growth: no locks,
    /// no blocking, commands polled non-blockingly.
    pub fn process_block(&mut self, mono: &[f32], stereo_out: &mut [f32]) {
        self.drain_commands();
        self.tap.push(mono);

        let frames = mono.len().min(stereo_out.len() / 2);
        self.scratch_l.resize(frames, 0.0);
        self.scratch_r.resize(frames, 0.0);
        self.scratch_l.copy_from_slice(&mono[..frames]);
        self.scratch_r.copy_from_slice(&mono[..frames]);

        self.left.process(&mut self.scratch_l);
        self.right.process(&mut self.scratch_r);

        for frame in 0..frames {
            stereo_out[frame * 2] = self.scratch_l[frame];
            stereo_out[frame * 2 + 1] = self.scratch_r[frame];
        }
        // A short input block leaves the remainder silent rather than stale
        for sample in &mut stereo_out[frames * 2..] {
            *sample = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auris_core::{CorrectionSettings, BAND_COUNT};
    use crossbeam_channel::bounded;

    fn test_processor(settings: &CorrectionSettings) -> (CorrectionProcessor, crossbeam_channel::Sender<EngineCommand>) {
        let (tx, rx) = bounded(32);
        let tap = AnalysisTap::new(64);
        let processor =
            CorrectionProcessor::new(44100, 1.414, settings, true, true, rx, tap);
        (processor, tx)
    }

    #[test]
    fn downmix_mono_passthrough() {
        let mut mono = Vec::new();
        downmix_to_mono(&[0.5, -0.5, 0.25], 1, &mut mono);
        assert_eq!(mono, vec![0.5, -0.5, 0.25]);
    }

    #[test]
    fn downmix_averages_stereo() {
        let mut mono = Vec::new();
        downmix_to_mono(&[1.0, 0.0, 0.0, 1.0, 0.5, 0.5], 2, &mut mono);
        assert_eq!(mono, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn downmix_zero_channels_yields_nothing() {
        let mut mono = vec![1.0; 4];
        downmix_to_mono(&[1.0, 2.0], 0, &mut mono);
        assert!(mono.is_empty());
    }

    #[test]
    fn both_channels_carry_the_same_feed_when_flat() {
        let settings = CorrectionSettings::default();
        let (mut processor, _tx) = test_processor(&settings);

        let mono = vec![0.25f32; 128];
        let mut stereo = vec![0.0f32; 256];
        processor.process_block(&mono, &mut stereo);

        for frame in stereo.chunks_exact(2) {
            assert!((frame[0] - frame[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn queued_commands_apply_before_processing() {
        let settings = CorrectionSettings::default();
        let (mut processor, tx) = test_processor(&settings);

        let mut left = [1.0f32; BAND_COUNT];
        left[0] = 5.0;
        tx.send(EngineCommand::ApplyGains {
            left,
            right: [1.0; BAND_COUNT],
        })
        .unwrap();
        tx.send(EngineCommand::SetEarEnabled(Ear::Right, false)).unwrap();

        let mono = vec![0.0f32; 8];
        let mut stereo = vec![0.0f32; 16];
        processor.process_block(&mono, &mut stereo);

        assert_eq!(processor.ear(Ear::Left).band_gain_targets()[0], 5.0);
        assert!(!processor.ear(Ear::Right).is_enabled());
        assert!(processor.ear(Ear::Left).is_enabled());
    }

    #[test]
    fn tap_sees_the_uncorrected_feed() {
        let mut settings = CorrectionSettings::default();
        settings.left.set_loss_db(1000.0, 40.0);

        let (tx, rx) = bounded(4);
        drop(tx);
        let tap = AnalysisTap::new(64);
        let mut processor =
            CorrectionProcessor::new(44100, 1.414, &settings, true, true, rx, tap.clone());

        let mono = vec![0.5f32; 16];
        let mut stereo = vec![0.0f32; 32];
        processor.process_block(&mono, &mut stereo);

        // The tap carries the raw feed, not the boosted output
        assert_eq!(tap.snapshot(), mono);
    }

    #[test]
    fn short_output_block_is_zero_padded() {
        let settings = CorrectionSettings::default();
        let (mut processor, _tx) = test_processor(&settings);

        let mono = vec![0.5f32; 4];
        let mut stereo = vec![9.0f32; 16];
        processor.process_block(&mono, &mut stereo);

        assert!(stereo[8..].iter().all(|s| *s == 0.0));
    }
}
