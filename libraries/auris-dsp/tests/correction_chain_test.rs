//! Correction chain integration tests
//!
//! Exercises the per-ear chain the way the engine does: gains computed from
//! profiles, retargeted mid-stream, with click detection on the output.

use auris_core::{CorrectionSettings, Ear, BAND_COUNT, CORRECTION_BAND_FREQUENCIES};
use auris_dsp::{band_gains, db_to_linear, EarChannel};
use std::f32::consts::PI;

/// Generate a mono sine wave
fn generate_sine(frequency: f32, sample_rate: u32, duration_sec: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_sec) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * PI * frequency * t).sin() * amplitude
        })
        .collect()
}

/// Measure maximum sample-to-sample difference (click detector)
fn max_discontinuity(buffer: &[f32]) -> f32 {
    buffer
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .fold(0.0f32, f32::max)
}

#[test]
fn prescribed_scenario_left_boosted_right_flat() {
    // Left ear: 40 dB loss at 1 kHz with tuning pushed to its 90% ceiling;
    // everything else 0 dB loss at default 50% tuning. Right ear untouched.
    let mut settings = CorrectionSettings::default();
    settings.ear_mut(Ear::Left).set_loss_db(1000.0, 40.0);
    settings.tuning.set_intensity_pct(1000.0, 90.0);

    let left = band_gains(&settings.left, &settings.tuning);
    let right = band_gains(&settings.right, &settings.tuning);

    for (i, freq) in CORRECTION_BAND_FREQUENCIES.iter().enumerate() {
        if *freq == 1000.0 {
            // Tuning clamps at 90%, so the full-compensation figure uses 36 dB
            let expected = db_to_linear(36.0);
            assert!((left[i] - expected).abs() < expected * 1e-4);
        } else {
            assert_eq!(left[i], 1.0, "unset band {freq} Hz must stay at unity");
        }
        assert_eq!(right[i], 1.0, "right ear has no loss, gain must be unity");
    }
}

#[test]
fn forty_db_full_tuning_reaches_hundredfold_in_chain() {
    // Stored tuning clamps at 90%, but the calculator itself accepts a full
    // 100% multiplier, so drive the chain with the raw gains directly.
    let mut gains = [1.0f32; BAND_COUNT];
    gains[2] = db_to_linear(40.0); // 100.0

    let mut chain = EarChannel::new(44100);
    chain.apply_band_gains(&gains);

    let mut buffer = vec![1.0f32; 44100];
    chain.process(&mut buffer);
    let settled = buffer[buffer.len() - 1];
    assert!((settled - 100.0).abs() < 0.5);

    let targets = chain.band_gain_targets();
    assert!((targets[2] - 100.0).abs() < 1e-3);
    for (i, target) in targets.iter().enumerate() {
        if i != 2 {
            assert_eq!(*target, 1.0);
        }
    }
}

#[test]
fn ear_toggle_does_not_click() {
    let sample_rate = 44100;
    let mut chain = EarChannel::new(sample_rate);

    let mut buffer = generate_sine(440.0, sample_rate, 0.4, 0.8);
    let half = buffer.len() / 2;

    chain.process(&mut buffer[..half]);
    chain.set_enabled(false);
    chain.process(&mut buffer[half..]);

    // Clean 440 Hz at 0.8 amplitude moves at most ~0.05 per sample; a hard
    // mute would step by up to 1.6.
    let expected_max = 0.8 * 2.0 * PI * 440.0 / sample_rate as f32;
    let measured = max_discontinuity(&buffer);
    assert!(
        measured < expected_max * 2.0,
        "mute clicked: step {measured}, clean signal max {expected_max}"
    );

    // And the tail is actually silent
    let tail = &buffer[buffer.len() - 100..];
    assert!(tail.iter().all(|s| s.abs() < 1e-3));
}

#[test]
fn gain_retarget_does_not_click() {
    let sample_rate = 44100;
    let mut chain = EarChannel::new(sample_rate);

    let mut buffer = generate_sine(1000.0, sample_rate, 0.4, 0.1);
    let half = buffer.len() / 2;

    chain.process(&mut buffer[..half]);

    let mut gains = [1.0f32; BAND_COUNT];
    gains[2] = 10.0;
    chain.apply_band_gains(&gains);
    chain.process(&mut buffer[half..]);

    // The boosted half eventually swings 10x faster; measure against the
    // boosted signal's own slope, not the quiet half's.
    let expected_max = 1.0 * 2.0 * PI * 1000.0 / sample_rate as f32;
    let measured = max_discontinuity(&buffer);
    assert!(
        measured < expected_max * 2.0,
        "retarget clicked: step {measured}"
    );
}

#[test]
fn both_ears_share_one_feed_but_correct_independently() {
    let sample_rate = 44100;
    let mut left = EarChannel::new(sample_rate);
    let mut right = EarChannel::new(sample_rate);

    let mut gains = [1.0f32; BAND_COUNT];
    gains[2] = 10.0;
    left.apply_band_gains(&gains);

    let feed = vec![0.1f32; 44100];
    let mut left_out = feed.clone();
    let mut right_out = feed;
    left.process(&mut left_out);
    right.process(&mut right_out);

    let l = left_out[left_out.len() - 1];
    let r = right_out[right_out.len() - 1];
    assert!((l - 1.0).abs() < 0.01, "left should settle at 10x 0.1");
    assert!((r - 0.1).abs() < 1e-4, "right stays uncorrected");
}
