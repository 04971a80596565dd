mod common;

use common::*;
use pitch_core::{AudioFrame, DetectorConfig, DifferenceMethod, PitchDetector, detect_pitch};

#[test]
fn test_pure_sines_within_one_percent() {
    let config = DetectorConfig::default();
    let n = samples_for(0.5);

    for &freq in &[100.0, 150.0, 220.0, 261.63, 330.0, 440.0, 523.25, 660.0, 800.0, 1000.0] {
        let signal = gen_sine(freq, SAMPLE_RATE, n, 0.8);
        let detected = detect_pitch(&signal, SAMPLE_RATE, &config);
        assert!(
            relative_error(detected, freq) < 0.01,
            "{} Hz detected as {} Hz",
            freq,
            detected
        );
    }
}

#[test]
fn test_a5_within_two_percent() {
    let signal = gen_sine(880.0, SAMPLE_RATE, samples_for(0.5), 0.8);
    let detected = detect_pitch(&signal, SAMPLE_RATE, &DetectorConfig::default());
    assert!(relative_error(detected, 880.0) < 0.02, "got {}", detected);
}

#[test]
fn test_low_e_within_three_percent() {
    let signal = gen_sine(85.0, SAMPLE_RATE, samples_for(0.5), 0.8);
    let detected = detect_pitch(&signal, SAMPLE_RATE, &DetectorConfig::default());
    assert!(relative_error(detected, 85.0) < 0.03, "got {}", detected);
}

#[test]
fn test_harmonic_tone_reports_fundamental() {
    let config = DetectorConfig::default();

    for &f0 in &[110.0, 220.0, 330.0] {
        let signal = gen_harmonic_tone(f0, &[1.0, 0.5, 0.25], SAMPLE_RATE, samples_for(0.5));
        let detected = detect_pitch(&signal, SAMPLE_RATE, &config);
        assert!(
            relative_error(detected, f0) < 0.02,
            "f0 {} Hz detected as {} Hz",
            f0,
            detected
        );
    }
}

#[test]
fn test_overtone_dominated_tone_reports_fundamental() {
    // Most of the energy sits in the 2nd and 3rd harmonics.
    let f0 = 196.0;
    let signal = gen_harmonic_tone(f0, &[0.3, 1.0, 0.8], SAMPLE_RATE, samples_for(0.5));
    let detected = detect_pitch(&signal, SAMPLE_RATE, &DetectorConfig::default());
    assert!(relative_error(detected, f0) < 0.02, "got {}", detected);
}

#[test]
fn test_single_2048_frame_accuracy() {
    let mut detector = PitchDetector::new(DetectorConfig::default()).unwrap();

    for &freq in &[110.0, 440.0, 1000.0, 1760.0] {
        let signal = gen_sine(freq, SAMPLE_RATE, 2048, 0.5);
        let detected = detector.detect(AudioFrame::new(&signal, SAMPLE_RATE));
        assert!(
            relative_error(detected, freq) < 0.02,
            "{} Hz detected as {} Hz",
            freq,
            detected
        );
    }
}

#[test]
fn test_fft_method_matches_direct() {
    let direct = DetectorConfig::default();
    let fft = DetectorConfig::default().with_difference_method(DifferenceMethod::Fft);

    for &freq in &[85.0, 196.0, 440.0, 880.0] {
        let signal = gen_harmonic_tone(freq, &[1.0, 0.4, 0.2], SAMPLE_RATE, 4096);
        let a = detect_pitch(&signal, SAMPLE_RATE, &direct);
        let b = detect_pitch(&signal, SAMPLE_RATE, &fft);
        assert!(a > 0.0 && b > 0.0, "{} Hz: direct {} fft {}", freq, a, b);
        assert!(
            relative_error(b, a) < 0.001,
            "{} Hz: direct {} fft {}",
            freq,
            a,
            b
        );
    }

    // Small tone riding on a large DC offset.
    for &amplitude in &[0.01, 0.003, 0.001] {
        let signal: Vec<f32> = gen_sine(220.0, SAMPLE_RATE, 4096, amplitude)
            .into_iter()
            .map(|x| x + 0.9)
            .collect();
        let a = detect_pitch(&signal, SAMPLE_RATE, &direct);
        let b = detect_pitch(&signal, SAMPLE_RATE, &fft);
        assert!(relative_error(a, 220.0) < 0.01, "amplitude {}: direct {}", amplitude, a);
        assert!(
            relative_error(b, a) < 0.001,
            "amplitude {}: direct {} fft {}",
            amplitude,
            a,
            b
        );
    }
}

#[test]
fn test_other_sample_rates() {
    let config = DetectorConfig::default();
    for &sr in &[16000.0, 22050.0, 48000.0, 96000.0] {
        let signal = gen_sine(330.0, sr, (sr * 0.1) as usize, 0.5);
        let detected = detect_pitch(&signal, sr, &config);
        assert!(
            relative_error(detected, 330.0) < 0.01,
            "{} Hz sample rate: got {}",
            sr,
            detected
        );
    }
}
