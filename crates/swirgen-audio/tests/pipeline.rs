//! End-to-end tests of the audio core against a corpus on disk.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p swirgen-audio --test pipeline
//! ```

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use swirgen_audio::corpus::discover;
use swirgen_audio::gain::GainOutcome;
use swirgen_audio::rng::create_component_rng;
use swirgen_audio::tone::calibration_tone;
use swirgen_audio::verify::{verify_levels, NamedFile, Verdict};
use swirgen_audio::{
    wav, BabbleSynthesizer, CalibrationReference, ClipCorpus, GainEngine, NoiseSynthesizer,
    SignalBuffer,
};
use swirgen_spec::{BabbleParams, CalibrationParams, CorpusSource, NoiseParams};

const SAMPLE_RATE: u32 = 16000;
const CEILING: f64 = 32700.0 / 32768.0;

/// A voiced-ish clip: a few harmonics under a slow envelope.
fn sentence(index: usize, seconds: f64, amplitude: f64) -> SignalBuffer {
    let len = (seconds * SAMPLE_RATE as f64) as usize;
    let f0 = 110.0 + 15.0 * index as f64;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let envelope = (PI * t / seconds).sin();
            let voiced: f64 = (1..=5)
                .map(|h| (2.0 * PI * f0 * h as f64 * t).sin() / h as f64)
                .sum();
            amplitude * envelope * voiced / 2.3
        })
        .collect();
    SignalBuffer::new(samples, SAMPLE_RATE)
}

fn write_corpus(dir: &Path, count: usize, amplitude: f64) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    (0..count)
        .map(|i| {
            let path = dir.join(format!("swir_{:02}.wav", i));
            wav::write_file(&path, &sentence(i, 0.4 + 0.1 * i as f64, amplitude)).unwrap();
            path
        })
        .collect()
}

fn babble_params(dir: &Path, output: PathBuf) -> BabbleParams {
    BabbleParams {
        sources: vec![CorpusSource::new(dir)],
        output,
        duration_seconds: 2.0,
        voices: 3,
        ..BabbleParams::default()
    }
}

fn noise_params(dir: &Path, output: PathBuf) -> NoiseParams {
    NoiseParams {
        sources: vec![CorpusSource::new(dir)],
        output,
        duration_seconds: 1.0,
        segment_length: 256,
        num_taps: 101,
        ..NoiseParams::default()
    }
}

#[test]
fn test_full_pipeline_reaches_calibration_level() {
    let tmp = tempfile::tempdir().unwrap();
    let speech = tmp.path().join("speech");
    write_corpus(&speech, 6, 0.3);

    let tone_path = tmp.path().join("tone.wav");
    let tone = calibration_tone(
        &CalibrationParams {
            output: tone_path.clone(),
            duration_seconds: 1.0,
            ..CalibrationParams::default()
        },
        SAMPLE_RATE,
    )
    .unwrap();
    wav::write_file(&tone_path, &tone).unwrap();

    let corpus = ClipCorpus::load(&[CorpusSource::new(&speech)]).unwrap();
    assert_eq!(corpus.len(), 6);

    let babble_path = tmp.path().join("babble.wav");
    let babble = BabbleSynthesizer::new(babble_params(&speech, babble_path.clone()))
        .synthesize(&corpus, &mut create_component_rng(42, "babble"))
        .unwrap();
    wav::write_file(&babble_path, &babble).unwrap();

    let noise_path = tmp.path().join("noise.wav");
    let noise = NoiseSynthesizer::new(noise_params(&speech, noise_path.clone()))
        .synthesize(&corpus, &mut create_component_rng(42, "noise"))
        .unwrap();
    wav::write_file(&noise_path, &noise).unwrap();

    let reference = CalibrationReference::from_file(&tone_path).unwrap();
    let engine = GainEngine::new(reference, CEILING);

    let mut targets = vec![babble_path.clone(), noise_path.clone()];
    targets.extend(discover(&[CorpusSource::new(&speech)]).unwrap());
    let report = engine.normalize_batch(&targets);
    assert!(report.failures.is_empty());
    assert_eq!(report.files.len(), 8);
    assert!(report
        .files
        .iter()
        .all(|f| matches!(f.outcome, GainOutcome::Applied(_))));

    let maskers = [
        NamedFile::new("Babble noise", &babble_path),
        NamedFile::new("Speech-shaped noise", &noise_path),
    ];
    let sentences = discover(&[CorpusSource::new(&speech)]).unwrap();
    let verification = verify_levels(&tone_path, &maskers, &sentences, 0.1).unwrap();

    assert_eq!(verification.verdict, Verdict::Pass);
    let summary = verification.sentences.unwrap();
    assert_eq!(summary.measured, 6);
    assert_eq!(summary.mismatches, 0);
    assert!(verification.maskers.iter().all(|m| m.dbfs.is_some()));
}

#[test]
fn test_same_seed_same_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let speech = tmp.path().join("speech");
    write_corpus(&speech, 4, 0.5);
    let corpus = ClipCorpus::load(&[CorpusSource::new(&speech)]).unwrap();

    let render = |seed: u32, name: &str| {
        let path = tmp.path().join(name);
        let params = babble_params(&speech, path.clone());
        let buffer = BabbleSynthesizer::new(params)
            .synthesize(&corpus, &mut create_component_rng(seed, "babble"))
            .unwrap();
        wav::write_file(&path, &buffer).unwrap().pcm_hash
    };

    let a = render(7, "a.wav");
    let b = render(7, "b.wav");
    let c = render(8, "c.wav");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(
        fs::read(tmp.path().join("a.wav")).unwrap(),
        fs::read(tmp.path().join("b.wav")).unwrap()
    );
}

#[test]
fn test_empty_corpus_fails_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let empty = tmp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    let corpus = ClipCorpus::load(&[CorpusSource::new(&empty)]).unwrap();
    assert!(corpus.is_empty());

    let output = tmp.path().join("babble.wav");
    let babble = BabbleSynthesizer::new(babble_params(&empty, output.clone()))
        .synthesize(&corpus, &mut create_component_rng(1, "babble"));
    assert!(babble.is_err());

    let noise = NoiseSynthesizer::new(noise_params(&empty, output.clone()))
        .synthesize(&corpus, &mut create_component_rng(1, "noise"));
    assert!(noise.is_err());

    assert!(!output.exists());
}

#[test]
fn test_loud_sentence_is_clip_protected() {
    let tmp = tempfile::tempdir().unwrap();

    let tone_path = tmp.path().join("tone.wav");
    let params = CalibrationParams {
        duration_seconds: 1.0,
        ..CalibrationParams::default()
    };
    let tone = calibration_tone(&params, SAMPLE_RATE).unwrap();
    wav::write_file(&tone_path, &tone).unwrap();

    // A single click over silence: tiny RMS, so the naive gain would clip.
    let mut samples = vec![0.0; SAMPLE_RATE as usize];
    samples[100] = 0.05;
    let click = tmp.path().join("click.wav");
    wav::write_file(&click, &SignalBuffer::new(samples, SAMPLE_RATE)).unwrap();

    let engine = GainEngine::new(CalibrationReference::from_file(&tone_path).unwrap(), CEILING);
    let report = engine.normalize_file(&click).unwrap();
    let protection = report.outcome.clip_protection().unwrap();
    assert!(protection.safety_ratio < 1.0);

    let rewritten = wav::load(&click).unwrap();
    let peak = swirgen_audio::level::peak(&rewritten.samples);
    assert!(peak <= CEILING + 1.0 / 32768.0);
}
