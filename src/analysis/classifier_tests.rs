use super::*;

/// Helper to build a FeatureVector with constant per-frame series
fn create_features(tempo: f32, centroid: f32, zcr: f32, rms: f32, frames: usize) -> FeatureVector {
    FeatureVector {
        tempo,
        spectral_centroid: vec![centroid; frames],
        spectral_rolloff: vec![0.0; frames],
        zero_crossing_rate: vec![zcr; frames],
        rms: vec![rms; frames],
        chroma: vec![[0.5; PITCH_CLASSES]; frames],
        spectral_contrast: vec![vec![0.0; frames]; 7],
        ..Default::default()
    }
}

fn chroma_frame(classes: &[(usize, f32)]) -> [f32; PITCH_CLASSES] {
    let mut frame = [0.0; PITCH_CLASSES];
    for &(class, value) in classes {
        frame[class] = value;
    }
    frame
}

#[test]
fn test_c_major_chroma_detects_c_major() {
    let features = FeatureVector {
        chroma: vec![chroma_frame(&[(0, 1.0), (4, 0.8), (7, 0.9)]); 10],
        ..Default::default()
    };
    assert_eq!(detect_key(&features), "C Major");
}

#[test]
fn test_c_minor_triad_detects_minor() {
    // C, D#, G fits the minor mask better than the major mask
    let features = FeatureVector {
        chroma: vec![chroma_frame(&[(0, 1.0), (3, 0.8), (7, 0.9)]); 4],
        ..Default::default()
    };
    assert_eq!(detect_key(&features), "C Minor");
}

#[test]
fn test_tonic_is_strongest_pitch_class() {
    let features = FeatureVector {
        chroma: vec![
            chroma_frame(&[(9, 1.0), (2, 0.4)]),
            chroma_frame(&[(9, 0.9), (4, 0.6)]),
        ],
        ..Default::default()
    };
    assert!(detect_key(&features).starts_with("A "));
}

#[test]
fn test_flat_or_empty_chroma_falls_back_to_c_minor() {
    // Zero variance gives zero correlation for both masks; the tie is Minor
    let flat = FeatureVector {
        chroma: vec![[0.5; PITCH_CLASSES]; 3],
        ..Default::default()
    };
    assert_eq!(detect_key(&flat), "C Minor");
    assert_eq!(detect_key(&FeatureVector::default()), "C Minor");
}

#[test]
fn test_pearson() {
    assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-6);
    assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-6);
    assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    assert_eq!(pearson(&[], &[]), 0.0);
}

#[test]
fn test_scores_are_clamped() {
    assert_eq!(energy_score(0.0), 0);
    assert_eq!(energy_score(0.00390625), 58);
    assert_eq!(energy_score(1.0), 100);
    assert_eq!(energy_score(f32::NAN), 0);

    // 0.4 * 100 + 21 + 0.3 * 100
    assert_eq!(danceability_score(125.0, 1.0), 91);
    assert_eq!(danceability_score(125.0, 5.0), 100);
    // 0.4 * 0 + 21 + 0 = 21
    assert_eq!(danceability_score(300.0, 0.0), 21);

    assert_eq!(valence_score(0.0, 1.0), 100);
    assert_eq!(valence_score(5.0, 0.0), 0);
}

#[test]
fn test_scores_truncate() {
    // 0.4 * (100 - 2 * 2) + 21 + 0.3 * 10 = 62.4
    assert_eq!(danceability_score(123.0, 0.1), 62);
    // 0.6 * 90 + 0.4 * 10 = 58
    assert_eq!(valence_score(0.1, 0.1), 58);
}

#[test]
fn test_loudness() {
    assert_eq!(loudness_db(&[]), -100.0);
    assert!((loudness_db(&[1.0, 1.0]) - 0.0).abs() < 1e-6);
    assert!((loudness_db(&[0.1]) + 20.0).abs() < 1e-4);
    // Silence floors at -100 dB
    assert!((loudness_db(&[0.0, 0.0]) + 100.0).abs() < 1e-4);
    // Quiet frame raised to 80 dB below the loudest frame: (0 + -80) / 2
    assert!((loudness_db(&[1.0, 0.0]) + 40.0).abs() < 1e-4);
}

#[test]
fn test_classify_fast_dark_track_is_drum_and_bass() {
    let classifier = HeuristicClassifier::new();
    let features = create_features(150.0, 2500.0, 0.05, 0.2, 20);
    let result = classifier.classify(&features);

    assert_eq!(result.genre, "Electronic");
    assert_eq!(result.sub_genre, "Drum & Bass");
    // Flat chroma has zero variance -> major tonality; loud and fast -> high
    assert_eq!(result.mood, "Energetic & Uplifting");
    assert_eq!(result.energy, 100);
    assert_eq!(result.tempo, 150.0);
}

#[test]
fn test_classify_quiet_track() {
    let classifier = HeuristicClassifier::new();
    let features = create_features(80.0, 1200.0, 0.02, 0.0011, 20);
    let result = classifier.classify(&features);

    assert_eq!((result.genre.as_str(), result.sub_genre.as_str()), ("Hip Hop", "Trap"));
    assert_eq!(result.mood, "Peaceful & Calm");
    assert_eq!(result.instruments, vec!["Vocals", "Keyboard"]);
    // 0.0011 * 100 * 150 = 16.5
    assert_eq!(result.energy, 16);
    assert!((result.loudness - 20.0 * 0.0011_f32.log10()).abs() < 1e-3);
}

#[test]
fn test_classify_silence_is_well_formed() {
    let classifier = HeuristicClassifier::new();
    let result = classifier.classify(&FeatureVector::default());

    assert_eq!(result.key, "C Minor");
    assert_eq!(result.loudness, -100.0);
    assert!(!result.instruments.is_empty() && result.instruments.len() <= 5);
    assert!(result.energy <= 100 && result.danceability <= 100 && result.valence <= 100);
}

#[test]
fn test_classify_is_deterministic() {
    let classifier = HeuristicClassifier::new();
    let features = create_features(128.0, 3200.0, 0.15, 0.12, 8);
    assert_eq!(classifier.classify(&features), classifier.classify(&features));
}

#[test]
fn test_classifier_is_usable_as_trait_object() {
    let classifier: Box<dyn TrackClassifier> = Box::new(HeuristicClassifier::new());
    let result = classifier.classify(&create_features(100.0, 2200.0, 0.05, 0.07, 4));
    assert_eq!(result.genre, "Pop");
    assert_eq!(result.sub_genre, "Contemporary");
}
