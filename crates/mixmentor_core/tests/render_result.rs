use mixmentor_core::{render_result, Card, CardKind, ResultDocument};
use pretty_assertions::assert_eq;
use serde_json::json;

fn parse(value: serde_json::Value) -> ResultDocument {
    ResultDocument::from_value(Some(value)).expect("valid result document")
}

#[test]
fn full_document_renders_all_cards_in_order() {
    let doc = parse(json!({
        "summary": "Demo report: balanced mix with targeted improvements.",
        "scores": { "loudness": 81.5, "spectral_balance": 72.4, "air_band": 64.49 },
        "recommendations": {
            "recording": ["Tighten mic technique."],
            "mixing": ["Add 1-2 dB presence around 3 kHz.", "Ease bus compression."]
        },
        "bpm_key": {
            "bpm": 142.0,
            "confidence": 0.744,
            "warning": null,
            "key": "A minor",
            "key_confidence": 0.61,
            "note": "Best guess only."
        },
        "ab_compare": {
            "loudness_diff_lufs": -1.24,
            "short_term_diff_lufs": -0.6,
            "true_peak_diff_db": 0.26,
            "spectral_diff_summary": "Mix is slightly darker.",
            "stereo_diff_summary": "Width is close.",
            "phase_corr_diff": -0.08,
            "dynamics_diff_summary": "Slightly more compressed.",
            "match_suggestions": ["Raise high shelf.", "Ease bus compression."]
        },
        "metrics": { "stereo": { "width": 0.32 } },
        "warnings": ["Clipping detected."]
    }));

    let view = render_result(&doc);
    assert_eq!(
        view.kinds(),
        vec![
            CardKind::Summary,
            CardKind::Scores,
            CardKind::Recommendations,
            CardKind::BpmKey,
            CardKind::AbCompare,
            CardKind::Appendix,
        ]
    );

    match view.card(CardKind::Summary) {
        Some(Card::Summary { text, warnings }) => {
            assert!(text.starts_with("Demo report"));
            assert_eq!(warnings, &vec!["Clipping detected.".to_string()]);
        }
        other => panic!("unexpected summary card: {other:?}"),
    }

    match view.card(CardKind::Scores) {
        Some(Card::Scores { entries }) => {
            let rendered: Vec<_> = entries
                .iter()
                .map(|entry| (entry.label.as_str(), entry.value))
                .collect();
            assert_eq!(
                rendered,
                vec![
                    ("Lydstyrke", 82),
                    ("Spektralbalanse", 72),
                    ("air band", 64),
                ]
            );
        }
        other => panic!("unexpected scores card: {other:?}"),
    }

    match view.card(CardKind::BpmKey) {
        Some(Card::BpmKey {
            bpm,
            bpm_confidence_pct,
            key,
            key_confidence_pct,
            note,
            warning,
        }) => {
            assert_eq!(bpm, "142.0");
            assert_eq!(*bpm_confidence_pct, 74);
            assert_eq!(key, "A minor");
            assert_eq!(*key_confidence_pct, 61);
            assert_eq!(note.as_deref(), Some("Best guess only."));
            assert_eq!(*warning, None);
        }
        other => panic!("unexpected bpm card: {other:?}"),
    }

    match view.card(CardKind::AbCompare) {
        Some(Card::AbCompare {
            loudness_diff,
            true_peak_diff,
            match_suggestions,
            ..
        }) => {
            assert_eq!(loudness_diff, "-1.2 LUFS");
            assert_eq!(true_peak_diff, "0.3 dBTP");
            assert_eq!(match_suggestions.len(), 2);
        }
        other => panic!("unexpected ab card: {other:?}"),
    }
}

#[test]
fn minimal_document_renders_core_cards_only() {
    let doc = parse(json!({
        "summary": "Short.",
        "scores": {}
    }));

    let view = render_result(&doc);
    assert_eq!(
        view.kinds(),
        vec![
            CardKind::Summary,
            CardKind::Scores,
            CardKind::Recommendations,
            CardKind::Appendix,
        ]
    );
    assert_eq!(
        view.card(CardKind::Recommendations),
        Some(&Card::Recommendations {
            recording: Vec::new(),
            mixing: Vec::new(),
        })
    );
    assert_eq!(
        view.card(CardKind::Appendix),
        Some(&Card::Appendix {
            json: "null".to_string()
        })
    );
}

#[test]
fn null_optional_sections_are_absent() {
    let doc = parse(json!({
        "summary": "Short.",
        "scores": { "noise": 90 },
        "recommendations": { "recording": null },
        "bpm_key": null,
        "ab_compare": null,
        "metrics": [1, 2, 3]
    }));
    let view = render_result(&doc);
    assert_eq!(view.cards.len(), 4);
    match view.card(CardKind::Appendix) {
        Some(Card::Appendix { json }) => assert!(json.contains('1') && json.contains('\n')),
        other => panic!("unexpected appendix: {other:?}"),
    }
}

#[test]
fn null_lists_render_empty() {
    let doc = parse(json!({
        "summary": "Short.",
        "scores": { "loudness": 80 },
        "recommendations": null,
        "warnings": null,
        "ab_compare": {
            "loudness_diff_lufs": 0.0,
            "true_peak_diff_db": 0.0,
            "spectral_diff_summary": "Same.",
            "stereo_diff_summary": "Same.",
            "dynamics_diff_summary": "Same.",
            "match_suggestions": null
        }
    }));
    let view = render_result(&doc);

    assert_eq!(
        view.card(CardKind::Summary),
        Some(&Card::Summary {
            text: "Short.".to_string(),
            warnings: Vec::new(),
        })
    );
    assert_eq!(
        view.card(CardKind::Recommendations),
        Some(&Card::Recommendations {
            recording: Vec::new(),
            mixing: Vec::new(),
        })
    );
    match view.card(CardKind::AbCompare) {
        Some(Card::AbCompare {
            match_suggestions, ..
        }) => assert!(match_suggestions.is_empty()),
        other => panic!("unexpected ab card: {other:?}"),
    }
}

#[test]
fn scores_keep_backend_order() {
    let doc = parse(json!({
        "summary": "Ordered.",
        "scores": {
            "loudness": 80,
            "spectral_balance": 70,
            "stereo": 60,
            "dynamics": 50,
            "noise": 40
        }
    }));
    match render_result(&doc).card(CardKind::Scores) {
        Some(Card::Scores { entries }) => {
            let keys: Vec<&str> = entries.iter().map(|entry| entry.key.as_str()).collect();
            assert_eq!(
                keys,
                vec!["loudness", "spectral_balance", "stereo", "dynamics", "noise"]
            );
        }
        other => panic!("unexpected scores card: {other:?}"),
    }
}

#[test]
fn rendering_is_deterministic() {
    let doc = parse(json!({
        "summary": "Same.",
        "scores": { "b": 1.5, "a": 2.49 },
        "metrics": { "z": 1, "a": { "nested": true } }
    }));
    assert_eq!(render_result(&doc), render_result(&doc));
}

#[test]
fn missing_scores_is_rejected() {
    let err = ResultDocument::from_value(Some(json!({ "summary": "x" })));
    assert!(err.is_err());
    assert!(ResultDocument::from_value(None).is_err());
}
