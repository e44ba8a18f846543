//! Deterministic mapping from a [`ResultDocument`] to the cards shown to the user.

use crate::result::{AbCompare, BpmKey, ResultDocument};
use crate::translate::score_label;

pub const SUMMARY_TITLE: &str = "Sammendrag";
pub const SCORES_TITLE: &str = "Poengsum";
pub const RECOMMENDATIONS_TITLE: &str = "Prioriterte tiltak";
pub const RECORDING_TITLE: &str = "Innspilling";
pub const MIXING_TITLE: &str = "Miksing";
pub const BPM_KEY_TITLE: &str = "BPM & Toneart";
pub const AB_COMPARE_TITLE: &str = "A/B Masteringssammenligning";
pub const MATCH_SUGGESTIONS_TITLE: &str = "Forslag til match";
pub const APPENDIX_TITLE: &str = "Teknisk vedlegg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Summary,
    Scores,
    Recommendations,
    BpmKey,
    AbCompare,
    Appendix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub key: String,
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Summary {
        text: String,
        warnings: Vec<String>,
    },
    Scores {
        entries: Vec<ScoreEntry>,
    },
    Recommendations {
        recording: Vec<String>,
        mixing: Vec<String>,
    },
    BpmKey {
        /// One decimal place.
        bpm: String,
        bpm_confidence_pct: i64,
        key: String,
        key_confidence_pct: i64,
        note: Option<String>,
        warning: Option<String>,
    },
    AbCompare {
        /// Formatted with unit, e.g. `-1.2 LUFS`.
        loudness_diff: String,
        /// Formatted with unit, e.g. `0.3 dBTP`.
        true_peak_diff: String,
        spectral_summary: String,
        stereo_summary: String,
        dynamics_summary: String,
        match_suggestions: Vec<String>,
    },
    /// Raw metrics, shown collapsed by default.
    Appendix {
        json: String,
    },
}

impl Card {
    pub fn kind(&self) -> CardKind {
        match self {
            Card::Summary { .. } => CardKind::Summary,
            Card::Scores { .. } => CardKind::Scores,
            Card::Recommendations { .. } => CardKind::Recommendations,
            Card::BpmKey { .. } => CardKind::BpmKey,
            Card::AbCompare { .. } => CardKind::AbCompare,
            Card::Appendix { .. } => CardKind::Appendix,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind() {
            CardKind::Summary => SUMMARY_TITLE,
            CardKind::Scores => SCORES_TITLE,
            CardKind::Recommendations => RECOMMENDATIONS_TITLE,
            CardKind::BpmKey => BPM_KEY_TITLE,
            CardKind::AbCompare => AB_COMPARE_TITLE,
            CardKind::Appendix => APPENDIX_TITLE,
        }
    }
}

/// The complete rendered result area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultView {
    pub cards: Vec<Card>,
}

impl ResultView {
    pub fn kinds(&self) -> Vec<CardKind> {
        self.cards.iter().map(Card::kind).collect()
    }

    pub fn card(&self, kind: CardKind) -> Option<&Card> {
        self.cards.iter().find(|card| card.kind() == kind)
    }
}

/// Builds the result cards in their fixed order. Optional sections that are
/// absent produce no card; absent recommendation lists render empty.
pub fn render_result(doc: &ResultDocument) -> ResultView {
    let mut cards = Vec::with_capacity(6);

    cards.push(Card::Summary {
        text: doc.summary.clone(),
        warnings: doc.warnings.clone(),
    });

    cards.push(Card::Scores {
        entries: doc
            .scores
            .iter()
            .map(|(key, value)| ScoreEntry {
                key: key.clone(),
                label: score_label(key),
                value: value.round() as i64,
            })
            .collect(),
    });

    cards.push(Card::Recommendations {
        recording: doc.recommendations.recording.clone().unwrap_or_default(),
        mixing: doc.recommendations.mixing.clone().unwrap_or_default(),
    });

    if let Some(bpm_key) = &doc.bpm_key {
        cards.push(bpm_key_card(bpm_key));
    }
    if let Some(ab) = &doc.ab_compare {
        cards.push(ab_compare_card(ab));
    }

    cards.push(Card::Appendix {
        json: serde_json::to_string_pretty(&doc.metrics).unwrap_or_else(|_| "null".to_string()),
    });

    ResultView { cards }
}

fn bpm_key_card(bpm_key: &BpmKey) -> Card {
    Card::BpmKey {
        bpm: format!("{:.1}", bpm_key.bpm),
        bpm_confidence_pct: percent(bpm_key.confidence),
        key: bpm_key.key.clone(),
        key_confidence_pct: percent(bpm_key.key_confidence),
        note: non_blank(bpm_key.note.as_deref()),
        warning: non_blank(bpm_key.warning.as_deref()),
    }
}

fn ab_compare_card(ab: &AbCompare) -> Card {
    Card::AbCompare {
        loudness_diff: format!("{:.1} LUFS", ab.loudness_diff_lufs),
        true_peak_diff: format!("{:.1} dBTP", ab.true_peak_diff_db),
        spectral_summary: ab.spectral_diff_summary.clone(),
        stereo_summary: ab.stereo_diff_summary.clone(),
        dynamics_summary: ab.dynamics_diff_summary.clone(),
        match_suggestions: ab.match_suggestions.clone(),
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
