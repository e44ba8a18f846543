//! Static lookup tables from backend vocabulary to user-facing labels.
//!
//! Every lookup falls back to the key itself, so an unknown key is shown
//! verbatim instead of failing.

const GENRE_LABELS: &[(&str, &str)] = &[
    ("Rap/Trap", "Rap/Trap"),
    ("Rap - BoomBap", "Rap - Boom Bap"),
    ("Rap - Trap", "Rap - Trap"),
    ("Pop", "Pop"),
    ("R&B", "R&B"),
    ("EDM", "EDM"),
    ("EDM - Club", "EDM - Club"),
    ("EDM - Chill", "EDM - Chill"),
    ("House", "House"),
    ("Techno", "Techno"),
    ("Rock", "Rock"),
    ("Metal", "Metal"),
    ("Acoustic", "Akustisk"),
    ("Singer-Songwriter", "Visesang/Låtskriver"),
    ("Jazz", "Jazz"),
    ("Lo-fi", "Lo-fi"),
];

const STAGE_LABELS: &[(&str, &str)] = &[
    ("queued", "I kø"),
    ("ingest", "Forbereder"),
    ("processing", "Analyserer"),
    ("complete", "Ferdig"),
    ("failed", "Feilet"),
];

const SCORE_LABELS: &[(&str, &str)] = &[
    ("loudness", "Lydstyrke"),
    ("spectral_balance", "Spektralbalanse"),
    ("stereo", "Stereo"),
    ("dynamics", "Dynamikk"),
    ("noise", "Støy"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| *label)
}

/// Display label for a genre key.
pub fn genre_label(key: &str) -> String {
    lookup(GENRE_LABELS, key).unwrap_or(key).to_string()
}

/// Display label for a job stage or status key.
pub fn stage_label(key: &str) -> String {
    lookup(STAGE_LABELS, key).unwrap_or(key).to_string()
}

/// Display label for a score metric key.
///
/// Unknown keys are humanized by turning underscores into spaces.
pub fn score_label(key: &str) -> String {
    match lookup(SCORE_LABELS, key) {
        Some(label) => label.to_string(),
        None => key.replace('_', " "),
    }
}
