pub const PROGRESS_WIDTH: usize = 30;
pub const PROGRESS_FILLED: char = '#';
pub const PROGRESS_EMPTY: char = '-';

pub const LABEL_MODE: &str = "Modus";
pub const LABEL_GENRE: &str = "Sjanger";
pub const LABEL_VOCAL_STYLE: &str = "Vokalstil";
pub const LABEL_AUDIO: &str = "Lydfil";
pub const LABEL_REFERENCE: &str = "Referanse";
pub const NONE_SELECTED: &str = "(ingen)";

pub const BPM_LABEL: &str = "BPM";
pub const KEY_LABEL: &str = "Toneart";
pub const CONFIDENCE_LABEL: &str = "sikkerhet";
pub const LOUDNESS_DIFF_LABEL: &str = "Lydstyrkeforskjell";
pub const TRUE_PEAK_DIFF_LABEL: &str = "True peak-forskjell";
pub const SPECTRAL_LABEL: &str = "Spektral";
pub const STEREO_LABEL: &str = "Stereo";
pub const DYNAMICS_LABEL: &str = "Dynamikk";
pub const APPENDIX_HINT: &str = "bruk --appendix for å vise";

pub const FALLBACK_GENRES_NOTE: &str = "(innebygd liste; backend utilgjengelig)";
