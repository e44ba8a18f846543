use crate::translate::genre_label;

/// Genres offered when the backend list cannot be used.
pub const FALLBACK_GENRES: [&str; 16] = [
    "Rap/Trap",
    "Rap - BoomBap",
    "Rap - Trap",
    "Pop",
    "R&B",
    "EDM",
    "EDM - Club",
    "EDM - Chill",
    "House",
    "Techno",
    "Rock",
    "Metal",
    "Acoustic",
    "Singer-Songwriter",
    "Jazz",
    "Lo-fi",
];

/// Vocal styles offered in vocal mode. The first entry is the default.
pub const VOCAL_STYLES: [&str; 3] = ["Rap", "Singing", "Spoken"];

/// Ordered, never-empty list of selectable genre keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreList {
    keys: Vec<String>,
    from_backend: bool,
}

impl GenreList {
    /// The built-in list.
    pub fn fallback() -> Self {
        Self {
            keys: FALLBACK_GENRES.iter().map(|key| key.to_string()).collect(),
            from_backend: false,
        }
    }

    /// Uses the backend list unless it is empty (or only blank entries).
    pub fn from_backend(keys: Vec<String>) -> Self {
        let keys: Vec<String> = keys
            .into_iter()
            .filter(|key| !key.trim().is_empty())
            .collect();
        if keys.is_empty() {
            return Self::fallback();
        }
        Self {
            keys,
            from_backend: true,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|candidate| candidate == key)
    }

    pub fn first(&self) -> &str {
        // Both constructors guarantee at least one entry.
        self.keys.first().map(String::as_str).unwrap_or(FALLBACK_GENRES[0])
    }

    pub fn is_from_backend(&self) -> bool {
        self.from_backend
    }

    /// `(key, label)` pairs in list order, for populating a selector.
    pub fn options(&self) -> Vec<(String, String)> {
        self.keys
            .iter()
            .map(|key| (key.clone(), genre_label(key)))
            .collect()
    }
}

impl Default for GenreList {
    fn default() -> Self {
        Self::fallback()
    }
}
