use mixmentor_core::AppViewModel;

use super::constants::*;

/// The input form as it will be submitted: mode tabs, then the fields the
/// active mode shows.
pub fn form_lines(view: &AppViewModel) -> Vec<String> {
    let tabs = view
        .tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("[{}]", tab.label)
            } else {
                format!(" {} ", tab.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let genre = view
        .genre_options
        .iter()
        .find(|(key, _)| *key == view.selected_genre)
        .map(|(_, label)| label.as_str())
        .unwrap_or(view.selected_genre.as_str());

    let mut lines = vec![
        format!("{LABEL_MODE}: {tabs}"),
        format!("{LABEL_GENRE}: {genre}"),
    ];
    if view.vocal_style_visible {
        lines.push(format!("{LABEL_VOCAL_STYLE}: {}", view.selected_vocal_style));
    }
    lines.push(format!(
        "{LABEL_AUDIO}: {}",
        view.audio_name.as_deref().unwrap_or(NONE_SELECTED)
    ));
    if view.reference_visible {
        lines.push(format!(
            "{LABEL_REFERENCE}: {}",
            view.reference_name.as_deref().unwrap_or(NONE_SELECTED)
        ));
    }
    lines
}

/// One line per genre option: display label, then the key to pass to `--genre`.
pub fn genre_lines(options: &[(String, String)], from_backend: bool) -> Vec<String> {
    let width = options
        .iter()
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = options
        .iter()
        .map(|(key, label)| {
            let pad = width - label.chars().count();
            format!("{label}{}  {key}", " ".repeat(pad))
        })
        .collect();
    if !from_backend {
        lines.push(FALLBACK_GENRES_NOTE.to_string());
    }
    lines
}
