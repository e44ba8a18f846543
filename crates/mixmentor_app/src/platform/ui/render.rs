use mixmentor_core::{
    AppViewModel, Card, ResultView, MATCH_SUGGESTIONS_TITLE, MIXING_TITLE, RECORDING_TITLE,
};

use super::constants::*;

pub fn progress_bar(progress: f32) -> String {
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (progress * PROGRESS_WIDTH as f32).round() as usize;
    let mut bar = String::with_capacity(PROGRESS_WIDTH + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(PROGRESS_FILLED).take(filled));
    bar.extend(std::iter::repeat(PROGRESS_EMPTY).take(PROGRESS_WIDTH - filled));
    bar.push(']');
    bar
}

/// Progress bar, percentage, progress label and status text on one line.
pub fn status_line(view: &AppViewModel) -> String {
    let mut line = format!(
        "{} {:>3}%",
        progress_bar(view.progress),
        view.progress_percent
    );
    if !view.progress_label.is_empty() {
        line.push_str(&format!(" {}", view.progress_label));
    }
    if !view.status.is_empty() {
        line.push_str(&format!(" | {}", view.status));
    }
    line
}

/// Renders every card in order. The appendix stays collapsed unless asked for.
pub fn result_lines(result: &ResultView, expand_appendix: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for card in &result.cards {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        card_lines(card, expand_appendix, &mut lines);
    }
    lines
}

fn card_lines(card: &Card, expand_appendix: bool, out: &mut Vec<String>) {
    match card {
        Card::Appendix { json } => {
            if expand_appendix {
                out.push(format!("[-] {}", card.title()));
                out.extend(json.lines().map(|line| format!("    {line}")));
            } else {
                out.push(format!("[+] {} ({APPENDIX_HINT})", card.title()));
            }
            return;
        }
        _ => out.push(heading(card.title())),
    }

    match card {
        Card::Summary { text, warnings } => {
            out.push(text.clone());
            out.extend(warnings.iter().map(|warning| format!("! {warning}")));
        }
        Card::Scores { entries } => {
            let width = entries
                .iter()
                .map(|entry| entry.label.chars().count())
                .max()
                .unwrap_or(0);
            for entry in entries {
                let pad = width - entry.label.chars().count();
                out.push(format!(
                    "  {}{}  {:>3}",
                    entry.label,
                    " ".repeat(pad),
                    entry.value
                ));
            }
        }
        Card::Recommendations { recording, mixing } => {
            out.push(subheading(RECORDING_TITLE));
            numbered(recording, out);
            out.push(subheading(MIXING_TITLE));
            numbered(mixing, out);
        }
        Card::BpmKey {
            bpm,
            bpm_confidence_pct,
            key,
            key_confidence_pct,
            note,
            warning,
        } => {
            out.push(format!(
                "  {BPM_LABEL}: {bpm} ({CONFIDENCE_LABEL} {bpm_confidence_pct}%)"
            ));
            out.push(format!(
                "  {KEY_LABEL}: {key} ({CONFIDENCE_LABEL} {key_confidence_pct}%)"
            ));
            if let Some(note) = note {
                out.push(format!("  {note}"));
            }
            if let Some(warning) = warning {
                out.push(format!("! {warning}"));
            }
        }
        Card::AbCompare {
            loudness_diff,
            true_peak_diff,
            spectral_summary,
            stereo_summary,
            dynamics_summary,
            match_suggestions,
        } => {
            out.push(format!("  {LOUDNESS_DIFF_LABEL}: {loudness_diff}"));
            out.push(format!("  {TRUE_PEAK_DIFF_LABEL}: {true_peak_diff}"));
            out.push(format!("  {SPECTRAL_LABEL}: {spectral_summary}"));
            out.push(format!("  {STEREO_LABEL}: {stereo_summary}"));
            out.push(format!("  {DYNAMICS_LABEL}: {dynamics_summary}"));
            out.push(subheading(MATCH_SUGGESTIONS_TITLE));
            numbered(match_suggestions, out);
        }
        Card::Appendix { .. } => {}
    }
}

fn heading(title: &str) -> String {
    format!("== {title} ==")
}

fn subheading(title: &str) -> String {
    format!("-- {title} --")
}

fn numbered(items: &[String], out: &mut Vec<String>) {
    out.extend(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| format!("  {}. {item}", index + 1)),
    );
}
