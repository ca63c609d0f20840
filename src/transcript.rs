use crate::config::Config;
use unicode_normalization::UnicodeNormalization;

/// Cleans a recovered transcript before extraction. Never fails; the caller
/// decides whether an empty result is fatal.
pub fn normalize(cfg: &Config, raw: &str) -> String {
    let mut text = raw.to_string();

    if cfg.transcript.normalize_newlines {
        text = text.replace("\r\n", "\n").replace('\r', "\n");
    }

    if cfg.transcript.normalize_unicode {
        // NFKC folds OCR artefacts such as full-width digits and ligatures.
        text = text.nfkc().collect::<String>();
    }

    if cfg.transcript.strip_control_chars {
        text = strip_control_chars(&text);
    }

    if cfg.transcript.trim_trailing_whitespace {
        text = text
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
    }

    text
}

fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter_map(|ch| match ch {
            '\n' | '\t' => Some(ch),
            // page breaks from PDF extractors
            '\u{000B}' | '\u{000C}' => Some('\n'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// First `max_chars` characters of the transcript, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
