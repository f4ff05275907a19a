//! Shared helpers for document rendering.

use chrono::{Datelike, NaiveDate};

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Format a date the French way (e.g., "17 octobre 2026").
pub fn format_french_date(date: NaiveDate) -> String {
    let month = FRENCH_MONTHS[(date.month0() as usize).min(FRENCH_MONTHS.len() - 1)];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let trimmed = result.trim_matches('-');
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.to_string()
}

/// Build a Typst document from plain text. Each line becomes a string literal
/// so user content is never interpreted as markup; empty lines separate
/// paragraphs.
pub fn build_typst_source(title: &str, content: &str, date_label: &str) -> String {
    let mut source = String::new();
    source.push_str("#set page(paper: \"a4\", margin: 2.5cm)\n");
    source.push_str("#set text(size: 11pt, lang: \"fr\")\n\n");
    source.push_str(&format!(
        "#align(center)[#text(size: 16pt, weight: \"bold\")[#\"{}\"]]\n\n",
        escape_typst_string(title)
    ));

    for line in content.lines() {
        if line.trim().is_empty() {
            source.push('\n');
        } else {
            source.push_str(&format!("#\"{}\" \\\n", escape_typst_string(line)));
        }
    }

    source.push_str(&format!(
        "\n#v(1fr)\n#align(right)[#text(size: 9pt)[#\"Généré le {}\"]]\n",
        escape_typst_string(date_label)
    ));
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_french_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert_eq!(format_french_date(date), "1 août 2026");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("  Contrat de Bail  ", "doc"), "contrat-de-bail");
        assert_eq!(sanitize_filename("Attestation_(v2)", "doc"), "attestation-v2");
        assert_eq!(sanitize_filename("é-è", "doc"), "doc");
    }

    #[test]
    fn test_typst_source_escapes_markup() {
        let source = build_typst_source("Bail", "Loyer: 500 # \"net\"\n\n= pas un titre", "1 août 2026");
        assert!(source.contains(r#"#"Loyer: 500 # \"net\"" \"#));
        assert!(source.contains(r#"#"= pas un titre" \"#));
        assert!(source.contains("Généré le 1 août 2026"));
    }
}
