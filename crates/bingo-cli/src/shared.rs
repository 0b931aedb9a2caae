use std::io::{self, IsTerminal, Write};
use std::path::Path;

use bingo::{Card, ExtractOptions, LETTER, Pdf};
use tracing::debug;

use crate::cli::ReadArgs;
use crate::page_range::parse_page_range;

/// Extraction options for the `--assume-layout` / `--max-depth` flags.
pub fn extract_options(read: &ReadArgs) -> ExtractOptions {
    ExtractOptions {
        expected_page_size: read.assume_layout.then_some(LETTER),
        assume_layout: read.assume_layout,
        max_recursion_depth: read.max_depth,
        ..ExtractOptions::default()
    }
}

/// Open a PDF, printing the reason to stderr and returning exit code 1 on
/// failure.
pub fn open_pdf(file: &Path, options: Option<ExtractOptions>) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file, options).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Load cards from a `.json` file written by `generate --json` or
/// `extract --format json`, or extract them from a PDF.
pub fn load_cards(file: &Path, options: &ExtractOptions) -> Result<Vec<Card>, i32> {
    let is_json = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        let pdf = open_pdf(file, Some(options.clone()))?;
        let cards = pdf.extract_cards_parallel();
        debug!(file = %file.display(), cards = cards.len(), "cards extracted");
        return Ok(cards);
    }

    let bytes = std::fs::read(file).map_err(|e| {
        eprintln!("Error: cannot read {}: {e}", file.display());
        1
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        eprintln!("Error: {} is not a JSON card list: {e}", file.display());
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json(value: &impl serde::Serialize) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}

/// Quote a CSV field when it holds a comma, quote or newline.
pub fn csv_escape(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// "Reading page N/M" on stderr while a command walks pages. Silent unless
/// stderr is a terminal.
pub struct ProgressReporter {
    total: usize,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            enabled: total > 1 && io::stderr().is_terminal(),
        }
    }

    /// `current` is 1-based.
    pub fn report(&self, current: usize) {
        self.draw(&format!("Reading page {current}/{}", self.total));
    }

    pub fn finish(&self) {
        self.draw("");
    }

    fn draw(&self, line: &str) {
        if self.enabled {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "\r{line:<40}\r{line}");
            let _ = stderr.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_cases() {
        assert_eq!(csv_escape("CARD00001"), "CARD00001");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape(""), "");
    }

    #[test]
    fn open_pdf_file_not_found() {
        let result = open_pdf(Path::new("/nonexistent/file.pdf"), None);
        assert_eq!(result.err(), Some(1));
    }

    #[test]
    fn resolve_pages_defaults_to_all() {
        assert_eq!(resolve_pages(None, 3).unwrap(), [0, 1, 2]);
        assert_eq!(resolve_pages(Some("1,3"), 5).unwrap(), [0, 2]);
        assert_eq!(resolve_pages(Some("0"), 5).unwrap_err(), 1);
    }

    #[test]
    fn assume_layout_sets_letter_size() {
        let read = ReadArgs {
            assume_layout: true,
            max_depth: 3,
        };
        let options = extract_options(&read);
        assert_eq!(options.expected_page_size, Some(LETTER));
        assert!(options.assume_layout);
        assert_eq!(options.max_recursion_depth, 3);

        let plain = extract_options(&ReadArgs {
            assume_layout: false,
            max_depth: 10,
        });
        assert_eq!(plain.expected_page_size, None);
        assert!(!plain.assume_layout);
    }

    #[test]
    fn load_cards_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let card = Card::from_row_major("CARD00003", &(1..=24).collect::<Vec<u32>>());
        std::fs::write(&path, serde_json::to_vec(&[&card]).unwrap()).unwrap();

        let cards = load_cards(&path, &ExtractOptions::default()).unwrap();
        assert_eq!(cards, [card]);
    }

    #[test]
    fn load_cards_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, b"{\"not\": \"cards\"}").unwrap();
        assert_eq!(load_cards(&path, &ExtractOptions::default()), Err(1));
    }
}
