use std::fmt::Write as _;
use std::path::Path;

use bingo::{COLUMN_LETTERS, Card, CardExtractor, FREE_CELL, GRID_SIZE, Pdf};
use tracing::info;

use crate::cli::{OutputFormat, ReadArgs};
use crate::shared::{
    ProgressReporter, csv_escape, extract_options, open_pdf, print_json, resolve_pages,
};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    read: &ReadArgs,
) -> Result<(), i32> {
    let pdf = open_pdf(file, Some(extract_options(read)))?;
    let cards = match pages {
        Some(_) => {
            let page_indices = resolve_pages(pages, pdf.page_count())?;
            cards_from_pages(&pdf, &page_indices)
        }
        None => pdf.extract_cards_parallel(),
    };
    info!(cards = cards.len(), pages = pdf.page_count(), "extraction finished");

    match format {
        OutputFormat::Text => {
            let blocks: Vec<String> = cards.iter().map(format_card).collect();
            print!("{}", blocks.join("\n"));
            Ok(())
        }
        OutputFormat::Json => print_json(&cards),
        OutputFormat::Csv => {
            println!("serial,row,{}", COLUMN_LETTERS.join(","));
            for card in &cards {
                for row in 0..GRID_SIZE {
                    let cells: Vec<String> = (0..GRID_SIZE)
                        .map(|col| card.get(row, col).map(|n| n.to_string()).unwrap_or_default())
                        .collect();
                    println!("{},{},{}", csv_escape(&card.serial), row + 1, cells.join(","));
                }
            }
            Ok(())
        }
    }
}

/// Cards from the selected pages only; unreadable pages are reported and
/// skipped.
fn cards_from_pages(pdf: &Pdf, page_indices: &[usize]) -> Vec<Card> {
    let extractor = CardExtractor::new(pdf.options().clone());
    let progress = ProgressReporter::new(page_indices.len());
    let mut cards = Vec::new();

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        match pdf.page(idx) {
            Ok(page) => cards.extend(extractor.extract_page(&page)),
            Err(e) => eprintln!("Warning: skipping page {}: {e}", idx + 1),
        }
    }

    progress.finish();
    cards
}

/// The card as a small table: serial, column letters, then five rows.
/// Empty cells print as `--`, the center as `FREE`.
pub fn format_card(card: &Card) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.serial);
    for letter in COLUMN_LETTERS {
        let _ = write!(out, "{letter:>5}");
    }
    out.push('\n');
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let cell = match card.get(row, col) {
                Some(n) => n.to_string(),
                None if (row, col) == FREE_CELL => "FREE".to_string(),
                None => "--".to_string(),
            };
            let _ = write!(out, "{cell:>5}");
        }
        out.push('\n');
    }
    out
}
