use std::path::Path;

use bingo::PageSource;
use serde_json::json;

use crate::cli::ReportFormat;
use crate::shared::{ProgressReporter, open_pdf, print_json, resolve_pages};

pub fn run(file: &Path, pages: Option<&str>, format: &ReportFormat) -> Result<(), i32> {
    let pdf = open_pdf(file, None)?;
    let page_indices = resolve_pages(pages, pdf.page_count())?;
    let progress = ProgressReporter::new(page_indices.len());

    let mut texts = Vec::with_capacity(page_indices.len());
    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        texts.push((idx + 1, page.extract_text()));
    }
    progress.finish();

    match format {
        ReportFormat::Text => {
            for (page, text) in &texts {
                println!("--- Page {page} ---");
                println!("{text}");
            }
            Ok(())
        }
        ReportFormat::Json => {
            let pages: Vec<_> = texts
                .iter()
                .map(|(page, text)| json!({ "page": page, "text": text }))
                .collect();
            print_json(&pages)
        }
    }
}
