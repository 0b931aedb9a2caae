use std::path::Path;

use bingo::{ExtractOptions, PageSource, Pdf, WordOptions};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::shared::{ProgressReporter, csv_escape, open_pdf, print_json, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    x_tolerance: f64,
    y_tolerance: f64,
) -> Result<(), i32> {
    let options = ExtractOptions {
        words: WordOptions {
            x_tolerance,
            y_tolerance,
            ..WordOptions::default()
        },
        ..ExtractOptions::default()
    };
    let pdf = open_pdf(file, Some(options))?;
    let page_indices = resolve_pages(pages, pdf.page_count())?;
    let progress = ProgressReporter::new(page_indices.len());

    match format {
        OutputFormat::Text => {
            println!("page\ttext\tx0\ttop\tx1\tbottom");
            for_each_word(&pdf, &page_indices, &progress, |page, w| {
                println!(
                    "{page}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    w.text, w.bbox.x0, w.bbox.top, w.bbox.x1, w.bbox.bottom
                );
            })
        }
        OutputFormat::Csv => {
            println!("page,text,x0,top,x1,bottom");
            for_each_word(&pdf, &page_indices, &progress, |page, w| {
                println!(
                    "{page},{},{:.2},{:.2},{:.2},{:.2}",
                    csv_escape(&w.text),
                    w.bbox.x0,
                    w.bbox.top,
                    w.bbox.x1,
                    w.bbox.bottom
                );
            })
        }
        OutputFormat::Json => {
            let mut all_words = Vec::new();
            for_each_word(&pdf, &page_indices, &progress, |page, w| {
                all_words.push(json!({
                    "page": page,
                    "text": w.text,
                    "x0": w.bbox.x0,
                    "top": w.bbox.top,
                    "x1": w.bbox.x1,
                    "bottom": w.bbox.bottom,
                }));
            })?;
            print_json(&all_words)
        }
    }
}

/// Call `f` with the 1-based page number and each word of the selected pages.
fn for_each_word(
    pdf: &Pdf,
    page_indices: &[usize],
    progress: &ProgressReporter,
    mut f: impl FnMut(usize, &bingo::Word),
) -> Result<(), i32> {
    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        for word in &page.extract_words() {
            f(idx + 1, word);
        }
    }

    progress.finish();
    Ok(())
}
