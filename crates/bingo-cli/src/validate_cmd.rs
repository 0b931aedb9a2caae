use std::path::PathBuf;

use bingo::{Card, DuplicateReport, InternalRepeat, find_internal_repeats, validate_duplicates};
use serde_json::json;

use crate::cli::{ReadArgs, ReportFormat};
use crate::shared::{extract_options, load_cards, print_json};

/// Everything `validate` reports about a card set.
struct Findings {
    report: DuplicateReport,
    repeats: Vec<InternalRepeat>,
    incomplete: Vec<String>,
}

impl Findings {
    fn collect(cards: &[Card]) -> Self {
        Self {
            report: validate_duplicates(cards),
            repeats: find_internal_repeats(cards),
            incomplete: cards
                .iter()
                .filter(|c| !c.is_complete())
                .map(|c| c.serial.clone())
                .collect(),
        }
    }

    fn has_problems(&self) -> bool {
        !self.report.is_clean() || !self.repeats.is_empty()
    }
}

pub fn run(
    files: &[PathBuf],
    format: &ReportFormat,
    strict: bool,
    read: &ReadArgs,
) -> Result<(), i32> {
    let options = extract_options(read);
    let mut cards = Vec::new();
    for file in files {
        cards.extend(load_cards(file, &options)?);
    }

    let findings = Findings::collect(&cards);
    match format {
        ReportFormat::Text => print!("{}", format_text(&findings)),
        ReportFormat::Json => print_json(&json!({
            "total": findings.report.total,
            "unique": findings.report.unique,
            "duplicates": findings.report.duplicates,
            "duplicated": findings.report.duplicated,
            "internal_repeats": findings.repeats,
            "incomplete": findings.incomplete,
        }))?,
    }

    if strict && findings.has_problems() {
        return Err(2);
    }
    Ok(())
}

fn format_text(findings: &Findings) -> String {
    let report = &findings.report;
    let mut out = format!(
        "Total cards: {}\nUnique: {}\nDuplicates: {}\n",
        report.total, report.unique, report.duplicates
    );
    for group in &report.duplicated {
        out.push_str(&format!("  same grid: {}\n", group.serials.join(", ")));
    }
    for repeat in &findings.repeats {
        let numbers: Vec<String> = repeat.repeated.iter().map(u32::to_string).collect();
        out.push_str(&format!(
            "Repeated numbers on {}: {}\n",
            repeat.serial,
            numbers.join(", ")
        ));
    }
    if !findings.incomplete.is_empty() {
        out.push_str(&format!(
            "Incomplete cards: {}\n",
            findings.incomplete.join(", ")
        ));
    }
    out.push_str(if findings.has_problems() {
        "Result: problems found\n"
    } else {
        "Result: OK\n"
    });
    out
}
