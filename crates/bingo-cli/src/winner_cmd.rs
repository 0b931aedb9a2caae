use std::path::Path;

use bingo::{Card, CardProgress, GRID_SIZE, MarkState, RenderOptions, progress, render_winner};
use tracing::info;

use crate::cli::{ReadArgs, ReportFormat};
use crate::shared::{extract_options, load_cards, print_json};

pub struct WinnerArgs<'a> {
    pub file: &'a Path,
    pub called: &'a [u32],
    pub winners_only: bool,
    pub pdf: Option<&'a Path>,
    pub title: &'a str,
    pub format: &'a ReportFormat,
    pub read: &'a ReadArgs,
}

pub fn run(args: &WinnerArgs<'_>) -> Result<(), i32> {
    let cards = load_cards(args.file, &extract_options(args.read))?;
    let mut ranked = progress(&cards, args.called);

    if let Some(out) = args.pdf {
        write_winner(&cards, &ranked, args, out)?;
    }

    if args.winners_only {
        ranked.retain(|p| p.line);
    }

    match args.format {
        ReportFormat::Text => {
            println!("serial\thits\tline\tfull");
            for line in ranked.iter().map(format_row) {
                println!("{line}");
            }
            Ok(())
        }
        ReportFormat::Json => print_json(&ranked),
    }
}

/// Render the best-ranked card with a completed line to `out`.
fn write_winner(
    cards: &[Card],
    ranked: &[CardProgress],
    args: &WinnerArgs<'_>,
    out: &Path,
) -> Result<(), i32> {
    let Some(card) = top_winner(cards, ranked) else {
        eprintln!("Error: no card has a completed line");
        return Err(1);
    };
    let marks = MarkState::from_called(card, args.called.iter().copied());
    let options = RenderOptions {
        title: args.title.to_string(),
        ..RenderOptions::default()
    };
    let bytes = render_winner(card, &marks, &options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    std::fs::write(out, bytes).map_err(|e| {
        eprintln!("Error: cannot write {}: {e}", out.display());
        1
    })?;
    info!(serial = %card.serial, out = %out.display(), "winner card written");
    Ok(())
}

fn top_winner<'a>(cards: &'a [Card], ranked: &[CardProgress]) -> Option<&'a Card> {
    let best = ranked.iter().find(|p| p.line)?;
    cards.iter().find(|c| c.serial == best.serial)
}

fn format_row(p: &CardProgress) -> String {
    let flag = |set: bool| if set { "yes" } else { "no" };
    format!(
        "{}\t{}/{}\t{}\t{}",
        p.serial,
        p.hits,
        GRID_SIZE * GRID_SIZE,
        flag(p.line),
        flag(p.full)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_shows_hits_out_of_twenty_five() {
        let p = CardProgress {
            serial: "CARD00002".to_string(),
            hits: 6,
            line: true,
            full: false,
        };
        assert_eq!(format_row(&p), "CARD00002\t6/25\tyes\tno");
    }

    #[test]
    fn top_winner_skips_cards_without_a_line() {
        let cards = [
            Card::from_row_major("CARD00001", &(1..=24).collect::<Vec<u32>>()),
            Card::from_row_major("CARD00002", &(31..=54).collect::<Vec<u32>>()),
        ];
        let row: Vec<u32> = (31..=35).collect();
        let ranked = progress(&cards, &row);
        assert_eq!(top_winner(&cards, &ranked).map(|c| c.serial.as_str()), Some("CARD00002"));

        let ranked = progress(&cards, &[1, 2]);
        assert!(top_winner(&cards, &ranked).is_none());
    }
}
