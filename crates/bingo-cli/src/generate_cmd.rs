use std::path::{Path, PathBuf};

use bingo::{Card, ExtractOptions, GenerationSession, RenderOptions, render_cards};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::shared::load_cards;

pub struct GenerateArgs<'a> {
    pub count: usize,
    pub output: &'a Path,
    pub title: &'a str,
    pub start: u32,
    pub seed: Option<u64>,
    pub existing: &'a [PathBuf],
    pub json: Option<&'a Path>,
}

pub fn run(args: &GenerateArgs<'_>) -> Result<(), i32> {
    let mut issued = Vec::new();
    for file in args.existing {
        issued.extend(load_cards(file, &ExtractOptions::default())?);
    }

    let mut session = GenerationSession::starting_at(args.start).with_existing(&issued);
    info!(
        existing = issued.len(),
        first = session.next_serial().as_deref().unwrap_or("none"),
        "generating {} cards",
        args.count
    );
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let cards = session.generate(&mut rng, args.count);
    if cards.len() < args.count {
        eprintln!(
            "Error: only {} of {} cards could be generated without repeating a card or passing CARD99999",
            cards.len(),
            args.count
        );
        return Err(1);
    }

    let options = RenderOptions {
        title: args.title.to_string(),
        ..RenderOptions::default()
    };
    let pdf = render_cards(&cards, &options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    write_file(args.output, &pdf)?;

    if let Some(path) = args.json {
        let json = serde_json::to_vec_pretty(&cards).map_err(|e| {
            eprintln!("Error: failed to serialize cards: {e}");
            1
        })?;
        write_file(path, &json)?;
    }

    println!("{}", summary(&cards, args.output));
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), i32> {
    std::fs::write(path, bytes).map_err(|e| {
        eprintln!("Error: cannot write {}: {e}", path.display());
        1
    })
}

fn summary(cards: &[Card], output: &Path) -> String {
    match (cards.first(), cards.last()) {
        (Some(first), Some(last)) => format!(
            "Wrote {} cards ({}..{}) to {}",
            cards.len(),
            first.serial,
            last.serial,
            output.display()
        ),
        _ => format!("Wrote 0 cards to {}", output.display()),
    }
}
