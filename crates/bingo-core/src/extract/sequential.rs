use std::sync::LazyLock;

use regex::Regex;

use super::{CardStrategy, ExtractOptions, PageContext, StrategyOutcome};
use crate::card::{Card, GRID_SIZE, find_serials, placeholder, serial_number};

/// Whole-word integers in page text.
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("valid number regex"));

const CARD_VALUES: usize = GRID_SIZE * GRID_SIZE - 1;

/// Reads the page text as a stream of numbers, 24 per card.
///
/// The integer printed inside the first serial is dropped once so it does
/// not shift the grid. Always applicable; leftovers short of a full card are
/// discarded.
pub struct SequentialStrategy;

impl CardStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn extract(&self, ctx: &PageContext<'_>, _options: &ExtractOptions) -> StrategyOutcome {
        // A number too large for a cell still takes its slot, as an empty cell.
        let mut numbers: Vec<Option<u32>> = NUMBER
            .find_iter(&ctx.text)
            .map(|m| m.as_str().parse().ok())
            .collect();
        let serials = find_serials(&ctx.text);

        if let Some(n) = serials.first().and_then(|s| serial_number(s)) {
            if let Some(pos) = numbers.iter().position(|&v| v == Some(n)) {
                numbers.remove(pos);
            }
        }

        let cards = numbers
            .chunks_exact(CARD_VALUES)
            .enumerate()
            .map(|(i, group)| {
                let serial = serials
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| placeholder::sequential(ctx.page_number(), i + 1));
                Card::from_cells(serial, group.iter().copied())
            })
            .collect();
        StrategyOutcome::Cards(cards)
    }
}
