//! Random card generation with per-session uniqueness.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::card::{
    Card, FREE_CELL, GRID_SIZE, MAX_SERIAL, Matrix, column_range, format_serial, is_serial,
    serial_number,
};

/// Retries per card before giving up.
const MAX_ATTEMPTS_PER_CARD: usize = 10_000;

/// Draw a random valid matrix: five distinct values per column range, free
/// center.
pub fn generate_matrix<R: Rng + ?Sized>(rng: &mut R) -> Matrix {
    let mut matrix: Matrix = [[None; GRID_SIZE]; GRID_SIZE];
    for col in 0..GRID_SIZE {
        let pool: Vec<u32> = column_range(col).collect();
        for (row, value) in pool.choose_multiple(rng, GRID_SIZE).enumerate() {
            matrix[row][col] = Some(*value);
        }
    }
    matrix[FREE_CELL.0][FREE_CELL.1] = None;
    matrix
}

/// Generates cards that are unique within the session.
///
/// The session remembers every matrix it produced (plus any it was seeded
/// with) and numbers serials consecutively.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    seen: HashSet<Matrix>,
    next_serial: u32,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSession {
    /// Empty session; the first serial is `CARD00001`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Empty session whose first serial is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self {
            seen: HashSet::new(),
            next_serial: first,
        }
    }

    /// Treat `cards` as already issued: their matrices are avoided and
    /// serial numbering continues after the highest printed serial.
    pub fn with_existing<'a>(mut self, cards: impl IntoIterator<Item = &'a Card>) -> Self {
        for card in cards {
            self.seen.insert(card.matrix);
            let number = serial_number(&card.serial).filter(|_| is_serial(&card.serial));
            if let Some(n) = number.filter(|n| *n >= self.next_serial) {
                self.next_serial = n.saturating_add(1);
            }
        }
        self
    }

    /// Number of distinct matrices known to the session.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Serial the next card will get, or `None` once serials are used up.
    pub fn next_serial(&self) -> Option<String> {
        format_serial(self.next_serial)
    }

    /// One new card, or `None` if serials past `CARD99999` would be needed
    /// or no unseen matrix turned up within the retry bound.
    pub fn generate_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        let Some(serial) = format_serial(self.next_serial) else {
            warn!(max = MAX_SERIAL, "serial numbers exhausted");
            return None;
        };
        for attempt in 0..MAX_ATTEMPTS_PER_CARD {
            let matrix = generate_matrix(rng);
            if self.seen.insert(matrix) {
                if attempt > 0 {
                    debug!(attempt, "regenerated colliding matrix");
                }
                self.next_serial = self.next_serial.saturating_add(1);
                return Some(Card::new(serial, matrix));
            }
        }
        warn!(seen = self.seen.len(), "no unseen matrix found");
        None
    }

    /// Up to `count` new cards; stops early when serials run out or the
    /// retry bound is hit.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(count);
        for _ in 0..count {
            match self.generate_card(rng) {
                Some(card) => cards.push(card),
                None => break,
            }
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::validate_duplicates;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_matrices_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let card = Card::new("CARD00001", generate_matrix(&mut rng));
            assert_eq!(card.matrix[2][2], None);
            assert!(card.is_valid(), "invalid card: {:?}", card.matrix);
        }
    }

    #[test]
    fn session_cards_are_unique_and_numbered() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session = GenerationSession::new();
        let cards = session.generate(&mut rng, 100);
        assert_eq!(cards.len(), 100);
        assert_eq!(cards[0].serial, "CARD00001");
        assert_eq!(cards[99].serial, "CARD00100");
        assert_eq!(session.seen_count(), 100);
        assert!(validate_duplicates(&cards).is_clean());
    }

    #[test]
    fn existing_cards_continue_numbering() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = GenerationSession::new().generate(&mut rng, 3);
        let mut session = GenerationSession::new().with_existing(&first);
        assert_eq!(session.next_serial().as_deref(), Some("CARD00004"));
        let more = session.generate(&mut rng, 2);
        assert_eq!(more[0].serial, "CARD00004");
        let mut all = first.clone();
        all.extend(more);
        assert!(validate_duplicates(&all).is_clean());
    }

    #[test]
    fn serials_stop_at_five_digits() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = GenerationSession::starting_at(MAX_SERIAL);
        let cards = session.generate(&mut rng, 2);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].serial, "CARD99999");
        assert_eq!(session.next_serial(), None);
        assert!(session.generate_card(&mut rng).is_none());
    }

    #[test]
    fn existing_last_serial_exhausts_session() {
        let card = Card::from_row_major("CARD99999", &[1; 24]);
        let mut session = GenerationSession::new().with_existing([&card]);
        assert_eq!(session.next_serial(), None);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(session.generate(&mut rng, 3).is_empty());
    }

    #[test]
    fn placeholder_serials_do_not_move_numbering() {
        let card = Card::from_row_major("PAGE1_SEQ9", &[1; 24]);
        let session = GenerationSession::starting_at(5).with_existing([&card]);
        assert_eq!(session.next_serial().as_deref(), Some("CARD00005"));
        assert_eq!(session.seen_count(), 1);
    }
}
