//! Duplicate detection across a card set.

use std::collections::HashMap;

use crate::card::{Card, Matrix};

/// Cards sharing one matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateGroup {
    pub matrix: Matrix,
    /// Serials of every card with this matrix, in input order.
    pub serials: Vec<String>,
}

/// Summary of duplicate matrices in a card set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateReport {
    /// Number of cards examined.
    pub total: usize,
    /// Number of distinct matrices.
    pub unique: usize,
    /// `total - unique`.
    pub duplicates: usize,
    /// Matrices held by more than one card, in order of first appearance.
    pub duplicated: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates == 0
    }
}

/// Group cards by matrix content. Serials never affect grouping.
pub fn validate_duplicates(cards: &[Card]) -> DuplicateReport {
    let mut index: HashMap<&Matrix, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for card in cards {
        match index.get(&card.matrix) {
            Some(&i) => groups[i].serials.push(card.serial.clone()),
            None => {
                index.insert(&card.matrix, groups.len());
                groups.push(DuplicateGroup {
                    matrix: card.matrix,
                    serials: vec![card.serial.clone()],
                });
            }
        }
    }

    let unique = groups.len();
    DuplicateReport {
        total: cards.len(),
        unique,
        duplicates: cards.len() - unique,
        duplicated: groups.into_iter().filter(|g| g.serials.len() > 1).collect(),
    }
}

/// A card whose own numbers repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InternalRepeat {
    pub serial: String,
    /// Every non-empty number on the card, row-major.
    pub numbers: Vec<u32>,
    /// Values appearing more than once, ascending.
    pub repeated: Vec<u32>,
}

/// Cards containing the same number in more than one cell.
pub fn find_internal_repeats(cards: &[Card]) -> Vec<InternalRepeat> {
    cards
        .iter()
        .filter_map(|card| {
            let repeated = card.internal_duplicates();
            (!repeated.is_empty()).then(|| InternalRepeat {
                serial: card.serial.clone(),
                numbers: card.numbers(),
                repeated,
            })
        })
        .collect()
}
