//! Card extraction from page text.
//!
//! Each page runs through an ordered chain of [`CardStrategy`] values. The
//! first strategy that declares itself applicable decides the page's cards,
//! even when it finds none. The default chain is structured layout
//! reading, then position clustering, then sequential number reading.

mod clustering;
mod sequential;
mod structured;

pub use clustering::ClusteringStrategy;
pub use sequential::SequentialStrategy;
pub use structured::StructuredStrategy;

use tracing::debug;

use crate::card::Card;
use crate::cluster::ClusterOptions;
use crate::layout::{LayoutOptions, PageLayout};
use crate::page::PageSource;
use crate::words::WordOptions;

/// Options controlling card extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Margins of the printed layout.
    pub layout: LayoutOptions,
    /// Gap thresholds for the clustering fallback.
    pub clusters: ClusterOptions,
    /// When set, only pages of this size (within `page_size_tolerance`) are
    /// read with the structured layout; other pages fall through to the
    /// fallbacks.
    pub expected_page_size: Option<(f64, f64)>,
    /// Tolerance in points for `expected_page_size`.
    pub page_size_tolerance: f64,
    /// Character grouping used when building page text.
    pub words: WordOptions,
    /// Maximum nesting of Form XObjects followed while reading page text.
    pub max_recursion_depth: usize,
    /// Read pages with the structured layout even without a `BINGO`/`CARD`
    /// marker. `expected_page_size` still applies.
    pub assume_layout: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            clusters: ClusterOptions::default(),
            expected_page_size: None,
            page_size_tolerance: 1.0,
            words: WordOptions::default(),
            max_recursion_depth: 10,
            assume_layout: false,
        }
    }
}

impl ExtractOptions {
    /// Layout for a page of the given size, if the page can hold one.
    pub fn page_layout(&self, width: f64, height: f64) -> Option<PageLayout> {
        PageLayout::new(width, height, &self.layout)
    }

    /// True when `expected_page_size` is set and matches.
    pub fn matches_expected_size(&self, width: f64, height: f64) -> bool {
        self.expected_page_size.is_some_and(|(w, h)| {
            (w - width).abs() <= self.page_size_tolerance
                && (h - height).abs() <= self.page_size_tolerance
        })
    }

    /// True when an expected page size is configured and this page differs.
    pub fn rejects_page_size(&self, width: f64, height: f64) -> bool {
        self.expected_page_size.is_some() && !self.matches_expected_size(width, height)
    }
}

/// A page plus its full text, computed once and shared by the strategies.
pub struct PageContext<'a> {
    pub page: &'a dyn PageSource,
    pub text: String,
}

impl<'a> PageContext<'a> {
    pub fn new(page: &'a dyn PageSource) -> Self {
        let text = page.extract_text();
        Self { page, text }
    }

    /// 1-based page number.
    pub fn page_number(&self) -> usize {
        self.page.page_number()
    }
}

/// Result of running one strategy on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// The page does not fit this strategy; try the next one.
    NotApplicable,
    /// The strategy owns this page. The list may be empty.
    Cards(Vec<Card>),
}

/// One way of reading cards off a page.
pub trait CardStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn extract(&self, page: &PageContext<'_>, options: &ExtractOptions) -> StrategyOutcome;
}

/// Structured, then clustering, then sequential.
pub fn default_strategies() -> Vec<Box<dyn CardStrategy>> {
    vec![
        Box::new(StructuredStrategy),
        Box::new(ClusteringStrategy),
        Box::new(SequentialStrategy),
    ]
}

/// Runs a strategy chain over pages.
pub struct CardExtractor {
    strategies: Vec<Box<dyn CardStrategy>>,
    options: ExtractOptions,
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl CardExtractor {
    /// Extractor with the default strategy chain.
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_strategies(default_strategies(), options)
    }

    /// Extractor with a custom chain.
    pub fn with_strategies(strategies: Vec<Box<dyn CardStrategy>>, options: ExtractOptions) -> Self {
        Self {
            strategies,
            options,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Cards found on one page. Empty when no strategy applies.
    pub fn extract_page(&self, page: &dyn PageSource) -> Vec<Card> {
        let ctx = PageContext::new(page);
        for strategy in &self.strategies {
            match strategy.extract(&ctx, &self.options) {
                StrategyOutcome::NotApplicable => continue,
                StrategyOutcome::Cards(cards) => {
                    debug!(
                        page = ctx.page_number(),
                        strategy = strategy.name(),
                        cards = cards.len(),
                        "page extracted"
                    );
                    return cards;
                }
            }
        }
        debug!(page = ctx.page_number(), "no strategy applied");
        Vec::new()
    }

    /// Cards from every page, concatenated in page order.
    pub fn extract_pages<P: PageSource>(&self, pages: &[P]) -> Vec<Card> {
        pages.iter().flat_map(|p| self.extract_page(p)).collect()
    }
}

/// Extract cards from `pages` with the default chain.
pub fn extract_cards<P: PageSource>(pages: &[P], options: &ExtractOptions) -> Vec<Card> {
    CardExtractor::new(options.clone()).extract_pages(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::test_support::page;

    struct Fixed(StrategyOutcome);

    impl CardStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _: &PageContext<'_>, _: &ExtractOptions) -> StrategyOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn first_applicable_strategy_wins() {
        let card = Card::from_row_major("CARD00001", &[1; 24]);
        let extractor = CardExtractor::with_strategies(
            vec![
                Box::new(Fixed(StrategyOutcome::NotApplicable)),
                Box::new(Fixed(StrategyOutcome::Cards(vec![card.clone()]))),
                Box::new(Fixed(StrategyOutcome::Cards(vec![card.clone(), card.clone()]))),
            ],
            ExtractOptions::default(),
        );
        let p = page(0, 612.0, 792.0, &[]);
        assert_eq!(extractor.extract_page(&p), vec![card]);
    }

    #[test]
    fn applicable_empty_result_stops_the_chain() {
        let card = Card::from_row_major("CARD00001", &[1; 24]);
        let extractor = CardExtractor::with_strategies(
            vec![
                Box::new(Fixed(StrategyOutcome::Cards(Vec::new()))),
                Box::new(Fixed(StrategyOutcome::Cards(vec![card]))),
            ],
            ExtractOptions::default(),
        );
        assert!(extractor.extract_page(&page(0, 612.0, 792.0, &[])).is_empty());
    }

    #[test]
    fn no_strategies_yields_nothing() {
        let extractor = CardExtractor::with_strategies(Vec::new(), ExtractOptions::default());
        assert!(extractor.extract_page(&page(0, 612.0, 792.0, &[])).is_empty());
    }

    #[test]
    fn expected_size_matching() {
        let options = ExtractOptions {
            expected_page_size: Some((612.0, 792.0)),
            ..ExtractOptions::default()
        };
        assert!(options.matches_expected_size(612.4, 791.8));
        assert!(!options.matches_expected_size(595.0, 842.0));
        assert!(!ExtractOptions::default().matches_expected_size(612.0, 792.0));

        assert!(!options.rejects_page_size(612.0, 792.0));
        assert!(options.rejects_page_size(595.0, 842.0));
        assert!(!ExtractOptions::default().rejects_page_size(595.0, 842.0));
    }

    #[test]
    fn pages_concatenate_in_order() {
        let a = page(0, 612.0, 792.0, &[("CARD00001", 10.0, 10.0)]);
        let b = page(1, 612.0, 792.0, &[]);
        let numbers: String = (1..=24).map(|n| format!("{n} ")).collect();
        let c = page(2, 612.0, 792.0, &[(numbers.trim(), 10.0, 10.0)]);
        let cards = extract_cards(&[a, b, c], &ExtractOptions::default());
        // Page 1 triggers the structured reader (4 empty cards), page 2 has
        // nothing, page 3 is one line of numbers.
        assert_eq!(cards.len(), 5);
        assert!(cards[..4].iter().all(|c| c.serial == "CARD00001"));
        assert_eq!(cards[4].numbers().len(), 24);
    }
}
