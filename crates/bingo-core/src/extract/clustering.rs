use tracing::debug;

use super::{CardStrategy, ExtractOptions, PageContext, StrategyOutcome};
use crate::card::{Card, FREE_CELL, GRID_SIZE, Matrix, find_serial, parse_integer, placeholder};
use crate::cluster::{cluster_axis, nearest_index};

/// Reads one card per page by clustering number positions into a 5×5 grid.
///
/// Pages with no numeric words yield no cards. Pages whose numbers do not
/// form at least five rows and five columns are left to the next strategy.
pub struct ClusteringStrategy;

struct NumericWord {
    value: u32,
    x0: f64,
    top: f64,
}

impl CardStrategy for ClusteringStrategy {
    fn name(&self) -> &'static str {
        "clustering"
    }

    fn extract(&self, ctx: &PageContext<'_>, options: &ExtractOptions) -> StrategyOutcome {
        let numeric: Vec<NumericWord> = ctx
            .page
            .extract_words()
            .iter()
            .filter_map(|w| {
                parse_integer(&w.text).map(|value| NumericWord {
                    value,
                    x0: w.bbox.x0,
                    top: w.bbox.top,
                })
            })
            .collect();
        if numeric.is_empty() {
            return StrategyOutcome::Cards(Vec::new());
        }

        let opts = &options.clusters;
        let xs: Vec<f64> = numeric.iter().map(|w| w.x0).collect();
        let ys: Vec<f64> = numeric.iter().map(|w| w.top).collect();
        let columns = cluster_axis(&xs, opts.x_gap, opts.coarse_x_gap, opts.min_clusters);
        let rows = cluster_axis(&ys, opts.y_gap, opts.coarse_y_gap, opts.min_clusters);
        if columns.len() < opts.min_clusters || rows.len() < opts.min_clusters {
            debug!(
                page = ctx.page_number(),
                columns = columns.len(),
                rows = rows.len(),
                "too few clusters for a grid"
            );
            return StrategyOutcome::NotApplicable;
        }

        let mut matrix: Matrix = [[None; GRID_SIZE]; GRID_SIZE];
        for word in &numeric {
            let (Some(r), Some(c)) = (nearest_index(&rows, word.top), nearest_index(&columns, word.x0))
            else {
                continue;
            };
            if r >= GRID_SIZE || c >= GRID_SIZE || (r, c) == FREE_CELL {
                continue;
            }
            // First writer wins.
            if matrix[r][c].is_none() {
                matrix[r][c] = Some(word.value);
            }
        }

        let serial = find_serial(&ctx.text)
            .map(str::to_string)
            .unwrap_or_else(|| placeholder::auto(ctx.page_number()));
        StrategyOutcome::Cards(vec![Card::new(serial, matrix)])
    }
}
