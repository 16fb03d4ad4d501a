use super::{ratio_or_zero, Economics, SellerStats};
use serde::{Deserialize, Serialize};

/// Platform economics after removing the `sellers_removed` least profitable sellers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRow {
    pub sellers_removed: u64,
    pub sellers_remaining: u64,
    pub revenues: f64,
    pub review_costs: f64,
    pub it_costs: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyHighlights {
    pub baseline: StrategyRow,
    pub max_profit: StrategyRow,
    pub max_margin: StrategyRow,
}

#[derive(Debug, Clone, Copy)]
struct Totals {
    revenues: f64,
    review_costs: f64,
    profits: f64,
    items: f64,
}

impl Totals {
    fn row(&self, removed: u64, remaining: u64, economics: &Economics) -> StrategyRow {
        let it_costs = economics.it_cost(remaining as f64, self.items);
        let net_profit = self.profits - it_costs;
        StrategyRow {
            sellers_removed: removed,
            sellers_remaining: remaining,
            revenues: self.revenues,
            review_costs: self.review_costs,
            it_costs,
            total_costs: self.review_costs + it_costs,
            net_profit,
            margin: ratio_or_zero(net_profit, self.revenues),
        }
    }
}

/// What-if table for pruning sellers from the least profitable up, plus its highlights.
///
/// Row `k` removes the `k` worst sellers. The last seller is never removed, so
/// a table over `n` sellers has `n` rows (one row when there are no sellers).
pub fn prepare_seller_strategy_data(
    sellers: &[SellerStats],
    economics: &Economics,
) -> (Vec<StrategyRow>, StrategyHighlights) {
    let mut sorted: Vec<&SellerStats> = sellers.iter().collect();
    // stable, so equally profitable sellers leave in table order
    sorted.sort_by(|a, b| a.profits.total_cmp(&b.profits));
    let n_sellers = sorted.len() as u64;

    let mut totals = Totals {
        revenues: sellers.iter().map(|s| s.revenues).sum(),
        review_costs: sellers.iter().map(|s| s.cost_of_reviews).sum(),
        profits: sellers.iter().map(|s| s.profits).sum(),
        items: sellers.iter().map(|s| s.quantity as f64).sum(),
    };

    let mut rows = Vec::with_capacity(sorted.len().max(1));
    rows.push(totals.row(0, n_sellers, economics));

    for (idx, seller) in sorted.iter().take(sorted.len().saturating_sub(1)).enumerate() {
        totals.revenues -= seller.revenues;
        totals.review_costs -= seller.cost_of_reviews;
        totals.profits -= seller.profits;
        totals.items -= seller.quantity as f64;
        let removed = idx as u64 + 1;
        rows.push(totals.row(removed, n_sellers - removed, economics));
    }

    let highlights = highlights(&rows);
    (rows, highlights)
}

/// First row with the greatest value of `key`.
fn first_max<F>(rows: &[StrategyRow], key: F) -> StrategyRow
where
    F: Fn(&StrategyRow) -> f64,
{
    let mut best: Option<&StrategyRow> = None;
    for row in rows {
        if best.map_or(true, |b| key(row) > key(b)) {
            best = Some(row);
        }
    }
    best.cloned().unwrap_or_default()
}

fn highlights(rows: &[StrategyRow]) -> StrategyHighlights {
    StrategyHighlights {
        baseline: rows.first().cloned().unwrap_or_default(),
        max_profit: first_max(rows, |r| r.net_profit),
        max_margin: first_max(rows, |r| r.margin),
    }
}

/// The row for `sellers_removed`, or the closest one when that count is not in the table.
pub fn select_scenario(rows: &[StrategyRow], sellers_removed: u64) -> Option<&StrategyRow> {
    rows.iter()
        .find(|r| r.sellers_removed == sellers_removed)
        .or_else(|| rows.iter().min_by_key(|r| r.sellers_removed.abs_diff(sellers_removed)))
}
