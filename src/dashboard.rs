//! The immutable payload behind every page, computed once at start-up.

use crate::analytics::category::category_slider_max;
use crate::analytics::monthly::{metric_options, MetricOption};
use crate::analytics::state::customer_spotlight;
use crate::analytics::*;
use crate::error::Result;
use crate::loader::{load_dataset, DataSource};
use crate::models::Dataset;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Default of the state filter, in orders.
const STATE_DEFAULT_MIN_ORDERS: u64 = 500;
/// Categories named in the hero-category recommendation.
const HERO_CATEGORY_COUNT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub economics: Economics,
    pub financial_overview: FinancialOverview,
    pub waterfall: Vec<WaterfallStep>,
    pub monthly_metrics: Vec<MonthlyMetrics>,
    pub monthly_metric_options: Vec<MetricOption>,
    pub category_profitability: Vec<CategoryProfit>,
    pub category_slider_max: usize,
    pub state_metrics: Vec<StateMetrics>,
    pub state_slider: SliderConfig,
    pub customer_spotlight: CustomerSpotlight,
    pub sellers: Vec<SellerStats>,
    pub strategy: Vec<StrategyRow>,
    pub strategy_highlights: StrategyHighlights,
    pub strategy_slider: SliderConfig,
    pub top_category_names: Vec<String>,
    pub top_category_profit: f64,
    pub latest_net_revenue: f64,
    pub net_revenue_change: f64, // versus the previous month
    pub profit_uplift: f64,
    pub margin_uplift: f64,
}

impl DashboardData {
    /// Run the whole pipeline over `dataset`.
    pub fn from_dataset(dataset: &Dataset, economics: Economics) -> Self {
        let started = Instant::now();
        let base = prepare_base_frames(dataset, &economics);

        let monthly_metrics = compute_monthly_metrics(&base, &economics);
        let category_profitability = compute_category_profitability(
            &base,
            &dataset.products,
            &dataset.category_translations,
            &economics,
        );
        let state_metrics = compute_state_metrics(&base, &dataset.customers, &dataset.reviews, &economics);

        let sellers = compute_seller_table(&base, &dataset.sellers, &dataset.reviews, &economics);
        let financial_overview = compute_financial_overview(&sellers, &economics);
        let waterfall = build_waterfall(&financial_overview);
        let (strategy, strategy_highlights) = prepare_seller_strategy_data(&sellers, &economics);

        let max_state_orders = state_metrics.iter().map(|s| s.order_count).max().unwrap_or(0);
        let state_slider = SliderConfig::new(
            max_state_orders,
            STATE_DEFAULT_MIN_ORDERS.min(max_state_orders),
        );

        let strategy_max = strategy.iter().map(|r| r.sellers_removed).max().unwrap_or(0);
        let strategy_default = if strategy_max > 0 {
            strategy_highlights.max_profit.sellers_removed
        } else {
            0
        };
        let strategy_slider = SliderConfig::new(strategy_max, strategy_default);

        let top = &category_profitability[..HERO_CATEGORY_COUNT.min(category_profitability.len())];
        let top_category_names: Vec<String> = top.iter().map(|c| c.product_category.clone()).collect();
        let top_category_profit: f64 = top.iter().map(|c| c.net_profit).sum();

        let (latest_net_revenue, net_revenue_change) = match monthly_metrics.as_slice() {
            [.., previous, last] => (last.net_revenue, last.net_revenue - previous.net_revenue),
            [only] => (only.net_revenue, 0.0),
            [] => (0.0, 0.0),
        };

        let profit_uplift =
            strategy_highlights.max_profit.net_profit - strategy_highlights.baseline.net_profit;
        let margin_uplift = strategy_highlights.max_margin.margin - strategy_highlights.baseline.margin;

        info!(
            months = monthly_metrics.len(),
            categories = category_profitability.len(),
            states = state_metrics.len(),
            sellers = sellers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard data computed"
        );

        DashboardData {
            economics,
            financial_overview,
            waterfall,
            monthly_metrics,
            monthly_metric_options: metric_options(),
            category_slider_max: category_slider_max(category_profitability.len()),
            category_profitability,
            state_slider,
            customer_spotlight: customer_spotlight(&state_metrics),
            state_metrics,
            sellers,
            strategy,
            strategy_highlights,
            strategy_slider,
            top_category_names,
            top_category_profit,
            latest_net_revenue,
            net_revenue_change,
            profit_uplift,
            margin_uplift,
        }
    }
}

/// Load the dataset behind `source` and compute the payload from it.
pub async fn load_dashboard_data(source: &DataSource, economics: Economics) -> Result<DashboardData> {
    let dataset = load_dataset(source).await?;
    Ok(DashboardData::from_dataset(&dataset, economics))
}
