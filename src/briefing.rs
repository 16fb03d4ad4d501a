//! Narrative built on top of the numbers: KPI cards, insights and the action plan.

use crate::analytics::StrategyRow;
use crate::dashboard::DashboardData;
use crate::utils::format::{format_brl, format_category_name, format_count, format_percent, join_with_and};
use serde::{Deserialize, Serialize};

/// Pages of the briefing, in reading order.
pub const NAV_ITEMS: [(&str, &str); 5] = [
    ("Executive Overview", "/"),
    ("Revenue Drivers", "/drivers"),
    ("Customer Trust", "/customers"),
    ("Seller Strategy", "/strategy"),
    ("CEO Next Moves", "/actions"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
}

impl KpiCard {
    fn new(title: &str, value: String, subtitle: String) -> Self {
        KpiCard {
            title: title.to_string(),
            value,
            subtitle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
    pub seller_count: u64,
    pub item_count: u64,
    pub navigation: Vec<NavItem>,
}

pub fn header(data: &DashboardData) -> Header {
    let fin = &data.financial_overview;
    Header {
        title: "Olist Growth Briefing".to_string(),
        subtitle: format!(
            "{} sellers • {} items delivered",
            format_count(fin.seller_count),
            format_count(fin.item_count)
        ),
        seller_count: fin.seller_count,
        item_count: fin.item_count,
        navigation: NAV_ITEMS
            .iter()
            .map(|(label, path)| NavItem {
                label: label.to_string(),
                path: path.to_string(),
            })
            .collect(),
    }
}

/// KPI cards and the two-line insight under the waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewInsight {
    pub kpis: Vec<KpiCard>,
    pub dominant_stream: String,
    pub insights: Vec<String>,
}

pub fn overview_insight(data: &DashboardData) -> OverviewInsight {
    let fin = &data.financial_overview;
    let (dominant_stream, dominant, other) = if fin.revenues_sales >= fin.revenues_subscription {
        ("Sales fees", fin.revenues_sales, fin.revenues_subscription)
    } else {
        ("Subscriptions", fin.revenues_subscription, fin.revenues_sales)
    };

    OverviewInsight {
        kpis: vec![
            KpiCard::new(
                "Total revenue",
                format_brl(fin.revenues_total),
                "Cumulative over the dataset period".to_string(),
            ),
            KpiCard::new(
                "Net profit",
                format_brl(fin.profits_net),
                "After reputation and IT costs".to_string(),
            ),
            KpiCard::new("Net margin", format_percent(fin.margin), "Net profit / revenue".to_string()),
            KpiCard::new(
                "Active sellers",
                format_count(fin.seller_count),
                "Onboarded during the period".to_string(),
            ),
        ],
        dominant_stream: dominant_stream.to_string(),
        insights: vec![
            format!(
                "{dominant_stream} now contribute {}, compared with {} from the complementary stream.",
                format_brl(dominant),
                format_brl(other)
            ),
            format!(
                "Reputation costs eroded {} of earnings, underscoring the need to keep delivery promises tight.",
                format_brl(fin.costs_reviews)
            ),
        ],
    }
}

pub fn revenue_trend_text(change: f64) -> String {
    if change > 0.0 {
        format!("▲ {} vs. last month", format_brl(change.abs()))
    } else if change < 0.0 {
        format!("▼ {} vs. last month", format_brl(change.abs()))
    } else {
        "Flat vs. last month".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub key_numbers: Vec<KpiCard>,
    pub recommendations: Vec<String>,
}

pub fn action_plan(data: &DashboardData) -> ActionPlan {
    let highlights = &data.strategy_highlights;
    let baseline = &highlights.baseline;
    let profit = &highlights.max_profit;
    let margin = &highlights.max_margin;
    let trend = revenue_trend_text(data.net_revenue_change);

    let key_numbers = vec![
        KpiCard::new(
            "Latest monthly net revenue",
            format_brl(data.latest_net_revenue),
            trend.clone(),
        ),
        KpiCard::new(
            "Profit uplift on table",
            format_brl(data.profit_uplift),
            format!("Remove {} low performers", format_count(profit.sellers_removed)),
        ),
        KpiCard::new(
            "Lean margin scenario",
            format_percent(margin.margin),
            if data.margin_uplift >= 0.0 {
                format!(
                    "Margin would move from {} to {}",
                    format_percent(baseline.margin),
                    format_percent(margin.margin)
                )
            } else {
                format!("Margin would decline by {}", format_percent(data.margin_uplift.abs()))
            },
        ),
    ];

    let mut recommendations = vec![format!(
        "Keep revenue momentum: {} in the latest month ({trend}). Lock the growth calendar with \
         marketing and CRM leads before discussing trade-offs.",
        format_brl(data.latest_net_revenue)
    )];

    let spotlight = &data.customer_spotlight;
    if let (Some(worst), Some(best)) = (&spotlight.worst_delay, &spotlight.best_delay) {
        recommendations.push(format!(
            "Stabilize delivery promise in {} (currently +{:.1} days) by applying the playbook from {} (at {:.1} days).",
            worst.customer_state_name, worst.avg_delay, best.customer_state_name, best.avg_delay
        ));
    }

    let labels: Vec<String> = data
        .top_category_names
        .iter()
        .map(|name| format_category_name(name))
        .collect();
    let categories = join_with_and(&labels).unwrap_or_else(|| "key categories".to_string());
    recommendations.push(format!(
        "Double down on hero categories: {categories} deliver {} net profit after reputation costs. \
         Align merchandising, paid media, and supply ops on this shortlist.",
        format_brl(data.top_category_profit)
    ));

    let profit_phrase = if data.profit_uplift >= 0.0 {
        format!("unlocks {} incremental profit", format_brl(data.profit_uplift))
    } else {
        format!("reduces profit by {}", format_brl(data.profit_uplift.abs()))
    };
    recommendations.push(format!(
        "Initiate the pruning plan: removing {} underperforming sellers {profit_phrase} while keeping {} partners engaged.",
        format_count(profit.sellers_removed),
        format_count(profit.sellers_remaining)
    ));

    if let Some(best) = &spotlight.best_review {
        recommendations.push(format!(
            "Amplify promoters: {} averages {:.2}★. Capture the CX rituals there and export them to the delayed states.",
            best.customer_state_name, best.avg_review
        ));
    }

    ActionPlan {
        key_numbers,
        recommendations,
    }
}

/// Talking points for one pruning scenario next to the two optimal ones.
pub fn scenario_summary(selected: &StrategyRow, data: &DashboardData) -> Vec<String> {
    let profit = &data.strategy_highlights.max_profit;
    let margin = &data.strategy_highlights.max_margin;
    vec![
        format!("Scenario: remove {} sellers", format_count(selected.sellers_removed)),
        format!("Net profit: {}", format_brl(selected.net_profit)),
        format!("Revenue retained: {}", format_brl(selected.revenues)),
        format!("Total costs: {}", format_brl(selected.total_costs)),
        format!("Remaining sellers: {}", format_count(selected.sellers_remaining)),
        format!("Net margin: {}", format_percent(selected.margin)),
        format!(
            "Profit-max: remove {} sellers → {} net profit.",
            format_count(profit.sellers_removed),
            format_brl(profit.net_profit)
        ),
        format!(
            "Margin-max: remove {} sellers → margin {}.",
            format_count(margin.sellers_removed),
            format_percent(margin.margin)
        ),
    ]
}
