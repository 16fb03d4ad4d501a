use super::{ratio_or_zero, Economics, SellerStats};
use crate::utils::format::format_brl;
use serde::{Deserialize, Serialize};

/// Full-period profit and loss of the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverview {
    pub revenues_sales: f64,
    pub revenues_subscription: f64,
    pub revenues_total: f64,
    pub costs_reviews: f64,
    pub costs_it: f64,
    pub profits_gross: f64,
    pub profits_net: f64,
    pub margin: f64,
    pub seller_count: u64,
    pub item_count: u64,
}

pub fn compute_financial_overview(sellers: &[SellerStats], economics: &Economics) -> FinancialOverview {
    let sales: f64 = sellers.iter().map(|s| s.sales).sum();
    let months: f64 = sellers.iter().map(|s| s.months_on_olist).sum();
    let revenues_total: f64 = sellers.iter().map(|s| s.revenues).sum();
    let costs_reviews: f64 = sellers.iter().map(|s| s.cost_of_reviews).sum();
    let profits_gross: f64 = sellers.iter().map(|s| s.profits).sum();
    let seller_count = sellers.len() as u64;
    let item_count: u64 = sellers.iter().map(|s| s.quantity).sum();

    let costs_it = economics.it_cost(seller_count as f64, item_count as f64);
    let profits_net = profits_gross - costs_it;

    FinancialOverview {
        revenues_sales: economics.commission(sales),
        revenues_subscription: months * economics.subscription_fee,
        revenues_total,
        costs_reviews,
        costs_it,
        profits_gross,
        profits_net,
        margin: ratio_or_zero(profits_net, revenues_total),
        seller_count,
        item_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Relative, // moves the running total
    Total,    // shows the running total
}

/// One bar of the profit and loss waterfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub label: String,
    pub measure: Measure,
    pub value: f64, // 0 for totals, the chart computes them
    pub text: String,
}

fn step(label: &str, measure: Measure, value: f64, shown: f64) -> WaterfallStep {
    WaterfallStep {
        label: label.to_string(),
        measure,
        value,
        text: format_brl(shown),
    }
}

/// Revenues flow down through review and IT costs to net profit.
pub fn build_waterfall(overview: &FinancialOverview) -> Vec<WaterfallStep> {
    use Measure::{Relative, Total};
    vec![
        step("Subscriptions", Relative, overview.revenues_subscription, overview.revenues_subscription),
        step("Sales fees", Relative, overview.revenues_sales, overview.revenues_sales),
        step("Total revenues", Total, 0.0, overview.revenues_total),
        step("Review costs", Relative, -overview.costs_reviews, -overview.costs_reviews),
        step("Gross profit", Total, 0.0, overview.profits_gross),
        step("IT costs", Relative, -overview.costs_it, -overview.costs_it),
        step("Net profit", Total, 0.0, overview.profits_net),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{compute_seller_table, prepare_base_frames, test_data};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn overview() -> FinancialOverview {
        let data = test_data::dataset();
        let eco = Economics::default();
        let base = prepare_base_frames(&data, &eco);
        let sellers = compute_seller_table(&base, &data.sellers, &data.reviews, &eco);
        compute_financial_overview(&sellers, &eco)
    }

    #[test]
    fn sums_seller_economics_and_charges_it_costs() {
        let fin = overview();
        assert!(close(fin.revenues_sales, 39.0));
        assert!(close(fin.revenues_subscription, 160.0));
        assert!(close(fin.revenues_total, 199.0));
        assert!(close(fin.costs_reviews, 240.0));
        assert!(close(fin.profits_gross, -41.0));
        assert_eq!(fin.seller_count, 2);
        assert_eq!(fin.item_count, 4);

        let it = 3157.27 * 2f64.sqrt() + 978.23 * 2.0;
        assert!(close(fin.costs_it, it));
        assert!(close(fin.profits_net, -41.0 - it));
        assert!(close(fin.margin, (-41.0 - it) / 199.0));
    }

    #[test]
    fn no_sellers_means_no_margin() {
        let fin = compute_financial_overview(&[], &Economics::default());
        assert_eq!(fin.seller_count, 0);
        assert_eq!(fin.costs_it, 0.0);
        assert_eq!(fin.margin, 0.0);
    }

    #[test]
    fn waterfall_walks_from_revenue_to_net_profit() {
        let fin = overview();
        let steps = build_waterfall(&fin);
        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Subscriptions",
                "Sales fees",
                "Total revenues",
                "Review costs",
                "Gross profit",
                "IT costs",
                "Net profit"
            ]
        );
        assert_eq!(steps[2].measure, Measure::Total);
        assert_eq!(steps[2].value, 0.0);
        assert_eq!(steps[2].text, "199 BRL");
        assert!(close(steps[3].value, -240.0));
        assert_eq!(steps[3].text, "-240 BRL");

        let relative: f64 = steps
            .iter()
            .filter(|s| s.measure == Measure::Relative)
            .map(|s| s.value)
            .sum();
        assert!(close(relative, fin.profits_net));
    }
}
