use super::{ratio_or_zero, BaseFrames, Economics};
use crate::models::{CategoryTranslation, Product};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Commission earned and reputation cost absorbed by one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfit {
    pub product_category: String,
    pub gross_sales: f64,
    pub reputation_cost: f64, // share of order costs allocated by price
    pub order_count: u64,
    pub olist_commission: f64,
    pub net_profit: f64,
}

/// A category row ready for the top-N chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    #[serde(flatten)]
    pub category: CategoryProfit,
    pub profit_margin: f64,
}

#[derive(Default)]
struct CategoryAccumulator<'a> {
    gross_sales: f64,
    reputation_cost: f64,
    orders: HashSet<&'a str>,
}

/// English name of a category, the raw name when untranslated, `Unknown` when absent.
fn resolve_category(
    product_id: &str,
    products: &HashMap<&str, Option<&str>>,
    translations: &HashMap<&str, &str>,
) -> String {
    match products.get(product_id).copied().flatten() {
        Some(raw) => translations.get(raw).copied().unwrap_or(raw).to_string(),
        None => UNKNOWN_CATEGORY.to_string(),
    }
}

pub fn compute_category_profitability(
    base: &BaseFrames<'_>,
    products: &[Product],
    translations: &[CategoryTranslation],
    economics: &Economics,
) -> Vec<CategoryProfit> {
    let products: HashMap<&str, Option<&str>> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p.product_category_name.as_deref()))
        .collect();
    let translations: HashMap<&str, &str> = translations
        .iter()
        .map(|t| {
            (
                t.product_category_name.as_str(),
                t.product_category_name_english.as_str(),
            )
        })
        .collect();

    let mut order_price_total: HashMap<&str, f64> = HashMap::new();
    for item in &base.delivered_items {
        *order_price_total.entry(item.order_id.as_str()).or_default() += item.price;
    }

    let mut categories: HashMap<String, CategoryAccumulator<'_>> = HashMap::new();
    for item in &base.delivered_items {
        let order_id = item.order_id.as_str();
        let total = order_price_total.get(order_id).copied().unwrap_or(0.0);
        let price_share = ratio_or_zero(item.price, total);
        let allocated = price_share * base.cost_of(order_id);

        let category = resolve_category(&item.product_id, &products, &translations);
        let acc = categories.entry(category).or_default();
        acc.gross_sales += item.price;
        acc.reputation_cost += allocated;
        acc.orders.insert(order_id);
    }

    let mut rows: Vec<CategoryProfit> = categories
        .into_iter()
        .map(|(product_category, acc)| {
            let olist_commission = economics.commission(acc.gross_sales);
            CategoryProfit {
                product_category,
                gross_sales: acc.gross_sales,
                reputation_cost: acc.reputation_cost,
                order_count: acc.orders.len() as u64,
                olist_commission,
                net_profit: olist_commission - acc.reputation_cost,
            }
        })
        .collect();

    rank_by_net_profit(&mut rows);
    rows
}

/// Most profitable first, ties broken by category name.
fn rank_by_net_profit(rows: &mut [CategoryProfit]) {
    rows.sort_by(|a, b| {
        b.net_profit
            .total_cmp(&a.net_profit)
            .then_with(|| a.product_category.cmp(&b.product_category))
    });
}

/// The `top_n` most profitable categories, best first. `top_n` is at least 1.
pub fn top_categories(rows: &[CategoryProfit], top_n: usize) -> Vec<RankedCategory> {
    rows.iter()
        .take(top_n.max(1))
        .map(|row| RankedCategory {
            profit_margin: ratio_or_zero(row.net_profit, row.olist_commission),
            category: row.clone(),
        })
        .collect()
}

/// Upper bound of the top-N slider, between 5 and 20.
pub fn category_slider_max(category_count: usize) -> usize {
    category_count.min(20).max(5)
}
