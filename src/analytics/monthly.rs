use super::{month_start, BaseFrames, Economics};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Revenue streams and reputation drag for one purchase month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    pub month: NaiveDate, // first day of the month
    pub gross_sales: f64,
    pub freight: f64,
    pub active_sellers: u64,
    pub gmv: f64,
    pub olist_commission: f64,
    pub subscription_revenue: f64,
    pub olist_revenue: f64,
    pub reputation_cost: f64,
    pub net_revenue: f64,
}

/// The monthly series a reader can toggle on the revenue trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyMetric {
    NetRevenue,
    OlistRevenue,
    ReputationCost,
    Gmv,
}

impl MonthlyMetric {
    pub const ALL: [MonthlyMetric; 4] = [
        MonthlyMetric::NetRevenue,
        MonthlyMetric::OlistRevenue,
        MonthlyMetric::ReputationCost,
        MonthlyMetric::Gmv,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MonthlyMetric::NetRevenue => "net_revenue",
            MonthlyMetric::OlistRevenue => "olist_revenue",
            MonthlyMetric::ReputationCost => "reputation_cost",
            MonthlyMetric::Gmv => "gmv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MonthlyMetric::NetRevenue => "Net revenue after reputation cost",
            MonthlyMetric::OlistRevenue => "Total platform revenue",
            MonthlyMetric::ReputationCost => "Reputation costs",
            MonthlyMetric::Gmv => "Total marketplace sales",
        }
    }

    pub fn value(self, row: &MonthlyMetrics) -> f64 {
        match self {
            MonthlyMetric::NetRevenue => row.net_revenue,
            MonthlyMetric::OlistRevenue => row.olist_revenue,
            MonthlyMetric::ReputationCost => row.reputation_cost,
            MonthlyMetric::Gmv => row.gmv,
        }
    }

    /// Everything but GMV, which dwarfs the platform's own revenue.
    pub fn default_selection() -> Vec<MonthlyMetric> {
        Self::ALL.into_iter().filter(|m| *m != MonthlyMetric::Gmv).collect()
    }
}

impl fmt::Display for MonthlyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown monthly metric `{}`", self.0)
    }
}

impl FromStr for MonthlyMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// A checklist entry: machine key plus the label shown to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOption {
    pub label: String,
    pub value: String,
}

pub fn metric_options() -> Vec<MetricOption> {
    MonthlyMetric::ALL
        .into_iter()
        .map(|m| MetricOption {
            label: m.label().to_string(),
            value: m.key().to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub month: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric: MonthlyMetric,
    pub label: String,
    pub points: Vec<MetricPoint>,
}

/// One series per selected metric. An empty selection shows net revenue alone.
pub fn select_series(monthly: &[MonthlyMetrics], selected: &[MonthlyMetric]) -> Vec<MetricSeries> {
    let selected = if selected.is_empty() {
        &[MonthlyMetric::NetRevenue][..]
    } else {
        selected
    };
    selected
        .iter()
        .map(|&metric| MetricSeries {
            metric,
            label: metric.label().to_string(),
            points: monthly
                .iter()
                .map(|row| MetricPoint {
                    month: row.month,
                    value: metric.value(row),
                })
                .collect(),
        })
        .collect()
}

#[derive(Default)]
struct MonthAccumulator<'a> {
    gross_sales: f64,
    freight: f64,
    sellers: HashSet<&'a str>,
}

pub fn compute_monthly_metrics(base: &BaseFrames<'_>, economics: &Economics) -> Vec<MonthlyMetrics> {
    let purchase_month: HashMap<&str, NaiveDate> = base
        .delivered_orders
        .iter()
        .map(|o| (o.order_id.as_str(), month_start(&o.order_purchase_timestamp)))
        .collect();

    let mut months: BTreeMap<NaiveDate, MonthAccumulator<'_>> = BTreeMap::new();
    for item in &base.delivered_items {
        let Some(&month) = purchase_month.get(item.order_id.as_str()) else {
            continue;
        };
        let acc = months.entry(month).or_default();
        acc.gross_sales += item.price;
        acc.freight += item.freight_value;
        acc.sellers.insert(item.seller_id.as_str());
    }

    // Costs are charged on every delivered order, with or without items
    let mut monthly_cost: HashMap<NaiveDate, f64> = HashMap::new();
    for order in &base.delivered_orders {
        let month = month_start(&order.order_purchase_timestamp);
        *monthly_cost.entry(month).or_default() += base.cost_of(&order.order_id);
    }

    months
        .into_iter()
        .map(|(month, acc)| {
            let active_sellers = acc.sellers.len() as u64;
            let olist_commission = economics.commission(acc.gross_sales);
            let subscription_revenue = active_sellers as f64 * economics.subscription_fee;
            let olist_revenue = olist_commission + subscription_revenue;
            let reputation_cost = monthly_cost.get(&month).copied().unwrap_or(0.0);
            MonthlyMetrics {
                month,
                gross_sales: acc.gross_sales,
                freight: acc.freight,
                active_sellers,
                gmv: acc.gross_sales + acc.freight,
                olist_commission,
                subscription_revenue,
                olist_revenue,
                reputation_cost,
                net_revenue: olist_revenue - reputation_cost,
            }
        })
        .collect()
}
