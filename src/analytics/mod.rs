//! Aggregation pipeline turning raw marketplace records into financial metrics.
//!
//! Every transform is a pure function over borrowed tables; nothing here does I/O.

pub mod base;
pub mod category;
pub mod financial;
pub mod monthly;
pub mod seller;
pub mod slider;
pub mod state;
pub mod strategy;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use base::{prepare_base_frames, BaseFrames};
pub use category::{compute_category_profitability, CategoryProfit};
pub use financial::{build_waterfall, compute_financial_overview, FinancialOverview, WaterfallStep};
pub use monthly::{compute_monthly_metrics, MonthlyMetric, MonthlyMetrics};
pub use seller::{compute_seller_table, SellerStats};
pub use slider::SliderConfig;
pub use state::{compute_state_metrics, CustomerSpotlight, StateMetrics};
pub use strategy::{prepare_seller_strategy_data, StrategyHighlights, StrategyRow};

/// Business assumptions behind every revenue and cost figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Economics {
    pub commission_rate: f64,  // platform cut of the item price
    pub subscription_fee: f64, // BRL per seller per month
    pub alpha_it: f64,         // IT cost per sqrt(seller)
    pub beta_it: f64,          // IT cost per sqrt(item)
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            commission_rate: 0.10,
            subscription_fee: 80.0,
            alpha_it: 3157.27,
            beta_it: 978.23,
        }
    }
}

impl Economics {
    /// Cost attributed to a review, in BRL. Scores outside 1..=5 carry no cost.
    pub fn reputation_cost(&self, review_score: i64) -> Option<f64> {
        match review_score {
            1 => Some(100.0),
            2 => Some(50.0),
            3 => Some(40.0),
            4 | 5 => Some(0.0),
            _ => None,
        }
    }

    /// IT costs grow with the square root of both sellers and items.
    pub fn it_cost(&self, seller_count: f64, item_count: f64) -> f64 {
        self.alpha_it * seller_count.sqrt() + self.beta_it * item_count.sqrt()
    }

    pub fn commission(&self, gross_sales: f64) -> f64 {
        gross_sales * self.commission_rate
    }
}

/// First day of the timestamp's month.
pub fn month_start(ts: &NaiveDateTime) -> NaiveDate {
    let date = ts.date();
    date.with_day(1).unwrap_or(date)
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Running mean over values that may be missing.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
pub(crate) mod test_data {
    //! Small hand-built dataset shared by the pipeline tests.
    use crate::models::*;
    use chrono::NaiveDateTime;

    pub fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    pub fn order(id: &str, customer: &str, status: &str, purchased: &str) -> Order {
        Order {
            order_id: id.into(),
            customer_id: customer.into(),
            order_status: status.into(),
            order_purchase_timestamp: ts(purchased),
            order_approved_at: Some(ts(purchased)),
            order_delivered_carrier_date: None,
            order_delivered_customer_date: None,
            order_estimated_delivery_date: None,
        }
    }

    pub fn item(order_id: &str, n: i64, product: &str, seller: &str, price: f64, freight: f64) -> OrderItem {
        OrderItem {
            order_id: order_id.into(),
            order_item_id: n,
            product_id: product.into(),
            seller_id: seller.into(),
            shipping_limit_date: None,
            price,
            freight_value: freight,
        }
    }

    pub fn review(id: &str, order_id: &str, score: Option<i64>) -> Review {
        Review {
            review_id: id.into(),
            order_id: order_id.into(),
            review_score: score,
        }
    }

    pub fn customer(id: &str, state: &str) -> Customer {
        Customer {
            customer_id: id.into(),
            customer_unique_id: format!("u-{id}"),
            customer_zip_code_prefix: "01000".into(),
            customer_city: "sao paulo".into(),
            customer_state: state.into(),
        }
    }

    /// Three delivered orders over two months, one canceled order.
    ///
    /// * o1 (2017-01, SP): p1 by s1 at 100 + p2 by s2 at 50, review 1 star
    /// * o2 (2017-01, RJ): p1 by s1 at 200, review 5 stars
    /// * o3 (2017-02, SP): p3 by s2 at 40, review 3 stars
    /// * o4 (2017-02, SP): canceled, p1 by s1 at 999
    pub fn dataset() -> Dataset {
        let mut o1 = order("o1", "c1", "delivered", "2017-01-05 10:00:00");
        o1.order_delivered_customer_date = Some(ts("2017-01-20 12:00:00"));
        o1.order_estimated_delivery_date = Some(ts("2017-01-15 00:00:00"));
        let mut o2 = order("o2", "c2", "delivered", "2017-01-25 09:00:00");
        o2.order_delivered_customer_date = Some(ts("2017-02-01 08:00:00"));
        o2.order_estimated_delivery_date = Some(ts("2017-02-05 00:00:00"));
        let o3 = order("o3", "c3", "delivered", "2017-02-10 15:30:00");
        let o4 = order("o4", "c4", "canceled", "2017-02-11 15:30:00");

        Dataset {
            orders: vec![o1, o2, o3, o4],
            order_items: vec![
                item("o1", 1, "p1", "s1", 100.0, 10.0),
                item("o1", 2, "p2", "s2", 50.0, 5.0),
                item("o2", 1, "p1", "s1", 200.0, 20.0),
                item("o3", 1, "p3", "s2", 40.0, 8.0),
                item("o4", 1, "p1", "s1", 999.0, 1.0),
            ],
            reviews: vec![
                review("r1", "o1", Some(1)),
                review("r2", "o2", Some(5)),
                review("r3", "o3", Some(3)),
                review("r4", "o4", Some(1)),
            ],
            products: vec![
                Product {
                    product_id: "p1".into(),
                    product_category_name: Some("beleza_saude".into()),
                },
                Product {
                    product_id: "p2".into(),
                    product_category_name: Some("brinquedos".into()),
                },
                Product {
                    product_id: "p3".into(),
                    product_category_name: None,
                },
            ],
            category_translations: vec![CategoryTranslation {
                product_category_name: "beleza_saude".into(),
                product_category_name_english: "health_beauty".into(),
            }],
            customers: vec![
                customer("c1", "SP"),
                customer("c2", "RJ"),
                customer("c3", "SP"),
                customer("c4", "SP"),
            ],
            sellers: vec![
                Seller {
                    seller_id: "s1".into(),
                    seller_zip_code_prefix: "13000".into(),
                    seller_city: "campinas".into(),
                    seller_state: "SP".into(),
                },
                Seller {
                    seller_id: "s2".into(),
                    seller_zip_code_prefix: "20000".into(),
                    seller_city: "rio de janeiro".into(),
                    seller_state: "RJ".into(),
                },
            ],
        }
    }
}
