use super::{BaseFrames, Economics, Mean};
use crate::models::{Customer, Order, Review};
use crate::utils::regions::state_name;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Number of states shown when the minimum-orders filter leaves nothing.
const FALLBACK_STATE_COUNT: usize = 10;

/// Delivery reliability and satisfaction for customers of one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMetrics {
    pub customer_state: String,
    pub customer_state_name: String,
    pub avg_delay: f64, // days late versus the estimate, negative when early
    pub avg_review: f64,
    pub order_count: u64,
    pub olist_commission: f64,
}

/// States worth calling out on the customer trust page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSpotlight {
    pub worst_delay: Option<StateMetrics>,
    pub best_delay: Option<StateMetrics>,
    pub best_review: Option<StateMetrics>,
}

/// Whole days between delivery and the estimate, rounded down.
fn delivery_delay_days(order: &Order) -> Option<i64> {
    let delivered: NaiveDateTime = order.order_delivered_customer_date?;
    let estimated: NaiveDateTime = order.order_estimated_delivery_date?;
    Some((delivered - estimated).num_seconds().div_euclid(86_400))
}

#[derive(Default)]
struct StateAccumulator {
    delay: Mean,
    review: Mean,
    order_count: u64,
    olist_commission: f64,
}

pub fn compute_state_metrics(
    base: &BaseFrames<'_>,
    customers: &[Customer],
    reviews: &[Review],
    economics: &Economics,
) -> Vec<StateMetrics> {
    let mut order_sales: HashMap<&str, f64> = HashMap::new();
    for item in &base.delivered_items {
        *order_sales.entry(item.order_id.as_str()).or_default() += item.price;
    }

    let mut customer_state: HashMap<&str, &str> = HashMap::new();
    for customer in customers {
        customer_state
            .entry(customer.customer_id.as_str())
            .or_insert(customer.customer_state.as_str());
    }

    let mut order_review: HashMap<&str, Mean> = HashMap::new();
    for review in reviews {
        if let Some(score) = review.review_score {
            order_review
                .entry(review.order_id.as_str())
                .or_default()
                .push(score as f64);
        }
    }

    let mut states: BTreeMap<&str, StateAccumulator> = BTreeMap::new();
    for order in &base.delivered_orders {
        let Some(&state) = customer_state.get(order.customer_id.as_str()) else {
            continue;
        };
        let gross_sales = order_sales.get(order.order_id.as_str()).copied().unwrap_or(0.0);

        let acc = states.entry(state).or_default();
        acc.delay.push(delivery_delay_days(order).unwrap_or(0) as f64);
        if let Some(review) = order_review.get(order.order_id.as_str()).and_then(Mean::value) {
            acc.review.push(review);
        }
        acc.order_count += 1;
        acc.olist_commission += economics.commission(gross_sales);
    }

    let mut rows: Vec<StateMetrics> = states
        .into_iter()
        .filter_map(|(state, acc)| {
            // a state nobody reviewed has nothing to say about satisfaction
            let avg_review = acc.review.value()?;
            Some(StateMetrics {
                customer_state: state.to_string(),
                customer_state_name: state_name(state),
                avg_delay: acc.delay.value().unwrap_or(0.0),
                avg_review,
                order_count: acc.order_count,
                olist_commission: acc.olist_commission,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.customer_state.cmp(&b.customer_state))
    });
    rows
}

/// States with at least `min_orders` orders, or the busiest ten when none qualify.
pub fn filter_by_min_orders(rows: &[StateMetrics], min_orders: u64) -> Vec<StateMetrics> {
    let filtered: Vec<StateMetrics> = rows
        .iter()
        .filter(|row| row.order_count >= min_orders)
        .cloned()
        .collect();
    if !filtered.is_empty() {
        return filtered;
    }
    let mut busiest = rows.to_vec();
    busiest.sort_by(|a, b| b.order_count.cmp(&a.order_count));
    busiest.truncate(FALLBACK_STATE_COUNT);
    busiest
}

/// First row holding the extreme value, in table order.
fn pick<F>(rows: &[StateMetrics], key: F, want: Ordering) -> Option<StateMetrics>
where
    F: Fn(&StateMetrics) -> f64,
{
    let mut best: Option<&StateMetrics> = None;
    for row in rows {
        match best {
            None => best = Some(row),
            Some(current) => {
                if key(row).partial_cmp(&key(current)) == Some(want) {
                    best = Some(row);
                }
            }
        }
    }
    best.cloned()
}

pub fn customer_spotlight(rows: &[StateMetrics]) -> CustomerSpotlight {
    CustomerSpotlight {
        worst_delay: pick(rows, |r| r.avg_delay, Ordering::Greater),
        best_delay: pick(rows, |r| r.avg_delay, Ordering::Less),
        best_review: pick(rows, |r| r.avg_review, Ordering::Greater),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{prepare_base_frames, test_data};
    use crate::models::Dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table(data: &Dataset) -> Vec<StateMetrics> {
        let eco = Economics::default();
        let base = prepare_base_frames(data, &eco);
        compute_state_metrics(&base, &data.customers, &data.reviews, &eco)
    }

    #[test]
    fn aggregates_delay_review_and_commission_per_state() {
        let rows = table(&test_data::dataset());
        assert_eq!(rows.len(), 2);

        let sp = &rows[0];
        assert_eq!(sp.customer_state, "SP");
        assert_eq!(sp.customer_state_name, "São Paulo");
        assert_eq!(sp.order_count, 2);
        // o1 is 5.5 days late, o3 has no delivery dates
        assert!(close(sp.avg_delay, 2.5));
        assert!(close(sp.avg_review, 2.0));
        assert!(close(sp.olist_commission, 19.0));

        let rj = &rows[1];
        assert_eq!(rj.customer_state, "RJ");
        // 3 days 16 hours early floors to -4
        assert!(close(rj.avg_delay, -4.0));
        assert!(close(rj.avg_review, 5.0));
        assert!(close(rj.olist_commission, 20.0));
    }

    #[test]
    fn unreviewed_states_and_unknown_customers_are_dropped() {
        let mut data = test_data::dataset();
        data.customers.push(test_data::customer("c9", "AM"));
        data.orders
            .push(test_data::order("o9", "c9", "delivered", "2017-02-01 00:00:00"));
        data.orders
            .push(test_data::order("o10", "ghost", "delivered", "2017-02-01 00:00:00"));
        data.reviews.push(test_data::review("r10", "o10", Some(5)));

        let rows = table(&data);
        let states: Vec<&str> = rows.iter().map(|r| r.customer_state.as_str()).collect();
        assert_eq!(states, vec!["SP", "RJ"]);
    }

    #[test]
    fn equal_order_counts_sort_by_state_code() {
        let mut data = test_data::dataset();
        data.customers.push(test_data::customer("c8", "AC"));
        data.orders
            .push(test_data::order("o8", "c8", "delivered", "2017-02-03 00:00:00"));
        data.order_items.push(test_data::item("o8", 1, "p1", "s1", 10.0, 1.0));
        data.reviews.push(test_data::review("r8", "o8", Some(4)));

        let rows = table(&data);
        let states: Vec<&str> = rows.iter().map(|r| r.customer_state.as_str()).collect();
        assert_eq!(states, vec!["SP", "AC", "RJ"]);
    }

    #[test]
    fn min_orders_filter_falls_back_to_busiest_states() {
        let rows = table(&test_data::dataset());
        assert_eq!(filter_by_min_orders(&rows, 2).len(), 1);
        assert_eq!(filter_by_min_orders(&rows, 0).len(), 2);
        let fallback = filter_by_min_orders(&rows, 500);
        assert_eq!(fallback.len(), 2);
        assert_eq!(fallback[0].customer_state, "SP");
    }

    #[test]
    fn spotlight_picks_extremes() {
        let rows = table(&test_data::dataset());
        let spotlight = customer_spotlight(&rows);
        assert_eq!(spotlight.worst_delay.unwrap().customer_state, "SP");
        assert_eq!(spotlight.best_delay.unwrap().customer_state, "RJ");
        assert_eq!(spotlight.best_review.unwrap().customer_state, "RJ");

        let empty = customer_spotlight(&[]);
        assert!(empty.worst_delay.is_none());
        assert!(empty.best_delay.is_none());
        assert!(empty.best_review.is_none());
    }
}
