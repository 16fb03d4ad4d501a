use super::{ratio_or_zero, BaseFrames, Economics, Mean};
use crate::models::{Order, Review, Seller};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Average Gregorian month, in days.
const DAYS_PER_MONTH: f64 = 30.436875;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Activity, service quality and economics of one seller over delivered orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerStats {
    pub seller_id: String,
    pub seller_city: Option<String>,
    pub seller_state: Option<String>,
    pub delay_to_carrier: f64, // days past the shipping limit, averaged over items
    pub wait_time: f64,        // days from purchase to delivery, averaged over orders
    pub date_first_sale: NaiveDateTime,
    pub date_last_sale: NaiveDateTime,
    pub months_on_olist: f64,
    pub share_of_one_stars: f64,
    pub share_of_five_stars: f64,
    pub review_score: Option<f64>,
    pub cost_of_reviews: f64,
    pub n_orders: u64,
    pub quantity: u64,
    pub quantity_per_order: f64,
    pub sales: f64,
    pub revenues: f64,
    pub profits: f64,
}

fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

struct SellerAccumulator<'a> {
    orders: HashSet<&'a str>,
    quantity: u64,
    sales: f64,
    carrier_delay: Mean,
}

pub fn compute_seller_table(
    base: &BaseFrames<'_>,
    sellers: &[Seller],
    reviews: &[Review],
    economics: &Economics,
) -> Vec<SellerStats> {
    let orders: HashMap<&str, &Order> = base
        .delivered_orders
        .iter()
        .map(|o| (o.order_id.as_str(), *o))
        .collect();
    let profiles: HashMap<&str, &Seller> = sellers.iter().map(|s| (s.seller_id.as_str(), s)).collect();

    let mut reviews_by_order: HashMap<&str, Vec<i64>> = HashMap::new();
    for review in reviews {
        if let Some(score) = review.review_score {
            reviews_by_order.entry(review.order_id.as_str()).or_default().push(score);
        }
    }

    let mut accumulators: BTreeMap<&str, SellerAccumulator<'_>> = BTreeMap::new();
    for item in &base.delivered_items {
        let acc = accumulators
            .entry(item.seller_id.as_str())
            .or_insert_with(|| SellerAccumulator {
                orders: HashSet::new(),
                quantity: 0,
                sales: 0.0,
                carrier_delay: Mean::default(),
            });
        acc.orders.insert(item.order_id.as_str());
        acc.quantity += 1;
        acc.sales += item.price;

        let carrier = orders
            .get(item.order_id.as_str())
            .and_then(|o| o.order_delivered_carrier_date);
        if let (Some(carrier), Some(limit)) = (carrier, item.shipping_limit_date) {
            acc.carrier_delay.push(days_between(limit, carrier).max(0.0));
        }
    }

    accumulators
        .into_iter()
        .filter_map(|(seller_id, acc)| {
            let seller_orders: Vec<&Order> = acc
                .orders
                .iter()
                .filter_map(|id| orders.get(id).copied())
                .collect();

            let sale_dates: Vec<NaiveDateTime> = seller_orders
                .iter()
                .map(|o| o.order_approved_at.unwrap_or(o.order_purchase_timestamp))
                .collect();
            let date_first_sale = sale_dates.iter().min().copied()?;
            let date_last_sale = sale_dates.iter().max().copied()?;
            let months_on_olist = (days_between(date_first_sale, date_last_sale) / DAYS_PER_MONTH).round();

            let mut wait = Mean::default();
            for order in &seller_orders {
                if let Some(delivered) = order.order_delivered_customer_date {
                    wait.push(days_between(order.order_purchase_timestamp, delivered));
                }
            }

            let mut score = Mean::default();
            let mut review_count = 0u64;
            let mut one_stars = 0u64;
            let mut five_stars = 0u64;
            let mut cost_of_reviews = 0.0;
            for order in &seller_orders {
                for &s in reviews_by_order.get(order.order_id.as_str()).into_iter().flatten() {
                    score.push(s as f64);
                    review_count += 1;
                    one_stars += u64::from(s == 1);
                    five_stars += u64::from(s == 5);
                    cost_of_reviews += economics.reputation_cost(s).unwrap_or(0.0);
                }
            }

            let n_orders = acc.orders.len() as u64;
            let revenues = economics.commission(acc.sales) + months_on_olist * economics.subscription_fee;
            let profile = profiles.get(seller_id);

            Some(SellerStats {
                seller_id: seller_id.to_string(),
                seller_city: profile.map(|p| p.seller_city.clone()),
                seller_state: profile.map(|p| p.seller_state.clone()),
                delay_to_carrier: acc.carrier_delay.value().unwrap_or(0.0),
                wait_time: wait.value().unwrap_or(0.0),
                date_first_sale,
                date_last_sale,
                months_on_olist,
                share_of_one_stars: ratio_or_zero(one_stars as f64, review_count as f64),
                share_of_five_stars: ratio_or_zero(five_stars as f64, review_count as f64),
                review_score: score.value(),
                cost_of_reviews,
                n_orders,
                quantity: acc.quantity,
                quantity_per_order: acc.quantity as f64 / n_orders as f64,
                sales: acc.sales,
                revenues,
                profits: revenues - cost_of_reviews,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{prepare_base_frames, test_data};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table() -> Vec<SellerStats> {
        let data = test_data::dataset();
        let eco = Economics::default();
        let base = prepare_base_frames(&data, &eco);
        compute_seller_table(&base, &data.sellers, &data.reviews, &eco)
    }

    #[test]
    fn builds_one_row_per_selling_seller() {
        let rows = table();
        assert_eq!(rows.len(), 2);

        let s1 = &rows[0];
        assert_eq!(s1.seller_id, "s1");
        assert_eq!(s1.seller_city.as_deref(), Some("campinas"));
        assert_eq!(s1.quantity, 2);
        assert_eq!(s1.n_orders, 2);
        assert!(close(s1.sales, 300.0));
        assert!(close(s1.months_on_olist, 1.0));
        assert!(close(s1.cost_of_reviews, 100.0));
        assert!(close(s1.review_score.unwrap(), 3.0));
        assert!(close(s1.share_of_one_stars, 0.5));
        assert!(close(s1.share_of_five_stars, 0.5));
        assert!(close(s1.revenues, 110.0));
        assert!(close(s1.profits, 10.0));

        let s2 = &rows[1];
        assert!(close(s2.sales, 90.0));
        assert!(close(s2.cost_of_reviews, 140.0));
        assert!(close(s2.share_of_five_stars, 0.0));
        assert!(close(s2.revenues, 89.0));
        assert!(close(s2.profits, -51.0));
    }

    #[test]
    fn canceled_orders_do_not_count() {
        let rows = table();
        // o4 (999 BRL, canceled) belongs to s1
        assert!(rows.iter().all(|r| r.sales < 999.0));
    }

    #[test]
    fn single_sale_sellers_have_no_tenure() {
        let mut data = test_data::dataset();
        data.orders
            .push(test_data::order("o7", "c1", "delivered", "2017-04-01 00:00:00"));
        data.order_items.push(test_data::item("o7", 1, "p1", "s7", 20.0, 1.0));
        let eco = Economics::default();
        let base = prepare_base_frames(&data, &eco);
        let rows = compute_seller_table(&base, &data.sellers, &data.reviews, &eco);

        let s7 = rows.iter().find(|r| r.seller_id == "s7").unwrap();
        assert!(s7.seller_city.is_none());
        assert!(close(s7.months_on_olist, 0.0));
        assert!(s7.review_score.is_none());
        assert!(close(s7.share_of_one_stars, 0.0));
        assert!(close(s7.revenues, 2.0));
        assert!(close(s7.profits, 2.0));
    }

    #[test]
    fn wait_time_and_carrier_delay_are_in_days() {
        let mut data = test_data::dataset();
        for order in data.orders.iter_mut().filter(|o| o.order_id == "o2") {
            order.order_delivered_carrier_date = Some(test_data::ts("2017-01-28 09:00:00"));
        }
        for item in data.order_items.iter_mut().filter(|i| i.order_id == "o2") {
            item.shipping_limit_date = Some(test_data::ts("2017-01-27 09:00:00"));
        }
        let eco = Economics::default();
        let base = prepare_base_frames(&data, &eco);
        let rows = compute_seller_table(&base, &data.sellers, &data.reviews, &eco);

        let s1 = &rows[0];
        assert!(close(s1.delay_to_carrier, 1.0));
        // o1: 15 days 2 hours, o2: 6 days 23 hours
        let expected = ((15.0 + 2.0 / 24.0) + (6.0 + 23.0 / 24.0)) / 2.0;
        assert!(close(s1.wait_time, expected));
    }
}
