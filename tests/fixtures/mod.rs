// Shared CSV fixture for the integration tests
use olist_briefing::analytics::Economics;
use olist_briefing::loader::load_csv_dir;
use olist_briefing::DashboardData;
use std::fs;
use tempfile::TempDir;

const ORDERS: &str = "\
order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date
o1,c1,delivered,2017-01-05 10:00:00,2017-01-05 10:00:00,,2017-01-20 12:00:00,2017-01-15 00:00:00
o2,c2,delivered,2017-01-25 09:00:00,2017-01-25 09:00:00,,2017-02-01 08:00:00,2017-02-05 00:00:00
o3,c3,delivered,2017-02-10 15:30:00,2017-02-10 15:30:00,,,
o4,c4,canceled,2017-02-11 15:30:00,2017-02-11 15:30:00,,,
";

const ORDER_ITEMS: &str = "\
order_id,order_item_id,product_id,seller_id,shipping_limit_date,price,freight_value
o1,1,p1,s1,,100.0,10.0
o1,2,p2,s2,,50.0,5.0
o2,1,p1,s1,,200.0,20.0
o3,1,p3,s2,,40.0,8.0
o4,1,p1,s1,,999.0,1.0
";

const REVIEWS: &str = "\
review_id,order_id,review_score,review_comment_title,review_comment_message
r1,o1,1,,chegou atrasado
r2,o2,5,,
r3,o3,3,,
r4,o4,1,,
";

const PRODUCTS: &str = "\
product_id,product_category_name
p1,beleza_saude
p2,brinquedos
p3,
";

const TRANSLATIONS: &str = "\u{feff}product_category_name,product_category_name_english
beleza_saude,health_beauty
";

const CUSTOMERS: &str = "\
customer_id,customer_unique_id,customer_zip_code_prefix,customer_city,customer_state
c1,u-c1,01000,sao paulo,SP
c2,u-c2,20000,rio de janeiro,RJ
c3,u-c3,01000,sao paulo,SP
c4,u-c4,01000,sao paulo,SP
";

const SELLERS: &str = "\
seller_id,seller_zip_code_prefix,seller_city,seller_state
s1,13000,campinas,SP
s2,20000,rio de janeiro,RJ
";

/// Three delivered orders over January and February 2017 plus one canceled order.
pub fn write_dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("olist_orders_dataset.csv", ORDERS),
        ("olist_order_items_dataset.csv", ORDER_ITEMS),
        ("olist_order_reviews_dataset.csv", REVIEWS),
        ("olist_products_dataset.csv", PRODUCTS),
        ("product_category_name_translation.csv", TRANSLATIONS),
        ("olist_customers_dataset.csv", CUSTOMERS),
        ("olist_sellers_dataset.csv", SELLERS),
    ];
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

pub fn dashboard() -> DashboardData {
    let dir = write_dataset();
    let dataset = load_csv_dir(dir.path()).unwrap();
    DashboardData::from_dataset(&dataset, Economics::default())
}
