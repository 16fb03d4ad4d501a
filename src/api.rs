#[cfg(feature = "ssr")]
use crate::analytics::category::{top_categories, RankedCategory};
#[cfg(feature = "ssr")]
use crate::analytics::monthly::{select_series, MetricOption, MetricSeries};
#[cfg(feature = "ssr")]
use crate::analytics::state::filter_by_min_orders;
#[cfg(feature = "ssr")]
use crate::analytics::strategy::select_scenario;
#[cfg(feature = "ssr")]
use crate::analytics::{
    CustomerSpotlight, FinancialOverview, MonthlyMetric, SliderConfig, StateMetrics, StrategyHighlights, StrategyRow,
    WaterfallStep,
};
#[cfg(feature = "ssr")]
use crate::briefing::{self, OverviewInsight};
#[cfg(feature = "ssr")]
use crate::dashboard::DashboardData;
#[cfg(feature = "ssr")]
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
#[cfg(feature = "ssr")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "ssr")]
use thiserror::Error;
#[cfg(feature = "ssr")]
use tracing::{debug, warn};

/// Rejected query parameters. Always answered with 400 and a plain-text reason.
#[cfg(feature = "ssr")]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UnknownMetric(String),
    #[error("no strategy scenario available")]
    NoScenario,
    #[error("invalid query: {0}")]
    BadQuery(String),
}

#[cfg(feature = "ssr")]
impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        warn!(error = %self, "rejected request");
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

/// Mount the `/api` routes and the query error handler.
#[cfg(feature = "ssr")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default().error_handler(|err, _req| ApiError::BadQuery(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/header", web::get().to(get_header)) // GET /api/header
            .route("/overview", web::get().to(get_overview)) // GET /api/overview
            .route("/drivers/monthly", web::get().to(get_monthly_drivers)) // GET /api/drivers/monthly?metrics=a,b
            .route("/drivers/categories", web::get().to(get_category_drivers)) // GET /api/drivers/categories?top_n=
            .route("/customers", web::get().to(get_customers)) // GET /api/customers?min_orders=
            .route("/strategy", web::get().to(get_strategy)) // GET /api/strategy?sellers_removed=
            .route("/actions", web::get().to(get_actions)), // GET /api/actions
    );
}

#[cfg(feature = "ssr")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to the Olist Growth Briefing!")
}

#[cfg(feature = "ssr")]
pub async fn get_header(data: web::Data<DashboardData>) -> HttpResponse {
    HttpResponse::Ok().json(briefing::header(&data))
}

#[cfg(feature = "ssr")]
#[derive(Serialize)]
pub struct OverviewResponse<'a> {
    pub financial_overview: &'a FinancialOverview,
    pub waterfall: &'a [WaterfallStep],
    pub insight: OverviewInsight,
}

#[cfg(feature = "ssr")]
pub async fn get_overview(data: web::Data<DashboardData>) -> HttpResponse {
    HttpResponse::Ok().json(OverviewResponse {
        financial_overview: &data.financial_overview,
        waterfall: &data.waterfall,
        insight: briefing::overview_insight(&data),
    })
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub metrics: Option<String>, // comma separated metric keys
}

#[cfg(feature = "ssr")]
#[derive(Serialize)]
pub struct MonthlyResponse<'a> {
    pub options: &'a [MetricOption],
    pub selected: Vec<MonthlyMetric>,
    pub series: Vec<MetricSeries>,
}

/// Metrics named in `raw`. No parameter means the default selection.
#[cfg(feature = "ssr")]
pub fn parse_metrics(raw: Option<&str>) -> Result<Vec<MonthlyMetric>, ApiError> {
    let Some(raw) = raw else {
        return Ok(MonthlyMetric::default_selection());
    };
    let mut selected = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let metric: MonthlyMetric = key.parse().map_err(|e: crate::analytics::monthly::UnknownMetric| {
            ApiError::UnknownMetric(e.to_string())
        })?;
        if !selected.contains(&metric) {
            selected.push(metric);
        }
    }
    Ok(selected)
}

#[cfg(feature = "ssr")]
pub async fn get_monthly_drivers(
    data: web::Data<DashboardData>,
    query: web::Query<MonthlyQuery>,
) -> Result<HttpResponse, ApiError> {
    let selected = parse_metrics(query.metrics.as_deref())?;
    debug!(?selected, "monthly drivers requested");
    let series = select_series(&data.monthly_metrics, &selected);
    Ok(HttpResponse::Ok().json(MonthlyResponse {
        options: &data.monthly_metric_options,
        selected: series.iter().map(|s| s.metric).collect(),
        series,
    }))
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub top_n: Option<usize>,
}

#[cfg(feature = "ssr")]
#[derive(Serialize)]
pub struct CategoryResponse {
    pub top_n: usize,
    pub slider_max: usize,
    pub categories: Vec<RankedCategory>,
}

#[cfg(feature = "ssr")]
pub async fn get_category_drivers(data: web::Data<DashboardData>, query: web::Query<CategoryQuery>) -> HttpResponse {
    // zero is read as one, like the slider's lower bound
    let top_n = query.top_n.unwrap_or(data.category_slider_max.min(10)).max(1);
    let categories = top_categories(&data.category_profitability, top_n);
    debug!(top_n, returned = categories.len(), "category drivers requested");
    HttpResponse::Ok().json(CategoryResponse {
        top_n,
        slider_max: data.category_slider_max,
        categories,
    })
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
pub struct CustomersQuery {
    pub min_orders: Option<u64>,
}

#[cfg(feature = "ssr")]
#[derive(Serialize)]
pub struct CustomersResponse<'a> {
    pub min_orders: u64,
    pub spotlight: &'a CustomerSpotlight,
    pub states: Vec<StateMetrics>,
    pub slider: &'a SliderConfig,
}

#[cfg(feature = "ssr")]
pub async fn get_customers(data: web::Data<DashboardData>, query: web::Query<CustomersQuery>) -> HttpResponse {
    let min_orders = query.min_orders.unwrap_or(data.state_slider.default);
    let states = filter_by_min_orders(&data.state_metrics, min_orders);
    debug!(min_orders, states = states.len(), "customer states requested");
    HttpResponse::Ok().json(CustomersResponse {
        min_orders,
        spotlight: &data.customer_spotlight,
        states,
        slider: &data.state_slider,
    })
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
pub struct StrategyQuery {
    pub sellers_removed: Option<u64>,
}

#[cfg(feature = "ssr")]
#[derive(Serialize)]
pub struct StrategyResponse<'a> {
    pub selected: &'a StrategyRow,
    pub summary: Vec<String>,
    pub highlights: &'a StrategyHighlights,
    pub table: &'a [StrategyRow],
    pub slider: &'a SliderConfig,
}

#[cfg(feature = "ssr")]
pub async fn get_strategy(
    data: web::Data<DashboardData>,
    query: web::Query<StrategyQuery>,
) -> Result<HttpResponse, ApiError> {
    let wanted = query.sellers_removed.unwrap_or(data.strategy_slider.default);
    let selected = select_scenario(&data.strategy, wanted).ok_or(ApiError::NoScenario)?;
    debug!(wanted, selected = selected.sellers_removed, "strategy scenario requested");
    Ok(HttpResponse::Ok().json(StrategyResponse {
        selected,
        summary: briefing::scenario_summary(selected, &data),
        highlights: &data.strategy_highlights,
        table: &data.strategy,
        slider: &data.strategy_slider,
    }))
}

#[cfg(feature = "ssr")]
pub async fn get_actions(data: web::Data<DashboardData>) -> HttpResponse {
    HttpResponse::Ok().json(briefing::action_plan(&data))
}
