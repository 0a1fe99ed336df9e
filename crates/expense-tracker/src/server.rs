//! Web front end: entry form, monthly and yearly report pages, JSON API

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::charts;
use crate::config::Config;
use crate::expenses::{self, NewExpense, SelectorError};
use crate::monthly::{MonthlyReport, monthly_report};
use crate::reports::Outcome;
use crate::store::ExpenseStore;
use crate::views;
use crate::yearly::{YearlyReport, yearly_report};

/// Shared handler state
pub struct AppState<S> {
    store: Arc<S>,
    currency_symbol: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            currency_symbol: Arc::clone(&self.currency_symbol),
        }
    }
}

impl<S: ExpenseStore> AppState<S> {
    pub fn new(store: S, currency_symbol: &str) -> Self {
        Self {
            store: Arc::new(store),
            currency_symbol: Arc::from(currency_symbol),
        }
    }
}

/// Request failure, answered as plain text
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Selector(_) | AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Expense form submission
#[derive(Debug, Deserialize)]
pub struct AddExpenseForm {
    pub date: String,
    pub category: String,
    pub amount: String,
    #[serde(default)]
    pub note: String,
}

/// `month` and `year` selectors, both optional
#[derive(Debug, Default, Deserialize)]
pub struct MonthSelector {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// `year` selector, optional
#[derive(Debug, Default, Deserialize)]
pub struct YearSelector {
    pub year: Option<String>,
}

/// JSON envelope for report endpoints
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ApiResponse<T> {
    Empty { message: String },
    Report(T),
}

impl<T> From<Outcome<T>> for ApiResponse<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::NoData(reason) => ApiResponse::Empty {
                message: reason.to_string(),
            },
            Outcome::Report(report) => ApiResponse::Report(report),
        }
    }
}

/// Build the application router
pub fn router<S: ExpenseStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add_expense::<S>))
        .route("/monthly", get(monthly_get::<S>).post(monthly_post::<S>))
        .route("/yearly", get(yearly_get::<S>).post(yearly_post::<S>))
        .route("/api/monthly", get(api_monthly::<S>))
        .route("/api/yearly", get(api_yearly::<S>))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve<S: ExpenseStore>(store: S, config: &Config) -> Result<()> {
    info!(store = %store.location(), "using expense store");
    let app = router(AppState::new(store, &config.currency_symbol));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn index() -> Html<String> {
    let today = chrono::Local::now().date_naive().to_string();
    Html(views::index_page(&today))
}

async fn add_expense<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<AddExpenseForm>,
) -> Result<Redirect, AppError> {
    let date = expenses::parse_date(&form.date).ok_or(AppError::InvalidDate(form.date))?;

    let expense = NewExpense {
        date,
        category: form.category,
        amount: form.amount,
        note: form.note,
    };
    state.store.append(&expense).await?;

    info!(
        date = %expense.date,
        category = %expense.category,
        amount = %expense.amount,
        "expense added"
    );
    Ok(Redirect::to("/"))
}

async fn load_monthly<S: ExpenseStore>(
    state: &AppState<S>,
    selector: &MonthSelector,
) -> Result<Outcome<MonthlyReport>, AppError> {
    let month = expenses::parse_month(selector.month.as_deref())?;
    let year = expenses::parse_year(selector.year.as_deref())?;

    let records = state.store.load_all().await?;
    info!(?month, ?year, records = records.len(), "monthly report requested");
    Ok(monthly_report(&records, month, year))
}

async fn load_yearly<S: ExpenseStore>(
    state: &AppState<S>,
    selector: &YearSelector,
) -> Result<Outcome<YearlyReport>, AppError> {
    let year = expenses::parse_year(selector.year.as_deref())?;

    let records = state.store.load_all().await?;
    info!(?year, records = records.len(), "yearly report requested");
    Ok(yearly_report(&records, year))
}

async fn render_monthly<S: ExpenseStore>(
    state: AppState<S>,
    selector: MonthSelector,
) -> Result<Response, AppError> {
    match load_monthly(&state, &selector).await? {
        Outcome::NoData(reason) => Ok(reason.to_string().into_response()),
        Outcome::Report(report) => {
            let chart = charts::pie_chart(&report.categories);
            Ok(Html(views::monthly_page(&report, &chart, &state.currency_symbol)).into_response())
        }
    }
}

async fn render_yearly<S: ExpenseStore>(
    state: AppState<S>,
    selector: YearSelector,
) -> Result<Response, AppError> {
    match load_yearly(&state, &selector).await? {
        Outcome::NoData(reason) => Ok(reason.to_string().into_response()),
        Outcome::Report(report) => {
            let chart =
                charts::bar_chart(report.year, &report.monthly_totals, &state.currency_symbol);
            Ok(Html(views::yearly_page(&report, &chart, &state.currency_symbol)).into_response())
        }
    }
}

/// Monthly page. `month` and `year` are honoured even when only one of them is
/// given; the missing one comes from the latest record.
async fn monthly_get<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Query(selector): Query<MonthSelector>,
) -> Result<Response, AppError> {
    render_monthly(state, selector).await
}

async fn monthly_post<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Form(selector): Form<MonthSelector>,
) -> Result<Response, AppError> {
    render_monthly(state, selector).await
}

async fn yearly_get<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Query(selector): Query<YearSelector>,
) -> Result<Response, AppError> {
    render_yearly(state, selector).await
}

async fn yearly_post<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Form(selector): Form<YearSelector>,
) -> Result<Response, AppError> {
    render_yearly(state, selector).await
}

async fn api_monthly<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Query(selector): Query<MonthSelector>,
) -> Result<Response, AppError> {
    let outcome = load_monthly(&state, &selector).await?;
    Ok(Json(ApiResponse::from(outcome)).into_response())
}

async fn api_yearly<S: ExpenseStore>(
    State(state): State<AppState<S>>,
    Query(selector): Query<YearSelector>,
) -> Result<Response, AppError> {
    let outcome = load_yearly(&state, &selector).await?;
    Ok(Json(ApiResponse::from(outcome)).into_response())
}
