use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use warp::{http::StatusCode, reject::Rejection, reply::Reply};

use crate::cache::TableCache;
use crate::query::{self, DuplicatePolicy, LocationSelection, SegmentSelection};
use crate::session::Session;
use crate::table::{CanonicalTable, ColumnSet, SkippedColumn};

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub state: Option<String>,
    pub unit: Option<String>,
    pub segment: Option<String>,
    pub customer: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SegmentQuery {
    pub segment: Option<String>,
    pub customer: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
}

#[derive(Serialize)]
struct SummaryResponse<'a> {
    records: usize,
    states: usize,
    segments: usize,
    columns: ColumnSet,
    fund_dates: &'a [NaiveDate],
    skipped_columns: &'a [SkippedColumn],
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

/// `?state=` and friends arrive as empty strings when the box is cleared.
fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

async fn load(cache: Arc<TableCache>) -> Result<Arc<CanonicalTable>> {
    // stat + parse are blocking file I/O
    tokio::task::spawn_blocking(move || cache.get()).await?
}

fn load_failed(e: anyhow::Error) -> warp::reply::WithStatus<warp::reply::Json> {
    error!("failed to load source table: {:?}", e);
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: "Failed to load portfolio data".to_string(),
            details: Some(format!("{:#}", e)),
        }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

pub async fn health() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "pgs-dossier"
    })))
}

pub async fn summary(cache: Arc<TableCache>) -> Result<impl Reply, Rejection> {
    let table = match load(cache).await {
        Ok(t) => t,
        Err(e) => return Ok(load_failed(e)),
    };
    let body = SummaryResponse {
        records: table.len(),
        states: query::distinct_states(&table).len(),
        segments: query::distinct_segments_global(&table).len(),
        columns: table.columns,
        fund_dates: &table.fund_dates,
        skipped_columns: &table.skipped_columns,
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&body),
        StatusCode::OK,
    ))
}

pub async fn location(q: LocationQuery, cache: Arc<TableCache>) -> Result<impl Reply, Rejection> {
    let table = match load(cache).await {
        Ok(t) => t,
        Err(e) => return Ok(load_failed(e)),
    };
    let selection = LocationSelection {
        state: non_empty(q.state),
        unit: non_empty(q.unit),
        segment: non_empty(q.segment),
        customer: non_empty(q.customer),
    };
    let mut session = Session::with_location(table, selection);
    session.duplicates = q.duplicates.unwrap_or_default();
    Ok(warp::reply::with_status(
        warp::reply::json(&session.step()),
        StatusCode::OK,
    ))
}

pub async fn segment(q: SegmentQuery, cache: Arc<TableCache>) -> Result<impl Reply, Rejection> {
    let table = match load(cache).await {
        Ok(t) => t,
        Err(e) => return Ok(load_failed(e)),
    };
    let selection = SegmentSelection {
        segment: non_empty(q.segment),
        customer: non_empty(q.customer),
    };
    let mut session = Session::with_segment(table, selection);
    session.duplicates = q.duplicates.unwrap_or_default();
    Ok(warp::reply::with_status(
        warp::reply::json(&session.step()),
        StatusCode::OK,
    ))
}
