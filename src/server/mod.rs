// src/server/mod.rs
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tracing::info;
use warp::{reject::Rejection, reply::Reply, Filter};

use crate::cache::TableCache;

pub mod handlers;

fn with_cache(
    cache: Arc<TableCache>,
) -> impl Filter<Extract = (Arc<TableCache>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&cache))
}

/// All JSON routes of the drill-down API.
pub fn routes(
    cache: Arc<TableCache>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health);

    let summary = warp::path("summary")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_cache(Arc::clone(&cache)))
        .and_then(handlers::summary);

    // state → unit → segment → customer
    let location = warp::path("location")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::LocationQuery>())
        .and(with_cache(Arc::clone(&cache)))
        .and_then(handlers::location);

    // segment → customer
    let segment = warp::path("segment")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::SegmentQuery>())
        .and(with_cache(cache))
        .and_then(handlers::segment);

    health
        .or(summary)
        .or(location)
        .or(segment)
        .with(warp::trace::request())
}

pub async fn serve(cache: Arc<TableCache>, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("Drill-down: GET http://localhost:{}/location, /segment", port);
    warp::serve(routes(cache)).run(addr).await;
}
