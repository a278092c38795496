//! HTTP layer for the catalog.
//!
//! Maps requests onto [`Catalog`] operations and serializes the results as
//! JSON. Catalog calls are synchronous and run on tokio's blocking pool.
//!
//! | Method & path | Operation |
//! |---|---|
//! | `POST /cats/search` | search by params |
//! | `GET /cats/search-pattern?name&limit` | prefix search |
//! | `POST /cats/add` | batch add |
//! | `POST /cats/save-description` | description update |
//! | `GET /cats/get-by-id?id` | lookup |
//! | `GET /cats/all?order&gender` | grouped listing |
//! | `GET /cats/validation?type` | validation rules |
//! | `POST`/`DELETE /cats/{id}/like` | like / unlike |
//! | `POST`/`DELETE /cats/{id}/dislike` | dislike / undislike |
//! | `GET /cats/likes-rating`, `GET /cats/dislikes-rating` | ratings |
//! | `GET /health` | liveness |

mod dto;
mod error;
mod handlers;

pub use error::ApiError;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::catalog::Catalog;

/// Builds the application router over a shared catalog.
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/cats/search", post(handlers::search))
        .route("/cats/search-pattern", get(handlers::search_pattern))
        .route("/cats/add", post(handlers::add))
        .route("/cats/save-description", post(handlers::save_description))
        .route("/cats/get-by-id", get(handlers::get_by_id))
        .route("/cats/all", get(handlers::get_all))
        .route("/cats/validation", get(handlers::validation_rules))
        .route("/cats/likes-rating", get(handlers::likes_rating))
        .route("/cats/dislikes-rating", get(handlers::dislikes_rating))
        .route(
            "/cats/{id}/like",
            post(handlers::like).delete(handlers::unlike),
        )
        .route(
            "/cats/{id}/dislike",
            post(handlers::dislike).delete(handlers::undislike),
        )
        .layer(Extension(catalog))
}

/// Serves the catalog on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, catalog: Arc<Catalog>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
