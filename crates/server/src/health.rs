//! `/health`: ready once the product table answers queries.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use product_info_db::DbPool;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStoreStatus {
    /// The database answered, even if only with an error.
    pub reachable: bool,
    pub schema_applied: bool,
    pub products: Option<i64>,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub status: &'static str,
    pub product_store: ProductStoreStatus,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(readiness)).with_state(db_pool)
}

async fn readiness(State(pool): State<DbPool>) -> (StatusCode, Json<Readiness>) {
    let product_store = probe_product_store(&pool).await;
    let ready = product_store.schema_applied;
    if !ready {
        warn!(
            event_name = "system.health.not_ready",
            correlation_id = "health",
            detail = %product_store.detail,
            "product store is not ready"
        );
    }

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    let body = Readiness {
        status: if ready { "ready" } else { "unavailable" },
        product_store,
        checked_at: Utc::now().to_rfc3339(),
    };
    (status_code, Json(body))
}

async fn probe_product_store(pool: &DbPool) -> ProductStoreStatus {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product").fetch_one(pool).await {
        Ok(count) => ProductStoreStatus {
            reachable: true,
            schema_applied: true,
            products: Some(count),
            detail: format!("{count} products stored"),
        },
        Err(sqlx::Error::Database(error)) => ProductStoreStatus {
            reachable: true,
            schema_applied: false,
            products: None,
            detail: format!("product table unavailable, migrations pending? {error}"),
        },
        Err(error) => ProductStoreStatus {
            reachable: false,
            schema_applied: false,
            products: None,
            detail: format!("database unreachable: {error}"),
        },
    }
}
