use crate::db::connection::{DbPool, get_pool_stats};
use crate::db::repositories::{ChoiceStore, PollStore, RecordStore};
use crate::error::StorageError;
use crate::polls::{add_choice, create_poll, handler_404, poll_add, poll_show, remove_choice, vote_choice};
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, interval};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub polls: Arc<PollStore>,
    pub choices: ChoiceStore,
    /// Held by every mutating handler so check-then-save sequences never
    /// interleave.
    pub writes: Arc<Mutex<()>>,
}

impl AppState {
    /// Builds the stores and loads the poll list once, up front.
    pub async fn new(db: DbPool) -> Result<Self, StorageError> {
        let records = RecordStore::new(db);
        let polls = PollStore::new(records.clone());
        let loaded = polls.fetch_all().await?;
        info!("loaded {} polls", loaded.len());

        Ok(AppState {
            polls: Arc::new(polls),
            choices: ChoiceStore::new(records),
            writes: Arc::new(Mutex::new(())),
        })
    }
}

pub fn spawn_health_check(db: DbPool) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match db.acquire().await {
                Ok(conn) => {
                    drop(conn);
                    debug!("{}", get_pool_stats(&db).await);
                }
                Err(e) => {
                    error!("Database connection health check failed: {}", e);
                }
            }
        }
    });
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(poll_add))
        .route("/polls", post(create_poll))
        .route("/poll/:slug", get(poll_show))
        .route("/poll/:slug/choices", post(add_choice))
        .route("/poll/:slug/choices/:choice_id/vote", post(vote_choice))
        .route("/poll/:slug/choices/:choice_id/delete", post(remove_choice))
        .fallback(handler_404)
        .layer(Extension(app_state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
