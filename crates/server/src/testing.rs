//! Test doubles shared by the server's unit tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use product_info_core::{CatalogNotifier, CatalogProduct, NotifyError, Product, ProductId};
use product_info_db::{ProductRepository, ProductUnitOfWork, RepositoryError};
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;

/// Local HTTP listener standing in for the catalog service.
pub struct CatalogStub {
    address: SocketAddr,
    received: Arc<AsyncMutex<Vec<Value>>>,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    received: Arc<AsyncMutex<Vec<Value>>>,
}

impl CatalogStub {
    pub async fn spawn(status: StatusCode) -> Self {
        let received = Arc::new(AsyncMutex::new(Vec::new()));
        let router = Router::new()
            .route("/management/products", post(accept))
            .with_state(StubState { status, received: Arc::clone(&received) });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });
        Self { address, received }
    }

    pub fn products_url(&self) -> String {
        format!("http://{}/management/products", self.address)
    }

    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }
}

async fn accept(State(state): State<StubState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().await.push(body);
    state.status
}

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Notifier that records each call into a shared log and optionally fails.
pub struct RecordingNotifier {
    log: CallLog,
    failure: Option<NotifyError>,
}

impl RecordingNotifier {
    pub fn succeeding(log: CallLog) -> Self {
        Self { log, failure: None }
    }

    pub fn failing(log: CallLog, failure: NotifyError) -> Self {
        Self { log, failure: Some(failure) }
    }
}

#[async_trait::async_trait]
impl CatalogNotifier for RecordingNotifier {
    async fn notify(&self, product: &CatalogProduct) -> Result<(), NotifyError> {
        push(&self.log, format!("notify:{}:{}:{}", product.id, product.name, product.brand_name));
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

/// Wraps a repository and records every store call into a shared log.
pub struct RecordingRepository<R> {
    inner: R,
    log: CallLog,
}

impl<R> RecordingRepository<R> {
    pub fn new(inner: R, log: CallLog) -> Self {
        Self { inner, log }
    }
}

#[async_trait::async_trait]
impl<R: ProductRepository> ProductRepository for RecordingRepository<R> {
    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError> {
        push(&self.log, "begin".to_string());
        let inner = self.inner.begin().await?;
        Ok(Box::new(RecordingUnitOfWork { inner, log: Arc::clone(&self.log) }))
    }
}

struct RecordingUnitOfWork {
    inner: Box<dyn ProductUnitOfWork>,
    log: CallLog,
}

#[async_trait::async_trait]
impl ProductUnitOfWork for RecordingUnitOfWork {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        push(&self.log, format!("find:{id}"));
        self.inner.find_by_id(id).await
    }

    async fn next_id(&mut self) -> Result<ProductId, RepositoryError> {
        push(&self.log, "next_id".to_string());
        self.inner.next_id().await
    }

    async fn save(&mut self, product: Product) -> Result<Product, RepositoryError> {
        push(&self.log, format!("save:{}", product.id));
        self.inner.save(product).await
    }

    async fn delete_by_id(&mut self, id: ProductId) -> Result<(), RepositoryError> {
        push(&self.log, format!("delete:{id}"));
        self.inner.delete_by_id(id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        push(&self.log, "commit".to_string());
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        push(&self.log, "rollback".to_string());
        self.inner.rollback().await
    }
}

fn push(log: &CallLog, entry: String) {
    log.lock().expect("call log poisoned").push(entry);
}
