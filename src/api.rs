use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::source::{FeatureLabels, Features};

/// Result of the most recent discovery run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Snapshot {
    /// Timestamp of the run (in UNIX epoch seconds), `0` before the first run.
    pub timestamp: u64,
    pub features: Features,
    pub labels: FeatureLabels,
}

/// Shared handle to the latest [`Snapshot`], written by the discovery loop.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the published snapshot.
    pub async fn publish(&self, snapshot: Snapshot) {
        *self.inner.write().await = snapshot;
    }

    pub async fn latest(&self) -> Snapshot {
        self.inner.read().await.clone()
    }
}

#[derive(Debug, serde::Serialize)]
struct LabelsBody {
    timestamp: u64,
    labels: FeatureLabels,
}

#[derive(Debug, serde::Serialize)]
struct FeaturesBody {
    timestamp: u64,
    features: Features,
}

async fn export_labels(store: State<SnapshotStore>) -> Response {
    let snapshot = store.latest().await;
    let body = LabelsBody {
        timestamp: snapshot.timestamp,
        labels: snapshot.labels,
    };
    (axum::http::StatusCode::OK, Json(body)).into_response()
}

async fn export_features(store: State<SnapshotStore>) -> Response {
    let snapshot = store.latest().await;
    let body = FeaturesBody {
        timestamp: snapshot.timestamp,
        features: snapshot.features,
    };
    (axum::http::StatusCode::OK, Json(body)).into_response()
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new(store: SnapshotStore) -> Self {
        let router = axum::Router::new()
            .route("/labels", get(export_labels))
            .route("/features", get(export_features))
            .with_state(store);
        Self { router }
    }

    /// Serves the API on an already bound listener until serving fails.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if serving fails.
    pub async fn listen(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router.into_make_service()).await
    }

    #[cfg(test)]
    fn router(&self) -> axum::Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::source::AttributeFeatureSet;

    async fn get_json(server: &APIServer, uri: &str) -> serde_json::Value {
        let response = server
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn snapshot() -> Snapshot {
        let mut labels = FeatureLabels::new();
        labels.insert("class.power_supply.BAT0.capacity".to_owned(), "87".to_owned());
        let mut features = Features::new();
        features.attributes.insert(
            "attribute".to_owned(),
            AttributeFeatureSet::new(labels.clone()),
        );
        Snapshot {
            timestamp: 1_700_000_000,
            features,
            labels,
        }
    }

    #[tokio::test]
    async fn test_labels_empty_before_first_run() {
        let server = APIServer::new(SnapshotStore::new());
        let body = get_json(&server, "/labels").await;
        assert_eq!(body, serde_json::json!({ "timestamp": 0, "labels": {} }));
    }

    #[tokio::test]
    async fn test_labels_after_publish() {
        let store = SnapshotStore::new();
        store.publish(snapshot()).await;
        let server = APIServer::new(store);

        let body = get_json(&server, "/labels").await;
        assert_eq!(
            body,
            serde_json::json!({
                "timestamp": 1_700_000_000u64,
                "labels": { "class.power_supply.BAT0.capacity": "87" }
            })
        );
    }

    #[tokio::test]
    async fn test_features_after_publish() {
        let store = SnapshotStore::new();
        store.publish(snapshot()).await;
        let server = APIServer::new(store);

        let body = get_json(&server, "/features").await;
        assert_eq!(
            body["features"]["attributes"]["attribute"]["elements"]["class.power_supply.BAT0.capacity"],
            "87"
        );
    }

    #[tokio::test]
    async fn test_listen_serves_on_bound_listener() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let store = SnapshotStore::new();
        store.publish(snapshot()).await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(APIServer::new(store).listen(listener));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /labels HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("class.power_supply.BAT0.capacity"), "{response}");
        server.abort();
    }

    #[tokio::test]
    async fn test_address_in_use_fails_before_serving() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = TcpListener::bind(addr).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
    }
}
