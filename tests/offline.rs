//! End-to-end: install against a loopback server, then serve offline.

use std::net::SocketAddr;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shellcache::{
    CacheStore, DiskStore, Error, HttpNetwork, Manifest, OfflineWorker, RequestKey,
    ResponseSnapshot, WorkerConfig,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves every default-manifest asset plus an always-500 route.
async fn start_server() -> (SocketAddr, JoinHandle<()>) {
    let app = Router::new()
        .route("/", get(|| async { "shell" }))
        .route("/dashboard", get(|| async { "dashboard page" }))
        .route("/add_member", get(|| async { "add member form" }))
        .route("/fees", get(|| async { "fees page" }))
        .route("/static/manifest.json", get(|| async { "{\"name\":\"app\"}" }))
        .route("/static/style.css", get(|| async { "body { margin: 0 }" }))
        .route("/static/icon.png", get(|| async { "png bytes" }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

async fn stop_server(handle: JoinHandle<()>) {
    handle.abort();
    let _ = handle.await;
}

async fn open_worker(
    root: &TempDir,
    addr: SocketAddr,
) -> OfflineWorker<HttpNetwork, DiskStore> {
    let manifest = Manifest::default();
    let config = WorkerConfig::new().with_origin(format!("http://{addr}"));
    let network = HttpNetwork::new(&config).unwrap();
    let store = DiskStore::open_in(root.path(), &manifest.cache_name)
        .await
        .unwrap();
    OfflineWorker::new(network, store, manifest).with_config(config)
}

#[tokio::test]
async fn install_then_serve_offline() {
    init_logging();
    let (addr, server) = start_server().await;
    let root = TempDir::new().unwrap();

    let worker = open_worker(&root, addr).await;
    worker.install().await.unwrap();

    // Online: the live network answers.
    let live = worker.fetch(&RequestKey::get("/dashboard")).await.unwrap();
    assert_eq!(live.status, 200);
    assert_eq!(&live.body[..], b"dashboard page");

    stop_server(server).await;

    // Offline: every precached asset is still served, byte-for-byte.
    for (path, body) in [
        ("/", "shell"),
        ("/dashboard", "dashboard page"),
        ("/add_member", "add member form"),
        ("/fees", "fees page"),
        ("/static/style.css", "body { margin: 0 }"),
        ("/static/icon.png", "png bytes"),
    ] {
        let cached = worker.fetch(&RequestKey::get(path)).await.unwrap();
        assert_eq!(cached.status, 200, "{path}");
        assert_eq!(&cached.body[..], body.as_bytes(), "{path}");
    }

    // Offline with nothing cached: the transport error surfaces.
    let err = worker
        .fetch(&RequestKey::get("/never_cached"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn cache_survives_a_restart() {
    init_logging();
    let (addr, server) = start_server().await;
    let root = TempDir::new().unwrap();

    let worker = open_worker(&root, addr).await;
    worker.install().await.unwrap();
    drop(worker);
    stop_server(server).await;

    // A freshly opened worker over the same store serves the old entries.
    let reopened = open_worker(&root, addr).await;
    let cached = reopened
        .fetch(&RequestKey::get("/static/style.css"))
        .await
        .unwrap();
    assert_eq!(&cached.body[..], b"body { margin: 0 }");
}

#[tokio::test]
async fn live_http_error_passes_through_untouched() {
    init_logging();
    let (addr, server) = start_server().await;
    let root = TempDir::new().unwrap();

    let worker = open_worker(&root, addr).await;

    // Plant a healthy cached entry for the same key.
    let key = RequestKey::get("/broken");
    worker
        .store()
        .put(&key, ResponseSnapshot::new(200, vec![], "cached copy"))
        .await
        .unwrap();

    // The live 500 wins over the cached 200.
    let response = worker.fetch(&key).await.unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(&response.body[..], b"internal error");

    stop_server(server).await;
}

#[tokio::test]
async fn install_fails_against_an_unreachable_origin() {
    init_logging();
    let root = TempDir::new().unwrap();

    // Bind-then-drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let worker = open_worker(&root, addr).await;
    let err = worker.install().await.unwrap_err();
    assert!(matches!(err, Error::Install { .. }));
}
