use axum::{
    Router,
    http::{StatusCode, Uri},
};
use mallang_console::{
    ConsoleBackend, HttpBackend, TokenClient,
    fetch::MissingTokenPolicy,
    models::OrderStatus,
    session::Session,
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// --- Recording Backend ---

type Seen = Arc<Mutex<Vec<String>>>;

// Accepts anything and remembers the raw path and query it was asked for.
async fn spawn_recorder() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let router = Router::new().fallback(move |uri: Uri| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(uri.to_string());
            StatusCode::OK
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (address, seen)
}

fn backend(api_url: &str) -> HttpBackend {
    HttpBackend::new(api_url, TokenClient::new(MissingTokenPolicy::Omit))
}

// --- Tests ---

#[tokio::test]
async fn test_order_id_stays_a_single_path_segment() {
    let (api_url, seen) = spawn_recorder().await;
    let backend = backend(&api_url);
    let session = Session::default();

    for id in ["../../category", "x?y=1#", "o1"] {
        backend
            .update_order_status(&session, id, OrderStatus::Preparing)
            .await
            .unwrap();
    }

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "/api/admin/orders/..%2F..%2Fcategory/status",
            "/api/admin/orders/x%3Fy=1%23/status",
            "/api/admin/orders/o1/status",
        ]
    );
}

#[tokio::test]
async fn test_order_status_url_respects_base_path() {
    let (api_url, seen) = spawn_recorder().await;
    let backend = backend(&format!("{}/v1/", api_url));

    backend
        .update_order_status(&Session::default(), "o1", OrderStatus::Completed)
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["/v1/api/admin/orders/o1/status"]);
}
