mod common;

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use bpcli::{
    beatport::{RetryPolicy, Session, Transport},
    error::Error,
};
use common::{Counter, fast_transport, serve};

#[test]
fn test_default_retry_schedule() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts(), 4);
    assert_eq!(policy.delay_for(0), Duration::ZERO);
    assert_eq!(
        policy.schedule(),
        vec![
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(8)
        ]
    );
}

#[test]
fn test_retry_schedule_without_retries() {
    let policy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::from_secs(1),
    };
    assert_eq!(policy.max_attempts(), 1);
    assert!(policy.schedule().is_empty());
}

#[tokio::test]
async fn test_server_errors_exhaust_all_attempts() {
    let counter = Counter::default();
    let hits = counter.clone();
    let app = Router::new().route(
        "/flaky",
        get(move || {
            let hits = hits.clone();
            async move {
                let attempt = hits.hit();
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("maintenance, attempt {attempt}"),
                )
            }
        }),
    );
    let base = serve(app).await;

    let transport = fast_transport();
    let err = transport
        .send(transport.get(&format!("{base}/flaky")))
        .await
        .unwrap_err();

    assert_eq!(counter.get(), 4);
    match err {
        Error::RetriesExhausted {
            attempts,
            status,
            body,
        } => {
            assert_eq!(attempts, 4);
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body, "maintenance, attempt 4");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_backoff_waits_between_attempts() {
    let seen: Arc<Mutex<Vec<Instant>>> = Arc::default();
    let hits = Arc::clone(&seen);
    let app = Router::new().route(
        "/down",
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.lock().unwrap().push(Instant::now());
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let base = serve(app).await;

    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(25),
    };
    let transport = Transport::new(Session::new().unwrap(), policy);
    let started = Instant::now();
    let result = transport.send(transport.get(&format!("{base}/down"))).await;

    assert!(result.is_err());
    assert!(started.elapsed() >= Duration::from_millis(350));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    let gaps: Vec<Duration> = seen.windows(2).map(|w| w[1] - w[0]).collect();
    for (gap, expected) in gaps.iter().zip(policy.schedule()) {
        assert!(*gap >= expected, "gap {gap:?} shorter than {expected:?}");
    }
}

#[tokio::test]
async fn test_recovers_after_transient_server_error() {
    let counter = Counter::default();
    let hits = counter.clone();
    let app = Router::new().route(
        "/recovering",
        get(move || {
            let hits = hits.clone();
            async move {
                if hits.hit() < 3 {
                    (StatusCode::BAD_GATEWAY, "down")
                } else {
                    (StatusCode::OK, "up")
                }
            }
        }),
    );
    let base = serve(app).await;

    let transport = fast_transport();
    let response = transport
        .send(transport.get(&format!("{base}/recovering")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "up");
    assert_eq!(counter.get(), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let counter = Counter::default();
    let hits = counter.clone();
    let app = Router::new().route(
        "/missing",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.hit();
                StatusCode::NOT_FOUND
            }
        }),
    );
    let base = serve(app).await;

    let transport = fast_transport();
    let response = transport
        .send(transport.get(&format!("{base}/missing")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(counter.get(), 1);
}

#[tokio::test]
async fn test_success_is_a_single_attempt() {
    let counter = Counter::default();
    let hits = counter.clone();
    let app = Router::new().route(
        "/ok",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.hit();
                "fine"
            }
        }),
    );
    let base = serve(app).await;

    let transport = fast_transport();
    let response = transport
        .send(transport.get(&format!("{base}/ok")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counter.get(), 1);
}

#[tokio::test]
async fn test_retried_post_resends_body() {
    let counter = Counter::default();
    let hits = counter.clone();
    let app = Router::new().route(
        "/echo",
        post(move |body: String| {
            let hits = hits.clone();
            async move {
                if hits.hit() == 1 {
                    (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                } else {
                    (StatusCode::OK, body)
                }
            }
        }),
    );
    let base = serve(app).await;

    let transport = fast_transport();
    let response = transport
        .send(
            transport
                .post(&format!("{base}/echo"))
                .json(&serde_json::json!({"username": "user"})),
        )
        .await
        .unwrap();

    assert_eq!(counter.get(), 2);
    let echoed: serde_json::Value = response.json().await.unwrap();
    assert_eq!(echoed["username"], "user");
}

#[tokio::test]
async fn test_connection_failure_surfaces_transport_error() {
    // Bind and drop to get a local port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = fast_transport();
    let err = transport
        .send(transport.get(&format!("http://{addr}/")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_redirects_are_followed_or_returned() {
    let app = Router::new()
        .route(
            "/jump",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/landing")]) }),
        )
        .route("/landing", get(|| async { "landed" }));
    let base = serve(app).await;

    let transport = fast_transport();
    let followed = transport
        .send(transport.get(&format!("{base}/jump")))
        .await
        .unwrap();
    assert_eq!(followed.status(), StatusCode::OK);
    assert_eq!(followed.text().await.unwrap(), "landed");

    let held = transport
        .send(transport.get_without_redirects(&format!("{base}/jump")))
        .await
        .unwrap();
    assert_eq!(held.status(), StatusCode::FOUND);
    assert_eq!(held.headers()[header::LOCATION], "/landing");
}

#[tokio::test]
async fn test_cookies_are_shared_across_clients() {
    let app = Router::new()
        .route(
            "/set",
            get(|| async { [(header::SET_COOKIE, "sessionid=abc; Path=/")] }),
        )
        .route(
            "/check",
            get(|headers: HeaderMap| async move {
                let cookie = headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if cookie.contains("sessionid=abc") {
                    StatusCode::OK
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
    let base = serve(app).await;

    let transport = Transport::new(Session::new().unwrap(), RetryPolicy::default());
    transport
        .send(transport.get(&format!("{base}/set")))
        .await
        .unwrap();
    let response = transport
        .send(transport.get_without_redirects(&format!("{base}/check")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // A fresh session does not see the cookie.
    let isolated = Transport::new(Session::new().unwrap(), RetryPolicy::default());
    let response = isolated
        .send(isolated.get(&format!("{base}/check")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
