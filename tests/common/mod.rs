#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::Router;
use bpcli::beatport::{Endpoints, RetryPolicy, Session, Transport};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Transport with millisecond backoff so retry tests stay fast.
pub fn fast_transport() -> Transport {
    Transport::new(
        Session::new().unwrap(),
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(5),
        },
    )
}

/// API and auth server on the same mock, like the real service.
pub fn endpoints(base: &str) -> Endpoints {
    Endpoints::new(base, Some(base))
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
