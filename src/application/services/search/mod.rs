use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::application::services::directory::DirectoryClient;
use crate::domain::catalog::block::BlockRecord;

/// What the caller currently knows about the search box. `Results` with an
/// empty list, `InFlight`, and `Failed` are three distinct situations.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Idle,
    InFlight {
        query: String,
    },
    Results {
        query: String,
        blocks: Vec<BlockRecord>,
    },
    Failed {
        query: String,
        message: String,
    },
}

/// Owns the query generation counter. Every `set_query` supersedes whatever
/// search is still in flight: the transport request is not aborted, but its
/// result is dropped on arrival if a newer generation has been issued.
#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    directory: Arc<DirectoryClient>,
    generation: AtomicU64,
    status: watch::Sender<SearchStatus>,
}

impl SearchSession {
    pub fn new(directory: Arc<DirectoryClient>) -> Self {
        let (status, _) = watch::channel(SearchStatus::Idle);
        Self {
            inner: Arc::new(SessionInner {
                directory,
                generation: AtomicU64::new(0),
                status,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.inner.status.subscribe()
    }

    pub fn status(&self) -> SearchStatus {
        self.inner.status.borrow().clone()
    }

    /// Issues a new search and returns the generation it runs under.
    pub fn set_query(&self, query: &str) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.inner.status.send(SearchStatus::InFlight {
            query: query.to_string(),
        });
        let session = self.inner.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            let result = session.directory.search(&query).await;
            if session.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(%query, generation, "dropping stale search result");
                return;
            }
            let mut next = Some(match result {
                Ok(blocks) => SearchStatus::Results {
                    query: query.clone(),
                    blocks,
                },
                Err(e) => {
                    tracing::warn!(%query, error = %e, "block directory search failed");
                    SearchStatus::Failed {
                        query: query.clone(),
                        message: e.to_string(),
                    }
                }
            });
            // Re-checked inside the channel closure so a set_query racing
            // with this completion cannot be overwritten by a stale status.
            session.status.send_if_modified(|current| {
                if session.generation.load(Ordering::SeqCst) != generation {
                    return false;
                }
                match next.take() {
                    Some(status) => {
                        *current = status;
                        true
                    }
                    None => false,
                }
            });
        });
        generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::transport::{
        Transport, TransportError, TransportRequest, TransportResponse,
    };
    use crate::application::services::directory::DirectoryRoutes;

    /// Answers the search route with a per-term canned body after a per-term
    /// delay, so tests can make an older request outlive a newer one.
    struct DelayedTransport {
        responses: Vec<(&'static str, Duration, serde_json::Value)>,
    }

    #[async_trait]
    impl Transport for DelayedTransport {
        async fn request(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            for (term, delay, body) in &self.responses {
                if request.url.contains(&format!("term={term}")) {
                    tokio::time::sleep(*delay).await;
                    return Ok(TransportResponse {
                        status: 200,
                        body: serde_json::to_vec(body).unwrap(),
                    });
                }
            }
            Err(TransportError::Request(format!(
                "unmatched url {}",
                request.url
            )))
        }
    }

    fn session(responses: Vec<(&'static str, Duration, serde_json::Value)>) -> SearchSession {
        let client = DirectoryClient::new(
            Arc::new(DelayedTransport { responses }),
            DirectoryRoutes {
                base_url: "https://example.test".into(),
                search_path: "/block-directory/search".into(),
                install_path: "/block-directory/install".into(),
            },
        );
        SearchSession::new(Arc::new(client))
    }

    fn record(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "title": "Some Block",
            "id": "some-block",
        })
    }

    async fn settled(rx: &mut watch::Receiver<SearchStatus>) -> SearchStatus {
        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                SearchStatus::Idle | SearchStatus::InFlight { .. } => {
                    rx.changed().await.unwrap();
                }
                terminal => return terminal,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_query_is_surfaced() {
        let session = session(vec![
            (
                "slow",
                Duration::from_millis(200),
                serde_json::json!([record("ns/slow-block")]),
            ),
            (
                "fast",
                Duration::from_millis(10),
                serde_json::json!([record("ns/fast-block")]),
            ),
        ]);
        let mut rx = session.subscribe();

        session.set_query("slow");
        session.set_query("fast");

        let status = settled(&mut rx).await;
        match &status {
            SearchStatus::Results { query, blocks } => {
                assert_eq!(query, "fast");
                assert_eq!(blocks[0].name, "ns/fast-block");
            }
            other => panic!("expected results for the fast query, got {other:?}"),
        }

        // Let the superseded request come home; the status must not move.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(session.status(), status);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_results_are_distinct_from_in_flight_and_failure() {
        let session = session(vec![(
            "nothing",
            Duration::from_millis(10),
            serde_json::json!([]),
        )]);
        let mut rx = session.subscribe();

        assert_eq!(session.status(), SearchStatus::Idle);
        session.set_query("nothing");
        assert!(matches!(session.status(), SearchStatus::InFlight { .. }));

        match settled(&mut rx).await {
            SearchStatus::Results { blocks, .. } => assert!(blocks.is_empty()),
            other => panic!("expected empty results, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_surface_as_failed_status() {
        // No canned response matches, so the transport errors out.
        let session = session(Vec::new());
        let mut rx = session.subscribe();

        session.set_query("anything");
        match settled(&mut rx).await {
            SearchStatus::Failed { query, .. } => assert_eq!(query, "anything"),
            other => panic!("expected a failed status, got {other:?}"),
        }
    }
}
