use hidcore::StatusSnapshot;
use log::info;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use warp::{http::StatusCode, Filter};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 13000))
}

#[derive(Debug, Default)]
struct BridgeState {
    snapshot: StatusSnapshot,
    down: bool,
}

/// Serves the latest tracker snapshot at `GET /api/state`.
#[derive(Clone, Default)]
pub struct StateBridge {
    state: Arc<RwLock<BridgeState>>,
}

impl StateBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let cors = warp::cors().allow_any_origin().allow_method("GET");

        warp::path!("api" / "state")
            .and(warp::get())
            .and(state_filter)
            .and_then(|state: Arc<RwLock<BridgeState>>| async move {
                let guard = state.read().await;
                let reply = if guard.down {
                    warp::reply::with_status(
                        warp::reply::json(&json!({"error": "tracker unavailable"})),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                } else {
                    warp::reply::with_status(warp::reply::json(&guard.snapshot), StatusCode::OK)
                };
                Ok::<_, warp::Rejection>(reply)
            })
            .with(cors)
    }

    /// Replaces the served snapshot; `down` makes the route answer 500.
    pub async fn publish(&self, snapshot: StatusSnapshot, down: bool) {
        let mut guard = self.state.write().await;
        if guard.down != down {
            info!("[WebHID] endpoint {}", if down { "down" } else { "up" });
        }
        guard.snapshot = snapshot;
        guard.down = down;
    }

    pub async fn serve(self, address: SocketAddr) {
        info!("[WebHID] serving tracker state at http://{address}/api/state");
        warp::serve(self.routes()).run(address).await;
    }

    #[cfg(test)]
    pub async fn snapshot(&self) -> StatusSnapshot {
        self.state.read().await.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidcore::snapshot::TrackerStates;

    #[tokio::test]
    async fn state_route_serves_published_snapshot() {
        let bridge = StateBridge::new();
        let snapshot = StatusSnapshot {
            tracker_state: TrackerStates::new(["ONLINE"]),
            leader_signal_strength: 190,
            bandit_signal: Some(-58),
            ..Default::default()
        };
        bridge.publish(snapshot.clone(), false).await;
        assert_eq!(bridge.snapshot().await, snapshot);

        let response = warp::test::request()
            .method("GET")
            .path("/api/state")
            .reply(&bridge.routes())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let decoded = StatusSnapshot::from_slice(response.body()).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[tokio::test]
    async fn state_route_fails_during_outage() {
        let bridge = StateBridge::new();
        bridge.publish(StatusSnapshot::default(), true).await;

        let response = warp::test::request()
            .method("GET")
            .path("/api/state")
            .reply(&bridge.routes())
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
