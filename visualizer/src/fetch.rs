use hidcore::prelude::{FetchFailure, FetchResult};
use hidcore::StatusSnapshot;
use std::time::Duration;

pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// One `GET` of the tracker state endpoint.
pub async fn fetch_snapshot(client: reqwest::Client, endpoint: String) -> FetchResult<StatusSnapshot> {
    let response = client
        .get(&endpoint)
        .send()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;
    StatusSnapshot::from_slice(&body)
}
