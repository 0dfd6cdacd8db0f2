use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for dataset retrieval; tests substitute a canned
/// implementation so no pipeline test touches the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
