use async_trait::async_trait;
use reqwest::{Request, Response};

/// Abstraction over the HTTP transport, so the pipeline can be exercised
/// against canned responses in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
