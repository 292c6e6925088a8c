use super::prelude::*;

#[derive(Default)]
pub struct SystemQueries;

#[Object]
impl SystemQueries {
    /// Short description of this API (no auth required)
    async fn info(&self) -> Result<String> {
        Ok("This is the API of a Hackernews clone".to_string())
    }
}
