use super::prelude::*;

#[derive(Default)]
pub struct FeedQueries;

#[Object]
impl FeedQueries {
    /// List posted links, oldest first (no auth required)
    async fn feed(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Substring match against url or description")] filter: Option<String>,
        #[graphql(desc = "Number of links to skip")] skip: Option<i64>,
        #[graphql(desc = "Maximum number of links to return")] first: Option<i64>,
    ) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();

        let records = db
            .links()
            .list(filter.as_deref(), skip.unwrap_or(0), first)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(records.into_iter().map(Link::from).collect())
    }
}
