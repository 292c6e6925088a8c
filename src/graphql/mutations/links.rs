use super::prelude::*;

#[derive(Default)]
pub struct LinkMutations;

#[Object]
impl LinkMutations {
    /// Post a new link (requires authentication)
    async fn post(&self, ctx: &Context<'_>, url: String, description: String) -> Result<Link> {
        // Auth is checked before anything is written.
        let subject = ctx.subject()?.to_string();
        let db = ctx.data_unchecked::<Database>();

        let record = db
            .links()
            .create(CreateLink {
                url,
                description,
                posted_by: subject.clone(),
            })
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(user_id = %subject, link_id = %record.id, "link posted");

        Ok(record.into())
    }
}
