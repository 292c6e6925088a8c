use super::prelude::*;

#[derive(Default)]
pub struct VoteMutations;

#[Object]
impl VoteMutations {
    /// Vote for a link; one vote per user per link (requires authentication)
    async fn vote(&self, ctx: &Context<'_>, link_id: ID) -> Result<Vote> {
        let subject = ctx.subject()?.to_string();
        let db = ctx.data_unchecked::<Database>();
        let link_id = link_id.to_string();

        let link = db
            .links()
            .get_by_id(&link_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        if link.is_none() {
            return Err(ApiError::LinkNotFound.extend());
        }

        // Fast path only; the UNIQUE(user_id, link_id) constraint on the
        // insert below is what actually holds under concurrent votes.
        let already = db
            .votes()
            .exists(&subject, &link_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        if already {
            return Err(ApiError::AlreadyVoted.extend());
        }

        let record = db
            .votes()
            .create(CreateVote {
                user_id: subject.clone(),
                link_id: link_id.clone(),
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::AlreadyVoted.extend()
                } else {
                    ApiError::from(e).extend()
                }
            })?;

        tracing::info!(user_id = %subject, link_id = %link_id, "vote recorded");

        Ok(record.into())
    }
}
