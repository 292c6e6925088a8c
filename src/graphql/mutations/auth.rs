//! GraphQL authentication mutations
//!
//! Signup and login both return an [AuthPayload] carrying a signed token
//! and the user. Neither requires authentication.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new account and return a signed token
    async fn signup(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
        name: String,
    ) -> Result<AuthPayload> {
        let db = ctx.data_unchecked::<Database>();
        let auth = ctx.data_unchecked::<AuthService>();

        let password_hash = auth.hash_password(&password).map_err(|e| e.extend())?;

        let user = db
            .users()
            .create(CreateUser {
                email,
                password_hash,
                name,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::DuplicateUser.extend()
                } else {
                    ApiError::from(e).extend()
                }
            })?;

        let token = auth.issue_token(&user.id).map_err(|e| e.extend())?;

        tracing::info!(user_id = %user.id, "user signed up");

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }

    /// Authenticate with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let db = ctx.data_unchecked::<Database>();
        let auth = ctx.data_unchecked::<AuthService>();

        let user = db
            .users()
            .get_by_email(&email)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| {
                tracing::warn!("login failed: unknown email");
                ApiError::UserNotFound.extend()
            })?;

        let valid = auth
            .verify_password(&password, &user.password_hash)
            .map_err(|e| e.extend())?;
        if !valid {
            tracing::warn!(user_id = %user.id, "login failed: wrong password");
            return Err(ApiError::InvalidCredentials.extend());
        }

        let token = auth.issue_token(&user.id).map_err(|e| e.extend())?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(AuthPayload {
            token,
            user: user.into(),
        })
    }
}
