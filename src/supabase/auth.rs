//! Sign-in and sign-up through the Supabase auth (GoTrue) API.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    Error,
    identity::{IdentityProvider, Session, User, UserId},
    supabase::{ApiError, SupabaseClient, check_response},
};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        User {
            id: UserId::new(user.id),
            email: user.email.unwrap_or_default(),
        }
    }
}

/// The body of a token response, or of a sign-up response that signs the
/// user in straight away.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: AuthUser,
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Session {
            access_token: response.access_token,
            expires_at: OffsetDateTime::now_utc() + Duration::seconds(response.expires_in),
            user: response.user.into(),
        }
    }
}

/// Sign-up answers with a session if email confirmation is off, otherwise
/// with the new user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

fn into_auth_error(error: ApiError) -> Error {
    Error::Auth(error.message)
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let response = self
            .request(Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&Credentials {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let response = check_response(response).await.map_err(|error| {
            match error.status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Error::InvalidCredentials,
                _ => into_auth_error(error),
            }
        })?;

        let session: Session = response.json::<TokenResponse>().await?.into();
        tracing::info!("User {} signed in", session.user.id);

        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, Error> {
        let response = self
            .request(Method::POST, "/auth/v1/signup", None)
            .json(&Credentials {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let response = check_response(response).await.map_err(into_auth_error)?;

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => {
                let session: Session = token.into();
                tracing::info!("Registered and signed in user {}", session.user.id);
                Ok(Some(session))
            }
            SignUpResponse::User(user) => {
                tracing::info!("Registered user {}, awaiting email confirmation", user.id);
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, session: &Session) -> Result<(), Error> {
        let response = self
            .request(
                Method::POST,
                "/auth/v1/logout",
                Some(&session.access_token),
            )
            .send()
            .await?;

        check_response(response).await.map_err(into_auth_error)?;

        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<User, Error> {
        let response = self
            .request(Method::GET, "/auth/v1/user", Some(access_token))
            .send()
            .await?;

        let response = check_response(response)
            .await
            .map_err(|error| match error.status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::NotAuthenticated,
                _ => into_auth_error(error),
            })?;

        Ok(response.json::<AuthUser>().await?.into())
    }
}
