//! Transaction rows through the Supabase REST (PostgREST) API.
//!
//! Row level security on the `transactions` table limits every request to the
//! rows of the user the access token belongs to. Every query also filters on
//! `user_id`.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::{
    Error,
    identity::{Session, UserId},
    store::{SortOrder, TransactionFilter, TransactionStore},
    supabase::{ApiError, SupabaseClient, check_response},
    transaction::{NewTransaction, Transaction, TransactionId},
};

const TRANSACTIONS_PATH: &str = "/rest/v1/transactions";

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    user_id: UserId,
    #[serde(flatten)]
    transaction: &'a NewTransaction,
}

fn into_store_error(error: ApiError) -> Error {
    Error::Store(error.message)
}

#[async_trait]
impl TransactionStore for SupabaseClient {
    async fn select(
        &self,
        session: &Session,
        filter: TransactionFilter,
        order: SortOrder,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query = vec![
            ("select", "*".to_owned()),
            ("user_id", format!("eq.{}", session.user.id)),
        ];

        if let Some(kind) = filter.kind {
            query.push(("type", format!("eq.{kind}")));
        }

        if order == SortOrder::DateDescending {
            query.push(("order", "date.desc".to_owned()));
        }

        let response = self
            .request(Method::GET, TRANSACTIONS_PATH, Some(&session.access_token))
            .query(&query)
            .send()
            .await?;

        let response = check_response(response).await.map_err(into_store_error)?;
        let transactions = response.json::<Vec<Transaction>>().await?;
        tracing::debug!("Selected {} transactions", transactions.len());

        Ok(transactions)
    }

    async fn insert(
        &self,
        session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let response = self
            .request(Method::POST, TRANSACTIONS_PATH, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .json(&[InsertRow {
                user_id: session.user.id,
                transaction: &transaction,
            }])
            .send()
            .await?;

        let response = check_response(response).await.map_err(into_store_error)?;

        response
            .json::<Vec<Transaction>>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::error!("Supabase did not return the inserted transaction");
                Error::Store("the inserted transaction was not returned".to_owned())
            })
    }

    async fn delete(&self, session: &Session, id: TransactionId) -> Result<usize, Error> {
        let response = self
            .request(Method::DELETE, TRANSACTIONS_PATH, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("eq.{id}")),
                ("user_id", format!("eq.{}", session.user.id)),
            ])
            .send()
            .await?;

        let response = check_response(response).await.map_err(into_store_error)?;
        let deleted = response.json::<Vec<serde_json::Value>>().await?;

        Ok(deleted.len())
    }
}
