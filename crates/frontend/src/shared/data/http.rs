use async_trait::async_trait;
use contracts::shared::provisioning::{CreateEntityTableRequest, CREATE_ENTITY_TABLE};
use contracts::shared::record::RawRecord;
use contracts::shared::rest::{SelectQuery, FUNCTIONS_PREFIX, REST_PREFIX};
use gloo_net::http::{Request, RequestBuilder, Response};

use super::backend::{DataBackend, DataError, DataResult, SchemaProvisioner};
use crate::shared::api_utils::{api_url, bearer_header, error_message};

/// REST client for `/api/rest`, authenticated with the stored access token
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpBackend;

fn table_url(table: &str) -> String {
    api_url(&format!("{}/{}", REST_PREFIX, urlencoding::encode(table)))
}

fn row_url(table: &str, id: &str) -> String {
    format!("{}/{}", table_url(table), urlencoding::encode(id))
}

fn authorized(builder: RequestBuilder) -> DataResult<RequestBuilder> {
    let header = bearer_header().ok_or(DataError::Unauthenticated)?;
    Ok(builder.header("Authorization", &header))
}

async fn check(response: Response) -> DataResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = error_message(response).await;
    Err(match status {
        401 => DataError::Unauthenticated,
        404 => DataError::NotFound(message),
        406 => DataError::NotSingle,
        _ => DataError::Status { status, message },
    })
}

async fn send(request: Request) -> DataResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| DataError::Network(e.to_string()))?;
    check(response).await
}

async fn send_builder(builder: RequestBuilder) -> DataResult<Response> {
    let response = builder
        .send()
        .await
        .map_err(|e| DataError::Network(e.to_string()))?;
    check(response).await
}

async fn read_row(response: Response) -> DataResult<RawRecord> {
    response
        .json::<RawRecord>()
        .await
        .map_err(|e| DataError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl DataBackend for HttpBackend {
    async fn select(&self, table: &str, query: &SelectQuery) -> DataResult<Vec<RawRecord>> {
        let pairs = query.to_query_pairs();
        let builder = authorized(Request::get(&table_url(table)))?
            .query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let response = send_builder(builder).await?;
        response
            .json::<Vec<RawRecord>>()
            .await
            .map_err(|e| DataError::Decode(e.to_string()))
    }

    async fn select_single(&self, table: &str, id: &str) -> DataResult<RawRecord> {
        let response = send_builder(authorized(Request::get(&row_url(table, id)))?).await?;
        read_row(response).await
    }

    async fn insert(&self, table: &str, row: RawRecord) -> DataResult<RawRecord> {
        let request = authorized(Request::post(&table_url(table)))?
            .json(&row)
            .map_err(|e| DataError::Decode(e.to_string()))?;
        read_row(send(request).await?).await
    }

    async fn update(&self, table: &str, id: &str, patch: RawRecord) -> DataResult<RawRecord> {
        let request = authorized(Request::patch(&row_url(table, id)))?
            .json(&patch)
            .map_err(|e| DataError::Decode(e.to_string()))?;
        read_row(send(request).await?).await
    }

    async fn delete(&self, table: &str, id: &str) -> DataResult<()> {
        send_builder(authorized(Request::delete(&row_url(table, id)))?).await?;
        Ok(())
    }
}

/// Calls the `create-entity-table` function
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpProvisioner;

#[async_trait(?Send)]
impl SchemaProvisioner for HttpProvisioner {
    async fn create_entity_table(&self, request: &CreateEntityTableRequest) -> DataResult<()> {
        let url = api_url(&format!("{}/{}", FUNCTIONS_PREFIX, CREATE_ENTITY_TABLE));
        let request = authorized(Request::post(&url))?
            .json(request)
            .map_err(|e| DataError::Decode(e.to_string()))?;
        send(request).await?;
        Ok(())
    }
}
