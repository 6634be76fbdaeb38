use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::store::{Collection, Condition, DocumentStore, Filter, FindOptions, SortOrder};

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    /// The anon key goes out both as `apikey` and as the bearer token.
    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, query, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

/// Document store backed by PostgREST tables named after each collection.
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: SupabaseClient::new(config),
        }
    }

    fn table_path(collection: Collection) -> String {
        format!("/rest/v1/{}", collection.as_str())
    }

    fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

/// Translates a filter into PostgREST query operators (`eq.`, `in.(…)`).
pub fn filter_to_query(filter: &Filter) -> Vec<(String, String)> {
    filter
        .conditions()
        .iter()
        .map(|(field, condition)| {
            let operator = match condition {
                Condition::Eq(value) => format!("eq.{}", scalar_to_param(value)),
                Condition::In(values) => {
                    let quoted: Vec<String> = values
                        .iter()
                        .map(|v| format!("\"{}\"", scalar_to_param(v).replace('"', "\\\"")))
                        .collect();
                    format!("in.({})", quoted.join(","))
                }
            };
            (field.clone(), operator)
        })
        .collect()
}

fn options_to_query(options: &FindOptions) -> Vec<(String, String)> {
    let mut query = Vec::new();

    if let Some((field, order)) = &options.sort {
        let direction = match order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        query.push(("order".to_string(), format!("{}.{}", field, direction)));
    }

    if let Some(limit) = options.limit {
        query.push(("limit".to_string(), limit.to_string()));
    }

    query
}

fn scalar_to_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn insert(&self, collection: Collection, document: Value) -> Result<()> {
        let _: Vec<Value> = self
            .client
            .request_with_headers(
                Method::POST,
                &Self::table_path(collection),
                &[],
                Some(document),
                Some(Self::representation_headers()),
            )
            .await?;

        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>> {
        let mut query = filter_to_query(filter);
        query.extend(options_to_query(&options));

        self.client
            .request(Method::GET, &Self::table_path(collection), &query, None)
            .await
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        changes: Map<String, Value>,
    ) -> Result<u64> {
        let updated: Vec<Value> = self
            .client
            .request_with_headers(
                Method::PATCH,
                &Self::table_path(collection),
                &filter_to_query(filter),
                Some(Value::Object(changes)),
                Some(Self::representation_headers()),
            )
            .await?;

        Ok(updated.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_to_query_operators() {
        let filter = Filter::new()
            .eq("role", "doctor")
            .eq("is_active", true)
            .is_in("status", ["pending", "dispensed"]);

        let query = filter_to_query(&filter);
        assert_eq!(
            query,
            vec![
                ("role".to_string(), "eq.doctor".to_string()),
                ("is_active".to_string(), "eq.true".to_string()),
                ("status".to_string(), "in.(\"pending\",\"dispensed\")".to_string()),
            ]
        );
    }

    #[test]
    fn test_options_to_query() {
        let options = FindOptions::limit(1000).sort_by("timestamp", SortOrder::Ascending);
        assert_eq!(
            options_to_query(&options),
            vec![
                ("order".to_string(), "timestamp.asc".to_string()),
                ("limit".to_string(), "1000".to_string()),
            ]
        );
    }
}
