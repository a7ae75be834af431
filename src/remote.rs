//! Remote document store: create-or-replace one record by slug.
//!
//! Records are sent in the typed-value document form
//! (`{"fields": {"name": {"stringValue": ...}, ...}}`) with an HTTP PATCH.

use serde_json::{Map, Value, json};
use species_types::SpeciesRecord;

use crate::config::RemoteConfig;
use crate::error::{CatalogError, Result};

pub trait DocumentStore {
    fn upsert(&self, slug: &str, record: &SpeciesRecord) -> Result<()>;
}

/// Encode a JSON value as a typed document value.
pub fn to_typed_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => match n.as_u64() {
                Some(u) => json!({ "integerValue": u.to_string() }),
                None => json!({ "doubleValue": n.as_f64() }),
            },
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(to_typed_value).collect::<Vec<_>>() } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": typed_fields(fields) } }),
    }
}

fn typed_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), to_typed_value(v)))
        .collect()
}

/// Request body for one record: `{"fields": {...}}`.
pub fn document_body(record: &SpeciesRecord) -> Result<Value> {
    let value = serde_json::to_value(record).map_err(|e| CatalogError::RemoteUpsert {
        slug: record.slug.clone(),
        status: None,
        detail: format!("cannot encode record: {e}"),
    })?;
    let fields = match &value {
        Value::Object(fields) => typed_fields(fields),
        _ => Map::new(),
    };
    Ok(json!({ "fields": fields }))
}

pub struct FirestoreStore {
    base_url: String,
    project_id: String,
    collection: String,
    api_key: String,
    agent: ureq::Agent,
}

impl FirestoreStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::Config(
                "no API key for the remote store; set FIRESTORE_API_KEY".to_string(),
            ));
        }
        // Non-2xx responses come back as responses so their body can be reported.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            agent,
        })
    }

    pub fn document_url(&self, slug: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}?key={}",
            self.base_url, self.project_id, self.collection, slug, self.api_key
        )
    }
}

impl DocumentStore for FirestoreStore {
    fn upsert(&self, slug: &str, record: &SpeciesRecord) -> Result<()> {
        let body = document_body(record)?;
        let url = self.document_url(slug);
        tracing::debug!("PATCH {}/{}", self.collection, slug);

        let mut response = self
            .agent
            .patch(&url)
            .send_json(&body)
            .map_err(|e| CatalogError::RemoteUpsert {
                slug: slug.to_string(),
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .body_mut()
                .read_to_string()
                .unwrap_or_else(|e| format!("<unreadable response body: {e}>"));
            return Err(CatalogError::RemoteUpsert {
                slug: slug.to_string(),
                status: Some(status.as_u16()),
                detail,
            });
        }

        tracing::info!("remote document {}/{} updated", self.collection, slug);
        Ok(())
    }
}
