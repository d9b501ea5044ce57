//! Cloud Firestore REST client.
//!
//! Documents are created with `POST .../documents/{collection}` (the server
//! assigns the id) and read back with the paginated list endpoint. Requests
//! carry the signed-in user's id token so Firestore security rules apply.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::{DocumentStore, FieldValue, Record, StoreError, StoredRecord};
use crate::config::FirebaseConfig;
use crate::identity::Session;
use crate::remote::{api_error_message, http_client};

/// Largest page the list endpoint accepts without complaint.
const PAGE_SIZE: u32 = 300;

/// Firestore client for one project's default database.
pub struct Firestore {
    client: reqwest::Client,
    documents_root: String,
}

impl Firestore {
    /// Create a new Firestore client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
            documents_root: format!(
                "{}/projects/{}/databases/(default)/documents",
                config.firestore_url.trim_end_matches('/'),
                config.project_id
            ),
        })
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        Url::parse(&format!("{}/{collection}", self.documents_root))
            .map_err(|e| StoreError::Parse(format!("invalid collection URL: {e}")))
    }

    async fn fail(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        StoreError::Api {
            status: status.as_u16(),
            message: api_error_message(status, &body),
        }
    }
}

#[async_trait]
impl DocumentStore for Firestore {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    #[instrument(skip(self, session, record), fields(user_id = %session.user_id))]
    async fn insert(
        &self,
        session: &Session,
        collection: &str,
        record: Record,
    ) -> Result<String, StoreError> {
        let url = self.collection_url(collection)?;
        let body = json!({ "fields": encode_fields(&record) });

        let response = self
            .client
            .post(url)
            .bearer_auth(session.id_token().expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        let id = document_id(&document.name)?;

        debug!(%id, "Created document");
        Ok(id)
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn get_all(
        &self,
        session: &Session,
        collection: &str,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.collection_url(collection)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(session.id_token().expose_secret())
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::fail(response).await);
            }

            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Parse(e.to_string()))?;

            for document in page.documents {
                records.push(StoredRecord {
                    id: document_id(&document.name)?,
                    fields: decode_fields(&document.fields),
                });
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = records.len(), "Listed documents");
        Ok(records)
    }
}

/// A Firestore document resource.
#[derive(Debug, Deserialize)]
struct Document {
    /// `projects/{p}/databases/(default)/documents/{collection}/{id}`
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// The trailing path segment of a document resource name.
fn document_id(name: &str) -> Result<String, StoreError> {
    name.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| StoreError::Parse(format!("document name without id: {name}")))
}

fn encode_fields(record: &Record) -> Map<String, Value> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Encode a field as a Firestore `Value` object.
fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // int64 travels as a decimal string
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
    }
}

/// Decode the fields of a document, dropping value kinds we do not model.
fn decode_fields(fields: &Map<String, Value>) -> Record {
    fields
        .iter()
        .filter_map(|(key, value)| match decode_value(value) {
            Some(decoded) => Some((key.clone(), decoded)),
            None => {
                debug!(field = %key, "Skipping unsupported field value");
                None
            }
        })
        .collect()
}

fn decode_value(value: &Value) -> Option<FieldValue> {
    let (kind, inner) = value.as_object()?.iter().next()?;
    match kind.as_str() {
        "nullValue" => Some(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Bool),
        "integerValue" => match inner {
            Value::String(s) => s.parse().ok().map(FieldValue::Integer),
            other => other.as_i64().map(FieldValue::Integer),
        },
        "doubleValue" => match inner {
            Value::String(s) => s.parse().ok().map(FieldValue::Double),
            other => other.as_f64().map(FieldValue::Double),
        },
        "stringValue" => inner.as_str().map(|s| FieldValue::String(s.to_owned())),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc))),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_document_id() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/products/Xy12").unwrap(),
            "Xy12"
        );
        assert!(document_id("projects/p/databases/(default)/documents/products/").is_err());
    }

    #[test]
    fn test_encode_value_shapes() {
        assert_eq!(
            encode_value(&FieldValue::Integer(42)),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            encode_value(&FieldValue::from("Mug")),
            json!({ "stringValue": "Mug" })
        );
        assert_eq!(
            encode_value(&FieldValue::Double(2.5)),
            json!({ "doubleValue": 2.5 })
        );
        assert_eq!(encode_value(&FieldValue::Null), json!({ "nullValue": null }));
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            encode_value(&FieldValue::Timestamp(at)),
            json!({ "timestampValue": "2024-03-01T12:00:00.000000Z" })
        );
    }

    #[test]
    fn test_list_response_decodes() {
        let body = json!({
            "documents": [{
                "name": "projects/p/databases/(default)/documents/products/abc",
                "fields": {
                    "name": { "stringValue": "Espresso Cups" },
                    "quantity": { "integerValue": "4" },
                    "price": { "doubleValue": 12.5 },
                    "dateAdded": { "integerValue": "1700000000000" },
                    "location": { "geoPointValue": { "latitude": 51.5, "longitude": -0.1 } }
                },
                "createTime": "2024-03-01T12:00:00.000000Z",
                "updateTime": "2024-03-01T12:00:00.000000Z"
            }],
            "nextPageToken": "page-2"
        });

        let page: ListDocumentsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));

        let document = &page.documents[0];
        let fields = decode_fields(&document.fields);
        assert_eq!(fields["name"].as_str(), Some("Espresso Cups"));
        assert_eq!(fields["quantity"].as_i64(), Some(4));
        assert_eq!(fields["price"].as_f64(), Some(12.5));
        assert_eq!(fields["dateAdded"].as_i64(), Some(1_700_000_000_000));
        assert!(!fields.contains_key("location"));
    }

    #[test]
    fn test_empty_collection_decodes() {
        let page: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_timestamp_decodes() {
        let decoded = decode_value(&json!({ "timestampValue": "2024-03-01T12:00:00Z" })).unwrap();
        assert_eq!(
            decoded,
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
    }
}
