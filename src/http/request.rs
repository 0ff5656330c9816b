//! Outbound request construction.
//!
//! # Responsibilities
//! - Decide which request shape a job needs (`RequestKind`)
//! - Resolve the target URL, headers and query string against the backend
//!
//! # Decision Table
//! ```text
//! file_url present              → Upload  (always multipart POST)
//! GET                           → Query   (query + headers only)
//! POST/PUT/DELETE with a body   → Json    (declared verb, JSON body)
//! anything else                 → Other   (declared verb, body if present)
//! ```

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::backend::BackendEndpoint;
use crate::http::error::ProxyError;
use crate::job::JobInput;

/// Shape of the request sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    /// Download `file_url`, then POST it as multipart part `file`.
    Upload {
        file_url: String,
        fields: Vec<(String, String)>,
    },
    /// Plain GET.
    Query,
    /// POST/PUT/DELETE with a JSON body.
    Json { method: Method, body: Value },
    /// Any other combination: declared verb, JSON body when present.
    Other { method: Method, body: Option<Value> },
}

impl RequestKind {
    /// Classify a job input.
    pub fn classify(input: &JobInput) -> Result<Self, ProxyError> {
        let method = parse_method(&input.method)?;

        if let Some(file_url) = input.file_url() {
            return Ok(RequestKind::Upload {
                file_url: file_url.to_string(),
                fields: form_fields(&input.body)?,
            });
        }

        let kind = match method {
            Method::GET => RequestKind::Query,
            m if input.has_body() && is_json_verb(&m) => RequestKind::Json {
                method: m,
                body: input.body.clone(),
            },
            m => RequestKind::Other {
                method: m,
                body: input.has_body().then(|| input.body.clone()),
            },
        };
        Ok(kind)
    }

    /// Verb actually sent to the backend.
    pub fn method(&self) -> Method {
        match self {
            RequestKind::Upload { .. } => Method::POST,
            RequestKind::Query => Method::GET,
            RequestKind::Json { method, .. } | RequestKind::Other { method, .. } => method.clone(),
        }
    }
}

/// Fully resolved request, derived from a job input and the backend endpoint.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub kind: RequestKind,
    pub url: Url,
    pub headers: HeaderMap,
    /// Sorted by key.
    pub query: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn from_job(input: &JobInput, endpoint: &BackendEndpoint) -> Result<Self, ProxyError> {
        let kind = RequestKind::classify(input)?;
        let url = endpoint
            .url_for(&input.path)
            .map_err(|e| ProxyError::Unexpected(format!("invalid path '{}': {}", input.path, e)))?;

        let mut headers = header_map(&input.headers)?;
        if matches!(kind, RequestKind::Upload { .. }) {
            // The multipart encoder sets its own boundary.
            headers.remove(CONTENT_TYPE);
        }

        let query = input
            .query_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect();

        Ok(Self { kind, url, headers, query })
    }

    pub fn method(&self) -> Method {
        self.kind.method()
    }
}

fn parse_method(raw: &str) -> Result<Method, ProxyError> {
    let upper = raw.trim().to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| ProxyError::Unexpected(format!("invalid HTTP method '{}'", raw)))
}

fn is_json_verb(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::DELETE
}

/// Body fields sent alongside an uploaded file.
fn form_fields(body: &Value) -> Result<Vec<(String, String)>, ProxyError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()),
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        _ => Err(ProxyError::Unexpected(
            "file upload body must be a JSON object".to_string(),
        )),
    }
}

fn header_map(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap, ProxyError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ProxyError::Unexpected(format!("invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ProxyError::Unexpected(format!("invalid value for header '{}': {}", name, e)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(method: &str, body: Value, file_url: Option<&str>) -> JobInput {
        JobInput {
            method: method.into(),
            body,
            file_url: file_url.map(String::from),
            ..JobInput::default()
        }
    }

    #[test]
    fn test_file_url_forces_multipart_post() {
        for method in ["GET", "POST", "PUT", "patch"] {
            let kind = RequestKind::classify(&input(method, json!({ "model": "w" }), Some("http://f/a.wav"))).unwrap();
            assert_eq!(kind.method(), Method::POST);
            assert_eq!(
                kind,
                RequestKind::Upload {
                    file_url: "http://f/a.wav".into(),
                    fields: vec![("model".into(), "w".into())],
                }
            );
        }
    }

    #[test]
    fn test_get_ignores_body() {
        let kind = RequestKind::classify(&input("get", json!({ "a": 1 }), None)).unwrap();
        assert_eq!(kind, RequestKind::Query);
    }

    #[test]
    fn test_json_verbs_with_body() {
        for (raw, method) in [("POST", Method::POST), ("put", Method::PUT), ("Delete", Method::DELETE)] {
            let kind = RequestKind::classify(&input(raw, json!({ "a": 1 }), None)).unwrap();
            assert_eq!(kind, RequestKind::Json { method, body: json!({ "a": 1 }) });
        }
    }

    #[test]
    fn test_fallback_cases() {
        let kind = RequestKind::classify(&input("DELETE", json!({}), None)).unwrap();
        assert_eq!(kind, RequestKind::Other { method: Method::DELETE, body: None });

        let kind = RequestKind::classify(&input("PATCH", json!({ "a": 1 }), None)).unwrap();
        assert_eq!(
            kind,
            RequestKind::Other { method: Method::PATCH, body: Some(json!({ "a": 1 })) }
        );

        let kind = RequestKind::classify(&input("HEAD", Value::Null, None)).unwrap();
        assert_eq!(kind, RequestKind::Other { method: Method::HEAD, body: None });
    }

    #[test]
    fn test_invalid_method_is_unexpected() {
        let err = RequestKind::classify(&input("NOT A VERB", Value::Null, None)).unwrap_err();
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn test_form_fields_stringify_non_strings() {
        let fields = form_fields(&json!({ "language": "en", "temperature": 0.5, "stream": false })).unwrap();
        assert!(fields.contains(&("language".into(), "en".into())));
        assert!(fields.contains(&("temperature".into(), "0.5".into())));
        assert!(fields.contains(&("stream".into(), "false".into())));
    }

    #[test]
    fn test_upload_with_non_object_body_is_rejected() {
        let err = RequestKind::classify(&input("POST", json!([1, 2]), Some("http://f/a.wav"))).unwrap_err();
        assert!(matches!(err, ProxyError::Unexpected(_)));
    }

    #[test]
    fn test_outbound_request_resolution() {
        let endpoint = BackendEndpoint::new("127.0.0.1", 8000).unwrap();
        let mut job = input("POST", json!({ "model": "w" }), Some("http://f/a.wav"));
        job.path = "/v1/audio/transcriptions".into();
        job.headers.insert("Content-Type".into(), "application/json".into());
        job.headers.insert("Authorization".into(), "Bearer t".into());
        job.query_params.insert("b".into(), "2".into());
        job.query_params.insert("a".into(), "1".into());

        let outbound = OutboundRequest::from_job(&job, &endpoint).unwrap();
        assert_eq!(outbound.url.as_str(), "http://127.0.0.1:8000/v1/audio/transcriptions");
        assert!(outbound.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(outbound.headers["authorization"], "Bearer t");
        assert_eq!(
            outbound.query,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_invalid_header_is_unexpected() {
        let endpoint = BackendEndpoint::new("127.0.0.1", 8000).unwrap();
        let mut job = JobInput::default();
        job.headers.insert("bad header".into(), "x".into());

        let err = OutboundRequest::from_job(&job, &endpoint).unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }
}
