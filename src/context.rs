// ============================================================================
// Invocation Envelope
// ============================================================================
//
// What the hosting runtime hands to a function: the triggering event with
// its decoded payload, and a context exposing the org's Data API.
//
// ============================================================================

use crate::DataApi;
use crate::core::{DataApiError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event that triggered a function invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationEvent<T> {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub time: DateTime<Utc>,
    pub data: T,
}

impl<T> InvocationEvent<T> {
    /// Wrap a payload in a freshly stamped event
    pub fn new(source: &str, data: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.to_string(),
            event_type: "com.salesforce.function.invoke.sync".to_string(),
            time: Utc::now(),
            data,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

/// Org the function runs against
#[derive(Clone)]
pub struct Org {
    id: String,
    data_api: DataApi,
}

impl Org {
    pub fn new(data_api: DataApi) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data_api,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_api(&self) -> &DataApi {
        &self.data_api
    }
}

/// Per-invocation context
#[derive(Clone)]
pub struct Context {
    id: String,
    org: Option<Org>,
}

impl Context {
    pub fn new(org: Option<Org>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            org,
        }
    }

    /// Context bound to an org using `data_api`
    pub fn with_data_api(data_api: DataApi) -> Self {
        Self::new(Some(Org::new(data_api)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// # Errors
    /// `Configuration` if the function was invoked without an org.
    pub fn org(&self) -> Result<&Org> {
        self.org.as_ref().ok_or_else(|| {
            DataApiError::Configuration("no org is associated with this invocation".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_org() {
        let context = Context::new(None);
        assert!(matches!(context.org(), Err(DataApiError::Configuration(_))));
    }

    #[test]
    fn test_event_deserialize() {
        let json = r#"{
            "id": "00Dxx0000006IYJEA2-4Y4W3Lw_LkoskcHdEaZze-uow",
            "source": "urn:event:from:salesforce/xx/228.0/00Dxx0000006IYJ/apex/UnitOfWorkFunction:test():7",
            "type": "com.salesforce.function.invoke.sync",
            "time": "2022-01-03T10:00:00Z",
            "data": { "accountName": "Acme" }
        }"#;

        let event: InvocationEvent<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "com.salesforce.function.invoke.sync");
        assert_eq!(event.data()["accountName"], "Acme");
    }
}
