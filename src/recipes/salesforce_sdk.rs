// ============================================================================
// Single Account write and read back
// ============================================================================
//
// Creates one Account from the payload, with a timestamp appended to its
// name, then looks it up by the returned id to confirm what the store holds.
//
// ============================================================================

use super::Clock;
use crate::context::{Context, InvocationEvent};
use crate::core::{DataApiError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

pub const NAME_TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionInput {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOutput {
    pub accounts: Vec<Account>,
}

pub struct SalesforceSdkFunction {
    clock: Clock,
}

impl Default for SalesforceSdkFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesforceSdkFunction {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for the name suffix
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub async fn apply(
        &self,
        event: &InvocationEvent<FunctionInput>,
        context: &Context,
    ) -> Result<FunctionOutput> {
        let span = info_span!("recipe.salesforce_sdk", event_id = %event.id);
        self.run(event.data(), context).instrument(span).await
    }

    async fn run(&self, input: &FunctionInput, context: &Context) -> Result<FunctionOutput> {
        let name = match input.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DataApiError::InvalidPayload("Account Name is required".into())),
        };

        let data_api = context.org()?.data_api();
        let stamped_name = format!("{}-{}", name, (self.clock)().format(NAME_TIMESTAMP_FORMAT));

        let account = data_api
            .new_record_builder("Account")
            .with_field("Name", stamped_name)?
            .with_optional_field("AccountNumber", input.account_number.as_deref())?
            .with_optional_field("Industry", input.industry.as_deref())?
            .with_optional_field("Type", input.account_type.as_deref())?
            .with_optional_field("Website", input.website.as_deref())?
            .build()?;

        let created = match data_api.create(account).await {
            Ok(created) => created,
            Err(err) => {
                event!(Level::ERROR, "Failed to create account. Root Cause : {}", err);
                return Err(err);
            }
        };

        let records: Vec<_> = data_api
            .find_by_id("Account", created.id())
            .await?
            .into_iter()
            .collect();

        event!(
            Level::INFO,
            "Function successfully queried {} account records!",
            records.len()
        );

        let accounts = records
            .iter()
            .map(|record| Account {
                id: record.id.to_string(),
                name: record.string_field("Name").unwrap_or_default().to_string(),
            })
            .collect();

        Ok(FunctionOutput { accounts })
    }
}
