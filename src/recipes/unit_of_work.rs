// ============================================================================
// Account / Contact / Case / Task unit of work
// ============================================================================
//
// Creates an account, a contact, a service case linked to both, and two
// follow-up tasks on the case in one atomic unit of work, then returns the
// ids of everything created.
//
// ============================================================================

use super::Clock;
use crate::context::{Context, InvocationEvent};
use crate::core::{DataApiError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionInput {
    pub account_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOutput {
    pub account_id: String,
    pub contact_id: String,
    pub case_id: String,
    pub task_ids: Vec<String>,
}

pub struct UnitOfWorkFunction {
    clock: Clock,
}

impl Default for UnitOfWorkFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfWorkFunction {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for the reminder date
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub async fn apply(
        &self,
        event: &InvocationEvent<FunctionInput>,
        context: &Context,
    ) -> Result<FunctionOutput> {
        let span = info_span!("recipe.unit_of_work", event_id = %event.id);
        self.run(event.data(), context).instrument(span).await
    }

    async fn run(&self, input: &FunctionInput, context: &Context) -> Result<FunctionOutput> {
        let account_name = required("accountName", &input.account_name)?;
        let last_name = required("lastName", &input.last_name)?;
        let subject = required("subject", &input.subject)?;

        let data_api = context.org()?.data_api();
        let mut uow = data_api.new_unit_of_work_builder();

        let account = data_api
            .new_record_builder("Account")
            .with_field("Name", account_name)?
            .build()?;
        let account_ref = uow.register_create(account)?;

        let contact = data_api
            .new_record_builder("Contact")
            .with_optional_field("FirstName", input.first_name.as_deref())?
            .with_field("LastName", last_name)?
            .with_field("AccountId", &account_ref)?
            .build()?;
        let contact_ref = uow.register_create(contact)?;

        let service_case = data_api
            .new_record_builder("Case")
            .with_field("Subject", subject)?
            .with_optional_field("Description", input.description.as_deref())?
            .with_field("Origin", "Web")?
            .with_field("Status", "New")?
            .with_field("AccountId", &account_ref)?
            .with_field("ContactId", &contact_ref)?
            .build()?;
        let case_ref = uow.register_create(service_case)?;

        let reminder_date = (self.clock)() + Duration::days(2);

        let reminder_task = data_api
            .new_record_builder("Task")
            .with_field("Subject", "Call")?
            .with_field("WhatId", &case_ref)?
            .with_field("WhoId", &contact_ref)?
            .with_field("Description", "Please call customer to verify service location")?
            .with_field("Priority", "High")?
            .with_field("IsReminderSet", true)?
            .with_field("ActivityDate", reminder_date)?
            .build()?;
        let reminder_ref = uow.register_create(reminder_task)?;

        let followup_task = data_api
            .new_record_builder("Task")
            .with_field("Subject", "Email")?
            .with_field("WhatId", &case_ref)?
            .with_field("WhoId", &contact_ref)?
            .with_field(
                "Description",
                "Please follow up with customer after verifying service location",
            )?
            .build()?;
        let followup_ref = uow.register_create(followup_task)?;

        let result = match data_api.commit_unit_of_work(uow.build()?).await {
            Ok(result) => result,
            Err(err) => {
                event!(Level::ERROR, "Failed to insert record. Root Cause : {}", err);
                return Err(err);
            }
        };

        event!(
            Level::INFO,
            "Function successfully committed UoW with {} affected records!",
            result.len()
        );

        Ok(FunctionOutput {
            account_id: result.resolve(&account_ref)?.to_string(),
            contact_id: result.resolve(&contact_ref)?.to_string(),
            case_id: result.resolve(&case_ref)?.to_string(),
            task_ids: vec![
                result.resolve(&reminder_ref)?.to_string(),
                result.resolve(&followup_ref)?.to_string(),
            ],
        })
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DataApiError::InvalidPayload(format!("Please provide {}", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert_eq!(required("x", &Some("a".into())).unwrap(), "a");
        assert!(required("x", &Some("  ".into())).is_err());

        let err = required("accountName", &None).unwrap_err();
        assert_eq!(err.to_string(), "Please provide accountName");
    }

    #[test]
    fn test_input_camel_case() {
        let input: FunctionInput = serde_json::from_str(
            r#"{"accountName":"Acme","lastName":"Doe","subject":"Broken"}"#,
        )
        .unwrap();

        assert_eq!(input.account_name.as_deref(), Some("Acme"));
        assert!(input.first_name.is_none());
    }
}
