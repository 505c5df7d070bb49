//! Functions composed on top of the Data API.

pub mod salesforce_sdk;
pub mod unit_of_work;

pub use salesforce_sdk::SalesforceSdkFunction;
pub use unit_of_work::{FunctionInput, FunctionOutput, UnitOfWorkFunction};

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Injectable source of "now"
pub(crate) type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;
