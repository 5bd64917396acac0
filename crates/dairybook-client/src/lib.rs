pub mod billing;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod import;

pub use commands::common::{SourcePaths, SourceTable};
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use import::TableLayout;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
