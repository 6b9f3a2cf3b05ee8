pub mod config;
pub mod error;
pub mod invoker;
pub mod outcome;
pub mod pipeline;
pub mod process;
pub mod publisher;
pub mod redact;
pub mod retriever;
pub mod templates;

pub use config::{default_scan_name, ScanConfig, RESULTS_FILE, SARIF_FILE};
pub use error::TaskError;
pub use outcome::{Outcome, ResolvedOutcome};
pub use pipeline::{TaskRun, TaskSettings};
pub use process::{ProcessResult, StreamSource};
