pub mod circuit_breakers;
pub mod collect;
pub mod context;
pub mod delist;
pub mod error;
pub mod http;
pub mod process;
pub mod progress;
pub mod resume;
pub mod run;

pub use context::{CancelHandle, Context, PauseHandle, ProgressCallback};
pub use error::OrchestratorError;
pub use http::{FetchOutcome, HttpFetcher};
pub use process::ProcessDeps;
pub use progress::{Phase, ProgressSnapshot};
pub use resume::ResumeState;
pub use run::{run_task, RunParams};
