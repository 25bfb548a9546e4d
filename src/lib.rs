pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod preview;
pub mod selection;
pub mod view_state;

pub use client::{AnalysisClient, Analyzer};
pub use config::EndpointConfig;
pub use error::{ConfigError, FailureKind, LoadError, SubmitError};
pub use preview::{PreviewHandle, PreviewStore};
pub use selection::SelectedImage;
pub use view_state::{Phase, Rendered, ViewState};
