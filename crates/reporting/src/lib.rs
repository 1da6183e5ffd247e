pub mod asset;
pub mod composer;
pub mod payload;
pub mod session;
pub mod source;

pub use composer::{ComposeError, RequestComposer};
pub use session::ReportingSession;
pub use source::{ConfigSource, SourceError, SourceResult};
