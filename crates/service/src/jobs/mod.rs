//! Background job processing system
//!
//! Distance resolution runs here, off the request path. The queue is
//! in-process; deduplication across processes happens one level up through
//! job records in the cache.

pub mod generic_handler;
pub mod handlers;
pub mod processor;
pub mod types;

pub use handlers::BackgroundJobHandler;
pub use processor::{JobHandler, JobProcessor, JobProcessorConfig, RetryPolicy};
pub use types::{BackgroundJob, JobError, JobResult};
