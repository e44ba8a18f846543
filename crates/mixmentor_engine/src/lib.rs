//! MixMentor engine: backend HTTP client, upload, polling and report export.
mod client;
mod engine;
mod export;
mod poller;
mod types;
mod upload;

pub use client::{ApiSettings, ChannelEventSink, EventSink, JobApi, ReqwestJobApi};
pub use engine::{EngineCommand, EngineHandle};
pub use export::{
    ensure_output_dir, export_report, report_filename, AtomicFileWriter, PersistError,
};
pub use poller::Poller;
pub use types::{
    ApiError, EngineError, EngineEvent, FailureKind, FilePart, JobCreated, JobId, StatusReport,
    UploadForm,
};
