use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use mentor_logging::mentor_trace;
use reqwest::multipart::{Form, Part};

use crate::{EngineEvent, EventSink, FilePart, UploadForm};

/// Size of the slices file bodies are streamed in; one progress event per slice.
const UPLOAD_CHUNK: usize = 64 * 1024;

/// Builds the multipart body. File parts are streamed so the bytes handed to
/// the transport can be reported as they go out.
pub(crate) fn build_multipart(
    submission: u64,
    form: UploadForm,
    sink: Arc<dyn EventSink>,
) -> Form {
    let total = form.total_bytes();
    let sent = Arc::new(AtomicU64::new(0));

    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    for file in form.files {
        let FilePart {
            field,
            file_name,
            data,
        } = file;
        let len = data.len() as u64;
        let body = reqwest::Body::wrap_stream(progress_stream(
            data,
            submission,
            total,
            sent.clone(),
            sink.clone(),
        ));
        let part = Part::stream_with_length(body, len).file_name(file_name);
        multipart = multipart.part(field, part);
    }
    multipart
}

fn progress_stream(
    data: Bytes,
    submission: u64,
    total: u64,
    sent: Arc<AtomicU64>,
    sink: Arc<dyn EventSink>,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(UPLOAD_CHUNK)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK).min(data.len())))
        .collect();

    stream::iter(chunks).map(move |chunk| {
        let now = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        mentor_trace!("upload #{} {}/{} bytes", submission, now, total);
        sink.emit(EngineEvent::UploadProgress {
            submission,
            sent: now,
            total,
        });
        Ok(chunk)
    })
}
