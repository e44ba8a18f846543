use bytes::Bytes;

use crate::Mode;

/// Share of the overall progress scale reserved for the upload.
pub const UPLOAD_SHARE: f32 = 0.2;

/// A user-selected audio file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub name: String,
    pub data: Bytes,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One upload request, built fresh for every submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    pub mode: Mode,
    pub genre: String,
    pub vocal_style: Option<String>,
    pub audio: Option<AudioFile>,
    pub reference: Option<AudioFile>,
    pub is_demo: bool,
}

impl JobSubmission {
    /// Text parts of the multipart body, in wire order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("mode", self.mode.as_str().to_string()),
            ("genre", self.genre.clone()),
        ];
        if self.mode == Mode::Vocal {
            if let Some(style) = &self.vocal_style {
                fields.push(("vocal_style", style.clone()));
            }
        }
        if self.is_demo {
            fields.push(("demo", "true".to_string()));
        }
        fields
    }

    /// File parts of the multipart body. Demo submissions carry none, and the
    /// reference file is only sent in mix mode.
    pub fn file_fields(&self) -> Vec<(&'static str, &AudioFile)> {
        if self.is_demo {
            return Vec::new();
        }
        let mut files = Vec::with_capacity(2);
        if let Some(audio) = &self.audio {
            files.push(("audio", audio));
        }
        if self.mode == Mode::Mix {
            if let Some(reference) = &self.reference {
                files.push(("reference", reference));
            }
        }
        files
    }

    pub fn upload_bytes(&self) -> u64 {
        self.file_fields().iter().map(|(_, file)| file.len()).sum()
    }
}

/// Maps upload byte counts onto the first [`UPLOAD_SHARE`] of the progress bar.
///
/// An unknown total (zero) reports no progress.
pub fn upload_progress(sent: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let fraction = sent as f64 / total as f64;
    let scaled = (fraction * f64::from(UPLOAD_SHARE)) as f32;
    scaled.clamp(0.0, UPLOAD_SHARE)
}
