//! Per-run log sink
//!
//! Every line a validation run emits goes through its own [`RunLog`], which
//! carries the run's batch prefix and tracing span. Nothing process-wide is
//! reconfigured by a run, so concurrent runs in directory mode stay isolated.

use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{Span, debug, error, info, info_span, warn};

/// Log sink owned by a single validation run
#[derive(Debug, Clone)]
pub struct RunLog {
    prefix: String,
    span: Span,
    capture: Option<Arc<Mutex<Vec<String>>>>,
}

impl RunLog {
    /// Create a sink for checking `path`, optionally tagged with a batch id
    pub fn new(path: &Path, batch_id: Option<&str>) -> Self {
        let batch = batch_id.unwrap_or("");
        Self {
            prefix: batch_prefix(batch_id),
            span: info_span!("check", file = %path.display(), batch = %batch),
            capture: None,
        }
    }

    /// Also keep every emitted line in memory
    pub fn capturing(mut self) -> Self {
        self.capture = Some(Arc::new(Mutex::new(Vec::new())));
        self
    }

    /// Batch prefix prepended to each line
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Lines emitted so far (empty unless capturing)
    pub fn lines(&self) -> Vec<String> {
        match &self.capture {
            Some(capture) => capture
                .lock()
                .map(|lines| lines.clone())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        self.span.in_scope(|| info!("{}", line));
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        self.span.in_scope(|| warn!("{}", line));
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        self.span.in_scope(|| error!("{}", line));
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        let line = format!("{}{}", self.prefix, message.as_ref());
        self.span.in_scope(|| debug!("{}", line));
    }

    fn line(&self, message: &str) -> String {
        let line = format!("{}{}", self.prefix, message);
        if let Some(capture) = &self.capture {
            if let Ok(mut lines) = capture.lock() {
                lines.push(line.clone());
            }
        }
        line
    }
}

fn batch_prefix(batch_id: Option<&str>) -> String {
    match batch_id {
        Some(id) if !id.trim().is_empty() => format!("({}) ", id),
        _ => String::new(),
    }
}
