//! State behind the upload form: what is selected, what is shown, and
//! whether a submission is in flight.

use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    client::Analyzer,
    constants::{MISSING_IMAGE_MESSAGE, SUBMIT_FAILED_MESSAGE},
    error::{FailureKind, SubmitError},
    preview::{PreviewHandle, PreviewStore},
    selection::SelectedImage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Submitting,
    Succeeded,
    Failed,
}

/// What the form currently shows below the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The analysis payload, pretty-printed with two-space indentation.
    Result(String),
    Error(String),
}

#[derive(Debug)]
pub struct ViewState {
    previews: PreviewStore,
    selected: Option<SelectedImage>,
    preview: Option<PreviewHandle>,
    result: Option<Value>,
    loading: bool,
    error: Option<String>,
    last_failure: Option<FailureKind>,
    drag_active: bool,
}

impl ViewState {
    pub fn new(previews: PreviewStore) -> Self {
        Self {
            previews,
            selected: None,
            preview: None,
            result: None,
            loading: false,
            error: None,
            last_failure: None,
            drag_active: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Submitting
        } else if self.result.is_some() {
            Phase::Succeeded
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.selected.is_some() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Kind of the most recent submission failure, for diagnostics only.
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    /// Whether the submit trigger is enabled.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.loading
    }

    pub fn select(&mut self, image: SelectedImage) {
        debug!(
            "selected {} ({} bytes, {})",
            image.file_name(),
            image.len(),
            image.content_type()
        );
        // Assigning drops the previous handle, which revokes its URL.
        self.preview = Some(self.previews.create(&image));
        self.selected = Some(image);
        self.result = None;
        self.error = None;
        self.last_failure = None;
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Ends a drag; a dropped file replaces the selection.
    pub fn drop_file(&mut self, image: Option<SelectedImage>) {
        self.drag_active = false;
        if let Some(image) = image {
            self.select(image);
        }
    }

    /// First half of a submission.
    ///
    /// Returns the image to upload and marks the form as loading. Returns
    /// `None` when there is nothing to send: either no image is selected (the
    /// missing-image message is set) or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<SelectedImage> {
        if self.loading {
            warn!("submission already in flight, ignoring submit");
            return None;
        }

        let Some(image) = self.selected.clone() else {
            self.result = None;
            self.error = Some(MISSING_IMAGE_MESSAGE.to_string());
            self.last_failure = None;
            return None;
        };

        info!("submitting {}", image.file_name());
        self.loading = true;
        self.error = None;
        Some(image)
    }

    /// Second half of a submission: record how the upload settled.
    pub fn settle(&mut self, outcome: Result<Value, SubmitError>) {
        self.loading = false;

        match outcome {
            Ok(payload) => {
                info!("analysis received");
                self.result = Some(payload);
                self.error = None;
                self.last_failure = None;
            }
            Err(err) => {
                warn!("submission failed ({}): {}", err.kind(), err);
                self.result = None;
                self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                self.last_failure = Some(err.kind());
            }
        }
    }

    /// Uploads the selected image through `analyzer` and records the outcome.
    pub async fn submit<A: Analyzer>(&mut self, analyzer: &A) {
        let Some(image) = self.begin_submit() else {
            return;
        };
        let in_flight = InFlight {
            state: self,
            settled: false,
        };
        let outcome = analyzer.analyze(&image).await;
        in_flight.settle(outcome);
    }

    fn abandon(&mut self) {
        warn!("submission dropped before it settled");
        self.loading = false;
        self.result = None;
        self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
        self.last_failure = Some(FailureKind::Cancelled);
    }

    pub fn render(&self) -> Option<Rendered> {
        if let Some(error) = &self.error {
            return Some(Rendered::Error(error.clone()));
        }
        self.result
            .as_ref()
            .map(|payload| Rendered::Result(serde_json::to_string_pretty(payload).unwrap_or_default()))
    }

    /// Back to an empty form; releases the preview.
    pub fn reset(&mut self) {
        self.selected = None;
        self.preview = None;
        self.result = None;
        self.error = None;
        self.last_failure = None;
        self.loading = false;
        self.drag_active = false;
    }
}

/// Clears the loading flag if a submission future is dropped mid-upload.
struct InFlight<'a> {
    state: &'a mut ViewState,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, outcome: Result<Value, SubmitError>) {
        self.state.settle(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.abandon();
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PreviewStore::new())
    }
}
