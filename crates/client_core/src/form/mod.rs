//! The "create event" form controller.
//!
//! [`FormController`] owns the draft, runs validation, talks to the event
//! store through an [`EventTransport`] and drives the
//! `Loading -> Editing -> Submitting -> {Success, Error}` state machine.
//! Rendering is left to the caller, which reads state through accessors and
//! forwards user actions to the methods here.
//!
//! Timers and image previews are held as guards, so dropping the controller
//! (or calling [`FormController::unmount`]) cancels pending timers and
//! revokes every preview reference.

use std::{path::Path, time::Duration};

use chrono::{NaiveDate, Utc};
use shared::protocol::EventPayload;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    error::{FormError, TransportError},
    transport::EventTransport,
};

mod draft;
mod preview;
mod timer;
mod validation;

pub use draft::{DraftField, EventDraft};
pub use preview::{AttachedImage, ImageFile, PreviewHandle, PreviewRegistry};
pub use timer::FormSignal;
pub use validation::{validate_draft, ValidationReport, Violation, ACCEPTED_IMAGE_TYPES};

use timer::ScopedTimer;

pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_DISMISS_WINDOW: Duration = Duration::from_secs(7);
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save event data";
pub const SAVE_ERROR_MESSAGE: &str = "Error saving event data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// How long the skeleton stays up after mount.
    pub loading_delay: Duration,
    /// How long the success banner stays up unless dismissed.
    pub dismiss_window: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            loading_delay: DEFAULT_LOADING_DELAY,
            dismiss_window: DEFAULT_DISMISS_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Loading,
    Editing,
    Submitting,
    Success,
    Error,
}

impl FormPhase {
    fn name(self) -> &'static str {
        match self {
            FormPhase::Loading => "loading",
            FormPhase::Editing => "editing",
            FormPhase::Submitting => "submitting",
            FormPhase::Success => "showing a confirmation",
            FormPhase::Error => "showing an error",
        }
    }
}

#[derive(Debug)]
struct SuccessBanner {
    generation: u64,
    created_on: NaiveDate,
    _dismiss_timer: ScopedTimer,
}

pub struct FormController<T: EventTransport> {
    transport: T,
    settings: FormSettings,
    phase: FormPhase,
    draft: EventDraft,
    image: Option<AttachedImage>,
    previews: PreviewRegistry,
    message: Option<String>,
    success: Option<SuccessBanner>,
    banner_generation: u64,
    cancel_dialog_open: bool,
    scroll_to_top: bool,
    last_created: Option<EventPayload>,
    loading_timer: Option<ScopedTimer>,
    signal_tx: UnboundedSender<FormSignal>,
    signal_rx: UnboundedReceiver<FormSignal>,
}

impl<T: EventTransport> FormController<T> {
    /// Creates an empty form in [`FormPhase::Loading`] and arms the loading
    /// timer. Must be called from within a tokio runtime.
    pub fn mount(transport: T, settings: FormSettings) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let loading_timer = ScopedTimer::arm(
            settings.loading_delay,
            FormSignal::LoadingFinished,
            signal_tx.clone(),
        );
        debug!(loading_delay = ?settings.loading_delay, "event form mounted");
        Self {
            transport,
            settings,
            phase: FormPhase::Loading,
            draft: EventDraft::default(),
            image: None,
            previews: PreviewRegistry::new(),
            message: None,
            success: None,
            banner_generation: 0,
            cancel_dialog_open: false,
            scroll_to_top: false,
            last_created: None,
            loading_timer: Some(loading_timer),
            signal_tx,
            signal_rx,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn settings(&self) -> FormSettings {
        self.settings
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn image(&self) -> Option<&AttachedImage> {
        self.image.as_ref()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// The inline validation or submission error, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Text of the confirmation banner while it is visible.
    pub fn success_message(&self) -> Option<String> {
        self.success
            .as_ref()
            .map(|banner| format!("Event created on {}!", banner.created_on.format("%B %-d, %Y")))
    }

    pub fn is_cancel_dialog_open(&self) -> bool {
        self.cancel_dialog_open
    }

    /// The record most recently accepted by the store from this form.
    pub fn last_created(&self) -> Option<&EventPayload> {
        self.last_created.as_ref()
    }

    /// Returns and clears a pending request to scroll the view to the top.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    pub fn has_pending_timers(&self) -> bool {
        self.loading_timer.is_some() || self.success.is_some()
    }

    pub fn update_field(&mut self, field: DraftField, value: &str) {
        self.draft.set(field, value);
        self.after_edit();
    }

    pub fn set_event_date(&mut self, date: NaiveDate) {
        self.draft.event_date = Some(date);
        self.after_edit();
    }

    fn after_edit(&mut self) {
        self.message = None;
        if self.phase == FormPhase::Error {
            self.phase = FormPhase::Editing;
        }
    }

    /// Replaces any attached image. The MIME type is not checked here.
    pub fn attach_image(&mut self, file: ImageFile) {
        let preview = self.previews.create();
        debug!(
            file_name = %file.file_name,
            mime_type = %file.mime_type,
            size = file.bytes.len(),
            "banner image attached"
        );
        self.image = Some(AttachedImage::new(file, preview));
    }

    pub async fn attach_image_from_path(&mut self, path: &Path) -> Result<(), FormError> {
        let file = ImageFile::from_path(path).await?;
        self.attach_image(file);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        if self.image.take().is_some() {
            debug!("banner image cleared");
        }
    }

    pub fn validate(&self) -> ValidationReport {
        validate_draft(
            &self.draft,
            self.image.as_ref().map(AttachedImage::mime_type),
        )
    }

    /// Validates the draft and, when it passes, sends it to the store.
    ///
    /// On success the draft and image are cleared and the confirmation
    /// banner is shown. On failure the draft is left as it was so the user
    /// can try again; nothing is retried automatically. Dropping the returned
    /// future before it completes puts the form back in `Editing`.
    ///
    /// A validation failure while the banner is up moves the phase to `Error`
    /// but leaves the banner and its timer alone; the banner's expiry then
    /// hides it without touching the `Error` phase.
    pub async fn submit(&mut self) -> Result<EventPayload, FormError> {
        if matches!(self.phase, FormPhase::Loading | FormPhase::Submitting) {
            return Err(FormError::NotReady(self.phase.name()));
        }

        let report = self.validate();
        if let Some(message) = report.message() {
            warn!(violations = report.violations().len(), "event form failed validation");
            self.message = Some(message);
            self.phase = FormPhase::Error;
            self.scroll_to_top = true;
            return Err(FormError::Validation(report));
        }

        self.message = None;
        self.success = None;
        let payload = self.draft.to_payload(self.image.as_ref());

        let outcome = {
            let submitting = SubmittingGuard::enter(&mut self.phase);
            let outcome = self.transport.create_event(&payload).await;
            submitting.complete();
            outcome
        };

        match outcome {
            Ok(created) => {
                info!(event_name = %created.event_name, "event created");
                self.draft = EventDraft::default();
                self.image = None;
                self.last_created = Some(created.clone());
                self.show_success_banner();
                self.scroll_to_top = true;
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "event submission failed");
                self.message = Some(failure_message(&err).to_string());
                self.phase = FormPhase::Error;
                Err(FormError::Transport(err))
            }
        }
    }

    fn show_success_banner(&mut self) {
        self.banner_generation += 1;
        let generation = self.banner_generation;
        let timer = ScopedTimer::arm(
            self.settings.dismiss_window,
            FormSignal::DismissElapsed { generation },
            self.signal_tx.clone(),
        );
        self.success = Some(SuccessBanner {
            generation,
            created_on: Utc::now().date_naive(),
            _dismiss_timer: timer,
        });
        self.phase = FormPhase::Success;
    }

    /// Hides the confirmation banner before its window elapses.
    pub fn dismiss_success(&mut self) {
        if self.success.take().is_some() {
            debug!("success banner dismissed");
        }
        if self.phase == FormPhase::Success {
            self.phase = FormPhase::Editing;
        }
    }

    /// Loads the stored record back into the form ("Edit Event").
    pub async fn edit_last_event(&mut self) -> Result<Option<EventPayload>, FormError> {
        self.dismiss_success();
        let latest = self.transport.fetch_latest().await?;
        if let Some(payload) = &latest {
            self.draft = EventDraft::from_payload(payload);
            self.image = None;
            self.after_edit();
            debug!(event_name = %payload.event_name, "stored event loaded for editing");
        }
        Ok(latest)
    }

    /// First step of cancelling: opens the confirmation dialog.
    pub fn request_cancel(&mut self) {
        self.cancel_dialog_open = true;
    }

    pub fn abort_cancel(&mut self) {
        self.cancel_dialog_open = false;
    }

    /// Clears the whole draft if the dialog is open. Returns whether anything
    /// was cleared.
    pub fn confirm_cancel(&mut self) -> bool {
        if !std::mem::take(&mut self.cancel_dialog_open) {
            return false;
        }
        self.draft = EventDraft::default();
        self.image = None;
        self.after_edit();
        debug!("event form cleared");
        true
    }

    /// Applies every timer expiry that is already queued, without waiting.
    pub fn process_signals(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.apply_signal(signal);
            applied += 1;
        }
        applied
    }

    /// Waits for the next timer expiry and applies it. Returns `None` right
    /// away when no timer is pending.
    pub async fn next_signal(&mut self) -> Option<FormSignal> {
        if !self.has_pending_timers() {
            return self.signal_rx.try_recv().ok().map(|signal| {
                self.apply_signal(signal);
                signal
            });
        }
        let signal = self.signal_rx.recv().await?;
        self.apply_signal(signal);
        Some(signal)
    }

    fn apply_signal(&mut self, signal: FormSignal) {
        match signal {
            FormSignal::LoadingFinished => {
                self.loading_timer = None;
                if self.phase == FormPhase::Loading {
                    self.phase = FormPhase::Editing;
                    debug!("event form ready");
                }
            }
            FormSignal::DismissElapsed { generation } => {
                let current = self.success.as_ref().map(|banner| banner.generation);
                if current != Some(generation) {
                    debug!(generation, "ignoring stale dismiss timer");
                    return;
                }
                self.dismiss_success();
            }
        }
    }

    /// Tears the form down. Pending timers are cancelled and preview
    /// references revoked, same as dropping it.
    pub fn unmount(self) {
        debug!(
            pending_timers = self.has_pending_timers(),
            live_previews = self.previews.live_count(),
            "event form unmounted"
        );
    }
}

/// Holds the form in `Submitting` while the transport call is in flight.
/// Dropped without [`SubmittingGuard::complete`], it returns the form to
/// `Editing`.
struct SubmittingGuard<'a> {
    phase: &'a mut FormPhase,
    armed: bool,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(phase: &'a mut FormPhase) -> Self {
        *phase = FormPhase::Submitting;
        Self { phase, armed: true }
    }

    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && *self.phase == FormPhase::Submitting {
            warn!("event submission abandoned before completing");
            *self.phase = FormPhase::Editing;
        }
    }
}

fn failure_message(err: &TransportError) -> &'static str {
    if err.is_status() {
        SAVE_FAILED_MESSAGE
    } else {
        SAVE_ERROR_MESSAGE
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
