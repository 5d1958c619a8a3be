//! Client side of the event form: the HTTP transport to the event store and
//! the form controller that drives it.

pub mod error;
pub mod form;
pub mod transport;

pub use error::{FormError, TransportError};
pub use form::{
    DraftField, EventDraft, FormController, FormPhase, FormSettings, ImageFile, ValidationReport,
    Violation,
};
pub use transport::{EventTransport, HttpEventClient};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
