//! Service layer
//!
//! Services hold the client-side logic: the registry keeps the session's
//! task list fresh, and the selection controller decides what the polling
//! engine is bound to.

mod registry;
mod selection;

pub use registry::JobRegistry;
pub use selection::SelectionController;
