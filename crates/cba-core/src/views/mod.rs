//! Page state machines.
//!
//! Each page owns its state exclusively and drops it on navigation. Remote
//! calls are split into a `begin_*` step that checks the loading gate and
//! mints a [`Ticket`](crate::lifecycle::Ticket), and a `finish_*` step that
//! applies the whole result at once, or nothing if the ticket went stale.
//! The free `async` functions in each module run both steps against an
//! [`IndicatorApi`](crate::api::IndicatorApi).

pub mod chat;
pub mod compare;
pub mod results;
pub mod upload;

pub use chat::ChatView;
pub use compare::CompareView;
pub use results::{DataSource, ResultsView, ViewMode};
pub use upload::{UploadState, UploadView};
