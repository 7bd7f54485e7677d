//! Live Monitor tab
//!
//! [`MonitorView`] is the rendered state, [`RefreshEngine`] reconciles it
//! with the controller one tick at a time, and [`RefreshTask`] drives the
//! engine until it is cancelled.

mod engine;
mod task;
mod view;

pub use engine::{RefreshEngine, ERRORS_VARIABLE};
pub use task::RefreshTask;
pub use view::{
    BarState, DisplayChange, DisplayState, ErrorSlot, FlagCell, MessageRow, MonitorView, ERROR_SLOTS,
    UNKNOWN_VALUE,
};
