//! Provides the types that describe what to send to which printers.

pub mod command;
pub mod option;
pub mod plan;
pub mod target;

#[doc(inline)]
pub use command::{CommandDocument, PrintCommand};

#[doc(inline)]
pub use option::{CalibrationOptions, OptionMask};

#[doc(inline)]
pub use plan::{HostPlan, Plan, Step};
