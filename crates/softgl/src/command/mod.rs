//! Pipeline operations and display lists
//!
//! Calls on a context are turned into [`Op`] values. In immediate mode they
//! run at once; while a list is being compiled they are appended to it. A
//! list replay feeds its records back through the same dispatch.
//!
//! A list that calls itself, directly or through other lists, recurses
//! without bound. Such cycles are a caller error and are not detected.

pub mod display_list;
pub mod op;

pub use display_list::{DisplayList, ListMode, ListRecorder, ListTable, ParamBuffer};
pub use op::Op;
