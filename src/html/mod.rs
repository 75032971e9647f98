//! HTML module
//!
//! Page templates and the presenter that fills them with relay results
//! and the remote file listing.

mod presenter;
mod template;

pub use presenter::{banner, failure_page, file_options, render};
pub use template::{PageTemplate, Templates};
