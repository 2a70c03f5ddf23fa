mod form;
mod submission;

pub use form::*;
pub use submission::*;
