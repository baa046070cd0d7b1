// The review analysis pipeline and its input/output types.

pub mod analyze;
pub mod input;
pub mod result;
