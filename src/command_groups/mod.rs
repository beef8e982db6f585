mod invocation;
mod tutor_commands;
mod queue_commands;

pub use invocation::*;
pub use tutor_commands::*;
pub use queue_commands::*;
