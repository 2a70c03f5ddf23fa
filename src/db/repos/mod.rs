mod forms;
mod purge_locks;
mod submissions;

pub use forms::*;
pub use purge_locks::*;
pub use submissions::*;
