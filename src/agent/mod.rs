mod hitl;
pub use hitl::*;

mod runtime;
pub use runtime::*;

mod state;
pub use state::*;

pub mod middleware;
pub use middleware::*;
