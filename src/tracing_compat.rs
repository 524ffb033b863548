//! Optional tracing integration.
//!
//! With the `tracing-integration` feature (on by default) this module
//! re-exports the `tracing` event macros. Without it the same names resolve
//! to macros that expand to nothing, so call sites stay identical:
//!
//! ```
//! use frankenticket::tracing_compat::info;
//!
//! info!(action = "login", "ticket issued");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    /// Swallows its arguments when tracing is compiled out.
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __frankenticket_noop_event {
        ($($arg:tt)*) => {{}};
    }
}

#[cfg(not(feature = "tracing-integration"))]
pub use crate::__frankenticket_noop_event as debug;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__frankenticket_noop_event as error;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__frankenticket_noop_event as info;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__frankenticket_noop_event as trace;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__frankenticket_noop_event as warn;
