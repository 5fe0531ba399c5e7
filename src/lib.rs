macro_rules! flat_mod {
    ($($i:ident),+) => {
        $(
            mod $i;
            pub use $i::*;
        )+
    }
}

/// Releases an OpenCL handle, logging instead of panicking on failure.
/// Meant for `Drop` implementations, where unwinding would abort.
macro_rules! tri_warn {
    ($call:ident ($($arg:expr),*)) => {
        match unsafe { $call($($arg),*) } {
            0 => {},
            err => tracing::warn!(
                call = stringify!($call),
                code = crate::error::ErrorCL::from(err).name(),
                "failed to release OpenCL object"
            )
        }
    };
}

pub mod prelude {
    pub use crate::platform::Platform;
    pub use crate::device::{Device, DeviceType};
    pub use crate::context::{Context, ContextProps};
    pub use crate::queue::{CommandQueue, CommandQueueProps};
    pub use crate::error::{ErrorCL, Result, ApiCall};
    pub use crate::program::{Program, BuildStatus};
    pub use crate::event::{Event, BaseEvent, ProfilingInfo, EMPTY};
    pub use crate::buffer::{MemBuffer, MemFlags};
    pub use crate::kernel::Kernel;
}

pub mod error;
pub mod platform;
pub mod device;
pub mod queue;
pub mod context;
pub mod program;
pub mod buffer;
pub mod event;
pub mod kernel;

pub mod utils;
pub mod cli;
pub mod tutorial;
