use error_stack::Report;
use opencl_sys::{cl_event, cl_ulong};
use crate::{prelude::Result, error::ErrorCL};

flat_mod!(base, buffer);

/// Common behaviour of every event handed out by an enqueue.
pub trait Event: Sized + AsRef<BaseEvent> {
    /// Blocks until the command behind the event has completed.
    #[inline(always)]
    fn wait (&self) -> Result<()> {
        BaseEvent::wait_ref(self.as_ref())
    }

    /// Profiling counters of the command. The queue must have been created with
    /// [`PROFILING_ENABLE`](crate::queue::CommandQueueProps::PROFILING_ENABLE).
    #[inline(always)]
    fn profiling_info (&self) -> Result<ProfilingInfo> {
        BaseEvent::profiling_info_ref(self.as_ref())
    }
}

/// Device timestamps, in nanoseconds, of a command's life cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfilingInfo {
    pub queued: cl_ulong,
    pub submitted: cl_ulong,
    pub started: cl_ulong,
    pub ended: cl_ulong
}

impl ProfilingInfo {
    /// Time spent between being enqueued by the host and submitted to the device.
    #[inline(always)]
    pub fn queued_time (&self) -> cl_ulong {
        self.submitted.saturating_sub(self.queued)
    }

    /// Time spent between submission and the start of execution.
    #[inline(always)]
    pub fn submitted_time (&self) -> cl_ulong {
        self.started.saturating_sub(self.submitted)
    }

    #[inline(always)]
    pub fn execution_time (&self) -> cl_ulong {
        self.ended.saturating_sub(self.started)
    }

    #[inline(always)]
    pub fn total_time (&self) -> cl_ulong {
        self.ended.saturating_sub(self.queued)
    }
}

pub(crate) fn wait_list (wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Vec<cl_event> {
    wait.into_iter().map(|x| x.as_ref().0).collect()
}

pub(crate) fn raw_wait_list (wait: &[cl_event]) -> Result<(u32, *const cl_event)> {
    let wait_len = u32::try_from(wait.len())
        .map_err(|_| Report::new(ErrorCL::InvalidEventWaitList).attach_printable("too many events in wait list"))?;

    let wait_ptr = match wait_len {
        0 => core::ptr::null(),
        _ => wait.as_ptr()
    };

    Ok((wait_len, wait_ptr))
}

#[cfg(test)]
mod tests {
    use super::ProfilingInfo;

    #[test]
    fn phases () {
        let info = ProfilingInfo { queued: 100, submitted: 150, started: 400, ended: 1400 };
        assert_eq!(info.queued_time(), 50);
        assert_eq!(info.submitted_time(), 250);
        assert_eq!(info.execution_time(), 1000);
        assert_eq!(info.total_time(), 1300);
    }

    #[test]
    fn out_of_order_counters_saturate () {
        let info = ProfilingInfo { queued: 10, submitted: 5, started: 0, ended: 0 };
        assert_eq!(info.queued_time(), 0);
        assert_eq!(info.total_time(), 0);
    }
}
