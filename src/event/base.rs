use core::{mem::MaybeUninit, ptr::addr_of};
use opencl_sys::{cl_event, cl_profiling_info, cl_ulong, clReleaseEvent, clRetainEvent, clWaitForEvents, clGetEventProfilingInfo, CL_PROFILING_COMMAND_QUEUED, CL_PROFILING_COMMAND_SUBMIT, CL_PROFILING_COMMAND_START, CL_PROFILING_COMMAND_END};
use crate::{prelude::Result, error::{report, ErrorCL}};
use super::{Event, ProfilingInfo};

#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BaseEvent (pub(crate) cl_event);

/// Empty wait list.
pub const EMPTY : [BaseEvent; 0] = [];

impl BaseEvent {
    #[inline(always)]
    pub(crate) fn new (id: cl_event) -> Self {
        Self(id)
    }

    #[inline(always)]
    pub fn id (&self) -> cl_event {
        self.0
    }

    pub(super) fn wait_ref (&self) -> Result<()> {
        let err = unsafe { clWaitForEvents(1, addr_of!(self.0)) };
        if err == 0 { return Ok(()) }

        let report = report(err, "clWaitForEvents");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidEvent => report.attach_printable(format!("'{:?}' is not a valid event", self.0)),
            ErrorCL::ExecutionStatusErrorForEventsInWaitList => report.attach_printable("the command behind the event terminated abnormally"),
            _ => report
        })
    }

    pub(super) fn profiling_info_ref (&self) -> Result<ProfilingInfo> {
        Ok(ProfilingInfo {
            queued: self.get_profiling_info(CL_PROFILING_COMMAND_QUEUED)?,
            submitted: self.get_profiling_info(CL_PROFILING_COMMAND_SUBMIT)?,
            started: self.get_profiling_info(CL_PROFILING_COMMAND_START)?,
            ended: self.get_profiling_info(CL_PROFILING_COMMAND_END)?
        })
    }

    fn get_profiling_info (&self, ty: cl_profiling_info) -> Result<cl_ulong> {
        let mut result = MaybeUninit::<cl_ulong>::uninit();

        let err = unsafe {
            clGetEventProfilingInfo(self.0, ty, core::mem::size_of::<cl_ulong>(), result.as_mut_ptr().cast(), core::ptr::null_mut())
        };

        if err == 0 {
            return Ok(unsafe { result.assume_init() });
        }

        let report = report(err, "clGetEventProfilingInfo");
        Err(match ErrorCL::from(err) {
            ErrorCL::ProfilingInfoNotAvailable => report.attach_printable("the queue was not created with profiling enabled or the command has not completed"),
            ErrorCL::InvalidEvent => report.attach_printable(format!("'{:?}' is not a valid event", self.0)),
            _ => report
        })
    }
}

impl Event for BaseEvent {}

impl AsRef<BaseEvent> for BaseEvent {
    #[inline(always)]
    fn as_ref(&self) -> &BaseEvent {
        self
    }
}

impl Clone for BaseEvent {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainEvent(self.0));
        Self(self.0)
    }
}

impl Drop for BaseEvent {
    #[inline(always)]
    fn drop(&mut self) {
        tri_warn!(clReleaseEvent(self.0))
    }
}

unsafe impl Send for BaseEvent {}
unsafe impl Sync for BaseEvent {}
