use opencl_sys::{cl_command_queue_properties, CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE, CL_QUEUE_PROFILING_ENABLE, cl_command_queue, clReleaseCommandQueue, clRetainCommandQueue, clFinish};
use crate::{prelude::{Context, Device}, error::{check, report, ErrorCL, Result}};

/// OpenCL command queue
#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CommandQueue (pub(crate) cl_command_queue);

bitflags::bitflags! {
    /// Describes the command-queue properties supported by the device.
    #[repr(transparent)]
    pub struct CommandQueueProps: cl_command_queue_properties {
        const OUT_OF_ORDER_EXEC_MODE_ENABLE = CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE;
        const PROFILING_ENABLE = CL_QUEUE_PROFILING_ENABLE;
    }
}

impl Default for CommandQueueProps {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl CommandQueue {
    pub fn new (ctx: &Context, device: &Device, props: impl Into<Option<CommandQueueProps>>) -> Result<Self> {
        let props = props.into().unwrap_or_default();
        let mut err = 0;

        cfg_if::cfg_if! {
            if #[cfg(feature = "cl2")] {
                let properties = [opencl_sys::CL_QUEUE_PROPERTIES as opencl_sys::cl_queue_properties, props.bits(), 0];
                let id = unsafe { opencl_sys::clCreateCommandQueueWithProperties(ctx.0, device.0, properties.as_ptr(), &mut err) };
                let call = "clCreateCommandQueueWithProperties";
            } else {
                #[allow(deprecated)]
                let id = unsafe { opencl_sys::clCreateCommandQueue(ctx.0, device.0, props.bits(), &mut err) };
                let call = "clCreateCommandQueue";
            }
        }

        if err == 0 {
            return Ok(Self(id));
        }

        let report = report(err, call);
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidContext => report.attach_printable("context is not a valid context"),
            ErrorCL::InvalidDevice => report.attach_printable("device is not valid or is not associated with context"),
            ErrorCL::InvalidQueueProperties => report.attach_printable(format!("{props:?} are valid but not supported by the device")),
            _ => report
        })
    }

    /// Blocks until all previously queued commands have completed.
    #[inline(always)]
    pub fn finish (&self) -> Result<()> {
        check(unsafe { clFinish(self.0) }, "clFinish")
    }
}

impl Clone for CommandQueue {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainCommandQueue(self.0));
        Self(self.0)
    }
}

impl Drop for CommandQueue {
    #[inline(always)]
    fn drop(&mut self) {
        tri_warn!(clReleaseCommandQueue(self.0));
    }
}

unsafe impl Send for CommandQueue {}
unsafe impl Sync for CommandQueue {}
