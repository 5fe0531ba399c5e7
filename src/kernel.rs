use core::{mem::MaybeUninit, ptr::addr_of};
use std::ffi::CString;
use error_stack::Report;
use opencl_sys::{cl_kernel, cl_kernel_info, cl_mem, clReleaseKernel, clRetainKernel, clCreateKernel, clGetKernelInfo, CL_KERNEL_FUNCTION_NAME, CL_KERNEL_NUM_ARGS, clSetKernelArg, clEnqueueNDRangeKernel};
use crate::{prelude::{Program, CommandQueue, BaseEvent, MemBuffer}, error::{check, report, ErrorCL, Result}, event::{wait_list, raw_wait_list}};

#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Kernel (pub(crate) cl_kernel);

impl Kernel {
    /// Creates the kernel `name` from a built program.
    pub fn new (program: &Program, name: &str) -> Result<Self> {
        let c_name = CString::new(name)
            .map_err(|e| Report::new(ErrorCL::InvalidKernelName).attach_printable(e))?;

        let mut err = 0;
        let id = unsafe { clCreateKernel(program.0, c_name.as_ptr(), &mut err) };
        if err == 0 { return Ok(Self(id)); }

        let report = report(err, "clCreateKernel");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidProgram => report.attach_printable("program is not a valid program object"),
            ErrorCL::InvalidProgramExecutable => report.attach_printable("there is no successfully built executable for program"),
            ErrorCL::InvalidKernelName => report.attach_printable(format!("kernel '{name}' not found in program")),
            ErrorCL::InvalidKernelDefinition => report.attach_printable(format!("the function definition for __kernel function '{name}' does not exist")),
            _ => report
        })
    }

    #[inline(always)]
    pub fn set_arg<T: Copy> (&mut self, idx: u32, v: T) -> Result<()> {
        let err = unsafe { clSetKernelArg(self.0, idx, core::mem::size_of::<T>(), addr_of!(v).cast()) };
        self.parse_error_set_arg(err, idx, core::mem::size_of::<T>())
    }

    #[inline(always)]
    pub fn set_mem_arg<T: Copy> (&mut self, idx: u32, v: &MemBuffer<T>) -> Result<()> {
        let mem : cl_mem = v.id();
        let err = unsafe { clSetKernelArg(self.0, idx, core::mem::size_of::<cl_mem>(), addr_of!(mem).cast()) };
        self.parse_error_set_arg(err, idx, core::mem::size_of::<cl_mem>())
    }

    /// Return the kernel function name.
    #[inline(always)]
    pub fn name (&self) -> Result<String> {
        unsafe {
            let mut len = 0;
            check(clGetKernelInfo(self.0, CL_KERNEL_FUNCTION_NAME, 0, core::ptr::null_mut(), &mut len), "clGetKernelInfo")?;

            let mut result = vec![0u8; len];
            check(clGetKernelInfo(self.0, CL_KERNEL_FUNCTION_NAME, len, result.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetKernelInfo")?;
            Ok(crate::utils::c_string(result))
        }
    }

    /// Return the number of arguments to _kernel_.
    #[inline(always)]
    pub fn num_args (&self) -> Result<u32> {
        self.get_info(CL_KERNEL_NUM_ARGS)
    }

    /// Enqueues the kernel over an `N`-dimensional range. Without `local_dims` the runtime picks the work-group size.
    pub fn enqueue_with_queue<const N: usize> (&mut self, queue: &CommandQueue, global_dims: &[usize; N], local_dims: Option<&[usize; N]>, wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Result<BaseEvent> {
        let dim_len = u32::try_from(N)
            .map_err(|_| Report::new(ErrorCL::InvalidWorkDimension).attach_printable(format!("{N} work dimensions")))?;
        let local_dims = match local_dims {
            Some(x) => x.as_ptr(),
            None => core::ptr::null()
        };

        let wait = wait_list(wait);
        let (wait_len, wait_ptr) = raw_wait_list(&wait)?;

        let mut event = core::ptr::null_mut();
        let err = unsafe {
            clEnqueueNDRangeKernel(queue.0, self.0, dim_len, core::ptr::null(), global_dims.as_ptr(), local_dims, wait_len, wait_ptr, &mut event)
        };

        if err == 0 {
            tracing::trace!(dims = ?global_dims, "kernel enqueued");
            return Ok(BaseEvent::new(event));
        }

        let report = report(err, "clEnqueueNDRangeKernel");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidProgramExecutable => report.attach_printable("there is no successfully built program executable available for device associated with the command queue"),
            ErrorCL::InvalidCommandQueue => report.attach_printable("command queue is not a valid command-queue"),
            ErrorCL::InvalidKernel => report.attach_printable("kernel is not a valid kernel object"),
            ErrorCL::InvalidContext => report.attach_printable("context associated with the command queue and kernel is not the same or the context associated with command queue and events in the event wait list are not the same"),
            ErrorCL::InvalidKernelArgs => report.attach_printable("the kernel argument values have not been specified"),
            ErrorCL::InvalidWorkDimension => report.attach_printable(format!("work-dimension {N} is not a valid value (i.e. a value between 1 and 3)")),
            ErrorCL::InvalidGlobalWorkSize => report.attach_printable(format!("global work size {global_dims:?} is not valid")),
            ErrorCL::InvalidWorkGroupSize => report.attach_printable("local work size is specified and is invalid (i.e. specified values in local work size exceed the maximum size of workgroup for the device associated with queue)"),
            ErrorCL::OutOfResources => report.attach_printable("there is a failure to queue the execution instance of kernel on the command-queue because of insufficient resources needed to execute the kernel"),
            ErrorCL::MemObjectAllocationFailure => report.attach_printable("there is a failure to allocate memory for data store associated with image or buffer objects specified as arguments to kernel"),
            ErrorCL::InvalidEventWaitList => report.attach_printable("event objects in event wait list are not valid events"),
            _ => report
        })
    }

    fn get_info<T: Copy> (&self, ty: cl_kernel_info) -> Result<T> {
        let mut value = MaybeUninit::<T>::uninit();

        unsafe {
            check(clGetKernelInfo(self.0, ty, core::mem::size_of::<T>(), value.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetKernelInfo")?;
            Ok(value.assume_init())
        }
    }

    fn parse_error_set_arg (&self, err: i32, idx: u32, size: usize) -> Result<()> {
        if err == 0 {
            return Ok(());
        }

        let report = report(err, "clSetKernelArg");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidKernel => report.attach_printable(format!("'{:?}' is not a valid kernel", self.0)),
            ErrorCL::InvalidArgIndex => report.attach_printable(format!("'{idx}' is not a valid argument index")),
            ErrorCL::InvalidArgValue => report.attach_printable("arg value specified is NULL for an argument that is not declared with the __local qualifier or vice-versa"),
            ErrorCL::InvalidMemObject => report.attach_printable("arg value is not a valid memory object for an argument declared to be a memory object"),
            ErrorCL::InvalidArgSize => report.attach_printable(format!("{size} != size of the declared data type")),
            _ => report
        })
    }
}

impl Clone for Kernel {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainKernel(self.0));
        Self(self.0)
    }
}

impl Drop for Kernel {
    #[inline(always)]
    fn drop(&mut self) {
        tri_warn!(clReleaseKernel(self.0))
    }
}

unsafe impl Send for Kernel {}
unsafe impl Sync for Kernel {}
