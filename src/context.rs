use opencl_sys::{cl_context, cl_context_properties, cl_device_id, CL_CONTEXT_PLATFORM, CL_CONTEXT_DEVICES, clCreateContext, clReleaseContext, clRetainContext, clGetContextInfo};
use crate::error::{check, report, ErrorCL, Result};
use crate::prelude::{Platform, Device};

/// OpenCL context
#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Context (pub(crate) cl_context);

impl Context {
    pub fn new (props: Option<ContextProps>, devices: &[Device]) -> Result<Self> {
        let props = props.map(ContextProps::build);
        let props_ptr = match props {
            Some(ref x) => x.as_ptr(),
            None => core::ptr::null()
        };

        let len = u32::try_from(devices.len())
            .map_err(|_| error_stack::Report::new(ErrorCL::InvalidValue).attach_printable("too many devices"))?;
        let mut err = 0;

        let id = unsafe {
            clCreateContext(props_ptr, len, devices.as_ptr().cast(), None, core::ptr::null_mut(), &mut err)
        };

        if err != 0 {
            let report = report(err, "clCreateContext");
            return Err(match ErrorCL::from(err) {
                ErrorCL::InvalidPlatform => report.attach_printable("platform in the context properties is not a valid platform"),
                ErrorCL::InvalidValue => report.attach_printable("no devices were given"),
                ErrorCL::InvalidDevice => report.attach_printable("a device is not valid or not associated with the platform"),
                ErrorCL::DeviceNotAvailable => report.attach_printable("a device is currently not available"),
                _ => report
            });
        }

        Ok(Context(id))
    }

    /// Devices the context was created with.
    pub fn devices (&self) -> Result<Vec<Device>> {
        unsafe {
            let mut size = 0;
            check(clGetContextInfo(self.0, CL_CONTEXT_DEVICES, 0, core::ptr::null_mut(), &mut size), "clGetContextInfo")?;

            let mut ids : Vec<cl_device_id> = vec![core::ptr::null_mut(); size / core::mem::size_of::<cl_device_id>()];
            check(clGetContextInfo(self.0, CL_CONTEXT_DEVICES, size, ids.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetContextInfo")?;

            Ok(ids.iter().copied().map(Device).collect())
        }
    }
}

impl Clone for Context {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainContext(self.0));
        Self(self.0)
    }
}

impl Drop for Context {
    #[inline(always)]
    fn drop (&mut self) {
        tri_warn!(clReleaseContext(self.0));
    }
}

unsafe impl Send for Context {}
unsafe impl Sync for Context {}

/// OpenCL context properties
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextProps {
    pub platform: Option<Platform>,
}

impl ContextProps {
    #[inline(always)]
    pub fn new () -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn with_platform (platform: Platform) -> Self {
        Self { platform: Some(platform) }
    }

    /// Zero-terminated property list as expected by `clCreateContext`.
    pub fn build (self) -> Vec<cl_context_properties> {
        let mut result = Vec::<cl_context_properties>::with_capacity(3);

        if let Some(platform) = self.platform {
            result.extend([
                CL_CONTEXT_PLATFORM as cl_context_properties,
                platform.0 as cl_context_properties
            ])
        }

        result.push(0);
        result
    }
}

unsafe impl Send for ContextProps {}
unsafe impl Sync for ContextProps {}
