use core::{fmt::Display, mem::MaybeUninit};
use std::ffi::CString;
use opencl_sys::{cl_program, cl_build_status, cl_program_build_info, clReleaseProgram, clCreateProgramWithSource, clRetainProgram, clBuildProgram, clGetProgramBuildInfo, CL_PROGRAM_BUILD_STATUS, CL_PROGRAM_BUILD_OPTIONS, CL_PROGRAM_BUILD_LOG, CL_BUILD_SUCCESS, CL_BUILD_NONE, CL_BUILD_ERROR, CL_BUILD_IN_PROGRESS};
use error_stack::Report;
use crate::{prelude::{Context, Device}, error::{check, report, ErrorCL, Result}};

/// OpenCL program
#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Program (pub(crate) cl_program);

impl Program {
    /// Creates a program from the concatenation of `sources`. The program still has to be [built](Program::build).
    pub fn from_sources<S: AsRef<str>> (ctx: &Context, sources: &[S]) -> Result<Self> {
        let strings = sources.iter().map(|s| s.as_ref().as_ptr().cast()).collect::<Vec<_>>();
        let lengths = sources.iter().map(|s| s.as_ref().len()).collect::<Vec<_>>();
        let count = u32::try_from(sources.len())
            .map_err(|_| Report::new(ErrorCL::InvalidValue).attach_printable("too many program sources"))?;

        let mut err = 0;
        let id = unsafe {
            clCreateProgramWithSource(ctx.0, count, strings.as_ptr(), lengths.as_ptr(), &mut err)
        };

        if err == 0 {
            return Ok(Self(id));
        }

        let report = report(err, "clCreateProgramWithSource");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidValue => report.attach_printable("no program sources were given"),
            _ => report
        })
    }

    #[inline(always)]
    pub fn from_source (ctx: &Context, source: &str) -> Result<Self> {
        Self::from_sources(ctx, &[source])
    }

    /// Compiles and links the program for `devices`. An empty slice builds for every device of the context.
    pub fn build (&self, devices: &[Device], options: &str) -> Result<()> {
        let options = CString::new(options)
            .map_err(|e| Report::new(ErrorCL::InvalidBuildOptions).attach_printable(e))?;

        let len = u32::try_from(devices.len())
            .map_err(|_| Report::new(ErrorCL::InvalidValue).attach_printable("too many devices"))?;
        let device_list = match len {
            0 => core::ptr::null(),
            _ => devices.as_ptr().cast()
        };

        let err = unsafe {
            clBuildProgram(self.0, len, device_list, options.as_ptr(), None, core::ptr::null_mut())
        };

        if err == 0 {
            return Ok(());
        }

        let report = report(err, "clBuildProgram");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidBuildOptions => report.attach_printable(format!("build options {options:?} are invalid")),
            ErrorCL::BuildProgramFailure => report.attach_printable("failure to build the program executable, see the build log"),
            ErrorCL::CompilerNotAvailable => report.attach_printable("no compiler is available for the device"),
            _ => report
        })
    }

    /// Build status of the program for `device`.
    #[inline(always)]
    pub fn build_status (&self, device: &Device) -> Result<BuildStatus> {
        let status = self.get_build_info::<cl_build_status>(device, CL_PROGRAM_BUILD_STATUS)?;
        Ok(BuildStatus::from(status))
    }

    /// Options passed to the last build for `device`.
    #[inline(always)]
    pub fn build_options (&self, device: &Device) -> Result<String> {
        self.get_build_info_string(device, CL_PROGRAM_BUILD_OPTIONS)
    }

    /// Compiler output of the last build for `device`.
    #[inline(always)]
    pub fn build_log (&self, device: &Device) -> Result<String> {
        self.get_build_info_string(device, CL_PROGRAM_BUILD_LOG)
    }

    fn get_build_info<T: Copy> (&self, device: &Device, ty: cl_program_build_info) -> Result<T> {
        unsafe {
            let mut value = MaybeUninit::<T>::uninit();
            check(clGetProgramBuildInfo(self.0, device.0, ty, core::mem::size_of::<T>(), value.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetProgramBuildInfo")?;
            Ok(value.assume_init())
        }
    }

    fn get_build_info_string (&self, device: &Device, ty: cl_program_build_info) -> Result<String> {
        unsafe {
            let mut len = 0;
            check(clGetProgramBuildInfo(self.0, device.0, ty, 0, core::ptr::null_mut(), &mut len), "clGetProgramBuildInfo")?;

            let mut result = vec![0u8; len];
            check(clGetProgramBuildInfo(self.0, device.0, ty, len, result.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetProgramBuildInfo")?;
            Ok(crate::utils::c_string(result))
        }
    }
}

impl Clone for Program {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainProgram(self.0));
        Self(self.0)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        tri_warn!(clReleaseProgram(self.0));
    }
}

unsafe impl Send for Program {}
unsafe impl Sync for Program {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Success,
    None,
    Error,
    InProgress,
    Other (cl_build_status)
}

impl From<cl_build_status> for BuildStatus {
    #[inline]
    fn from(value: cl_build_status) -> Self {
        match value {
            CL_BUILD_SUCCESS => Self::Success,
            CL_BUILD_NONE => Self::None,
            CL_BUILD_ERROR => Self::Error,
            CL_BUILD_IN_PROGRESS => Self::InProgress,
            other => Self::Other(other)
        }
    }
}

impl Display for BuildStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Success => f.write_str("CL_BUILD_SUCCESS"),
            Self::None => f.write_str("CL_BUILD_NONE"),
            Self::Error => f.write_str("CL_BUILD_ERROR"),
            Self::InProgress => f.write_str("CL_BUILD_IN_PROGRESS"),
            Self::Other(code) => write!(f, "{code}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BuildStatus;

    #[test]
    fn build_status_from_code () {
        assert_eq!(BuildStatus::from(0), BuildStatus::Success);
        assert_eq!(BuildStatus::from(-2), BuildStatus::Error);
        assert_eq!(BuildStatus::from(-3).to_string(), "CL_BUILD_IN_PROGRESS");
        assert_eq!(BuildStatus::from(7), BuildStatus::Other(7));
    }
}
