use core::fmt::Debug;
use once_cell::sync::OnceCell;
use opencl_sys::{clGetPlatformIDs, cl_platform_id, clGetPlatformInfo, cl_platform_info, cl_uint, CL_PLATFORM_VERSION, CL_PLATFORM_NAME, CL_PLATFORM_VENDOR};
use crate::{error::{check, ErrorCL, Result}, device::Device};

static PLATFORMS : OnceCell<Vec<Platform>> = OnceCell::new();

/// OpenCL platform
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform (pub(crate) cl_platform_id);

impl Platform {
    /// Every platform exposed by the installed ICDs, in the order the loader reports them.
    /// The list is queried once and cached. No installed ICD means an empty list.
    pub fn all () -> Result<&'static [Platform]> {
        PLATFORMS.get_or_try_init(Self::query).map(Vec::as_slice)
    }

    fn query () -> Result<Vec<Platform>> {
        let mut cnt : cl_uint = 0;
        let err = unsafe { clGetPlatformIDs(0, core::ptr::null_mut(), &mut cnt) };

        if ErrorCL::from(err) == ErrorCL::PlatformNotFoundKhr {
            tracing::debug!("no OpenCL platform installed");
            return Ok(Vec::new());
        }
        check(err, "clGetPlatformIDs")?;

        let mut result = vec![core::ptr::null_mut(); cnt as usize];
        let err = unsafe { clGetPlatformIDs(cnt, result.as_mut_ptr(), core::ptr::null_mut()) };
        check(err, "clGetPlatformIDs")?;

        tracing::debug!(count = result.len(), "enumerated OpenCL platforms");
        Ok(result.into_iter().map(Platform).collect())
    }

    #[inline(always)]
    pub fn id (&self) -> cl_platform_id {
        self.0
    }

    /// OpenCL version string.
    #[inline(always)]
    pub fn version (&self) -> Result<String> {
        self.get_info_string(CL_PLATFORM_VERSION)
    }

    /// Platform name string.
    #[inline(always)]
    pub fn name (&self) -> Result<String> {
        self.get_info_string(CL_PLATFORM_NAME)
    }

    /// Platform vendor string.
    #[inline(always)]
    pub fn vendor (&self) -> Result<String> {
        self.get_info_string(CL_PLATFORM_VENDOR)
    }

    #[inline(always)]
    pub fn devices (&self) -> Result<Vec<Device>> {
        Device::from_platform(*self)
    }

    fn get_info_string (&self, ty: cl_platform_info) -> Result<String> {
        unsafe {
            let mut len = 0;
            check(clGetPlatformInfo(self.0, ty, 0, core::ptr::null_mut(), &mut len), "clGetPlatformInfo")?;

            let mut result = vec![0u8; len];
            check(clGetPlatformInfo(self.0, ty, len, result.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetPlatformInfo")?;
            Ok(crate::utils::c_string(result))
        }
    }
}

impl Debug for Platform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Platform")
        .field("id", &self.0)
        .field("name", &self.name().ok())
        .field("vendor", &self.vendor().ok())
        .field("version", &self.version().ok())
        .finish()
    }
}

unsafe impl Send for Platform {}
unsafe impl Sync for Platform {}
