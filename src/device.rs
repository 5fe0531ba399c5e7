use core::{mem::MaybeUninit, fmt::Debug};
use opencl_sys::{cl_device_id, clGetDeviceIDs, CL_DEVICE_TYPE_ALL, cl_device_info, clGetDeviceInfo, CL_DEVICE_PLATFORM, cl_uint, cl_ulong, CL_DEVICE_GLOBAL_MEM_SIZE, CL_DEVICE_MAX_CLOCK_FREQUENCY, CL_DEVICE_MAX_COMPUTE_UNITS, CL_DEVICE_MAX_MEM_ALLOC_SIZE, CL_DEVICE_NAME, cl_device_type, CL_DEVICE_TYPE_DEFAULT, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU, CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_CUSTOM, CL_DEVICE_TYPE, CL_DEVICE_VENDOR, CL_DEVICE_VERSION, cl_platform_id};
use crate::{platform::Platform, error::{check, ErrorCL, Result}};

/// OpenCL device
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device (pub(crate) cl_device_id);

impl Device {
    /// Every device of every type exposed by `platform`. A platform without devices yields an empty list.
    pub fn from_platform (platform: Platform) -> Result<Vec<Device>> {
        let mut cnt : cl_uint = 0;
        let err = unsafe { clGetDeviceIDs(platform.id(), CL_DEVICE_TYPE_ALL, 0, core::ptr::null_mut(), &mut cnt) };

        if ErrorCL::from(err) == ErrorCL::DeviceNotFound {
            return Ok(Vec::new());
        }
        check(err, "clGetDeviceIDs")?;

        let mut result = vec![core::ptr::null_mut(); cnt as usize];
        let err = unsafe { clGetDeviceIDs(platform.id(), CL_DEVICE_TYPE_ALL, cnt, result.as_mut_ptr(), core::ptr::null_mut()) };
        check(err, "clGetDeviceIDs")?;

        Ok(result.into_iter().map(Device).collect())
    }

    #[inline(always)]
    pub fn id (&self) -> cl_device_id {
        self.0
    }

    /// Device name string.
    #[inline(always)]
    pub fn name (&self) -> Result<String> {
        self.get_info_string(CL_DEVICE_NAME)
    }

    /// Vendor name string.
    #[inline(always)]
    pub fn vendor (&self) -> Result<String> {
        self.get_info_string(CL_DEVICE_VENDOR)
    }

    /// OpenCL version string.
    #[inline(always)]
    pub fn version (&self) -> Result<String> {
        self.get_info_string(CL_DEVICE_VERSION)
    }

    /// The OpenCL device type.
    #[inline(always)]
    pub fn ty (&self) -> Result<DeviceType> {
        self.get_info_bits::<cl_device_type>(CL_DEVICE_TYPE).map(DeviceType::from_bits_truncate)
    }

    /// The number of parallel compute cores on the OpenCL device. The minimum value is 1.
    #[inline(always)]
    pub fn max_compute_units (&self) -> Result<cl_uint> {
        self.get_info_bits(CL_DEVICE_MAX_COMPUTE_UNITS)
    }

    /// Maximum configured clock frequency of the device in MHz.
    #[inline(always)]
    pub fn max_clock_frequency (&self) -> Result<cl_uint> {
        self.get_info_bits(CL_DEVICE_MAX_CLOCK_FREQUENCY)
    }

    /// Max size of memory object allocation in bytes.
    #[inline(always)]
    pub fn max_mem_alloc_size (&self) -> Result<cl_ulong> {
        self.get_info_bits(CL_DEVICE_MAX_MEM_ALLOC_SIZE)
    }

    /// Size of global memory in bytes.
    #[inline(always)]
    pub fn global_mem_size (&self) -> Result<cl_ulong> {
        self.get_info_bits(CL_DEVICE_GLOBAL_MEM_SIZE)
    }

    /// The platform associated with this device.
    #[inline(always)]
    pub fn platform (&self) -> Result<Platform> {
        self.get_info_bits::<cl_platform_id>(CL_DEVICE_PLATFORM).map(Platform)
    }

    fn get_info_string (&self, ty: cl_device_info) -> Result<String> {
        unsafe {
            let mut len = 0;
            check(clGetDeviceInfo(self.0, ty, 0, core::ptr::null_mut(), &mut len), "clGetDeviceInfo")?;

            let mut result = vec![0u8; len];
            check(clGetDeviceInfo(self.0, ty, len, result.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetDeviceInfo")?;
            Ok(crate::utils::c_string(result))
        }
    }

    fn get_info_bits<T: Copy> (&self, ty: cl_device_info) -> Result<T> {
        unsafe {
            let mut value = MaybeUninit::<T>::uninit();
            check(clGetDeviceInfo(self.0, ty, core::mem::size_of::<T>(), value.as_mut_ptr().cast(), core::ptr::null_mut()), "clGetDeviceInfo")?;
            Ok(value.assume_init())
        }
    }
}

impl Debug for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Device")
        .field("name", &self.name().ok())
        .field("vendor", &self.vendor().ok())
        .field("version", &self.version().ok())
        .field("type", &self.ty().ok())
        .field("max_compute_units", &self.max_compute_units().ok())
        .field("max_clock_frequency", &self.max_clock_frequency().ok())
        .field("max_mem_alloc_size", &self.max_mem_alloc_size().ok())
        .field("global_mem_size", &self.global_mem_size().ok())
        .finish()
    }
}

unsafe impl Send for Device {}
unsafe impl Sync for Device {}

bitflags::bitflags! {
    /// The OpenCL device type.
    #[repr(transparent)]
    pub struct DeviceType : cl_device_type {
        const DEFAULT = CL_DEVICE_TYPE_DEFAULT;
        const CPU = CL_DEVICE_TYPE_CPU;
        const GPU = CL_DEVICE_TYPE_GPU;
        const ACCELERATOR = CL_DEVICE_TYPE_ACCELERATOR;
        const CUSTOM = CL_DEVICE_TYPE_CUSTOM;
    }
}

impl DeviceType {
    /// Space separated names of the set flags, e.g. `"DEFAULT GPU"`.
    pub fn describe (&self) -> String {
        const NAMES : [(DeviceType, &str); 5] = [
            (DeviceType::DEFAULT, "DEFAULT"),
            (DeviceType::CPU, "CPU"),
            (DeviceType::GPU, "GPU"),
            (DeviceType::ACCELERATOR, "ACCELERATOR"),
            (DeviceType::CUSTOM, "CUSTOM")
        ];

        NAMES.iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceType;

    #[test]
    fn describe_lists_set_flags () {
        assert_eq!((DeviceType::DEFAULT | DeviceType::GPU).describe(), "DEFAULT GPU");
        assert_eq!(DeviceType::CPU.describe(), "CPU");
        assert_eq!(DeviceType::empty().describe(), "");
    }
}
