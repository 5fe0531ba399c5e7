use core::fmt::Write;
use error_stack::Report;
use crate::prelude::{Platform, Device, DeviceType, Context, ContextProps, ErrorCL, Result};

/// Platform `platform_id` in enumeration order.
pub fn get_platform (platform_id: usize) -> Result<Platform> {
    let platforms = Platform::all()?;
    platforms.get(platform_id).copied().ok_or_else(|| {
        Report::new(ErrorCL::InvalidPlatform)
            .attach_printable(format!("platform {platform_id} requested, {} available", platforms.len()))
    })
}

/// Device `device_id` of platform `platform_id`, both in enumeration order.
pub fn get_device (platform_id: usize, device_id: usize) -> Result<Device> {
    let devices = get_platform(platform_id)?.devices()?;
    devices.get(device_id).copied().ok_or_else(|| {
        Report::new(ErrorCL::InvalidDevice)
            .attach_printable(format!("device {device_id} requested on platform {platform_id}, {} available", devices.len()))
    })
}

/// Context holding exactly the selected device.
pub fn get_context (platform_id: usize, device_id: usize) -> Result<Context> {
    let platform = get_platform(platform_id)?;
    let device = get_device(platform_id, device_id)?;
    tracing::debug!(platform_id, device_id, "creating context");
    Context::new(Some(ContextProps::with_platform(platform)), core::slice::from_ref(&device))
}

#[inline(always)]
pub fn platform_name (platform_id: usize) -> Result<String> {
    get_platform(platform_id)?.name()
}

#[inline(always)]
pub fn device_name (platform_id: usize, device_id: usize) -> Result<String> {
    get_device(platform_id, device_id)?.name()
}

/// Human readable report of every platform and its devices.
pub fn list_platforms_devices () -> Result<String> {
    let platforms = Platform::all()?
        .iter()
        .map(PlatformSummary::query)
        .collect::<Result<Vec<_>>>()?;

    Ok(render_listing(&platforms))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSummary {
    pub name: String,
    pub version: String,
    pub vendor: String,
    pub devices: Vec<DeviceSummary>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub name: String,
    pub version: String,
    pub vendor: String,
    pub ty: DeviceType,
    pub compute_units: u32,
    pub clock_frequency: u32,
    pub global_mem_size: u64,
    pub max_mem_alloc_size: u64
}

impl PlatformSummary {
    pub fn query (platform: &Platform) -> Result<Self> {
        Ok(Self {
            name: platform.name()?,
            version: platform.version()?,
            vendor: platform.vendor()?,
            devices: platform.devices()?.iter().map(DeviceSummary::query).collect::<Result<_>>()?
        })
    }
}

impl DeviceSummary {
    pub fn query (device: &Device) -> Result<Self> {
        Ok(Self {
            name: device.name()?,
            version: device.version()?,
            vendor: device.vendor()?,
            ty: device.ty()?,
            compute_units: device.max_compute_units()?,
            clock_frequency: device.max_clock_frequency()?,
            global_mem_size: device.global_mem_size()?,
            max_mem_alloc_size: device.max_mem_alloc_size()?
        })
    }
}

pub fn render_listing (platforms: &[PlatformSummary]) -> String {
    let mut out = String::new();
    // writing into a String never fails
    let _ = writeln!(out, "Found {} platform(s):", platforms.len());

    for (i, platform) in platforms.iter().enumerate() {
        let _ = writeln!(out, "\nPlatform {i}, {}, version: {}, vendor: {}", platform.name, platform.version, platform.vendor);
        let _ = writeln!(out, "\n   Found {} device(s):", platform.devices.len());

        for (j, device) in platform.devices.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n      Device {j}, {}, version: {}, vendor: {}, type: {}, compute units: {}, clock freq [MHz]: {}, max memory size [B]: {}, max allocatable memory [B]: {}",
                device.name, device.version, device.vendor, device.ty.describe(), device.compute_units, device.clock_frequency, device.global_mem_size, device.max_mem_alloc_size
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpu () -> DeviceSummary {
        DeviceSummary {
            name: "Tahiti".into(),
            version: "OpenCL 1.2 AMD-APP".into(),
            vendor: "Advanced Micro Devices, Inc.".into(),
            ty: DeviceType::GPU,
            compute_units: 32,
            clock_frequency: 1000,
            global_mem_size: 3221225472,
            max_mem_alloc_size: 1073741824
        }
    }

    #[test]
    fn empty_listing () {
        assert_eq!(render_listing(&[]), "Found 0 platform(s):\n");
    }

    #[test]
    fn listing_numbers_platforms_and_devices () {
        let platforms = [PlatformSummary {
            name: "AMD Accelerated Parallel Processing".into(),
            version: "OpenCL 2.0".into(),
            vendor: "AMD".into(),
            devices: vec![gpu()]
        }];

        let listing = render_listing(&platforms);
        assert!(listing.starts_with("Found 1 platform(s):\n"));
        assert!(listing.contains("\nPlatform 0, AMD Accelerated Parallel Processing, version: OpenCL 2.0, vendor: AMD\n"));
        assert!(listing.contains("\n   Found 1 device(s):\n"));
        assert!(listing.contains("Device 0, Tahiti, version: OpenCL 1.2 AMD-APP, vendor: Advanced Micro Devices, Inc., type: GPU, compute units: 32"));
        assert!(listing.contains("max allocatable memory [B]: 1073741824"));
    }
}
