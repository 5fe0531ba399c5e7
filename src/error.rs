use core::fmt::Display;
use error_stack::Report;
use opencl_sys::cl_int;

pub type Result<T> = error_stack::Result<T, ErrorCL>;

macro_rules! error_codes {
    ($($name:ident = $code:literal => $cl:literal, $msg:literal;)+) => {
        /// OpenCL status code. `Unknown` stands for any code the runtime may return that isn't listed here.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum ErrorCL {
            $($name = $code,)+
            Unknown = 1
        }

        impl ErrorCL {
            pub const ALL : &'static [ErrorCL] = &[$(ErrorCL::$name),+];

            /// Name of the matching `CL_*` constant.
            #[inline]
            pub const fn name (&self) -> &'static str {
                match self {
                    $(Self::$name => $cl,)+
                    Self::Unknown => "Unknown OpenCL error"
                }
            }

            #[inline]
            pub const fn message (&self) -> &'static str {
                match self {
                    $(Self::$name => $msg,)+
                    Self::Unknown => "Unknown error"
                }
            }
        }
    };
}

error_codes! {
    DeviceNotFound = -1 => "CL_DEVICE_NOT_FOUND", "Device not found";
    DeviceNotAvailable = -2 => "CL_DEVICE_NOT_AVAILABLE", "Device not available";
    CompilerNotAvailable = -3 => "CL_COMPILER_NOT_AVAILABLE", "Compiler not available";
    MemObjectAllocationFailure = -4 => "CL_MEM_OBJECT_ALLOCATION_FAILURE", "Memory object allocation failure";
    OutOfResources = -5 => "CL_OUT_OF_RESOURCES", "Out of resources";
    OutOfHostMemory = -6 => "CL_OUT_OF_HOST_MEMORY", "Out of host memory";
    ProfilingInfoNotAvailable = -7 => "CL_PROFILING_INFO_NOT_AVAILABLE", "Profiling info not available";
    MemCopyOverlap = -8 => "CL_MEM_COPY_OVERLAP", "Memory copy overlap";
    ImageFormatMismatch = -9 => "CL_IMAGE_FORMAT_MISMATCH", "Image format mismatch";
    ImageFormatNotSupported = -10 => "CL_IMAGE_FORMAT_NOT_SUPPORTED", "Image format not supported";
    BuildProgramFailure = -11 => "CL_BUILD_PROGRAM_FAILURE", "Build program failure";
    MapFailure = -12 => "CL_MAP_FAILURE", "Map failure";
    MisalignedSubBufferOffset = -13 => "CL_MISALIGNED_SUB_BUFFER_OFFSET", "Misaligned sub-buffer offset";
    ExecutionStatusErrorForEventsInWaitList = -14 => "CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST", "Execution status error for events in wait list";
    CompileProgramFailure = -15 => "CL_COMPILE_PROGRAM_FAILURE", "Program compilation failure";
    LinkerNotAvailable = -16 => "CL_LINKER_NOT_AVAILABLE", "Linker not available";
    LinkProgramFailure = -17 => "CL_LINK_PROGRAM_FAILURE", "Program linking failure";
    DevicePartitionFailed = -18 => "CL_DEVICE_PARTITION_FAILED", "Device partition failure";
    KernelArgInfoNotAvailable = -19 => "CL_KERNEL_ARG_INFO_NOT_AVAILABLE", "Kernel argument info not available";
    InvalidValue = -30 => "CL_INVALID_VALUE", "Invalid value";
    InvalidDeviceType = -31 => "CL_INVALID_DEVICE_TYPE", "Invalid device type";
    InvalidPlatform = -32 => "CL_INVALID_PLATFORM", "Invalid platform";
    InvalidDevice = -33 => "CL_INVALID_DEVICE", "Invalid device";
    InvalidContext = -34 => "CL_INVALID_CONTEXT", "Invalid context";
    InvalidQueueProperties = -35 => "CL_INVALID_QUEUE_PROPERTIES", "Invalid queue properties";
    InvalidCommandQueue = -36 => "CL_INVALID_COMMAND_QUEUE", "Invalid command queue";
    InvalidHostPtr = -37 => "CL_INVALID_HOST_PTR", "Invalid host pointer";
    InvalidMemObject = -38 => "CL_INVALID_MEM_OBJECT", "Invalid memory object";
    InvalidImageFormatDescriptor = -39 => "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR", "Invalid image format descriptor";
    InvalidImageSize = -40 => "CL_INVALID_IMAGE_SIZE", "Invalid image size";
    InvalidSampler = -41 => "CL_INVALID_SAMPLER", "Invalid sampler";
    InvalidBinary = -42 => "CL_INVALID_BINARY", "Invalid binary";
    InvalidBuildOptions = -43 => "CL_INVALID_BUILD_OPTIONS", "Invalid build options";
    InvalidProgram = -44 => "CL_INVALID_PROGRAM", "Invalid program";
    InvalidProgramExecutable = -45 => "CL_INVALID_PROGRAM_EXECUTABLE", "Invalid program executable";
    InvalidKernelName = -46 => "CL_INVALID_KERNEL_NAME", "Invalid kernel name";
    InvalidKernelDefinition = -47 => "CL_INVALID_KERNEL_DEFINITION", "Invalid kernel definition";
    InvalidKernel = -48 => "CL_INVALID_KERNEL", "Invalid kernel";
    InvalidArgIndex = -49 => "CL_INVALID_ARG_INDEX", "Invalid argument index";
    InvalidArgValue = -50 => "CL_INVALID_ARG_VALUE", "Invalid argument value";
    InvalidArgSize = -51 => "CL_INVALID_ARG_SIZE", "Invalid argument size";
    InvalidKernelArgs = -52 => "CL_INVALID_KERNEL_ARGS", "Invalid kernel arguments";
    InvalidWorkDimension = -53 => "CL_INVALID_WORK_DIMENSION", "Invalid work dimension";
    InvalidWorkGroupSize = -54 => "CL_INVALID_WORK_GROUP_SIZE", "Invalid work group size";
    InvalidWorkItemSize = -55 => "CL_INVALID_WORK_ITEM_SIZE", "Invalid work item size";
    InvalidGlobalOffset = -56 => "CL_INVALID_GLOBAL_OFFSET", "Invalid global offset";
    InvalidEventWaitList = -57 => "CL_INVALID_EVENT_WAIT_LIST", "Invalid event wait list";
    InvalidEvent = -58 => "CL_INVALID_EVENT", "Invalid event";
    InvalidOperation = -59 => "CL_INVALID_OPERATION", "Invalid operation";
    InvalidGlObject = -60 => "CL_INVALID_GL_OBJECT", "Invalid GL object";
    InvalidBufferSize = -61 => "CL_INVALID_BUFFER_SIZE", "Invalid buffer size";
    InvalidMipLevel = -62 => "CL_INVALID_MIP_LEVEL", "Invalid mip level";
    InvalidGlobalWorkSize = -63 => "CL_INVALID_GLOBAL_WORK_SIZE", "Invalid global work size";
    InvalidProperty = -64 => "CL_INVALID_PROPERTY", "Invalid property";
    InvalidImageDescriptor = -65 => "CL_INVALID_IMAGE_DESCRIPTOR", "Invalid image descriptor";
    InvalidCompilerOptions = -66 => "CL_INVALID_COMPILER_OPTIONS", "Invalid compiler options";
    InvalidLinkerOptions = -67 => "CL_INVALID_LINKER_OPTIONS", "Invalid linker options";
    InvalidDevicePartitionCount = -68 => "CL_INVALID_DEVICE_PARTITION_COUNT", "Invalid device partition count";
    InvalidPipeSize = -69 => "CL_INVALID_PIPE_SIZE", "Invalid pipe size";
    InvalidDeviceQueue = -70 => "CL_INVALID_DEVICE_QUEUE", "Invalid device queue";
    PlatformNotFoundKhr = -1001 => "CL_PLATFORM_NOT_FOUND_KHR", "No OpenCL platform found";
}

impl ErrorCL {
    #[inline(always)]
    pub const fn code (&self) -> cl_int {
        *self as cl_int
    }
}

impl error_stack::Context for ErrorCL {}

impl Display for ErrorCL {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.message().fmt(f)
    }
}

impl From<ErrorCL> for cl_int {
    #[inline(always)]
    fn from(value: ErrorCL) -> Self {
        value.code()
    }
}

impl From<cl_int> for ErrorCL {
    #[inline]
    fn from(value: cl_int) -> Self {
        ErrorCL::ALL.iter()
            .copied()
            .find(|e| e.code() == value)
            .unwrap_or(ErrorCL::Unknown)
    }
}

/// Name of the OpenCL entry point that produced an error, attached to every report raised from a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiCall (pub &'static str);

impl Display for ApiCall {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// Turns an OpenCL status code into a report. Unknown codes keep their raw value as an attachment.
pub(crate) fn report (err: cl_int, call: &'static str) -> Report<ErrorCL> {
    let error = ErrorCL::from(err);
    let report = Report::new(error).attach_printable(ApiCall(call));

    match error {
        ErrorCL::Unknown => report.attach_printable(format!("status code {err}")),
        _ => report
    }
}

#[inline]
pub(crate) fn check (err: cl_int, call: &'static str) -> Result<()> {
    if err == 0 {
        return Ok(());
    }

    Err(report(err, call))
}

/// One-line summary of a report: the failing call followed by the status code name.
pub fn describe (report: &Report<ErrorCL>) -> String {
    let error = report.current_context();
    match report.downcast_ref::<ApiCall>() {
        Some(call) => format!("ERROR: {call}, {}", error.name()),
        None => format!("ERROR: {error}, {}", error.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_i32 () {
        for &error in ErrorCL::ALL {
            assert_eq!(ErrorCL::from(error.code()), error);
        }
    }

    #[test]
    fn unlisted_codes_are_unknown () {
        assert_eq!(ErrorCL::from(-20), ErrorCL::Unknown);
        assert_eq!(ErrorCL::from(-9999), ErrorCL::Unknown);
        assert_eq!(ErrorCL::Unknown.name(), "Unknown OpenCL error");
    }

    #[test]
    fn names_match_constants () {
        assert_eq!(ErrorCL::from(-11).name(), "CL_BUILD_PROGRAM_FAILURE");
        assert_eq!(ErrorCL::from(-46).name(), "CL_INVALID_KERNEL_NAME");
        assert_eq!(ErrorCL::from(-1001).name(), "CL_PLATFORM_NOT_FOUND_KHR");
        assert_eq!(ErrorCL::InvalidValue.to_string(), "Invalid value");
    }

    #[test]
    fn check_passes_success_through () {
        assert!(check(0, "clFinish").is_ok());
    }

    #[test]
    fn describe_names_the_call () {
        let report = check(-11, "clBuildProgram").unwrap_err();
        assert_eq!(*report.current_context(), ErrorCL::BuildProgramFailure);
        assert_eq!(describe(&report), "ERROR: clBuildProgram, CL_BUILD_PROGRAM_FAILURE");
    }

    #[test]
    fn describe_without_call () {
        let report = Report::new(ErrorCL::InvalidDevice);
        assert_eq!(describe(&report), "ERROR: Invalid device, CL_INVALID_DEVICE");
    }
}
