use core::fmt::Display;
use opencl_sys::cl_ulong;
use crate::prelude::ProfilingInfo;

/// Unit used when printing profiling counters. The discriminant is the number of nanoseconds per unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ProfilingResolution {
    #[default]
    Ns = 1,
    Us = 1_000,
    Ms = 1_000_000,
    S = 1_000_000_000
}

impl ProfilingResolution {
    #[inline(always)]
    pub const fn nanos (self) -> cl_ulong {
        self as cl_ulong
    }

    #[inline]
    pub const fn suffix (self) -> &'static str {
        match self {
            Self::Ns => "ns",
            Self::Us => "us",
            Self::Ms => "ms",
            Self::S => "s"
        }
    }

    /// Converts a nanosecond count to this unit, truncating.
    #[inline(always)]
    pub const fn scale (self, nanos: cl_ulong) -> cl_ulong {
        nanos / self.nanos()
    }
}

impl Display for ProfilingResolution {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Single-line breakdown of a command's life cycle:
/// `Queued q, Submitted s, Executed e, Total t [unit]`.
pub fn full_profiling_info (info: &ProfilingInfo, res: ProfilingResolution) -> String {
    format!(
        "Queued {}, Submitted {}, Executed {}, Total {} [{res}]",
        res.scale(info.queued_time()),
        res.scale(info.submitted_time()),
        res.scale(info.execution_time()),
        res.scale(info.total_time())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO : ProfilingInfo = ProfilingInfo { queued: 1_000, submitted: 6_500, started: 9_000, ended: 2_010_000 };

    #[test]
    fn nanosecond_breakdown () {
        assert_eq!(
            full_profiling_info(&INFO, ProfilingResolution::Ns),
            "Queued 5500, Submitted 2500, Executed 2001000, Total 2009000 [ns]"
        );
    }

    #[test]
    fn coarser_units_truncate () {
        assert_eq!(
            full_profiling_info(&INFO, ProfilingResolution::Us),
            "Queued 5, Submitted 2, Executed 2001, Total 2009 [us]"
        );
        assert_eq!(
            full_profiling_info(&INFO, ProfilingResolution::Ms),
            "Queued 0, Submitted 0, Executed 2, Total 2 [ms]"
        );
        assert_eq!(
            full_profiling_info(&INFO, ProfilingResolution::S),
            "Queued 0, Submitted 0, Executed 0, Total 0 [s]"
        );
    }
}
