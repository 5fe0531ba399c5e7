use num_traits::{WrappingAdd, WrappingMul};
use opencl_sys::cl_ulong;
use crate::{prelude::{Program, Kernel, MemBuffer, MemFlags, Event, ProfilingInfo, Result, EMPTY}, utils::{full_profiling_info, ProfilingResolution}};
use super::{Session, verify};

pub const KERNEL_NAME : &str = "multadd";

/// Inputs of a run of `size` elements: `A[i] = i` and `B` cycling through `0, 1, 2`.
pub fn multadd_inputs (size: usize) -> (Vec<i32>, Vec<i32>) {
    let a = (0..size).map(|i| i as i32).collect();
    let b = (0..size).map(|i| (i % 3) as i32).collect();
    (a, b)
}

/// `C[i] = A[i] * B[i] + B[i]`, wrapping on overflow like the device does.
pub fn multadd_host<T: WrappingMul + WrappingAdd + Copy> (a: &[T], b: &[T]) -> Vec<T> {
    a.iter()
        .zip(b)
        .map(|(a, b)| a.wrapping_mul(b).wrapping_add(b))
        .collect()
}

/// Result of a device run along with the profiling counters of every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultAddOutcome {
    pub a: Vec<i32>,
    pub b: Vec<i32>,
    pub c: Vec<i32>,
    pub kernel: ProfilingInfo,
    /// Writes of `A` and `B`, then the read of `C`.
    pub transfers: [ProfilingInfo; 3]
}

impl MultAddOutcome {
    #[inline(always)]
    pub fn kernel_time (&self) -> cl_ulong {
        self.kernel.execution_time()
    }

    /// Device time spent moving `A`, `B` and `C`, in nanoseconds.
    pub fn overall_time (&self) -> cl_ulong {
        self.transfers.iter().map(ProfilingInfo::execution_time).sum()
    }

    /// Report printed after the device banner.
    pub fn summary (&self) -> String {
        format!(
            "Arr Size = {}\nKernel execution time [ns]:{}\n{}\nOverall execution time [ns]:{}",
            self.a.len(),
            self.kernel_time(),
            full_profiling_info(&self.kernel, ProfilingResolution::Us),
            self.overall_time()
        )
    }
}

/// Runs `multadd` over `size` elements: blocking writes, one 1D launch and a blocking read.
pub fn run (session: &Session, program: &Program, size: usize) -> Result<MultAddOutcome> {
    let (a, b) = multadd_inputs(size);
    let mut c = vec![0i32; size];

    let mut buffer_a = MemBuffer::<i32>::new(&session.context, MemFlags::READ_WRITE, size)?;
    let mut buffer_b = MemBuffer::<i32>::new(&session.context, MemFlags::READ_WRITE, size)?;
    let buffer_c = MemBuffer::<i32>::new(&session.context, MemFlags::READ_WRITE, size)?;

    let write_a = buffer_a.write(&session.queue, true, 0, &a, EMPTY)?;
    let write_b = buffer_b.write(&session.queue, true, 0, &b, EMPTY)?;

    let mut kernel = Kernel::new(program, KERNEL_NAME)?;
    let (name, args) = (kernel.name()?, kernel.num_args()?);
    tracing::debug!(kernel = %name, args, size, "launching");
    kernel.set_mem_arg(0, &buffer_a)?;
    kernel.set_mem_arg(1, &buffer_b)?;
    kernel.set_mem_arg(2, &buffer_c)?;
    let launch = kernel.enqueue_with_queue(&session.queue, &[size], None, EMPTY)?;

    let transfers = {
        let read_c = buffer_c.read(&session.queue, true, 0, &mut c, EMPTY)?;
        session.queue.finish()?;
        [write_a.profiling_info()?, write_b.profiling_info()?, read_c.profiling_info()?]
    };

    let kernel = launch.profiling_info()?;
    drop((write_a, write_b));

    verify(KERNEL_NAME, &c, &multadd_host(&a, &b));
    Ok(MultAddOutcome { a, b, c, kernel, transfers })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_follow_pattern () {
        let (a, b) = multadd_inputs(7);
        assert_eq!(a, [0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(b, [0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn host_reference () {
        let (a, b) = multadd_inputs(10);
        assert_eq!(multadd_host(&a, &b), [0, 2, 6, 0, 5, 12, 0, 8, 18, 0]);
    }

    #[test]
    fn host_reference_wraps () {
        assert_eq!(multadd_host(&[i32::MAX], &[2]), [i32::MAX.wrapping_mul(2).wrapping_add(2)]);
        assert_eq!(multadd_host::<u8>(&[200], &[2]), [146]);
    }

    #[test]
    fn output_length_matches_input () {
        for size in [0, 1, 3, 128, 1000] {
            let (a, b) = multadd_inputs(size);
            assert_eq!(multadd_host(&a, &b).len(), size);
        }
    }

    #[test]
    fn summary_report () {
        let (a, b) = multadd_inputs(4);
        let c = multadd_host(&a, &b);
        let outcome = MultAddOutcome {
            a, b, c,
            kernel: ProfilingInfo { queued: 0, submitted: 2_000, started: 5_000, ended: 12_000 },
            transfers: [
                ProfilingInfo { queued: 0, submitted: 0, started: 100, ended: 400 },
                ProfilingInfo { queued: 0, submitted: 0, started: 500, ended: 700 },
                ProfilingInfo { queued: 0, submitted: 0, started: 13_000, ended: 13_500 }
            ]
        };

        assert_eq!(outcome.kernel_time(), 7_000);
        assert_eq!(outcome.overall_time(), 1_000);
        assert_eq!(
            outcome.summary(),
            "Arr Size = 4\nKernel execution time [ns]:7000\nQueued 2, Submitted 3, Executed 7, Total 12 [us]\nOverall execution time [ns]:1000"
        );
    }
}
