use num_traits::WrappingAdd;
use opencl_sys::cl_ulong;
use crate::{prelude::{Program, Kernel, MemBuffer, MemFlags, Event, ProfilingInfo, Result, EMPTY}, utils::{full_profiling_info, ProfilingResolution}};
use super::{Session, verify};

pub const KERNEL_NAME : &str = "outer_sum";

pub const A : [i32; 5] = [1, 2, 3, 4, 5];
pub const B : [i32; 2] = [6, 7];

/// `C[x + y * len(a)] = A[x] + B[y]`: one row of `len(a)` elements per element of `b`.
pub fn outer_sum_host<T: WrappingAdd + Copy> (a: &[T], b: &[T]) -> Vec<T> {
    b.iter()
        .flat_map(|y| a.iter().map(move |x| x.wrapping_add(y)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuterSumOutcome {
    pub a: Vec<i32>,
    pub b: Vec<i32>,
    pub c: Vec<i32>,
    pub kernel: ProfilingInfo
}

impl OuterSumOutcome {
    #[inline(always)]
    pub fn kernel_time (&self) -> cl_ulong {
        self.kernel.execution_time()
    }

    pub fn summary (&self) -> String {
        format!(
            "A = {:?}\nB = {:?}\nC = {:?}\nKernel execution time [ns]:{}\n{}",
            self.a,
            self.b,
            self.c,
            self.kernel_time(),
            full_profiling_info(&self.kernel, ProfilingResolution::Us)
        )
    }
}

/// Runs `outer_sum` over [`A`] and [`B`] on a `(len(A), len(B))` range.
pub fn run (session: &Session, program: &Program) -> Result<OuterSumOutcome> {
    let (a, b) = (A.to_vec(), B.to_vec());
    let mut c = vec![0i32; a.len() * b.len()];

    let mut buffer_a = MemBuffer::<i32>::new(&session.context, MemFlags::READ_ONLY, a.len())?;
    let mut buffer_b = MemBuffer::<i32>::new(&session.context, MemFlags::READ_ONLY, b.len())?;
    let buffer_c = MemBuffer::<i32>::new(&session.context, MemFlags::WRITE_ONLY, c.len())?;

    buffer_a.write(&session.queue, true, 0, &a, EMPTY)?;
    buffer_b.write(&session.queue, true, 0, &b, EMPTY)?;

    let mut kernel = Kernel::new(program, KERNEL_NAME)?;
    kernel.set_mem_arg(0, &buffer_a)?;
    kernel.set_mem_arg(1, &buffer_b)?;
    kernel.set_mem_arg(2, &buffer_c)?;
    let launch = kernel.enqueue_with_queue(&session.queue, &[a.len(), b.len()], None, EMPTY)?;

    buffer_c.read(&session.queue, true, 0, &mut c, EMPTY)?;
    session.queue.finish()?;
    let kernel = launch.profiling_info()?;

    verify(KERNEL_NAME, &c, &outer_sum_host(&a, &b));
    Ok(OuterSumOutcome { a, b, c, kernel })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_inputs () {
        assert_eq!(outer_sum_host(&A, &B), [7, 8, 9, 10, 11, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn output_is_row_major () {
        let c = outer_sum_host(&[10, 20, 30], &[1, 2]);
        assert_eq!(c.len(), 6);
        assert_eq!(c, [11, 21, 31, 12, 22, 32]);
        assert!(outer_sum_host::<i32>(&[], &[1]).is_empty());
    }

    #[test]
    fn summary_report () {
        let outcome = OuterSumOutcome {
            a: A.to_vec(),
            b: B.to_vec(),
            c: outer_sum_host(&A, &B),
            kernel: ProfilingInfo { queued: 1_000, submitted: 3_000, started: 4_500, ended: 6_000 }
        };

        assert_eq!(
            outcome.summary(),
            "A = [1, 2, 3, 4, 5]\nB = [6, 7]\nC = [7, 8, 9, 10, 11, 8, 9, 10, 11, 12]\nKernel execution time [ns]:1500\nQueued 2, Submitted 1, Executed 1, Total 5 [us]"
        );
    }
}
