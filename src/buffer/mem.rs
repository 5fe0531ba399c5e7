use core::marker::PhantomData;
use error_stack::Report;
use opencl_sys::{cl_mem, clRetainMemObject, clReleaseMemObject, clCreateBuffer};
use crate::{prelude::{Context, CommandQueue, Result}, error::{report, ErrorCL}, event::{BaseEvent, ReadBuffer, WriteBuffer}};
use super::MemFlags;

/// Device buffer holding `len` elements of `T`.
pub struct MemBuffer<T: Copy> {
    id: cl_mem,
    len: usize,
    phtm: PhantomData<T>
}

impl<T: Copy> MemBuffer<T> {
    /// Allocates an uninitialized device buffer of `len` elements. Empty buffers are rejected.
    pub fn new (ctx: &Context, flags: impl Into<Option<MemFlags>>, len: usize) -> Result<Self> {
        let flags = flags.into().unwrap_or_default();
        let size = len.checked_mul(core::mem::size_of::<T>())
            .ok_or_else(|| Report::new(ErrorCL::InvalidBufferSize).attach_printable(format!("{len} elements overflow the addressable size")))?;

        if size == 0 {
            return Err(Report::new(ErrorCL::InvalidBufferSize).attach_printable("buffer must hold at least one element"));
        }

        let mut err = 0;
        let id = unsafe { clCreateBuffer(ctx.0, flags.bits(), size, core::ptr::null_mut(), &mut err) };

        if err == 0 {
            tracing::trace!(bytes = size, ?flags, "buffer allocated");
            return Ok(Self { id, len, phtm: PhantomData });
        }

        let report = report(err, "clCreateBuffer");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidBufferSize => report.attach_printable(format!("{size} bytes exceed the device's maximum allocation size")),
            ErrorCL::InvalidValue => report.attach_printable(format!("{flags:?} are not valid memory flags")),
            ErrorCL::MemObjectAllocationFailure => report.attach_printable(format!("failure to allocate {size} bytes for the buffer")),
            _ => report
        })
    }

    #[inline(always)]
    pub fn id (&self) -> cl_mem {
        self.id
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len (&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty (&self) -> bool {
        self.len == 0
    }

    /// Copies `src` into the buffer starting at element `offset`.
    #[inline(always)]
    pub fn write<'a> (&mut self, queue: &CommandQueue, blocking: bool, offset: usize, src: &'a [T], wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Result<WriteBuffer<'a>> {
        WriteBuffer::new(queue, blocking, offset, src, self, wait)
    }

    /// Copies `dst.len()` elements, starting at element `offset`, into `dst`.
    #[inline(always)]
    pub fn read<'a> (&self, queue: &CommandQueue, blocking: bool, offset: usize, dst: &'a mut [T], wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Result<ReadBuffer<'a>> {
        ReadBuffer::new(queue, blocking, offset, self, dst, wait)
    }
}

impl<T: Copy> Clone for MemBuffer<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        tri_warn!(clRetainMemObject(self.id));
        Self { id: self.id, len: self.len, phtm: PhantomData }
    }
}

impl<T: Copy> Drop for MemBuffer<T> {
    #[inline(always)]
    fn drop(&mut self) {
        tri_warn!(clReleaseMemObject(self.id));
    }
}

unsafe impl<T: Send + Copy> Send for MemBuffer<T> {}
unsafe impl<T: Sync + Copy> Sync for MemBuffer<T> {}
