use core::marker::PhantomData;
use error_stack::Report;
use opencl_sys::{cl_bool, cl_event, clEnqueueWriteBuffer, clEnqueueReadBuffer, CL_TRUE, CL_FALSE};
use crate::{prelude::{Result, CommandQueue, MemBuffer}, error::{report, ErrorCL}};
use super::{BaseEvent, Event, wait_list, raw_wait_list};

/// Event that writes from host memory to an OpenCL buffer.
/// The host slice stays borrowed for as long as the event lives; a non-blocking write is awaited on drop.
pub struct WriteBuffer<'a> {
    inner: BaseEvent,
    blocking: bool,
    phtm: PhantomData<&'a ()>
}

impl<'a> WriteBuffer<'a> {
    pub(crate) fn new<T: Copy> (queue: &CommandQueue, blocking: bool, offset: usize, src: &'a [T], dst: &MemBuffer<T>, wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Result<Self> {
        let (offset_bytes, len_bytes) = byte_region::<T>(dst, offset, src.len())?;
        let wait = wait_list(wait);
        let (wait_len, wait_ptr) = raw_wait_list(&wait)?;

        let mut event : cl_event = core::ptr::null_mut();
        let err = unsafe {
            clEnqueueWriteBuffer(queue.0, dst.id(), as_cl_bool(blocking), offset_bytes, len_bytes, src.as_ptr().cast(), wait_len, wait_ptr, &mut event)
        };

        if err == 0 {
            tracing::trace!(bytes = len_bytes, blocking, "buffer write enqueued");
            return Ok(Self { inner: BaseEvent::new(event), blocking, phtm: PhantomData });
        }

        let report = report(err, "clEnqueueWriteBuffer");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidCommandQueue => report.attach_printable(format!("'{:?}' is not a valid command-queue", queue.0)),
            ErrorCL::InvalidContext => report.attach_printable("the context associated with the command queue and buffer are not the same or the context associated with command queue and events in the event wait list are not the same"),
            ErrorCL::InvalidMemObject => report.attach_printable(format!("'{:?}' is not a valid buffer", dst.id())),
            ErrorCL::InvalidEventWaitList => report.attach_printable("event objects in the event wait list are not valid events"),
            ErrorCL::MemObjectAllocationFailure => report.attach_printable("there is a failure to allocate memory for data store associated with buffer"),
            _ => report
        })
    }
}

impl Event for WriteBuffer<'_> {}

impl AsRef<BaseEvent> for WriteBuffer<'_> {
    #[inline(always)]
    fn as_ref(&self) -> &BaseEvent {
        &self.inner
    }
}

impl Drop for WriteBuffer<'_> {
    fn drop(&mut self) {
        if !self.blocking {
            if let Err(e) = self.inner.wait() {
                tracing::warn!(error = ?e, "pending buffer write failed");
            }
        }
    }
}

/// Event that reads from an OpenCL buffer to host memory.
/// The destination slice stays borrowed for as long as the event lives; a non-blocking read is awaited on drop.
pub struct ReadBuffer<'a> {
    inner: BaseEvent,
    blocking: bool,
    phtm: PhantomData<&'a mut ()>
}

impl<'a> ReadBuffer<'a> {
    pub(crate) fn new<T: Copy> (queue: &CommandQueue, blocking: bool, offset: usize, src: &MemBuffer<T>, dst: &'a mut [T], wait: impl IntoIterator<Item = impl AsRef<BaseEvent>>) -> Result<Self> {
        let (offset_bytes, len_bytes) = byte_region::<T>(src, offset, dst.len())?;
        let wait = wait_list(wait);
        let (wait_len, wait_ptr) = raw_wait_list(&wait)?;

        let mut event : cl_event = core::ptr::null_mut();
        let err = unsafe {
            clEnqueueReadBuffer(queue.0, src.id(), as_cl_bool(blocking), offset_bytes, len_bytes, dst.as_mut_ptr().cast(), wait_len, wait_ptr, &mut event)
        };

        if err == 0 {
            tracing::trace!(bytes = len_bytes, blocking, "buffer read enqueued");
            return Ok(Self { inner: BaseEvent::new(event), blocking, phtm: PhantomData });
        }

        let report = report(err, "clEnqueueReadBuffer");
        Err(match ErrorCL::from(err) {
            ErrorCL::InvalidCommandQueue => report.attach_printable(format!("'{:?}' is not a valid command-queue", queue.0)),
            ErrorCL::InvalidContext => report.attach_printable("the context associated with the command queue and buffer are not the same or the context associated with command queue and events in the event wait list are not the same"),
            ErrorCL::InvalidMemObject => report.attach_printable(format!("'{:?}' is not a valid buffer", src.id())),
            ErrorCL::InvalidEventWaitList => report.attach_printable("event objects in the event wait list are not valid events"),
            ErrorCL::ExecutionStatusErrorForEventsInWaitList => report.attach_printable("a command in the wait list failed before the blocking read"),
            _ => report
        })
    }
}

impl Event for ReadBuffer<'_> {}

impl AsRef<BaseEvent> for ReadBuffer<'_> {
    #[inline(always)]
    fn as_ref(&self) -> &BaseEvent {
        &self.inner
    }
}

impl Drop for ReadBuffer<'_> {
    fn drop(&mut self) {
        if !self.blocking {
            if let Err(e) = self.inner.wait() {
                tracing::warn!(error = ?e, "pending buffer read failed");
            }
        }
    }
}

#[inline(always)]
fn as_cl_bool (v: bool) -> cl_bool {
    if v { CL_TRUE } else { CL_FALSE }
}

/// Byte offset and length of `len` elements starting at element `offset`, rejecting regions past the end of `buffer`.
fn byte_region<T: Copy> (buffer: &MemBuffer<T>, offset: usize, len: usize) -> Result<(usize, usize)> {
    match offset.checked_add(len) {
        Some(end) if end <= buffer.len() => {},
        _ => return Err(Report::new(ErrorCL::InvalidValue)
            .attach_printable(format!("region {offset}..{offset}+{len} is out of bounds for a buffer of {} elements", buffer.len())))
    }

    let size = core::mem::size_of::<T>();
    Ok((offset * size, len * size))
}
