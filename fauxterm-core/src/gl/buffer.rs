use glow::HasContext;

/// Uploads a slice of plain-old-data values to the buffer bound at `target`.
///
/// # Safety
/// `T` must be `#[repr(C)]` without padding-dependent invariants, and a
/// buffer must be bound at `target`.
pub(crate) unsafe fn buffer_upload_array<T: Copy>(
    gl: &glow::Context,
    target: u32,
    data: &[T],
    usage: u32,
) {
    unsafe {
        let bytes =
            std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data));
        gl.buffer_data_u8_slice(target, bytes, usage);
    }
}
