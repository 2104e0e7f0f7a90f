use crate::{Error, gl::GlState};

/// Borrowed GL context and state cache for one frame.
pub struct RenderContext<'a> {
    /// Current GL context
    pub gl: &'a glow::Context,
    /// State cache for `gl`
    pub state: &'a mut GlState,
}

/// Something that can be drawn in three steps.
pub trait Drawable {
    /// Binds the program, vertex data and textures needed for drawing.
    ///
    /// # Errors
    /// Returns an error if GPU data cannot be prepared.
    fn prepare(&self, context: &mut RenderContext) -> Result<(), Error>;

    /// Issues the draw calls.
    fn draw(&self, context: &mut RenderContext);

    /// Unbinds everything bound in `prepare`.
    fn cleanup(&self, context: &mut RenderContext);
}
