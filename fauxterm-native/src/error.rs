/// Errors raised while creating or driving a native console.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// stdin or stdout is not attached to a terminal.
    #[error("Not a terminal: stdin and stdout must both be attached to a tty")]
    NoTerminal,

    /// The process-wide window event loop could not be created.
    #[error("Window system error: {0}")]
    WindowSystem(String),

    /// Window, GL display, context or surface creation failed.
    #[error("Window error: {0}")]
    Window(String),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The console engine reported an error.
    #[error(transparent)]
    Core(#[from] fauxterm_core::Error),
}

impl Error {
    pub(crate) fn window_system_failed(detail: impl std::fmt::Display) -> Self {
        Self::WindowSystem(format!("Failed to initialize the window system: {detail}"))
    }

    pub(crate) fn window_creation_failed(detail: impl std::fmt::Display) -> Self {
        Self::Window(format!("Failed to create window: {detail}"))
    }

    pub(crate) fn gl_context_failed(detail: impl std::fmt::Display) -> Self {
        Self::Window(format!("Failed to create OpenGL context: {detail}"))
    }

    pub(crate) fn gl_surface_failed(detail: impl std::fmt::Display) -> Self {
        Self::Window(format!("Failed to create window surface: {detail}"))
    }
}
