#![warn(clippy::all)]

// Re-export dependencies.
pub use gl;
pub use sdl2;

#[macro_use]
mod context;

mod app;
mod buffer;
mod config;
mod driver;
mod error;
mod layout;
pub mod logging;
mod quad;
mod shader;
mod vao;

#[cfg(test)]
mod mock_driver;

pub use app::{pulse_colour, App};
pub use buffer::{Buffer, BufferTarget, IndexBuffer, VertexBuffer};
pub use config::AppConfig;
pub use context::{Bindable, Bound, ErrorPolicy, RenderContext};
pub use driver::{GlApi, NativeGl};
pub use error::{Error, Result};
pub use layout::{AttribType, VertexAttrib, VertexBufferElement, VertexBufferLayout};
pub use quad::{Quad, QUAD_INDICES, QUAD_POSITIONS};
pub use shader::{ShaderProgram, ShaderSource, ShaderStage};
pub use vao::{AttributeBinding, VertexArray};
