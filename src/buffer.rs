use gl::types::{GLenum, GLuint};

use crate::context::{Bindable, RenderContext};
use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Primitive indices.
    ElementArray,
}

impl BufferTarget {
    pub fn gl_target(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// One block of device memory, uploaded once with `STATIC_DRAW` and never
/// resized. Deleted on drop.
pub struct Buffer {
    ctx: RenderContext,
    handle: GLuint,
    target: BufferTarget,
    size: usize,
}

impl Buffer {
    /// Creates the buffer, leaves it bound to `target` and uploads `data`.
    pub fn new(ctx: &RenderContext, target: BufferTarget, data: &[u8]) -> Result<Self> {
        let handle = gl_call!(ctx, gen_buffer())?;
        if handle == 0 {
            return Err(Error::ResourceCreation("buffer"));
        }

        // From here on drop releases the handle if the upload fails.
        let buffer = Buffer {
            ctx: ctx.clone(),
            handle,
            target,
            size: data.len(),
        };
        buffer.raw_bind()?;
        gl_call!(ctx, buffer_data(target.gl_target(), data, gl::STATIC_DRAW))?;

        log::debug!(
            "created {:?} buffer {} ({} bytes)",
            target,
            handle,
            data.len()
        );
        Ok(buffer)
    }

    pub fn handle(&self) -> GLuint {
        self.handle
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Size of the uploaded data in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Bindable for Buffer {
    fn raw_bind(&self) -> Result<()> {
        gl_call!(self.ctx, bind_buffer(self.target.gl_target(), self.handle))
    }

    fn raw_unbind(&self) -> Result<()> {
        gl_call!(self.ctx, bind_buffer(self.target.gl_target(), 0))
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Err(err) = gl_release!(self.ctx, delete_buffer(self.handle)) {
            log::warn!("failed to delete buffer {}: {}", self.handle, err);
        } else {
            log::debug!("deleted buffer {}", self.handle);
        }
    }
}

/// Interleaved vertex data.
pub struct VertexBuffer {
    buffer: Buffer,
}

impl VertexBuffer {
    pub fn new<T: bytemuck::Pod>(ctx: &RenderContext, vertices: &[T]) -> Result<Self> {
        let buffer = Buffer::new(ctx, BufferTarget::Array, bytemuck::cast_slice(vertices))?;
        Ok(VertexBuffer { buffer })
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }
}

impl Bindable for VertexBuffer {
    fn raw_bind(&self) -> Result<()> {
        self.buffer.raw_bind()
    }

    fn raw_unbind(&self) -> Result<()> {
        self.buffer.raw_unbind()
    }
}

/// Unsigned 32-bit primitive indices.
pub struct IndexBuffer {
    buffer: Buffer,
    count: u32,
}

impl IndexBuffer {
    pub const INDEX_TYPE: GLenum = gl::UNSIGNED_INT;

    pub fn new(ctx: &RenderContext, indices: &[u32]) -> Result<Self> {
        let buffer = Buffer::new(ctx, BufferTarget::ElementArray, bytemuck::cast_slice(indices))?;
        Ok(IndexBuffer {
            buffer,
            count: indices.len() as u32,
        })
    }

    /// Number of indices, fixed at construction.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }
}

impl Bindable for IndexBuffer {
    fn raw_bind(&self) -> Result<()> {
        self.buffer.raw_bind()
    }

    fn raw_unbind(&self) -> Result<()> {
        self.buffer.raw_unbind()
    }
}
