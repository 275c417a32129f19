use gl::types::{GLint, GLsizei, GLuint};

use crate::buffer::VertexBuffer;
use crate::context::{Bindable, RenderContext};
use crate::error::{Error, Result};
use crate::layout::VertexBufferLayout;

// ----------------------------------------------------------------------------

/// One attribute slot as handed to `glVertexAttribPointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub location: u32,
    pub vector_size: i32,
    pub data_type: u32, // GL_FLOAT, GL_UNSIGNED_INT, GL_UNSIGNED_BYTE
    pub normalized: bool,
    pub stride: i32,
    pub offset: usize,
}

// ----------------------------------------------------------------------------

/// Wrapper around GL's VAO. Binding it restores every attribute pointer and
/// the element buffer in one call.
pub struct VertexArray {
    ctx: RenderContext,
    vao: GLuint,
    attributes: Vec<AttributeBinding>,
}

impl VertexArray {
    /// Creates the array and leaves it bound, so the attribute and index
    /// buffer setup that follows is recorded into it.
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let vao = gl_call!(ctx, gen_vertex_array())?;
        if vao == 0 {
            return Err(Error::ResourceCreation("vertex array"));
        }

        let vertex_array = Self {
            ctx: ctx.clone(),
            vao,
            attributes: Vec::new(),
        };
        vertex_array.raw_bind()?;

        log::debug!("created vertex array {}", vao);
        Ok(vertex_array)
    }

    /// Points slots `0..layout.elements().len()` at `buffer`, in push order.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexBufferLayout) -> Result<()> {
        self.raw_bind()?;
        buffer.raw_bind()?;

        let stride = layout.stride() as GLsizei;
        for (location, (offset, element)) in layout.offsets().enumerate() {
            let attribute = AttributeBinding {
                location: location as u32,
                vector_size: element.count as GLint,
                data_type: element.attrib_type.gl_type(),
                normalized: element.normalized,
                stride,
                offset: offset as usize,
            };

            gl_call!(self.ctx, enable_vertex_attrib_array(attribute.location))?;
            gl_call!(
                self.ctx,
                vertex_attrib_pointer(
                    attribute.location,
                    attribute.vector_size,
                    attribute.data_type,
                    attribute.normalized,
                    attribute.stride,
                    attribute.offset,
                )
            )?;
            self.attributes.push(attribute);
        }

        Ok(())
    }

    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.attributes
    }

    pub fn handle(&self) -> GLuint {
        self.vao
    }
}

impl Bindable for VertexArray {
    fn raw_bind(&self) -> Result<()> {
        gl_call!(self.ctx, bind_vertex_array(self.vao))
    }

    fn raw_unbind(&self) -> Result<()> {
        gl_call!(self.ctx, bind_vertex_array(0))
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if let Err(err) = gl_release!(self.ctx, delete_vertex_array(self.vao)) {
            log::warn!("failed to delete vertex array {}: {}", self.vao, err);
        } else {
            log::debug!("deleted vertex array {}", self.vao);
        }
    }
}
