use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::context::{Bindable, RenderContext};
use crate::error::Result;
use crate::layout::VertexBufferLayout;
use crate::shader::ShaderProgram;
use crate::vao::VertexArray;

#[rustfmt::skip]
pub const QUAD_POSITIONS: [f32; 8] = [
    -0.5, -0.5, // 0
     0.5, -0.5, // 1
     0.5,  0.5, // 2
    -0.5,  0.5, // 3
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// The unit quad: one vertex array, its vertex and index buffers, and the
/// layout that ties them together.
pub struct Quad {
    vertex_array: VertexArray,
    vertices: VertexBuffer,
    indices: IndexBuffer,
    layout: VertexBufferLayout,
}

impl Quad {
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let mut vertex_array = VertexArray::new(ctx)?;
        let vertices = VertexBuffer::new(ctx, &QUAD_POSITIONS)?;

        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2)?;
        vertex_array.add_buffer(&vertices, &layout)?;

        // Created while the array is bound, so the array keeps it.
        let indices = IndexBuffer::new(ctx, &QUAD_INDICES)?;

        vertex_array.raw_unbind()?;
        vertices.raw_unbind()?;
        indices.raw_unbind()?;

        Ok(Quad {
            vertex_array,
            vertices,
            indices,
            layout,
        })
    }

    /// Draws the quad with `program`, setting the `vec4` uniform `uniform`
    /// to `colour` first.
    pub fn draw(
        &self,
        ctx: &RenderContext,
        program: &ShaderProgram,
        uniform: &str,
        colour: [f32; 4],
    ) -> Result<()> {
        let program = program.bind()?;
        program.set_uniform_4f(uniform, colour)?;

        let vertex_array = self.vertex_array.bind()?;
        ctx.draw_indexed(&program, &vertex_array, &self.indices)
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    pub fn layout(&self) -> &VertexBufferLayout {
        &self.layout
    }
}
