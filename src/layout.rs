use gl::types::GLenum;

use crate::error::{Error, Result};

/// Scalar type of one vertex attribute component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttribType {
    Float,
    UnsignedInt,
    /// Packed colour channels, normalized to 0..=1 by the driver.
    UnsignedByte,
}

struct AttribInfo {
    gl_type: GLenum,
    size: u32,
    normalized: bool,
}

impl AttribType {
    const fn info(self) -> AttribInfo {
        match self {
            AttribType::Float => AttribInfo {
                gl_type: gl::FLOAT,
                size: 4,
                normalized: false,
            },
            AttribType::UnsignedInt => AttribInfo {
                gl_type: gl::UNSIGNED_INT,
                size: 4,
                normalized: false,
            },
            AttribType::UnsignedByte => AttribInfo {
                gl_type: gl::UNSIGNED_BYTE,
                size: 1,
                normalized: true,
            },
        }
    }

    pub fn from_gl(gl_type: GLenum) -> Result<Self> {
        match gl_type {
            gl::FLOAT => Ok(AttribType::Float),
            gl::UNSIGNED_INT => Ok(AttribType::UnsignedInt),
            gl::UNSIGNED_BYTE => Ok(AttribType::UnsignedByte),
            other => Err(Error::UnsupportedAttribType(other)),
        }
    }

    pub const fn gl_type(self) -> GLenum {
        self.info().gl_type
    }

    /// Byte size of one component.
    pub const fn size(self) -> u32 {
        self.info().size
    }

    pub const fn normalized(self) -> bool {
        self.info().normalized
    }
}

/// Rust scalars that can back a vertex attribute.
pub trait VertexAttrib: bytemuck::Pod {
    const TYPE: AttribType;
}

impl VertexAttrib for f32 {
    const TYPE: AttribType = AttribType::Float;
}

impl VertexAttrib for u32 {
    const TYPE: AttribType = AttribType::UnsignedInt;
}

impl VertexAttrib for u8 {
    const TYPE: AttribType = AttribType::UnsignedByte;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexBufferElement {
    pub attrib_type: AttribType,
    pub count: u32,
    pub normalized: bool,
}

impl VertexBufferElement {
    /// Bytes this attribute takes up in one vertex.
    pub fn size(&self) -> u32 {
        self.count * self.attrib_type.size()
    }
}

/// Ordered attribute list for one interleaved vertex buffer.
///
/// Push order decides both the byte offset of each attribute and its
/// attribute slot: the first push is slot 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// `layout.push::<f32>(2)` appends a two-float attribute.
    pub fn push<T: VertexAttrib>(&mut self, count: u32) -> Result<&mut Self> {
        self.push_type(T::TYPE, count)
    }

    pub fn push_type(&mut self, attrib_type: AttribType, count: u32) -> Result<&mut Self> {
        if !(1..=4).contains(&count) {
            return Err(Error::InvalidComponentCount(count));
        }

        let element = VertexBufferElement {
            attrib_type,
            count,
            normalized: attrib_type.normalized(),
        };
        self.stride += element.size();
        self.elements.push(element);
        Ok(self)
    }

    pub fn push_gl(&mut self, gl_type: GLenum, count: u32) -> Result<&mut Self> {
        self.push_type(AttribType::from_gl(gl_type)?, count)
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    /// Each element paired with its byte offset inside a vertex.
    pub fn offsets(&self) -> impl Iterator<Item = (u32, &VertexBufferElement)> + '_ {
        self.elements.iter().scan(0u32, |offset, element| {
            let current = *offset;
            *offset += element.size();
            Some((current, element))
        })
    }
}
