use std::fmt;

use crate::shader::ShaderStage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The driver raised an error flag after a wrapped call.
    Gl {
        code: u32,
        call: &'static str,
        file: &'static str,
        line: u32,
    },

    /// The driver handed back a zero name for a new object.
    ResourceCreation(&'static str),

    /// A GL type enum that a vertex layout cannot describe.
    UnsupportedAttribType(u32),

    /// Attribute component counts must be 1..=4.
    InvalidComponentCount(u32),

    ShaderIo(std::io::Error),

    ShaderCompile { stage: ShaderStage, log: String },

    ProgramLink(String),

    ProgramValidate(String),

    /// Window, context or event pump setup failed.
    Window(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Gl {
                code,
                call,
                file,
                line,
            } => write!(f, "[OpenGL Error] ({}): {} {}:{}", code, call, file, line),
            Error::ResourceCreation(what) => write!(f, "Driver failed to create {}", what),
            Error::UnsupportedAttribType(ty) => {
                write!(f, "Unsupported vertex attribute type 0x{:X}", ty)
            }
            Error::InvalidComponentCount(count) => {
                write!(f, "Vertex attribute component count {} is not in 1..=4", count)
            }
            Error::ShaderIo(err) => write!(f, "Failed to read shader source: {}", err),
            Error::ShaderCompile { stage, log } => {
                write!(f, "Failed to compile {} shader: {}", stage, log)
            }
            Error::ProgramLink(log) => write!(f, "Failed to link shader program: {}", log),
            Error::ProgramValidate(log) => {
                write!(f, "Shader program failed validation: {}", log)
            }
            Error::Window(msg) => write!(f, "Window error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ShaderIo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ShaderIo(err)
    }
}
