use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use gl::types::{GLenum, GLint, GLuint};

use crate::context::{Bindable, Bound, RenderContext};
use crate::error::{Error, Result};

const SECTION_TAG: &str = "#shader";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_type(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Vertex and fragment source split out of one combined shader file.
///
/// A line containing `#shader vertex` or `#shader fragment` starts a section.
/// Lines before the first header, and lines under a `#shader` header naming
/// neither stage, are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut source = ShaderSource::default();
        let mut current: Option<ShaderStage> = None;

        for line in reader.lines() {
            let line = line?;
            if line.contains(SECTION_TAG) {
                current = if line.contains("vertex") {
                    Some(ShaderStage::Vertex)
                } else if line.contains("fragment") {
                    Some(ShaderStage::Fragment)
                } else {
                    log::warn!("ignoring unknown shader section: {}", line.trim());
                    None
                };
                continue;
            }

            if let Some(stage) = current {
                let target = source.stage_mut(stage);
                target.push_str(&line);
                target.push('\n');
            }
        }

        Ok(source)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::parse(BufReader::new(file))
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }
}

fn compile_shader(ctx: &RenderContext, stage: ShaderStage, source: &str) -> Result<GLuint> {
    let shader = gl_call!(ctx, create_shader(stage.gl_type()))?;
    if shader == 0 {
        return Err(Error::ResourceCreation("shader"));
    }

    let compiled = gl_call!(ctx, shader_source(shader, source))
        .and_then(|()| gl_call!(ctx, compile_shader(shader)))
        .and_then(|()| {
            if ctx.api().shader_compile_status(shader) {
                Ok(())
            } else {
                let log = ctx.api().shader_info_log(shader);
                log::error!("failed to compile {} shader:\n{}", stage, log);
                Err(Error::ShaderCompile { stage, log })
            }
        });

    match compiled {
        Ok(()) => Ok(shader),
        Err(err) => {
            delete_shader(ctx, shader);
            Err(err)
        }
    }
}

fn delete_shader(ctx: &RenderContext, shader: GLuint) {
    if let Err(err) = gl_release!(ctx, delete_shader(shader)) {
        log::warn!("failed to delete shader {}: {}", shader, err);
    }
}

/// Attaches, links and validates. The caller owns `program` on error.
fn attach_and_link(ctx: &RenderContext, program: GLuint, shaders: &[GLuint]) -> Result<()> {
    for &shader in shaders {
        gl_call!(ctx, attach_shader(program, shader))?;
    }
    gl_call!(ctx, link_program(program))?;
    if !ctx.api().program_link_status(program) {
        return Err(Error::ProgramLink(ctx.api().program_info_log(program)));
    }

    gl_call!(ctx, validate_program(program))?;
    if !ctx.api().program_validate_status(program) {
        return Err(Error::ProgramValidate(ctx.api().program_info_log(program)));
    }

    // Only the linked program is needed from here on.
    for &shader in shaders {
        gl_call!(ctx, detach_shader(program, shader))?;
    }
    Ok(())
}

fn link_program(ctx: &RenderContext, shaders: &[GLuint]) -> Result<GLuint> {
    let program = gl_call!(ctx, create_program())?;
    if program == 0 {
        return Err(Error::ResourceCreation("program"));
    }

    match attach_and_link(ctx, program, shaders) {
        Ok(()) => Ok(program),
        Err(err) => {
            // Deleting the program also detaches whatever is still attached.
            if let Err(release) = gl_release!(ctx, delete_program(program)) {
                log::warn!("failed to delete program {}: {}", program, release);
            }
            Err(err)
        }
    }
}

/// A linked vertex + fragment program.
pub struct ShaderProgram {
    ctx: RenderContext,
    program: GLuint,
    /// Driver answers per uniform name, `None` included, so a missing
    /// uniform is only queried once.
    uniform_locations: RefCell<HashMap<String, Option<GLint>>>,
}

impl ShaderProgram {
    pub fn new(ctx: &RenderContext, source: &ShaderSource) -> Result<Self> {
        let vertex = compile_shader(ctx, ShaderStage::Vertex, &source.vertex)?;
        let fragment = match compile_shader(ctx, ShaderStage::Fragment, &source.fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                delete_shader(ctx, vertex);
                return Err(err);
            }
        };

        let linked = link_program(ctx, &[vertex, fragment]);
        delete_shader(ctx, vertex);
        delete_shader(ctx, fragment);
        let program = linked?;

        log::debug!("linked shader program {}", program);
        Ok(ShaderProgram {
            ctx: ctx.clone(),
            program,
            uniform_locations: RefCell::new(HashMap::new()),
        })
    }

    pub fn from_file<P: AsRef<Path>>(ctx: &RenderContext, path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading shader {}", path.display());
        let source = ShaderSource::from_file(path)?;
        Self::new(ctx, &source)
    }

    pub fn handle(&self) -> GLuint {
        self.program
    }

    /// Looks `name` up once per program; later calls hit the cache, including
    /// for names the driver did not know.
    pub fn uniform_location(&self, name: &str) -> Result<Option<GLint>> {
        if let Some(location) = self.uniform_locations.borrow().get(name) {
            return Ok(*location);
        }

        let location = gl_call!(self.ctx, get_uniform_location(self.program, name))?;
        if location.is_none() {
            log::warn!("uniform '{}' doesn't exist in program {}", name, self.program);
        }
        self.uniform_locations
            .borrow_mut()
            .insert(name.to_owned(), location);
        Ok(location)
    }
}

impl Bound<'_, ShaderProgram> {
    /// Sets a `vec4` uniform on this (bound) program. Unknown names are
    /// ignored, as the driver does for location -1.
    pub fn set_uniform_4f(&self, name: &str, value: [f32; 4]) -> Result<()> {
        match self.uniform_location(name)? {
            Some(location) => gl_call!(
                self.ctx,
                uniform_4f(location, value[0], value[1], value[2], value[3])
            ),
            None => Ok(()),
        }
    }
}

impl Bindable for ShaderProgram {
    fn raw_bind(&self) -> Result<()> {
        gl_call!(self.ctx, use_program(self.program))
    }

    fn raw_unbind(&self) -> Result<()> {
        gl_call!(self.ctx, use_program(0))
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Err(err) = gl_release!(self.ctx, delete_program(self.program)) {
            log::warn!("failed to delete program {}: {}", self.program, err);
        } else {
            log::debug!("deleted shader program {}", self.program);
        }
    }
}
