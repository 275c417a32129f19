//! Recording stand-in for the GL driver, so the wrappers can be tested
//! without a GPU or a window.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use gl::types::{GLbitfield, GLenum, GLfloat, GLint, GLsizei, GLuint};

use crate::driver::GlApi;

pub const MOCK_VERSION: &str = "3.3.0 Mock";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GenBuffer(GLuint),
    BindBuffer(GLenum, GLuint),
    BufferData {
        target: GLenum,
        len: usize,
        usage: GLenum,
    },
    DeleteBuffer(GLuint),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    EnableVertexAttribArray(GLuint),
    VertexAttribPointer {
        index: GLuint,
        size: GLint,
        data_type: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    },
    CreateShader(GLenum, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    DetachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    ValidateProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    GetUniformLocation(String),
    Uniform4f(GLint, [GLfloat; 4]),
    ClearColor([GLfloat; 4]),
    Clear(GLbitfield),
    DrawElements {
        mode: GLenum,
        count: GLsizei,
        index_type: GLenum,
        offset: usize,
    },
}

/// Driver-visible binding slots, as a draw call would see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub array_buffer: GLuint,
    pub element_array_buffer: GLuint,
    pub vertex_array: GLuint,
    pub program: GLuint,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Vec<Call>,
    pub pending_errors: VecDeque<GLenum>,
    fail_on: Vec<(&'static str, GLenum)>,
    next_name: GLuint,

    pub array_buffer: GLuint,
    pub vertex_array: GLuint,
    pub program: GLuint,
    /// Element buffer bindings live in the vertex array object (0 = default).
    pub element_bindings: HashMap<GLuint, GLuint>,

    pub live_buffers: HashSet<GLuint>,
    pub live_vertex_arrays: HashSet<GLuint>,
    pub live_shaders: HashSet<GLuint>,
    pub live_programs: HashSet<GLuint>,
    pub buffer_contents: HashMap<GLuint, Vec<u8>>,
    pub shader_sources: HashMap<GLuint, String>,
    shader_types: HashMap<GLuint, GLenum>,

    pub failing_stages: HashSet<GLenum>,
    pub fail_link: bool,
    pub fail_validate: bool,
    /// Uniforms the linked program exposes.
    pub uniforms: HashMap<String, GLint>,
}

impl MockState {
    pub fn bindings(&self) -> Bindings {
        Bindings {
            array_buffer: self.array_buffer,
            element_array_buffer: self
                .element_bindings
                .get(&self.vertex_array)
                .copied()
                .unwrap_or(0),
            vertex_array: self.vertex_array,
            program: self.program,
        }
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(*call)).count()
    }

    fn allocate(&mut self) -> GLuint {
        self.next_name += 1;
        self.next_name
    }
}

#[derive(Clone, Default)]
pub struct MockGl {
    state: Rc<RefCell<MockState>>,
}

impl MockGl {
    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn with_state(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.borrow_mut());
    }

    /// Queues a flag as if an earlier, unchecked call had raised it.
    pub fn push_error(&self, code: GLenum) {
        self.state.borrow_mut().pending_errors.push_back(code);
    }

    /// The next call to `method` raises `code`.
    pub fn fail_next(&self, method: &'static str, code: GLenum) {
        self.state.borrow_mut().fail_on.push((method, code));
    }

    fn record(&self, method: &'static str, call: Call) -> std::cell::RefMut<'_, MockState> {
        let mut state = self.state.borrow_mut();
        if let Some(pos) = state.fail_on.iter().position(|(name, _)| *name == method) {
            let (_, code) = state.fail_on.remove(pos);
            state.pending_errors.push_back(code);
        }
        state.calls.push(call);
        state
    }
}

impl GlApi for MockGl {
    fn get_error(&self) -> GLenum {
        self.state
            .borrow_mut()
            .pending_errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        if name == gl::VERSION {
            Some(MOCK_VERSION.to_owned())
        } else {
            None
        }
    }

    fn gen_buffer(&self) -> GLuint {
        let name = self.state.borrow_mut().allocate();
        let mut state = self.record("gen_buffer", Call::GenBuffer(name));
        state.live_buffers.insert(name);
        name
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        let mut state = self.record("bind_buffer", Call::BindBuffer(target, buffer));
        match target {
            gl::ARRAY_BUFFER => state.array_buffer = buffer,
            gl::ELEMENT_ARRAY_BUFFER => {
                let vao = state.vertex_array;
                state.element_bindings.insert(vao, buffer);
            }
            _ => {}
        }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        let mut state = self.record(
            "buffer_data",
            Call::BufferData {
                target,
                len: data.len(),
                usage,
            },
        );
        let bound = match target {
            gl::ARRAY_BUFFER => state.array_buffer,
            _ => state.bindings().element_array_buffer,
        };
        state.buffer_contents.insert(bound, data.to_vec());
    }

    fn delete_buffer(&self, buffer: GLuint) {
        let mut state = self.record("delete_buffer", Call::DeleteBuffer(buffer));
        state.live_buffers.remove(&buffer);
        if state.array_buffer == buffer {
            state.array_buffer = 0;
        }
        for bound in state.element_bindings.values_mut() {
            if *bound == buffer {
                *bound = 0;
            }
        }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let name = self.state.borrow_mut().allocate();
        let mut state = self.record("gen_vertex_array", Call::GenVertexArray(name));
        state.live_vertex_arrays.insert(name);
        name
    }

    fn bind_vertex_array(&self, array: GLuint) {
        let mut state = self.record("bind_vertex_array", Call::BindVertexArray(array));
        state.vertex_array = array;
    }

    fn delete_vertex_array(&self, array: GLuint) {
        let mut state = self.record("delete_vertex_array", Call::DeleteVertexArray(array));
        state.live_vertex_arrays.remove(&array);
        if state.vertex_array == array {
            state.vertex_array = 0;
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(
            "enable_vertex_attrib_array",
            Call::EnableVertexAttribArray(index),
        );
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        data_type: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.record(
            "vertex_attrib_pointer",
            Call::VertexAttribPointer {
                index,
                size,
                data_type,
                normalized,
                stride,
                offset,
            },
        );
    }

    fn create_shader(&self, shader_type: GLenum) -> GLuint {
        let name = self.state.borrow_mut().allocate();
        let mut state = self.record("create_shader", Call::CreateShader(shader_type, name));
        state.live_shaders.insert(name);
        state.shader_types.insert(name, shader_type);
        name
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.state
            .borrow_mut()
            .shader_sources
            .insert(shader, source.to_owned());
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record("compile_shader", Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let state = self.state.borrow();
        match state.shader_types.get(&shader) {
            Some(ty) => !state.failing_stages.contains(ty),
            None => false,
        }
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            format!("0:1(1): error: mock compile failure in shader {}", shader)
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.record("delete_shader", Call::DeleteShader(shader));
        state.live_shaders.remove(&shader);
    }

    fn create_program(&self) -> GLuint {
        let name = self.state.borrow_mut().allocate();
        let mut state = self.record("create_program", Call::CreateProgram(name));
        state.live_programs.insert(name);
        name
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record("attach_shader", Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.record("detach_shader", Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record("link_program", Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: GLuint) -> bool {
        !self.state.borrow().fail_link
    }

    fn validate_program(&self, program: GLuint) {
        self.record("validate_program", Call::ValidateProgram(program));
    }

    fn program_validate_status(&self, _program: GLuint) -> bool {
        !self.state.borrow().fail_validate
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        let state = self.state.borrow();
        if state.fail_link {
            "error: mock link failure".to_owned()
        } else if state.fail_validate {
            "error: mock validation failure".to_owned()
        } else {
            String::new()
        }
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.record("use_program", Call::UseProgram(program));
        state.program = program;
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.record("delete_program", Call::DeleteProgram(program));
        state.live_programs.remove(&program);
        if state.program == program {
            state.program = 0;
        }
    }

    fn get_uniform_location(&self, _program: GLuint, name: &str) -> Option<GLint> {
        let state = self.record(
            "get_uniform_location",
            Call::GetUniformLocation(name.to_owned()),
        );
        state.uniforms.get(name).copied()
    }

    fn uniform_4f(&self, location: GLint, v0: GLfloat, v1: GLfloat, v2: GLfloat, v3: GLfloat) {
        self.record("uniform_4f", Call::Uniform4f(location, [v0, v1, v2, v3]));
    }

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) {
        self.record("clear_color", Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record("clear", Call::Clear(mask));
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize) {
        self.record(
            "draw_elements",
            Call::DrawElements {
                mode,
                count,
                index_type,
                offset,
            },
        );
    }
}
