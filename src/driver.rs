#![allow(unsafe_code)]

use gl::types::{GLbitfield, GLchar, GLenum, GLfloat, GLint, GLsizei, GLuint};
use std::ffi::{c_void, CStr, CString};
use std::marker::PhantomData;

/// Every driver entry point the resource wrappers reach for.
///
/// Implementations act on whatever GL context is current on the calling
/// thread. Nothing here checks `glGetError`; that is the job of
/// [`gl_call!`](crate::gl_call).
pub trait GlApi {
    fn get_error(&self) -> GLenum;
    fn get_string(&self, name: GLenum) -> Option<String>;

    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: GLenum, buffer: GLuint);
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);
    fn delete_buffer(&self, buffer: GLuint);

    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, array: GLuint);
    fn delete_vertex_array(&self, array: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        data_type: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );

    fn create_shader(&self, shader_type: GLenum) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn program_validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    /// `None` when the program has no active uniform by that name.
    fn get_uniform_location(&self, program: GLuint, name: &str) -> Option<GLint>;
    fn uniform_4f(&self, location: GLint, v0: GLfloat, v1: GLfloat, v2: GLfloat, v3: GLfloat);

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat);
    fn clear(&self, mask: GLbitfield);
    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize);
}

/// The real driver, reached through the `gl` crate's loaded function pointers.
pub struct NativeGl {
    // The context is current on exactly one thread.
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// Loads the GL function pointers. The context the loader belongs to must
    /// be current on this thread for as long as the returned value is used.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        NativeGl {
            _not_send: PhantomData,
        }
    }
}

fn read_info_log(length: GLint, fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    if length <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; length as usize];
    let mut written: GLsizei = 0;
    fetch(length, &mut written, buf.as_mut_ptr() as *mut GLchar);
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).into_owned()
}

impl GlApi for NativeGl {
    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        unsafe {
            let raw_ptr = gl::GetString(name);
            if raw_ptr.is_null() {
                None
            } else {
                Some(
                    CStr::from_ptr(raw_ptr as *const GLchar)
                        .to_string_lossy()
                        .into_owned(),
                )
            }
        }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        unsafe { gl::BindBuffer(target, buffer) }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe {
            gl::BufferData(
                target,
                data.len() as isize,
                data.as_ptr() as *const c_void,
                usage,
            )
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut vertex_array = 0;
        unsafe { gl::GenVertexArrays(1, &mut vertex_array) };
        vertex_array
    }

    fn bind_vertex_array(&self, array: GLuint) {
        unsafe { gl::BindVertexArray(array) }
    }

    fn delete_vertex_array(&self, array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &array) }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
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
        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                data_type,
                normalized as u8,
                stride,
                offset as *const c_void,
            )
        }
    }

    fn create_shader(&self, shader_type: GLenum) -> GLuint {
        unsafe { gl::CreateShader(shader_type) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        unsafe {
            gl::ShaderSource(
                shader,
                1,
                &(source.as_ptr() as *const GLchar),
                &(source.len() as GLint),
            )
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut length = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length) };
        read_info_log(length, |capacity, written, buf| unsafe {
            gl::GetShaderInfoLog(shader, capacity, written, buf)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn program_validate_status(&self, program: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut length = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length) };
        read_info_log(length, |capacity, written, buf| unsafe {
            gl::GetProgramInfoLog(program, capacity, written, buf)
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        if location < 0 {
            None
        } else {
            Some(location)
        }
    }

    fn uniform_4f(&self, location: GLint, v0: GLfloat, v1: GLfloat, v2: GLfloat, v3: GLfloat) {
        unsafe { gl::Uniform4f(location, v0, v1, v2, v3) }
    }

    fn clear_color(&self, red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) {
        unsafe { gl::ClearColor(red, green, blue, alpha) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum, offset: usize) {
        unsafe { gl::DrawElements(mode, count, index_type, offset as *const c_void) }
    }
}
