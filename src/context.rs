use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

use gl::types::GLsizei;

use crate::buffer::IndexBuffer;
use crate::driver::GlApi;
use crate::error::{Error, Result};
use crate::shader::ShaderProgram;
use crate::vao::VertexArray;

// Upper bound on stale flags drained before a call. A lost context can keep
// reporting GL_CONTEXT_LOST forever.
const MAX_DRAINED_ERRORS: usize = 32;

/// Wraps one driver call: drains stale error flags, performs the call, then
/// polls for a new flag and reports it with the call text and call site.
///
/// Evaluates to `Result<T>` holding the call's return value.
///
/// ``` ignore
/// gl_call!(ctx, bind_buffer(gl::ARRAY_BUFFER, handle))?;
/// let name = gl_call!(ctx, gen_vertex_array())?;
/// ```
#[macro_export]
macro_rules! gl_call {
    ($ctx: expr, $method: ident ( $($arg: expr),* $(,)? )) => {{
        let ctx: &$crate::RenderContext = &$ctx;
        ctx.clear_errors();
        let value = ctx.api().$method($($arg),*);
        ctx.check_error(stringify!($method($($arg),*)), file!(), line!())
            .map(|()| value)
    }};
}

/// Like [`gl_call!`], but never traps: errors come back as `Err` whatever
/// the context's [`ErrorPolicy`]. Used on release paths, which may run
/// from `Drop` or while another error is already being returned.
#[macro_export]
macro_rules! gl_release {
    ($ctx: expr, $method: ident ( $($arg: expr),* $(,)? )) => {{
        let ctx: &$crate::RenderContext = &$ctx;
        ctx.clear_errors();
        let value = ctx.api().$method($($arg),*);
        ctx.check_error_with(
            $crate::ErrorPolicy::Report,
            stringify!($method($($arg),*)),
            file!(),
            line!(),
        )
        .map(|()| value)
    }};
}

/// What happens once a wrapped call reports a driver error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Log the error and hand it back as `Err(Error::Gl { .. })`.
    Report,
    /// Log the error and panic at the call site. Debug aid.
    Break,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ErrorPolicy::Break
        } else {
            ErrorPolicy::Report
        }
    }
}

struct Inner {
    api: Box<dyn GlApi>,
    policy: Cell<ErrorPolicy>,
}

/// Shared handle to the current GL context.
///
/// Every resource keeps a clone so it can release its handle on drop. The
/// context is current on one thread only, so this is `Rc`, not `Arc`.
#[derive(Clone)]
pub struct RenderContext {
    inner: Rc<Inner>,
}

impl RenderContext {
    pub fn new(api: impl GlApi + 'static, policy: ErrorPolicy) -> Self {
        RenderContext {
            inner: Rc::new(Inner {
                api: Box::new(api),
                policy: Cell::new(policy),
            }),
        }
    }

    #[doc(hidden)]
    pub fn api(&self) -> &dyn GlApi {
        self.inner.api.as_ref()
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.inner.policy.get()
    }

    pub fn set_error_policy(&self, policy: ErrorPolicy) {
        self.inner.policy.set(policy);
    }

    #[doc(hidden)]
    pub fn clear_errors(&self) {
        for _ in 0..MAX_DRAINED_ERRORS {
            if self.api().get_error() == gl::NO_ERROR {
                break;
            }
        }
    }

    #[doc(hidden)]
    pub fn check_error(&self, call: &'static str, file: &'static str, line: u32) -> Result<()> {
        self.check_error_with(self.error_policy(), call, file, line)
    }

    #[doc(hidden)]
    pub fn check_error_with(
        &self,
        policy: ErrorPolicy,
        call: &'static str,
        file: &'static str,
        line: u32,
    ) -> Result<()> {
        let code = self.api().get_error();
        if code == gl::NO_ERROR {
            return Ok(());
        }

        let err = Error::Gl {
            code,
            call,
            file,
            line,
        };
        log::error!("{}", err);

        match policy {
            ErrorPolicy::Report => Err(err),
            ErrorPolicy::Break => panic!("{}", err),
        }
    }

    /// The driver's `GL_VERSION` string.
    pub fn version(&self) -> Option<String> {
        self.api().get_string(gl::VERSION)
    }

    pub fn clear(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()> {
        gl_call!(self, clear_color(red, green, blue, alpha))?;
        gl_call!(self, clear(gl::COLOR_BUFFER_BIT))
    }

    /// Draws `indices` as triangles with the bound program and vertex array.
    ///
    /// `indices` must have been bound while `vertex_array` was bound, so the
    /// array already carries the element buffer binding.
    pub fn draw_indexed(
        &self,
        _program: &Bound<'_, ShaderProgram>,
        _vertex_array: &Bound<'_, VertexArray>,
        indices: &IndexBuffer,
    ) -> Result<()> {
        gl_call!(
            self,
            draw_elements(
                gl::TRIANGLES,
                indices.count() as GLsizei,
                IndexBuffer::INDEX_TYPE,
                0
            )
        )
    }
}

/// A resource that occupies one of the context's binding slots.
pub trait Bindable {
    /// Makes this resource current for its slot.
    fn raw_bind(&self) -> Result<()>;

    /// Resets the slot to zero.
    fn raw_unbind(&self) -> Result<()>;

    fn bind(&self) -> Result<Bound<'_, Self>>
    where
        Self: Sized,
    {
        self.raw_bind()?;
        Ok(Bound { resource: self })
    }
}

/// Proof that `T` was bound. Dropping it leaves the binding in place; call
/// [`Bound::unbind`] to reset the slot.
#[must_use = "dropping the token keeps the resource bound"]
pub struct Bound<'a, T: Bindable> {
    resource: &'a T,
}

impl<'a, T: Bindable> Bound<'a, T> {
    pub fn unbind(self) -> Result<()> {
        self.resource.raw_unbind()
    }
}

impl<T: Bindable> Deref for Bound<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource
    }
}
