use std::ffi::{CStr, c_char};
use std::mem::size_of_val;
use std::num::NonZero;

use anyhow::{Context as _, anyhow, bail};

use crate::libgl::*;

// NOTE: these are not replacements for the generated methods, they only exist where marshalling
// rust values (slices, strings, handles) is annoying enough. each one checks glGetError before
// returning, so the call sites don't have to.
pub trait Adapter {
    type Buffer;
    type Framebuffer;
    type Program;
    type Renderbuffer;
    type Shader;
    type Texture;

    unsafe fn create_buffer(&self) -> anyhow::Result<Self::Buffer>;
    unsafe fn create_framebuffer(&self) -> anyhow::Result<Self::Framebuffer>;
    unsafe fn create_program(&self) -> anyhow::Result<Self::Program>;
    unsafe fn create_renderbuffer(&self) -> anyhow::Result<Self::Renderbuffer>;
    unsafe fn create_shader(&self, r#type: GLenum) -> anyhow::Result<Self::Shader>;
    unsafe fn create_texture(&self) -> anyhow::Result<Self::Texture>;
    unsafe fn delete_buffer(&self, buffer: Self::Buffer) -> anyhow::Result<()>;
    unsafe fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) -> anyhow::Result<()>;
    unsafe fn delete_program(&self, program: Self::Program) -> anyhow::Result<()>;
    unsafe fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) -> anyhow::Result<()>;
    unsafe fn delete_shader(&self, shader: Self::Shader) -> anyhow::Result<()>;
    unsafe fn delete_texture(&self, texture: Self::Texture) -> anyhow::Result<()>;
    unsafe fn buffer_data<T: Copy>(
        &self,
        target: GLenum,
        data: &[T],
        usage: GLenum,
    ) -> anyhow::Result<()>;
    /// offset is in bytes.
    unsafe fn buffer_sub_data<T: Copy>(
        &self,
        target: GLenum,
        offset: usize,
        data: &[T],
    ) -> anyhow::Result<()>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) -> anyhow::Result<()>;
    /// compiles and returns the info log as the error if compilation failed.
    unsafe fn compile_shader_checked(&self, shader: Self::Shader) -> anyhow::Result<()>;
    /// links and returns the info log as the error if linking failed.
    unsafe fn link_program_checked(&self, program: Self::Program) -> anyhow::Result<()>;
    unsafe fn get_attrib_location(
        &self,
        program: Self::Program,
        name: &CStr,
    ) -> anyhow::Result<Option<GLint>>;
    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &CStr,
    ) -> anyhow::Result<Option<GLint>>;
    unsafe fn get_integer(&self, pname: GLenum) -> anyhow::Result<GLint>;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> anyhow::Result<String>;
    unsafe fn get_program_parameter(
        &self,
        program: Self::Program,
        pname: GLenum,
    ) -> anyhow::Result<GLint>;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> anyhow::Result<String>;
    unsafe fn get_shader_parameter(
        &self,
        shader: Self::Shader,
        pname: GLenum,
    ) -> anyhow::Result<GLint>;
    unsafe fn get_string(&self, name: GLenum) -> anyhow::Result<String>;
}

type GenFn = unsafe fn(&Api, GLsizei, *mut GLuint);

impl Api {
    #[inline]
    unsafe fn gen_one(&self, kind: &str, generate: GenFn) -> anyhow::Result<NonZero<GLuint>> {
        let mut object: GLuint = 0;
        unsafe { generate(self, 1, &mut object) };
        unsafe { self.check_error() }.with_context(|| format!("could not create {kind}"))?;
        NonZero::new(object).with_context(|| format!("could not create {kind}"))
    }
}

// glGetShaderInfoLog and glGetProgramInfoLog share the shape.
fn read_info_log(
    len: GLint,
    read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    if len <= 0 {
        return String::new();
    }
    let mut info_log: Vec<u8> = vec![0; len as usize];
    let mut written: GLsizei = 0;
    read(len, &mut written, info_log.as_mut_ptr() as *mut GLchar);
    info_log.truncate(written.clamp(0, len) as usize);
    String::from_utf8_lossy(&info_log).into_owned()
}

impl Adapter for Api {
    type Buffer = NonZero<GLuint>;
    type Framebuffer = NonZero<GLuint>;
    type Program = NonZero<GLuint>;
    type Renderbuffer = NonZero<GLuint>;
    type Shader = NonZero<GLuint>;
    type Texture = NonZero<GLuint>;

    #[inline]
    unsafe fn create_buffer(&self) -> anyhow::Result<Self::Buffer> {
        unsafe { self.gen_one("buffer", Api::GenBuffers) }
    }

    #[inline]
    unsafe fn create_framebuffer(&self) -> anyhow::Result<Self::Framebuffer> {
        unsafe { self.gen_one("framebuffer", Api::GenFramebuffers) }
    }

    #[inline]
    unsafe fn create_program(&self) -> anyhow::Result<Self::Program> {
        let program = unsafe { self.CreateProgram() };
        unsafe { self.check_error() }.context("could not create program")?;
        NonZero::new(program).context("could not create program")
    }

    #[inline]
    unsafe fn create_renderbuffer(&self) -> anyhow::Result<Self::Renderbuffer> {
        unsafe { self.gen_one("renderbuffer", Api::GenRenderbuffers) }
    }

    #[inline]
    unsafe fn create_shader(&self, r#type: GLenum) -> anyhow::Result<Self::Shader> {
        let shader = unsafe { self.CreateShader(r#type) };
        unsafe { self.check_error() }.context("could not create shader")?;
        NonZero::new(shader).context("could not create shader")
    }

    #[inline]
    unsafe fn create_texture(&self) -> anyhow::Result<Self::Texture> {
        unsafe { self.gen_one("texture", Api::GenTextures) }
    }

    #[inline]
    unsafe fn delete_buffer(&self, buffer: Self::Buffer) -> anyhow::Result<()> {
        unsafe { self.DeleteBuffers(1, &buffer.get()) };
        unsafe { self.check_error() }.context("could not delete buffer")
    }

    #[inline]
    unsafe fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) -> anyhow::Result<()> {
        unsafe { self.DeleteFramebuffers(1, &framebuffer.get()) };
        unsafe { self.check_error() }.context("could not delete framebuffer")
    }

    #[inline]
    unsafe fn delete_program(&self, program: Self::Program) -> anyhow::Result<()> {
        unsafe { self.DeleteProgram(program.get()) };
        unsafe { self.check_error() }.context("could not delete program")
    }

    #[inline]
    unsafe fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) -> anyhow::Result<()> {
        unsafe { self.DeleteRenderbuffers(1, &renderbuffer.get()) };
        unsafe { self.check_error() }.context("could not delete renderbuffer")
    }

    #[inline]
    unsafe fn delete_shader(&self, shader: Self::Shader) -> anyhow::Result<()> {
        unsafe { self.DeleteShader(shader.get()) };
        unsafe { self.check_error() }.context("could not delete shader")
    }

    #[inline]
    unsafe fn delete_texture(&self, texture: Self::Texture) -> anyhow::Result<()> {
        unsafe { self.DeleteTextures(1, &texture.get()) };
        unsafe { self.check_error() }.context("could not delete texture")
    }

    #[inline]
    unsafe fn buffer_data<T: Copy>(
        &self,
        target: GLenum,
        data: &[T],
        usage: GLenum,
    ) -> anyhow::Result<()> {
        let size = GLsizeiptr::try_from(size_of_val(data)).context("buffer is too big")?;
        unsafe { self.BufferData(target, size, data.as_ptr().cast(), usage) };
        unsafe { self.check_error() }.context("could not upload buffer data")
    }

    #[inline]
    unsafe fn buffer_sub_data<T: Copy>(
        &self,
        target: GLenum,
        offset: usize,
        data: &[T],
    ) -> anyhow::Result<()> {
        let offset = GLintptr::try_from(offset).context("offset is too big")?;
        let size = GLsizeiptr::try_from(size_of_val(data)).context("buffer is too big")?;
        unsafe { self.BufferSubData(target, offset, size, data.as_ptr().cast()) };
        unsafe { self.check_error() }.context("could not upload buffer sub data")
    }

    #[inline]
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) -> anyhow::Result<()> {
        let string = source.as_ptr() as *const GLchar;
        let length = GLint::try_from(source.len()).context("shader source is too long")?;
        unsafe { self.ShaderSource(shader.get(), 1, &string, &length) };
        unsafe { self.check_error() }.context("could not set shader source")
    }

    unsafe fn compile_shader_checked(&self, shader: Self::Shader) -> anyhow::Result<()> {
        unsafe { self.CompileShader(shader.get()) };
        unsafe { self.check_error() }.context("could not compile shader")?;

        let status = unsafe { self.get_shader_parameter(shader, COMPILE_STATUS)? };
        let info_log = unsafe { self.get_shader_info_log(shader)? };
        if status == FALSE as GLint {
            bail!("could not compile shader {shader}: {}", info_log.trim_end());
        }
        if !info_log.is_empty() {
            log::warn!("shader {shader} compiled with: {}", info_log.trim_end());
        }
        Ok(())
    }

    unsafe fn link_program_checked(&self, program: Self::Program) -> anyhow::Result<()> {
        unsafe { self.LinkProgram(program.get()) };
        unsafe { self.check_error() }.context("could not link program")?;

        let status = unsafe { self.get_program_parameter(program, LINK_STATUS)? };
        let info_log = unsafe { self.get_program_info_log(program)? };
        if status == FALSE as GLint {
            bail!("could not link program {program}: {}", info_log.trim_end());
        }
        if !info_log.is_empty() {
            log::warn!("program {program} linked with: {}", info_log.trim_end());
        }
        Ok(())
    }

    #[inline]
    unsafe fn get_attrib_location(
        &self,
        program: Self::Program,
        name: &CStr,
    ) -> anyhow::Result<Option<GLint>> {
        let ret = unsafe { self.GetAttribLocation(program.get(), name.as_ptr()) };
        unsafe { self.check_error() }
            .with_context(|| format!("could not get attrib location of {name:?}"))?;
        Ok((ret != -1).then_some(ret))
    }

    #[inline]
    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &CStr,
    ) -> anyhow::Result<Option<GLint>> {
        let ret = unsafe { self.GetUniformLocation(program.get(), name.as_ptr()) };
        unsafe { self.check_error() }
            .with_context(|| format!("could not get uniform location of {name:?}"))?;
        Ok((ret != -1).then_some(ret))
    }

    #[inline]
    unsafe fn get_integer(&self, pname: GLenum) -> anyhow::Result<GLint> {
        let mut data: GLint = 0;
        unsafe { self.GetIntegerv(pname, &mut data) };
        unsafe { self.check_error() }.with_context(|| format!("could not get integer {pname:#x}"))?;
        Ok(data)
    }

    #[inline]
    unsafe fn get_program_info_log(&self, program: Self::Program) -> anyhow::Result<String> {
        let len = unsafe { self.get_program_parameter(program, INFO_LOG_LENGTH)? };
        let info_log = read_info_log(len, |buf_size, length, info_log| unsafe {
            self.GetProgramInfoLog(program.get(), buf_size, length, info_log)
        });
        unsafe { self.check_error() }.context("could not get program info log")?;
        Ok(info_log)
    }

    #[inline]
    unsafe fn get_program_parameter(
        &self,
        program: Self::Program,
        pname: GLenum,
    ) -> anyhow::Result<GLint> {
        let mut param: GLint = 0;
        unsafe { self.GetProgramiv(program.get(), pname, &mut param) };
        unsafe { self.check_error() }
            .with_context(|| format!("could not get program parameter {pname:#x}"))?;
        Ok(param)
    }

    #[inline]
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> anyhow::Result<String> {
        let len = unsafe { self.get_shader_parameter(shader, INFO_LOG_LENGTH)? };
        let info_log = read_info_log(len, |buf_size, length, info_log| unsafe {
            self.GetShaderInfoLog(shader.get(), buf_size, length, info_log)
        });
        unsafe { self.check_error() }.context("could not get shader info log")?;
        Ok(info_log)
    }

    #[inline]
    unsafe fn get_shader_parameter(
        &self,
        shader: Self::Shader,
        pname: GLenum,
    ) -> anyhow::Result<GLint> {
        let mut param: GLint = 0;
        unsafe { self.GetShaderiv(shader.get(), pname, &mut param) };
        unsafe { self.check_error() }
            .with_context(|| format!("could not get shader parameter {pname:#x}"))?;
        Ok(param)
    }

    #[inline]
    unsafe fn get_string(&self, name: GLenum) -> anyhow::Result<String> {
        let ptr = unsafe { self.GetString(name) };
        if ptr.is_null() {
            return Err(match unsafe { self.check_error() } {
                Err(err) => anyhow!("could not get string {name:#x}: {err}"),
                Ok(()) => anyhow!("could not get string {name:#x}"),
            });
        }
        unsafe { CStr::from_ptr(ptr as *const c_char) }
            .to_str()
            .context("invalid string")
            .map(|s| s.to_string())
    }
}

// error paths poll glGetError from the fakes; with the `debug` feature the generated wrappers
// would consume (and panic on) them first.
#[cfg(all(test, not(feature = "debug")))]
mod tests {
    use super::*;
    use crate::fake;

    fn api() -> Api {
        unsafe { Api::load_with(fake::get_proc_address) }
    }

    #[test]
    fn test_create_delete() {
        let api = api();
        fake::take_calls();
        let buffer = unsafe { api.create_buffer() }.unwrap();
        let texture = unsafe { api.create_texture() }.unwrap();
        assert_ne!(buffer, texture);
        unsafe {
            api.delete_buffer(buffer).unwrap();
            api.delete_texture(texture).unwrap();
        }
        let calls = fake::take_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[2], format!("glDelete(1, [{buffer}])"));
        assert_eq!(calls[3], format!("glDelete(1, [{texture}])"));
    }

    #[test]
    fn test_buffer_data() {
        let api = api();
        fake::take_calls();
        let vertices: [[f32; 2]; 3] = [[0.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];
        unsafe {
            api.buffer_data(ARRAY_BUFFER, &vertices, STATIC_DRAW).unwrap();
            api.buffer_sub_data(ARRAY_BUFFER, 8, &vertices[1..]).unwrap();
        }
        assert_eq!(
            fake::take_calls(),
            [
                "glBufferData(0x8892, 24, 0x88e4)",
                "glBufferSubData(0x8892, 8, 16)"
            ]
        );
    }

    #[test]
    fn test_compile_shader() {
        const SOURCE: &str = "void main() { gl_Position = vec4(0.0); }";

        let api = api();
        fake::take_calls();
        let shader = unsafe { api.create_shader(VERTEX_SHADER) }.unwrap();
        unsafe {
            api.shader_source(shader, SOURCE).unwrap();
            api.compile_shader_checked(shader).unwrap();

            api.shader_source(shader, "void main() { error }").unwrap();
            let err = api.compile_shader_checked(shader).unwrap_err();
            assert!(err.to_string().contains("syntax error"), "{err}");
        }
        let calls = fake::take_calls();
        assert_eq!(calls[1], format!("glShaderSource({shader}, {SOURCE:?})"));
        assert_eq!(calls[2], format!("glCompileShader({shader})"));
    }

    #[test]
    fn test_link_program() {
        let api = api();
        unsafe {
            let program = api.create_program().unwrap();
            api.link_program_checked(program).unwrap();
            assert_eq!(api.get_program_info_log(program).unwrap(), "");
            assert_eq!(
                api.get_attrib_location(program, c"position").unwrap(),
                Some(0)
            );
            assert_eq!(api.get_uniform_location(program, c"time").unwrap(), None);
        }
    }

    #[test]
    fn test_get() {
        let api = api();
        unsafe {
            assert_eq!(api.get_integer(MAX_VERTEX_ATTRIBS).unwrap(), 16);
            assert_eq!(api.get_string(VERSION).unwrap(), "OpenGL ES 2.0 fake");
        }
    }

    #[test]
    fn test_get_errors() {
        let api = api();
        unsafe {
            assert!(api.get_integer(0xdead).is_err());
            let err = api.get_string(EXTENSIONS).unwrap_err();
            assert_eq!(err.to_string(), "could not get string 0x1f03: invalid enum (0x500)");
            assert!(api.check_error().is_ok());
        }
    }
}
