// in-process stand-ins for libGLESv2 entry points. state is per thread, so is every test.

use std::cell::{Cell, RefCell};
use std::ffi::{CStr, c_char, c_void};
use std::ptr::{null, null_mut};
use std::slice;

use crate::libgl::*;

const COMPILE_ERROR_LOG: &CStr = c"0:1(1): error: syntax error, unexpected NEW_IDENTIFIER";

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static ERROR: Cell<GLenum> = const { Cell::new(NO_ERROR) };
    static NEXT_NAME: Cell<GLuint> = const { Cell::new(1) };
    static SHADER_SOURCE: RefCell<String> = const { RefCell::new(String::new()) };
}

fn record(call: String) {
    CALLS.with_borrow_mut(|calls| calls.push(call));
}

fn next_name() -> GLuint {
    NEXT_NAME.replace(NEXT_NAME.get() + 1)
}

pub fn take_calls() -> Vec<String> {
    CALLS.take()
}

pub fn set_error(code: GLenum) {
    ERROR.set(code);
}

extern "system" fn get_error() -> GLenum {
    ERROR.replace(NO_ERROR)
}

extern "system" fn clear(mask: GLbitfield) {
    record(format!("glClear({mask:#x})"));
}

extern "system" fn clear_color(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) {
    record(format!("glClearColor({red}, {green}, {blue}, {alpha})"));
}

extern "system" fn gen_names(n: GLsizei, names: *mut GLuint) {
    let names = unsafe { slice::from_raw_parts_mut(names, n as usize) };
    names.iter_mut().for_each(|name| *name = next_name());
    record(format!("glGen({n}) -> {names:?}"));
}

extern "system" fn delete_names(n: GLsizei, names: *const GLuint) {
    let names = unsafe { slice::from_raw_parts(names, n as usize) };
    record(format!("glDelete({n}, {names:?})"));
}

extern "system" fn create_shader(r#type: GLenum) -> GLuint {
    record(format!("glCreateShader({:#x})", r#type));
    next_name()
}

extern "system" fn create_program() -> GLuint {
    record("glCreateProgram()".to_string());
    next_name()
}

extern "system" fn delete_object(object: GLuint) {
    record(format!("glDelete({object})"));
}

extern "system" fn shader_source(
    shader: GLuint,
    count: GLsizei,
    string: *const *const GLchar,
    length: *const GLint,
) {
    assert_eq!(count, 1);
    let source = unsafe {
        let len = *length as usize;
        slice::from_raw_parts((*string).cast::<u8>(), len)
    };
    let source = String::from_utf8(source.to_vec()).unwrap();
    record(format!("glShaderSource({shader}, {source:?})"));
    SHADER_SOURCE.set(source);
}

extern "system" fn compile_shader(shader: GLuint) {
    record(format!("glCompileShader({shader})"));
}

extern "system" fn link_program(program: GLuint) {
    record(format!("glLinkProgram({program})"));
}

// shaders "fail" to compile when their source mentions "error".
fn compile_failed() -> bool {
    SHADER_SOURCE.with_borrow(|source| source.contains("error"))
}

extern "system" fn get_shaderiv(_shader: GLuint, pname: GLenum, params: *mut GLint) {
    let value = match pname {
        COMPILE_STATUS => (!compile_failed()) as GLint,
        INFO_LOG_LENGTH if compile_failed() => COMPILE_ERROR_LOG.to_bytes_with_nul().len() as GLint,
        INFO_LOG_LENGTH => 0,
        _ => {
            set_error(INVALID_ENUM);
            return;
        }
    };
    unsafe { *params = value };
}

extern "system" fn get_shader_info_log(
    _shader: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    info_log: *mut GLchar,
) {
    let log = COMPILE_ERROR_LOG.to_bytes_with_nul();
    assert!(buf_size as usize >= log.len());
    unsafe {
        std::ptr::copy_nonoverlapping(log.as_ptr().cast(), info_log, log.len());
        *length = (log.len() - 1) as GLsizei;
    }
}

extern "system" fn get_programiv(_program: GLuint, pname: GLenum, params: *mut GLint) {
    let value = match pname {
        LINK_STATUS => TRUE as GLint,
        INFO_LOG_LENGTH => 0,
        _ => {
            set_error(INVALID_ENUM);
            return;
        }
    };
    unsafe { *params = value };
}

extern "system" fn get_integerv(pname: GLenum, data: *mut GLint) {
    match pname {
        MAX_VERTEX_ATTRIBS => unsafe { *data = 16 },
        _ => set_error(INVALID_ENUM),
    }
}

extern "system" fn get_string(name: GLenum) -> *const GLubyte {
    match name {
        VERSION => c"OpenGL ES 2.0 fake".as_ptr().cast(),
        _ => {
            set_error(INVALID_ENUM);
            null()
        }
    }
}

extern "system" fn buffer_data(
    target: GLenum,
    size: GLsizeiptr,
    _data: *const c_void,
    usage: GLenum,
) {
    record(format!("glBufferData({target:#x}, {size}, {usage:#x})"));
}

extern "system" fn buffer_sub_data(
    target: GLenum,
    offset: GLintptr,
    size: GLsizeiptr,
    _data: *const c_void,
) {
    record(format!("glBufferSubData({target:#x}, {offset}, {size})"));
}

extern "system" fn get_location(_program: GLuint, name: *const GLchar) -> GLint {
    match unsafe { CStr::from_ptr(name) }.to_bytes() {
        b"position" => 0,
        b"color" => 1,
        _ => -1,
    }
}

pub fn get_proc_address(name: *const c_char) -> *mut c_void {
    let name = unsafe { CStr::from_ptr(name) };
    match name.to_bytes() {
        b"glGetError" => get_error as *mut c_void,
        b"glClear" => clear as *mut c_void,
        b"glClearColor" => clear_color as *mut c_void,
        b"glGenBuffers" | b"glGenTextures" | b"glGenFramebuffers" | b"glGenRenderbuffers" => {
            gen_names as *mut c_void
        }
        b"glDeleteBuffers"
        | b"glDeleteTextures"
        | b"glDeleteFramebuffers"
        | b"glDeleteRenderbuffers" => delete_names as *mut c_void,
        b"glCreateShader" => create_shader as *mut c_void,
        b"glCreateProgram" => create_program as *mut c_void,
        b"glDeleteShader" | b"glDeleteProgram" => delete_object as *mut c_void,
        b"glShaderSource" => shader_source as *mut c_void,
        b"glCompileShader" => compile_shader as *mut c_void,
        b"glLinkProgram" => link_program as *mut c_void,
        b"glGetShaderiv" => get_shaderiv as *mut c_void,
        b"glGetShaderInfoLog" => get_shader_info_log as *mut c_void,
        b"glGetProgramiv" => get_programiv as *mut c_void,
        b"glGetIntegerv" => get_integerv as *mut c_void,
        b"glGetString" => get_string as *mut c_void,
        b"glBufferData" => buffer_data as *mut c_void,
        b"glBufferSubData" => buffer_sub_data as *mut c_void,
        b"glGetAttribLocation" | b"glGetUniformLocation" => get_location as *mut c_void,
        _ => null_mut(),
    }
}
