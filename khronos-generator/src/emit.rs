#![allow(clippy::write_with_newline)]

use std::borrow::Cow;
use std::collections::HashSet;
use std::io;
use std::str::FromStr;

use anyhow::{Context as _, bail};

use crate::registry::{Command, CommandTypePart, Registry};
use crate::{Api, Version};

const GL_TYPES: &str = "pub type GLbitfield = std::ffi::c_uint;
pub type GLboolean = std::ffi::c_uchar;
pub type GLbyte = std::ffi::c_schar;
pub type GLchar = std::ffi::c_char;
pub type GLclampf = std::ffi::c_float;
pub type GLdouble = std::ffi::c_double;
pub type GLenum = std::ffi::c_uint;
pub type GLfixed = i32;
pub type GLfloat = std::ffi::c_float;
pub type GLint = std::ffi::c_int;
pub type GLint64 = i64;
pub type GLintptr = isize;
pub type GLshort = std::ffi::c_short;
pub type GLsizei = std::ffi::c_int;
pub type GLsizeiptr = isize;
pub type GLsync = *mut std::ffi::c_void;
pub type GLubyte = std::ffi::c_uchar;
pub type GLuint = std::ffi::c_uint;
pub type GLuint64 = u64;
pub type GLushort = std::ffi::c_ushort;

// GL_OES_EGL_image
pub type GLeglImageOES = *mut std::ffi::c_void;
";

const EGL_TYPES: &str = "pub type khronos_int32_t = i32;
pub type khronos_uint64_t = u64;
pub type khronos_utime_nanoseconds_t = u64;

// https://registry.khronos.org/EGL/api/EGL/eglplatform.h

pub type EGLNativeDisplayType = *mut std::ffi::c_void;
pub type EGLNativePixmapType = *mut std::ffi::c_void;
pub type EGLNativeWindowType = *mut std::ffi::c_void;

pub type EGLint = khronos_int32_t;

// https://registry.khronos.org/EGL/api/EGL/egl.h

// 1.0

pub type EGLBoolean = std::ffi::c_uint;
pub type EGLDisplay = *mut std::ffi::c_void;

pub type EGLConfig = *mut std::ffi::c_void;
pub type EGLSurface = *mut std::ffi::c_void;
pub type EGLContext = *mut std::ffi::c_void;
pub type __eglMustCastToProperFunctionPointerType = Option<unsafe extern \"system\" fn()>;

// 1.2

pub type EGLenum = std::ffi::c_uint;
pub type EGLClientBuffer = *mut std::ffi::c_void;

// 1.5

pub type EGLSync = *mut std::ffi::c_void;
pub type EGLAttrib = isize;
pub type EGLTime = khronos_utime_nanoseconds_t;
pub type EGLImage = *mut std::ffi::c_void;

// https://registry.khronos.org/EGL/api/EGL/eglext.h

pub type EGLImageKHR = *mut std::ffi::c_void;
pub type EGLuint64KHR = khronos_uint64_t;
";

pub fn emit_types<W: io::Write>(w: &mut W, api: &Api) -> anyhow::Result<()> {
    let types = match api {
        Api::Gl | Api::Gles2 => GL_TYPES,
        Api::Egl => EGL_TYPES,
    };
    w.write_all(types.as_bytes())?;
    Ok(())
}

fn normalize_enum_name<'a>(name: &'a str, api: &Api) -> anyhow::Result<Cow<'a, str>> {
    let name = name
        .strip_prefix(api.enum_prefix())
        .with_context(|| format!("enum {name} does not have {} prefix", api.enum_prefix()))?;
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        Ok(Cow::Owned(format!("_{name}")))
    } else {
        Ok(Cow::Borrowed(name))
    }
}

fn normalize_gl_enum_type(r#type: Option<&str>, normalized_name: &str) -> anyhow::Result<String> {
    match r#type {
        Some("u") => Ok("GLuint".to_string()),
        Some("ull") => Ok("GLuint64".to_string()),
        Some("bitmask") => Ok("GLbitfield".to_string()),
        None if normalized_name == "TRUE" || normalized_name == "FALSE" => {
            Ok("GLboolean".to_string())
        }
        None => Ok("GLenum".to_string()),
        other => bail!("unknown gl enum type {other:?}"),
    }
}

/// `EGL_CAST(EGLContext,0)` -> `("EGLContext", "0")`.
fn parse_egl_cast(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix("EGL_CAST(")?.strip_suffix(")")?;
    let (target_type, inner_value) = inner.split_once(',')?;
    Some((target_type.trim(), inner_value.trim()))
}

fn normalize_egl_enum_type(
    r#type: Option<&str>,
    normalized_name: &str,
    value: &str,
) -> anyhow::Result<String> {
    if let Some((target_type, _)) = parse_egl_cast(value) {
        return Ok(target_type.to_string());
    }
    match r#type {
        Some("u") => Ok("u32".to_string()),
        Some("ull") => Ok("u64".to_string()),
        Some("bitmask") => Ok("EGLint".to_string()),
        None if value.starts_with("-") => Ok("EGLint".to_string()),
        None if normalized_name == "TRUE" || normalized_name == "FALSE" => {
            Ok("EGLBoolean".to_string())
        }
        None => Ok("EGLenum".to_string()),
        other => bail!("unknown egl enum type {other:?}"),
    }
}

fn emit_enum_value<W: io::Write>(w: &mut W, value: &str) -> anyhow::Result<()> {
    match parse_egl_cast(value) {
        Some((target_type, inner_value)) => write!(w, "{inner_value} as {target_type}")?,
        None => write!(w, "{value}")?,
    }
    Ok(())
}

pub fn emit_enums<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    let mut emitted: HashSet<&str> = HashSet::new();
    for e in registry.enums.iter() {
        if !emitted.insert(e.name) {
            continue;
        }
        let name = normalize_enum_name(e.name, api)?;
        let r#type = match api {
            Api::Gl | Api::Gles2 => normalize_gl_enum_type(e.r#type, &name),
            Api::Egl => normalize_egl_enum_type(e.r#type, &name, e.value),
        }
        .with_context(|| format!("could not determine type of {}", e.name))?;
        write!(w, "pub const {name}: {type} = ")?;
        emit_enum_value(w, e.value)?;
        write!(w, ";\n")?;
    }
    write!(w, "\n")?;
    Ok(())
}

/// None stands for void.
fn command_type(parts: &[CommandTypePart]) -> anyhow::Result<Option<String>> {
    use CommandTypePart::*;

    let ty = match parts {
        [Other("void")] => return Ok(None),
        [Other(other)] => match *other {
            "void *" => "*mut std::ffi::c_void".to_string(),
            "const void *" => "*const std::ffi::c_void".to_string(),
            "void **" => "*mut *mut std::ffi::c_void".to_string(),
            "const void **" => "*mut *const std::ffi::c_void".to_string(),
            "const void *const*" => "*const *const std::ffi::c_void".to_string(),
            "const char *" => "*const std::ffi::c_char".to_string(),
            "char *" => "*mut std::ffi::c_char".to_string(),
            "int" => "std::ffi::c_int".to_string(),
            "int *" => "*mut std::ffi::c_int".to_string(),
            other => bail!("unsupported type: {other:?}"),
        },
        [Defined(defined)] | [Other("const"), Defined(defined)] => defined.to_string(),
        [Defined(defined), Other("*")] => format!("*mut {defined}"),
        [Defined(defined), Other("**")] => format!("*mut *mut {defined}"),
        [Other("const"), Defined(defined), Other(pointer)] => match *pointer {
            "*" => format!("*const {defined}"),
            "*const*" => format!("*const *const {defined}"),
            "**" => format!("*mut *const {defined}"),
            other => bail!("unsupported pointer: {other:?}"),
        },
        other => bail!("unsupported type: {other:?}"),
    };
    Ok(Some(ty))
}

#[inline]
fn normalize_command_name<'a>(name: &'a str, api: &Api) -> anyhow::Result<&'a str> {
    name.strip_prefix(api.command_prefix())
        .with_context(|| format!("command {name} does not have {} prefix", api.command_prefix()))
}

#[inline]
fn normalize_command_param_name(name: &str) -> Cow<'_, str> {
    match name {
        "type" | "ref" | "in" | "fn" | "box" | "gen" | "match" | "mod" | "move" | "loop"
        | "where" | "impl" | "use" => Cow::Owned(format!("r#{name}")),
        ok => Cow::Borrowed(ok),
    }
}

// NOTE: the stub is extern "system" because it gets called through the native signature. the
// panic can't unwind out of it, so it ends up aborting after printing the message.
const API_BOILERPLATE: &str = "#[cold]
#[inline(never)]
extern \"system\" fn null_fn_ptr_panic() -> ! {
    panic!(\"function was not loaded\")
}

pub struct FnPtr {
    ptr: *const std::ffi::c_void,
    loaded: bool,
}

impl FnPtr {
    fn new(ptr: *const std::ffi::c_void) -> FnPtr {
        if ptr.is_null() {
            FnPtr {
                ptr: null_fn_ptr_panic as *const std::ffi::c_void,
                loaded: false,
            }
        } else {
            FnPtr { ptr, loaded: true }
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// null if the function was not loaded.
    #[inline]
    pub fn as_ptr(&self) -> *const std::ffi::c_void {
        if self.loaded { self.ptr } else { std::ptr::null() }
    }

    /// the slot as `F` (the command's `extern \"system\"` signature), for calls that are
    /// allowed to fail: unlike the wrappers it neither logs nor checks for errors.
    #[inline]
    pub unsafe fn cast<F: Copy>(&self) -> F {
        assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const std::ffi::c_void>());
        unsafe { std::mem::transmute_copy(&self.ptr) }
    }
}
";

fn emit_api_struct<W: io::Write>(
    w: &mut W,
    commands: &[&Command],
    api: &Api,
) -> anyhow::Result<()> {
    write!(w, "pub struct Api {{\n")?;
    for cmd in commands.iter() {
        let name = normalize_command_name(cmd.proto.name, api)?;
        write!(w, "    pub {name}: FnPtr,\n")?;
    }
    write!(w, "}}\n\n")?;
    Ok(())
}

fn emit_api_command<W: io::Write>(
    w: &mut W,
    cmd: &Command,
    api: &Api,
    error_check: Option<(&str, &str)>,
) -> anyhow::Result<()> {
    let native_name = cmd.proto.name;
    let name = normalize_command_name(native_name, api)?;
    let return_type = command_type(&cmd.proto.type_parts)
        .with_context(|| format!("could not map return type of {native_name}"))?;
    let mut params: Vec<(Cow<str>, String)> = Vec::with_capacity(cmd.params.len());
    for param in cmd.params.iter() {
        let ty = command_type(&param.type_parts)
            .with_context(|| format!("could not map type of {native_name}::{}", param.name))?
            .with_context(|| format!("{native_name}::{} is void", param.name))?;
        params.push((normalize_command_param_name(param.name), ty));
    }
    let param_names: Vec<&str> = params.iter().map(|(name, _)| name.as_ref()).collect();
    let param_types: Vec<&str> = params.iter().map(|(_, ty)| ty.as_str()).collect();

    // signature

    write!(w, "\n    #[inline]\n")?;
    write!(w, "    pub unsafe fn {name}(&self")?;
    for (name, ty) in params.iter() {
        write!(w, ", {name}: {ty}")?;
    }
    write!(w, ")")?;
    if let Some(return_type) = return_type.as_ref() {
        write!(w, " -> {return_type}")?;
    }
    write!(w, " {{\n")?;

    // body

    write!(
        w,
        "        debug_assert!(self.{name}.is_loaded(), \"{native_name} was not loaded\");\n"
    )?;
    write!(
        w,
        "        type Dst = unsafe extern \"system\" fn({})",
        param_types.join(", ")
    )?;
    if let Some(return_type) = return_type.as_ref() {
        write!(w, " -> {return_type}")?;
    }
    write!(w, ";\n")?;
    let call = format!(
        "unsafe {{ std::mem::transmute::<*const std::ffi::c_void, Dst>(self.{name}.ptr)({}) }}",
        param_names.join(", ")
    );
    match return_type {
        Some(_) => write!(w, "        let ret = {call};\n")?,
        None => write!(w, "        {call};\n")?,
    }

    write!(w, "        #[cfg(all(feature = \"debug\", debug_assertions))]\n")?;
    write!(w, "        {{\n")?;
    let placeholders = vec!["{:?}"; params.len()].join(", ");
    let mut log_args = param_names.join(", ");
    let mut log_format = format!("{native_name}({placeholders})");
    if return_type.is_some() {
        log_format.push_str(" -> {:?}");
        if !log_args.is_empty() {
            log_args.push_str(", ");
        }
        log_args.push_str("ret");
    }
    if log_args.is_empty() {
        write!(w, "            log::trace!(\"{log_format}\");\n")?;
    } else {
        write!(w, "            log::trace!(\"{log_format}\", {log_args});\n")?;
    }
    if let Some((error_command, success)) = error_check {
        if error_command != native_name {
            let error_name = normalize_command_name(error_command, api)?;
            write!(w, "            let error = unsafe {{ self.{error_name}() }};\n")?;
            write!(w, "            if error != {success} {{\n")?;
            write!(
                w,
                "                panic!(\"{native_name} failed: {{error:#x}}\");\n"
            )?;
            write!(w, "            }}\n")?;
        }
    }
    write!(w, "        }}\n")?;

    if return_type.is_some() {
        write!(w, "        ret\n")?;
    }
    write!(w, "    }}\n")?;

    Ok(())
}

fn emit_api_impl<W: io::Write>(
    w: &mut W,
    commands: &[&Command],
    api: &Api,
) -> anyhow::Result<()> {
    let (error_command, success) = api.error_command();
    let error_check = commands
        .iter()
        .any(|cmd| cmd.proto.name == error_command)
        .then_some((error_command, success));

    write!(w, "impl Api {{\n")?;
    write!(
        w,
        "    pub unsafe fn load_with<F>(mut get_proc_address: F) -> Self
    where
        F: FnMut(*const std::ffi::c_char) -> *mut std::ffi::c_void,
    {{
        Self {{
"
    )?;
    for cmd in commands.iter() {
        write!(
            w,
            "            {}: FnPtr::new(get_proc_address(c\"{}\".as_ptr())),\n",
            normalize_command_name(cmd.proto.name, api)?,
            cmd.proto.name,
        )?;
    }
    write!(w, "        }}\n")?;
    write!(w, "    }}\n")?;

    for cmd in commands.iter() {
        emit_api_command(w, cmd, api, error_check)?;
    }

    write!(w, "}}\n")?;
    Ok(())
}

pub fn emit_api<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let commands: Vec<&Command> = registry
        .commands
        .iter()
        .filter(|cmd| seen.insert(cmd.proto.name))
        .collect();

    write!(w, "{API_BOILERPLATE}\n")?;
    emit_api_struct(w, &commands, api)?;
    emit_api_impl(w, &commands, api)?;
    Ok(())
}

fn emit_requirements<W: io::Write>(
    w: &mut W,
    registry: &Registry,
    const_name: &str,
    names: &[&str],
) -> anyhow::Result<()> {
    write!(w, "pub const {const_name}: &[Requirement] = &[\n")?;
    for name in names.iter() {
        let required_by = registry
            .requirements
            .get(name)
            .with_context(|| format!("{name} is not required by anything"))?;
        let required_by: Vec<String> = required_by.iter().map(|it| format!("{it:?}")).collect();
        write!(
            w,
            "    Requirement {{ name: {name:?}, required_by: &[{}] }},\n",
            required_by.join(", ")
        )?;
    }
    write!(w, "];\n\n")?;
    Ok(())
}

/// feature/extension tags. for introspection only, nothing in the bindings looks at them.
pub fn emit_registry<W: io::Write>(
    w: &mut W,
    registry: &Registry,
    api: &Api,
    version: &Version,
    extensions: &[&str],
) -> anyhow::Result<()> {
    let feature = registry
        .features
        .iter()
        .find(|feat| {
            feat.api == api.as_str()
                && Version::from_str(feat.number).is_ok_and(|number| number == *version)
        })
        .with_context(|| format!("could not find {api:?} {version:?}"))?;

    let mut seen: HashSet<&str> = HashSet::new();
    let enums: Vec<&str> = registry
        .enums
        .iter()
        .map(|e| e.name)
        .filter(|name| seen.insert(*name))
        .collect();
    let commands: Vec<&str> = registry
        .commands
        .iter()
        .map(|c| c.proto.name)
        .filter(|name| seen.insert(*name))
        .collect();

    write!(
        w,
        "#[derive(Debug, Clone, Copy)]
pub struct Requirement {{
    pub name: &'static str,
    /// features (api versions) and extensions that bring this in.
    pub required_by: &'static [&'static str],
}}

"
    )?;
    write!(w, "pub const API: &str = {:?};\n", api.as_str())?;
    write!(w, "pub const FEATURE: &str = {:?};\n", feature.name)?;
    write!(w, "pub const EXTENSIONS: &[&str] = &{extensions:?};\n\n")?;
    emit_requirements(w, registry, "ENUMS", &enums)?;
    emit_requirements(w, registry, "COMMANDS", &commands)?;
    write!(
        w,
        "/// accepts registry names (`GL_TEXTURE_2D`, `eglGetError`).
pub fn required_by(name: &str) -> Option<&'static [&'static str]> {{
    ENUMS
        .iter()
        .chain(COMMANDS.iter())
        .find(|it| it.name == name)
        .map(|it| it.required_by)
}}
"
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filter_registry, parse_registry};

    const REGISTRY: &str = r#"<registry>
    <enums namespace="EGL" vendor="ARB">
        <enum value="0" name="EGL_FALSE"/>
        <enum value="1" name="EGL_TRUE"/>
    </enums>
    <enums namespace="EGLConfigBitsMask" type="bitmask">
        <enum value="0x0004" name="EGL_WINDOW_BIT"/>
    </enums>
    <enums namespace="EGL" start="0x3000" end="0x305F" vendor="KHR">
        <enum value="0x3000" name="EGL_SUCCESS"/>
        <enum value="EGL_CAST(EGLint,-1)" name="EGL_DONT_CARE"/>
        <enum value="EGL_CAST(EGLContext,0)" name="EGL_NO_CONTEXT"/>
        <enum value="0xFFFFFFFFFFFFFFFF" name="EGL_FOREVER" type="ull"/>
    </enums>
    <commands namespace="EGL">
        <command>
            <proto><ptype>EGLint</ptype> <name>eglGetError</name></proto>
        </command>
        <command>
            <proto><ptype>EGLBoolean</ptype> <name>eglInitialize</name></proto>
            <param><ptype>EGLDisplay</ptype> <name>dpy</name></param>
            <param><ptype>EGLint</ptype> *<name>major</name></param>
            <param><ptype>EGLint</ptype> *<name>minor</name></param>
        </command>
        <command>
            <proto>const char *<name>eglQueryString</name></proto>
            <param><ptype>EGLDisplay</ptype> <name>dpy</name></param>
            <param><ptype>EGLint</ptype> <name>name</name></param>
        </command>
        <command>
            <proto><ptype>EGLBoolean</ptype> <name>eglReleaseThread</name></proto>
        </command>
        <command>
            <proto><ptype>EGLBoolean</ptype> <name>eglWaitSync</name></proto>
            <param><ptype>EGLDisplay</ptype> <name>dpy</name></param>
            <param><ptype>EGLSync</ptype> <name>sync</name></param>
            <param><ptype>EGLint</ptype> <name>flags</name></param>
        </command>
    </commands>
    <feature api="egl" name="EGL_VERSION_1_0" number="1.0">
        <require>
            <enum name="EGL_FALSE"/>
            <enum name="EGL_TRUE"/>
            <enum name="EGL_WINDOW_BIT"/>
            <enum name="EGL_SUCCESS"/>
            <enum name="EGL_DONT_CARE"/>
            <enum name="EGL_NO_CONTEXT"/>
            <command name="eglGetError"/>
            <command name="eglInitialize"/>
            <command name="eglQueryString"/>
        </require>
    </feature>
    <feature api="egl" name="EGL_VERSION_1_2" number="1.2">
        <require>
            <command name="eglReleaseThread"/>
        </require>
    </feature>
    <feature api="egl" name="EGL_VERSION_1_5" number="1.5">
        <require>
            <enum name="EGL_FOREVER"/>
            <command name="eglWaitSync"/>
        </require>
    </feature>
</registry>
"#;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>, &Registry) -> anyhow::Result<()>,
    {
        let registry = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Egl,
            &Version(1, 5),
            &[],
        )
        .unwrap();
        let mut out: Vec<u8> = Vec::new();
        f(&mut out, &registry).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_emit_enums() {
        let out = emit(|w, registry| emit_enums(w, registry, &Api::Egl));
        assert_eq!(
            out,
            "pub const FALSE: EGLBoolean = 0;
pub const TRUE: EGLBoolean = 1;
pub const WINDOW_BIT: EGLint = 0x0004;
pub const SUCCESS: EGLenum = 0x3000;
pub const DONT_CARE: EGLint = -1 as EGLint;
pub const NO_CONTEXT: EGLContext = 0 as EGLContext;
pub const FOREVER: u64 = 0xFFFFFFFFFFFFFFFF;

"
        );
    }

    #[test]
    fn test_emit_api() {
        let out = emit(|w, registry| emit_api(w, registry, &Api::Egl));
        assert!(out.contains("pub struct Api {\n    pub GetError: FnPtr,\n"));
        assert!(out.contains("    pub unsafe fn cast<F: Copy>(&self) -> F {\n"));
        assert!(out.contains(
            "            Initialize: FnPtr::new(get_proc_address(c\"eglInitialize\".as_ptr())),\n"
        ));
        assert!(out.contains(
            "    pub unsafe fn Initialize(&self, dpy: EGLDisplay, major: *mut EGLint, minor: *mut EGLint) -> EGLBoolean {\n"
        ));
        assert!(out.contains(
            "        type Dst = unsafe extern \"system\" fn(EGLDisplay, *mut EGLint, *mut EGLint) -> EGLBoolean;\n"
        ));
        assert!(out.contains(
            "    pub unsafe fn QueryString(&self, dpy: EGLDisplay, name: EGLint) -> *const std::ffi::c_char {\n"
        ));
        assert!(out.contains("    pub unsafe fn ReleaseThread(&self) -> EGLBoolean {\n"));
        assert!(out.contains(
            "            log::trace!(\"eglWaitSync({:?}, {:?}, {:?}) -> {:?}\", dpy, sync, flags, ret);\n"
        ));
        assert!(out.contains("            log::trace!(\"eglReleaseThread() -> {:?}\", ret);\n"));
        assert!(out.contains("            if error != 0x3000 {\n"));
        // the error query must not check itself.
        assert_eq!(out.matches("let error = unsafe { self.GetError() };").count(), 4);
    }

    #[test]
    fn test_emit_registry() {
        let out = emit(|w, registry| emit_registry(w, registry, &Api::Egl, &Version(1, 5), &[]));
        assert!(out.contains("pub const API: &str = \"egl\";\n"));
        assert!(out.contains("pub const FEATURE: &str = \"EGL_VERSION_1_5\";\n"));
        assert!(out.contains("pub const EXTENSIONS: &[&str] = &[];\n"));
        assert!(out.contains(
            "    Requirement { name: \"EGL_FOREVER\", required_by: &[\"EGL_VERSION_1_5\"] },\n"
        ));
        assert!(out.contains(
            "    Requirement { name: \"eglReleaseThread\", required_by: &[\"EGL_VERSION_1_2\"] },\n"
        ));
    }

    #[test]
    fn test_command_type() {
        use CommandTypePart::*;

        assert_eq!(command_type(&[Other("void")]).unwrap(), None);
        assert_eq!(
            command_type(&[Other("const"), Defined("GLchar"), Other("*const*")]).unwrap(),
            Some("*const *const GLchar".to_string())
        );
        assert_eq!(
            command_type(&[Defined("GLuint"), Other("*")]).unwrap(),
            Some("*mut GLuint".to_string())
        );
        assert!(command_type(&[Other("struct wl_display *")]).is_err());
    }

    #[test]
    fn test_normalize_names() {
        assert_eq!(normalize_enum_name("GL_TEXTURE_2D", &Api::Gles2).unwrap(), "TEXTURE_2D");
        assert_eq!(normalize_enum_name("GL_2D", &Api::Gl).unwrap(), "_2D");
        assert!(normalize_enum_name("EGL_NONE", &Api::Gles2).is_err());
        assert_eq!(normalize_command_param_name("type"), "r#type");
        assert_eq!(normalize_command_param_name("ref"), "r#ref");
        assert_eq!(normalize_command_param_name("mask"), "mask");
    }
}
