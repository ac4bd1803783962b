use std::io::{Write as _, stdout};
use std::str::FromStr;
use std::{env, fs};

use anyhow::{Context as _, bail};
use khronos_generator::{Api, Version};

// prints what a build script would generate. handy when poking at registry files.
//
//   cargo run -p khronos-generator --example dump -- gles2 2.0 GL_KHR_robustness

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let api = match args.next().as_deref() {
        Some("gl") => Api::Gl,
        Some("gles2") | None => Api::Gles2,
        Some("egl") => Api::Egl,
        Some(other) => bail!("invalid api {other:?}"),
    };
    let version = match args.next() {
        Some(version) => Version::from_str(&version)?,
        None if api == Api::Egl => Version(1, 5),
        None => Version(2, 0),
    };
    let extensions: Vec<String> = args.collect();
    let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();

    let path = format!("khronos-registry/{}", api.registry_file_name());
    let spec = fs::read_to_string(&path).with_context(|| format!("could not read {path}"))?;
    let registry = khronos_generator::filter_registry(
        khronos_generator::parse_registry(&spec)?,
        &api,
        &version,
        &extensions,
    )?;

    let mut w = stdout().lock();
    khronos_generator::emit_types(&mut w, &api)?;
    khronos_generator::emit_enums(&mut w, &registry, &api)?;
    khronos_generator::emit_api(&mut w, &registry, &api)?;
    khronos_generator::emit_registry(&mut w, &registry, &api, &version, &extensions)?;
    w.flush()?;

    Ok(())
}
