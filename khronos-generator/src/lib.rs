mod emit;
mod registry;

use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context as _, bail};

pub use emit::{emit_api, emit_enums, emit_registry, emit_types};
pub use registry::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Gl,
    Gles2,
    Egl,
}

impl Api {
    /// name of the api as the registry spells it in `<feature api="...">`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gl => "gl",
            Self::Gles2 => "gles2",
            Self::Egl => "egl",
        }
    }

    pub fn registry_file_name(&self) -> &'static str {
        match self {
            Self::Gl | Self::Gles2 => "gl.xml",
            Self::Egl => "egl.xml",
        }
    }

    fn enum_prefix(&self) -> &'static str {
        match self {
            Self::Gl | Self::Gles2 => "GL_",
            Self::Egl => "EGL_",
        }
    }

    fn command_prefix(&self) -> &'static str {
        match self {
            Self::Gl | Self::Gles2 => "gl",
            Self::Egl => "egl",
        }
    }

    /// error query command and the value it returns when everything is fine.
    fn error_command(&self) -> (&'static str, &'static str) {
        match self {
            Self::Gl | Self::Gles2 => ("glGetError", "0"),
            Self::Egl => ("eglGetError", "0x3000"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Version(pub u32, pub u32);

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let major: u32 = parts.next().context("missing major")?.parse()?;
        let minor: u32 = parts.next().context("missing minor")?.parse()?;
        if parts.next().is_some() {
            bail!("unexpected trailing version parts in {s:?}");
        }
        Ok(Version(major, minor))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.0).then(self.1.cmp(&other.1)))
    }
}

#[test]
fn test_version() {
    let a = Version(3, 0);
    let b = Version(4, 6);
    assert!(a < b);
    assert!(Version(2, 0) == Version::from_str("2.0").unwrap());
    assert!(Version::from_str("1.5").unwrap() > Version(1, 4));
    assert!(Version::from_str("1.5.1").is_err());
    assert!(Version::from_str("one.five").is_err());
}

/// reads `{registry_dir}/{gl,egl}.xml` and writes `{api}_{types,enums,api,registry}_generated.rs`
/// into `out_dir`. meant to be called from build scripts.
pub fn generate(
    registry_dir: &Path,
    out_dir: &Path,
    api: Api,
    version: Version,
    extensions: &[&str],
) -> anyhow::Result<()> {
    let api_str = api.as_str();

    let registry_path = registry_dir.join(api.registry_file_name());
    let spec = fs::read_to_string(&registry_path)
        .with_context(|| format!("could not read {}", registry_path.display()))?;
    let registry = filter_registry(
        parse_registry(spec.as_str()).context("could not parse registry")?,
        &api,
        &version,
        extensions,
    )
    .context("could not filter registry")?;

    let create = |kind: &str| -> anyhow::Result<BufWriter<File>> {
        let path = out_dir.join(format!("{api_str}_{kind}_generated.rs"));
        let file =
            File::create(&path).with_context(|| format!("could not create {}", path.display()))?;
        Ok(BufWriter::new(file))
    };

    let mut types_out = create("types")?;
    emit_types(&mut types_out, &api)?;
    types_out.flush()?;

    let mut enums_out = create("enums")?;
    emit_enums(&mut enums_out, &registry, &api)?;
    enums_out.flush()?;

    let mut api_out = create("api")?;
    emit_api(&mut api_out, &registry, &api)?;
    api_out.flush()?;

    let mut registry_out = create("registry")?;
    emit_registry(&mut registry_out, &registry, &api, &version, extensions)?;
    registry_out.flush()?;

    Ok(())
}
