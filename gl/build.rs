use std::env;
use std::path::{Path, PathBuf};

use khronos_generator::{Api, Version};

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rerun-if-changed=../khronos-generator");
    println!("cargo:rerun-if-changed=../khronos-registry");

    let out_dir = PathBuf::from(&env::var("OUT_DIR")?);

    khronos_generator::generate(
        Path::new("../khronos-registry"),
        &out_dir,
        Api::Gles2,
        Version(2, 0),
        &[
            #[cfg(feature = "GL_EXT_texture_format_BGRA8888")]
            "GL_EXT_texture_format_BGRA8888",
            #[cfg(feature = "GL_KHR_robustness")]
            "GL_KHR_robustness",
            #[cfg(feature = "GL_OES_EGL_image")]
            "GL_OES_EGL_image",
            #[cfg(feature = "GL_OES_vertex_array_object")]
            "GL_OES_vertex_array_object",
        ],
    )
}
