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
        Api::Egl,
        Version(1, 5),
        &[
            #[cfg(feature = "EGL_EXT_platform_base")]
            "EGL_EXT_platform_base",
            #[cfg(feature = "EGL_EXT_platform_wayland")]
            "EGL_EXT_platform_wayland",
            #[cfg(feature = "EGL_EXT_platform_x11")]
            "EGL_EXT_platform_x11",
            #[cfg(feature = "EGL_KHR_image")]
            "EGL_KHR_image",
            #[cfg(feature = "EGL_KHR_platform_wayland")]
            "EGL_KHR_platform_wayland",
            #[cfg(feature = "EGL_KHR_platform_x11")]
            "EGL_KHR_platform_x11",
            #[cfg(feature = "EGL_MESA_image_dma_buf_export")]
            "EGL_MESA_image_dma_buf_export",
        ],
    )
}
