//! Error taxonomy for the viewer
//!
//! Every variant here is fatal for the process: the viewer is a single-session
//! interactive tool, so a broken asset or a failed GPU handshake terminates it
//! rather than degrading to a partial filter set.

use std::path::PathBuf;

use crate::shader::ShaderStage;

/// All failure modes of asset loading, shader building and filter selection.
#[derive(Debug, thiserror::Error)]
pub enum HqxError {
    /// An image file (source picture or filter lookup texture) could not be
    /// decoded. Carries the decoder's own diagnostic.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        /// Path of the offending image file
        path: PathBuf,
        /// Decoder diagnostic
        source: image::ImageError,
    },

    /// A shader source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A shader stage failed to compile. Indicates a broken filter asset.
    #[error("{stage} stage of shader '{name}' failed to compile:\n{log}")]
    ShaderCompile {
        /// Name of the filter shader being compiled
        name: String,
        /// The stage that failed
        stage: ShaderStage,
        /// Full compiler diagnostic log
        log: String,
    },

    /// Both stages compiled but the program could not be linked into a
    /// render pipeline.
    #[error("shader '{name}' failed to link:\n{log}")]
    ProgramLink {
        /// Name of the filter shader being linked
        name: String,
        /// Validation log captured from the device
        log: String,
    },

    /// A filter index outside the registry was selected. The input mapping is
    /// bounded by construction, so hitting this is a programming error.
    #[error("filter index {index} out of range (registry holds {len} slots)")]
    InvalidFilterIndex {
        /// The rejected index
        index: usize,
        /// Number of slots in the registry
        len: usize,
    },

    /// No suitable graphics adapter was found.
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The graphics device could not be created.
    #[error("failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The rendering surface could not be created for the window.
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
}
