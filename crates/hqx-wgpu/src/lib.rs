//! HQx pixel-art upscaling viewer built on wgpu
//!
//! This crate displays a single image through a selectable GPU upscaling
//! filter. Filters are WGSL shader programs paired with lookup textures,
//! loaded once at startup into a [`FilterRegistry`] and switched at runtime
//! with the digit keys — switching is an allocation-free index update, so it
//! can happen every frame without stutter.

pub mod error;
pub mod geometry;
pub mod input;
pub mod registry;
pub mod shader;
pub mod texture;

pub use error::HqxError;
pub use input::{DEFAULT_ZOOM, ViewerAction, map_key};
pub use registry::{FilterRegistry, FilterSlot, FilterVariant, Selection};
pub use shader::{FilterShader, ShaderStage};
pub use texture::LoadedTexture;
