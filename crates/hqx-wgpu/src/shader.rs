//! Filter program compilation and linking
//!
//! A filter shader is a single WGSL source file defining both the vertex and
//! the fragment stage. Each stage is compiled separately against the shared
//! source so that every diagnostic names the failing stage, and entry points
//! are discovered from the parsed module rather than hard-coded.
//!
//! Compilation happens on the CPU through `naga` (parse + full validation),
//! which yields readable diagnostics without touching the GPU. Linking — the
//! creation of the actual render pipeline — happens on the device inside a
//! validation error scope so that interface mismatches surface as
//! [`HqxError::ProgramLink`] instead of an uncaptured device error.

use std::path::Path;

use crate::error::HqxError;
use crate::geometry::Vertex;

/// The two programmable stages a filter shader must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage (`@vertex` entry point)
    Vertex,
    /// Fragment stage (`@fragment` entry point)
    Fragment,
}

impl ShaderStage {
    /// Returns the human-readable name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    fn naga_stage(&self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated dual-stage filter shader, ready for linking.
///
/// Holds the raw WGSL source plus the entry point name discovered for each
/// stage. Construction guarantees that the source parses, validates, and
/// defines both stages.
#[derive(Debug, Clone)]
pub struct FilterShader {
    name: String,
    source: String,
    vertex_entry: String,
    fragment_entry: String,
}

impl FilterShader {
    /// Reads a filter shader from disk and compiles both stages.
    ///
    /// # Arguments
    /// * `name` - Filter name used in diagnostics (e.g. "hq2x")
    /// * `path` - Path to the WGSL source file
    pub fn load(name: &str, path: &Path) -> Result<Self, HqxError> {
        let source = std::fs::read_to_string(path).map_err(|source| HqxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::compile(name, source)
    }

    /// Compiles both stages of a filter shader from in-memory source.
    ///
    /// The source is compiled once per stage so diagnostics can name the
    /// failing stage, mirroring a classic dual-stage compile.
    ///
    /// # Errors
    /// [`HqxError::ShaderCompile`] with the stage and the full compiler log
    /// when parsing or validation fails, or when a stage entry point is
    /// missing.
    pub fn compile(name: &str, source: String) -> Result<Self, HqxError> {
        let vertex_entry = compile_stage(name, &source, ShaderStage::Vertex)?;
        let fragment_entry = compile_stage(name, &source, ShaderStage::Fragment)?;

        Ok(Self {
            name: name.to_owned(),
            source,
            vertex_entry,
            fragment_entry,
        })
    }

    /// Returns the filter name this shader was compiled for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry point name for the given stage
    pub fn entry_point(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex_entry,
            ShaderStage::Fragment => &self.fragment_entry,
        }
    }
}

/// Compiles a single stage: parse, validate, and resolve its entry point.
fn compile_stage(name: &str, source: &str, stage: ShaderStage) -> Result<String, HqxError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| HqxError::ShaderCompile {
        name: name.to_owned(),
        stage,
        log: err.emit_to_string(source),
    })?;

    let mut validator =
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all());
    validator.validate(&module).map_err(|err| HqxError::ShaderCompile {
        name: name.to_owned(),
        stage,
        log: err.emit_to_string(source),
    })?;

    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga_stage())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| HqxError::ShaderCompile {
            name: name.to_owned(),
            stage,
            log: format!("shader defines no {stage} entry point"),
        })
}

/// Links a compiled filter shader into a render pipeline.
///
/// Creates the shader module and the render pipeline inside a validation
/// error scope; any captured error is reported as [`HqxError::ProgramLink`]
/// with the device's log. The transient shader module is dropped once the
/// pipeline exists — only the linked pipeline survives.
///
/// # Arguments
/// * `device` - The wgpu device for resource creation
/// * `shader` - The compiled dual-stage shader
/// * `layout` - Pipeline layout describing the filter binding contract
/// * `target_format` - Color format of the surface being rendered to
pub fn link_program(
    device: &wgpu::Device,
    shader: &FilterShader,
    layout: &wgpu::PipelineLayout,
    target_format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, HqxError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(shader.name()),
        source: wgpu::ShaderSource::Wgsl(shader.source.as_str().into()),
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(shader.name()),
        layout: Some(layout),
        cache: None,
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(shader.entry_point(ShaderStage::Vertex)),
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(shader.entry_point(ShaderStage::Fragment)),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        depth_stencil: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(HqxError::ProgramLink {
            name: shader.name.clone(),
            log: err.to_string(),
        });
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PASSTHROUGH_SHADER;

    /// A minimal filter-style shader exercising the full binding contract:
    /// source texture, sampler, texel-size uniform, and lookup texture.
    const LUT_FILTER_SHADER: &str = r#"
struct FilterUniforms {
    texture_size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var source_texture: texture_2d<f32>;
@group(0) @binding(1) var source_sampler: sampler;
@group(0) @binding(2) var<uniform> params: FilterUniforms;
@group(0) @binding(3) var lut_texture: texture_2d<f32>;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
    @location(1) texel: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) tex_coord: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 1.0);
    out.tex_coord = tex_coord;
    out.texel = tex_coord * params.texture_size;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(source_texture, source_sampler, in.tex_coord);
    let rule = textureSample(lut_texture, source_sampler, fract(in.texel));
    return mix(base, rule, rule.a);
}
"#;

    const VERTEX_ONLY_SHADER: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) tex_coord: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;

    #[test]
    fn test_passthrough_compiles() {
        let shader = FilterShader::compile("passthrough", PASSTHROUGH_SHADER.to_owned()).unwrap();
        assert_eq!(shader.entry_point(ShaderStage::Vertex), "vs_main");
        assert_eq!(shader.entry_point(ShaderStage::Fragment), "fs_main");
    }

    #[test]
    fn test_lut_filter_compiles() {
        let shader = FilterShader::compile("hq-test", LUT_FILTER_SHADER.to_owned()).unwrap();
        assert_eq!(shader.name(), "hq-test");
    }

    #[test]
    fn test_malformed_source_names_vertex_stage() {
        let err = FilterShader::compile("broken", "this is not wgsl".to_owned()).unwrap_err();
        match err {
            HqxError::ShaderCompile { name, stage, log } => {
                assert_eq!(name, "broken");
                // The vertex stage is compiled first, so a parse failure is
                // attributed to it.
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("expected ShaderCompile, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_fragment_entry_names_fragment_stage() {
        let err = FilterShader::compile("vertex-only", VERTEX_ONLY_SHADER.to_owned()).unwrap_err();
        match err {
            HqxError::ShaderCompile { stage, log, .. } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("fragment"));
            }
            other => panic!("expected ShaderCompile, got {other:?}"),
        }
    }
}
