//! The filter registry: the viewer's core state machine
//!
//! Maps a filter index to a pre-built `(render pipeline, lookup texture)`
//! pair. Slot 0 is the embedded passthrough program; slots 1..=3 are the
//! hq2x/hq3x/hq4x upscale variants, each owning exactly one pipeline and one
//! lookup texture loaded from the asset directory.
//!
//! All GPU resources — pipelines, lookup textures, bind groups, the shared
//! nearest sampler and the texel-size uniform — are created once during
//! [`FilterRegistry::new`] and live until the registry is dropped. Filter
//! switching afterwards is a pure index update: [`FilterRegistry::current_slot`]
//! performs no allocation, so it can run every frame without stutter.

use std::path::Path;

use crate::error::HqxError;
use crate::shader::{FilterShader, link_program};
use crate::texture::{LoadedTexture, create_nearest_sampler, load_texture};
use wgpu::util::DeviceExt;

/// The embedded identity filter, always available as slot 0.
pub(crate) const PASSTHROUGH_SHADER: &str = include_str!("shaders/passthrough.wgsl");

/// One configured upscale filter variant and its asset paths, relative to
/// the asset directory supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterVariant {
    /// Filter name, used for labels and diagnostics
    pub name: &'static str,
    /// The scale factor this variant is designed for
    pub scale: u32,
    /// Relative path of the WGSL shader source
    pub shader_path: &'static str,
    /// Relative path of the lookup texture image
    pub lut_path: &'static str,
}

/// The fixed set of upscale variants the registry loads at startup.
///
/// Every listed asset must exist under the asset directory; a missing file
/// is fatal (the asset layout contract).
pub const FILTER_VARIANTS: &[FilterVariant] = &[
    FilterVariant {
        name: "hq2x",
        scale: 2,
        shader_path: "wgsl/hq2x.wgsl",
        lut_path: "resources/hq2x.png",
    },
    FilterVariant {
        name: "hq3x",
        scale: 3,
        shader_path: "wgsl/hq3x.wgsl",
        lut_path: "resources/hq3x.png",
    },
    FilterVariant {
        name: "hq4x",
        scale: 4,
        shader_path: "wgsl/hq4x.wgsl",
        lut_path: "resources/hq4x.png",
    },
];

/// Texel-size uniform handed to every filter program.
///
/// Carries the source image dimensions — not the window size — since the
/// filters reason in source-pixel space. Padded to 16 bytes for uniform
/// buffer layout rules.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
struct FilterUniforms {
    texture_size: [f32; 2],
    _pad: [f32; 2],
}

/// One selectable filter configuration, fully bound and ready to draw.
#[derive(Debug)]
pub struct FilterSlot {
    /// Position of this slot in the registry (0 = passthrough)
    pub index: usize,
    /// The scale factor this slot renders at (1 for passthrough)
    pub scale: u32,
    /// Filter name for titles and logs
    pub name: &'static str,
    pipeline: wgpu::RenderPipeline,
    /// Lookup texture owned by this slot; `None` only for the passthrough
    lut: Option<LoadedTexture>,
    bind_group: wgpu::BindGroup,
}

impl FilterSlot {
    /// Returns the render pipeline for this filter
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Returns the pre-built bind group (source, sampler, uniforms, LUT)
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Returns whether this slot owns a lookup texture
    pub fn has_lut(&self) -> bool {
        self.lut.is_some()
    }
}

/// Selection state, kept separate from the GPU resources so the bounds rules
/// are testable without a device.
///
/// `current` is written only by the input handler and read every frame by
/// the render loop; both run on the same thread, interleaved between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    current: usize,
    len: usize,
}

impl Selection {
    /// Creates a selection over `len` slots, starting at `initial`.
    pub fn new(len: usize, initial: usize) -> Self {
        assert!(initial < len, "initial selection must be a valid slot index");
        Self { current: initial, len }
    }

    /// Selects a slot, rejecting out-of-range indices without touching the
    /// current selection.
    pub fn select(&mut self, index: usize) -> Result<(), HqxError> {
        if index >= self.len {
            return Err(HqxError::InvalidFilterIndex { index, len: self.len });
        }
        self.current = index;
        Ok(())
    }

    /// Returns the currently selected slot index
    pub fn current(&self) -> usize {
        self.current
    }
}

/// Owns the full array of filter slots and the active selection.
///
/// Once construction completes, the set of valid indices and their resource
/// bindings never changes for the lifetime of the process; only the current
/// selection varies.
#[derive(Debug)]
pub struct FilterRegistry {
    slots: Vec<FilterSlot>,
    selection: Selection,
    // Kept alive for the bind groups built from them
    _sampler: wgpu::Sampler,
    _uniforms: wgpu::Buffer,
}

impl FilterRegistry {
    /// Builds the registry: the passthrough slot plus every configured
    /// upscale variant, with uniform bindings resolved once.
    ///
    /// # Arguments
    /// * `device` - The wgpu device for resource creation
    /// * `queue` - Queue used to upload lookup textures
    /// * `assets_dir` - Base directory of the filter asset pack
    /// * `source` - The persistent source image texture; its dimensions feed
    ///   the texel-size uniform
    /// * `target_format` - Color format the pipelines render to
    /// * `initial_index` - Slot selected at startup
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets_dir: &Path,
        source: &LoadedTexture,
        target_format: wgpu::TextureFormat,
        initial_index: usize,
    ) -> Result<Self, HqxError> {
        let sampler = create_nearest_sampler(device);

        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Texel-size uniforms"),
            usage: wgpu::BufferUsages::UNIFORM,
            contents: bytemuck::cast_slice(&[FilterUniforms {
                texture_size: [source.width as f32, source.height as f32],
                _pad: [0.0; 2],
            }]),
        });

        let source_view = source.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut slots = Vec::with_capacity(FILTER_VARIANTS.len() + 1);

        // Slot 0: the fixed passthrough program, no lookup texture.
        let passthrough = FilterShader::compile("passthrough", PASSTHROUGH_SHADER.to_owned())?;
        let layout = bind_group_layout(device, false);
        let pipeline_layout = pipeline_layout(device, &layout, "passthrough");
        let pipeline = link_program(device, &passthrough, &pipeline_layout, target_format)?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("passthrough bind group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });
        slots.push(FilterSlot {
            index: 0,
            scale: 1,
            name: "passthrough",
            pipeline,
            lut: None,
            bind_group,
        });

        // Slots 1..: one upscale variant each, shader plus lookup texture.
        let layout = bind_group_layout(device, true);
        for variant in FILTER_VARIANTS {
            let shader = FilterShader::load(variant.name, &assets_dir.join(variant.shader_path))?;
            let pipeline_layout = self::pipeline_layout(device, &layout, variant.name);
            let pipeline = link_program(device, &shader, &pipeline_layout, target_format)?;

            let lut = load_texture(device, queue, &assets_dir.join(variant.lut_path), variant.name)?;
            let lut_view = lut.texture.create_view(&wgpu::TextureViewDescriptor::default());

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(variant.name),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&source_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(&lut_view),
                    },
                ],
            });

            tracing::debug!(filter = variant.name, scale = variant.scale, "filter slot built");

            slots.push(FilterSlot {
                index: slots.len(),
                scale: variant.scale,
                name: variant.name,
                pipeline,
                lut: Some(lut),
                bind_group,
            });
        }

        let selection = Selection::new(slots.len(), initial_index);

        Ok(Self {
            slots,
            selection,
            _sampler: sampler,
            _uniforms: uniforms,
        })
    }

    /// Selects the active filter slot.
    ///
    /// # Errors
    /// [`HqxError::InvalidFilterIndex`] for indices outside the registry;
    /// the current selection is left unchanged.
    pub fn select(&mut self, index: usize) -> Result<(), HqxError> {
        self.selection.select(index)
    }

    /// Returns the slot for the active index. Pure lookup, no allocation.
    pub fn current_slot(&self) -> &FilterSlot {
        &self.slots[self.selection.current()]
    }

    /// Returns the number of slots (passthrough included)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Registries are never empty; slot 0 always exists
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Bind group layout for the filter binding contract.
///
/// Binding 0: source texture, 1: nearest sampler, 2: texel-size uniform
/// (visible to both stages, the vertex stage precomputes texel offsets),
/// 3: lookup texture for upscale filters.
fn bind_group_layout(device: &wgpu::Device, with_lut: bool) -> wgpu::BindGroupLayout {
    let mut entries = vec![
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        },
    ];

    if with_lut {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 3,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
    }

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(if with_lut { "filter bind group layout" } else { "passthrough bind group layout" }),
        entries: &entries,
    })
}

fn pipeline_layout(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, name: &str) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(name),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_manifest_covers_scales_2_to_4() {
        let scales: Vec<u32> = FILTER_VARIANTS.iter().map(|v| v.scale).collect();
        assert_eq!(scales, vec![2, 3, 4]);

        for variant in FILTER_VARIANTS {
            assert!(variant.shader_path.starts_with("wgsl/"));
            assert!(variant.lut_path.starts_with("resources/"));
            assert!(variant.shader_path.contains(variant.name));
            assert!(variant.lut_path.contains(variant.name));
        }
    }

    #[test]
    fn test_select_accepts_all_valid_indices() {
        let mut selection = Selection::new(4, 1);
        for index in 0..4 {
            selection.select(index).unwrap();
            assert_eq!(selection.current(), index);
        }
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut selection = Selection::new(4, 1);
        selection.select(3).unwrap();
        selection.select(3).unwrap();
        assert_eq!(selection.current(), 3);
    }

    #[test]
    fn test_select_out_of_range_leaves_selection_unchanged() {
        let mut selection = Selection::new(4, 1);
        selection.select(2).unwrap();

        for index in [4, 5, usize::MAX] {
            match selection.select(index) {
                Err(HqxError::InvalidFilterIndex { index: reported, len }) => {
                    assert_eq!(reported, index);
                    assert_eq!(len, 4);
                }
                other => panic!("expected InvalidFilterIndex, got {other:?}"),
            }
            assert_eq!(selection.current(), 2);
        }
    }

    #[test]
    #[should_panic(expected = "valid slot index")]
    fn test_initial_selection_must_be_in_range() {
        let _ = Selection::new(4, 4);
    }
}
