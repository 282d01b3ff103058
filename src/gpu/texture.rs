//! GPU-side 1-D textures.
//!
//! A [`TextureSlot`] holds at most one texture plus the sampler carrying its
//! filter and wrap attributes. Building into an occupied slot destroys the
//! previous texture first, so the palette can be regenerated freely.

use crate::error::TextureError;
use crate::textures::{AddressMode, FilterMode, TextureData, TexturePrecision};

/// One named texture binding, empty until the first [`build`](Self::build).
pub struct TextureSlot {
    label: &'static str,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,
    size: u32,
    precision: TexturePrecision,
}

impl TextureSlot {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            texture: None,
            view: None,
            sampler: None,
            size: 0,
            precision: TexturePrecision::Unorm8,
        }
    }

    /// Create (or replace) the texture, set its attributes and upload `data`.
    ///
    /// Data wider than the device allows is rejected and the slot keeps its
    /// previous texture.
    pub fn build(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &TextureData,
        precision: TexturePrecision,
    ) -> Result<(), TextureError> {
        let width = data.width();
        check_width(width, device.limits().max_texture_dimension_2d)?;

        if let Some(old) = self.texture.take() {
            old.destroy();
        }

        let size = wgpu::Extent3d {
            width,
            height: 1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(self.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(precision),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.to_bytes(precision),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * precision.bytes_per_texel()),
                rows_per_image: Some(1),
            },
            size,
        );

        let address = address_mode(data.address_mode);
        let filter = filter_mode(data.filter);
        self.sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(self.label),
            address_mode_u: address,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }));
        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.size = width;
        self.precision = precision;
        log::debug!("Built {} ({} texels, {})", self.label, width, precision.label());
        Ok(())
    }

    pub fn is_generated(&self) -> bool {
        self.texture.is_some()
    }

    /// Width in texels of the current texture, 0 when empty.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn precision(&self) -> TexturePrecision {
        self.precision
    }

    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }
}

impl Drop for TextureSlot {
    fn drop(&mut self) {
        if let Some(texture) = self.texture.take() {
            texture.destroy();
        }
    }
}

fn check_width(width: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 {
        return Err(TextureError::Empty);
    }
    if width > max {
        return Err(TextureError::TooWide {
            width: width as usize,
            max: max as usize,
        });
    }
    Ok(())
}

fn texture_format(precision: TexturePrecision) -> wgpu::TextureFormat {
    match precision {
        TexturePrecision::Unorm8 => wgpu::TextureFormat::Rgba8Unorm,
        TexturePrecision::Float32 => wgpu::TextureFormat::Rgba32Float,
    }
}

fn filter_mode(filter: FilterMode) -> wgpu::FilterMode {
    match filter {
        FilterMode::Linear => wgpu::FilterMode::Linear,
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
    }
}

fn address_mode(mode: AddressMode) -> wgpu::AddressMode {
    match mode {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
        AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}
