//! Error types for chaos-points.
//!
//! This module provides error types for GPU initialization, texture building,
//! file handling and the application event loop.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while building texture data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// A texture must hold at least one texel.
    Empty,
    /// The source buffer holds fewer components than `size * 3`.
    SizeMismatch {
        /// Components required.
        expected: usize,
        /// Components supplied.
        actual: usize,
    },
    /// Wider than the device (or [`MAX_TEXTURE_WIDTH`](crate::textures::MAX_TEXTURE_WIDTH)) allows.
    TooWide {
        width: usize,
        max: usize,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Empty => write!(f, "Texture size must be greater than zero"),
            TextureError::SizeMismatch { expected, actual } => write!(
                f,
                "Texture buffer too small: expected {} components, got {}",
                expected, actual
            ),
            TextureError::TooWide { width, max } => {
                write!(f, "Texture width {} exceeds the limit of {}", width, max)
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// Errors that can occur reading or writing attractor, palette and settings files.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid JSON for the expected type.
    Json(serde_json::Error),
    /// Failed to encode a palette image.
    Image(image::ImageError),
    /// The file names an attractor that does not exist.
    UnknownAttractor(String),
    /// The parameter list does not match the attractor.
    ParamCount {
        /// Attractor name.
        attractor: String,
        /// Parameters the attractor takes.
        expected: usize,
        /// Parameters found in the file.
        actual: usize,
    },
    /// Palette index out of range.
    NoSuchPalette(usize),
    /// Palette file holds no colors.
    EmptyPalette,
    /// Palette file holds more colors than fit in a texture.
    PaletteTooLarge {
        colors: usize,
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "File error: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid file contents: {}", e),
            ConfigError::Image(e) => write!(f, "Failed to write palette image: {}", e),
            ConfigError::UnknownAttractor(name) => write!(f, "Unknown attractor '{}'", name),
            ConfigError::ParamCount { attractor, expected, actual } => write!(
                f,
                "Attractor '{}' takes {} parameters, file has {}",
                attractor, expected, actual
            ),
            ConfigError::NoSuchPalette(idx) => write!(f, "No palette at index {}", idx),
            ConfigError::EmptyPalette => write!(f, "Palette has no colors"),
            ConfigError::PaletteTooLarge { colors, max } => {
                write!(f, "Palette has {} colors, at most {} are supported", colors, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<image::ImageError> for ConfigError {
    fn from(e: image::ImageError) -> Self {
        ConfigError::Image(e)
    }
}

/// Errors that can occur when running the viewer.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
