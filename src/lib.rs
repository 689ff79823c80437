//! Renderer and device client for a 64x64 networked LED matrix.
//!
//! Scenes are drawn with a [`rasterizer::Rasterizer`] into a
//! [`framebuffer::Framebuffer`], then sent to the display as one full frame
//! with [`device::DeviceClient::push`].

/// Color types and parsing.
pub mod color;
/// Configuration management.
pub mod config;
/// Device protocol: transport, handshake, frame push.
pub mod device;
/// Built-in bitmap font.
pub mod font;
/// RGB24 pixel grid.
pub mod framebuffer;
/// Image resources.
pub mod image;
/// Drawing primitives and text layout.
pub mod rasterizer;
