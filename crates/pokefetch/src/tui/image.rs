//! Sprite decoding for terminals with an image protocol

use ratatui_image::{picker::Picker, protocol::StatefulProtocol};

/// Whether the terminal can draw sprites
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageProtocol {
    Supported,
    None,
}

impl ImageProtocol {
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var("TERM").ok().as_deref(),
            std::env::var("TERM_PROGRAM").ok().as_deref(),
        )
    }

    /// Kitty and Ghostty advertise themselves through TERM / TERM_PROGRAM
    fn from_env(term: Option<&str>, term_program: Option<&str>) -> Self {
        if term.is_some_and(|t| t.contains("kitty") || t.contains("ghostty")) {
            return ImageProtocol::Supported;
        }
        if term_program.is_some_and(|p| p.to_lowercase().contains("ghostty")) {
            return ImageProtocol::Supported;
        }
        ImageProtocol::None
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ImageProtocol::Supported)
    }
}

/// Decode sprite bytes into a renderable protocol
pub fn decode_sprite(bytes: &[u8], picker: &Picker) -> Option<StatefulProtocol> {
    let img = image::load_from_memory(bytes).ok()?;
    Some(picker.new_resize_protocol(img))
}
