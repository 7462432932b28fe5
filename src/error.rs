//! Error types for palette loading and color mapping.

use thiserror::Error;

use crate::color::Color;
use crate::role::ColorRole;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("palette `{0}` is not defined")]
    UnknownPalette(String),

    #[error("palette `{name}` is defined incorrectly, missing colors: {}", join_roles(.missing))]
    IncompletePalette {
        name: String,
        missing: Vec<ColorRole>,
    },

    #[error("palette `{palette}`: color `{role}` has malformed value `{value}`")]
    MalformedColor {
        palette: String,
        role: ColorRole,
        value: String,
    },

    #[error("unmappable color {color}{}", describe_position(.position))]
    UnmappableColor {
        color: Color,
        position: Option<(u32, u32)>,
    },

    #[error("invalid palette configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Attach a pixel position to an [`Error::UnmappableColor`].
    /// Other variants pass through unchanged.
    pub fn at(self, x: u32, y: u32) -> Self {
        match self {
            Error::UnmappableColor { color, .. } => Error::UnmappableColor {
                color,
                position: Some((x, y)),
            },
            other => other,
        }
    }
}

fn join_roles(roles: &[ColorRole]) -> String {
    roles
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_position(position: &Option<(u32, u32)>) -> String {
    match position {
        Some((x, y)) => format!(" at pixel ({x}, {y})"),
        None => String::new(),
    }
}
