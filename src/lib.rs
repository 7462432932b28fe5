//! Recolor ZX Spectrum art into other 15-color palettes.
//!
//! [`store::PaletteStore`] turns palette definitions into validated
//! [`store::Palette`]s; [`mapper::Recolorer`] swaps every pixel's color for
//! the color of the same role in a target palette.

pub mod cli;
pub mod color;
pub mod error;
pub mod image_io;
pub mod mapper;
pub mod role;
pub mod store;
pub mod tui;

pub use color::Color;
pub use error::{Error, Result};
pub use mapper::{map_color, resolve_role, Canvas, Recolorer};
pub use role::ColorRole;
pub use store::{Palette, PaletteStore, DEFAULT_TARGET_PALETTE, SOURCE_PALETTE};
