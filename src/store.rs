//! Palette definitions: raw configuration entries, validated palettes, and
//! the store that turns one into the other.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::role::ColorRole;

/// Palette the input images are expected to be drawn with.
pub const SOURCE_PALETTE: &str = "zx-spectrum";
/// Palette used when the caller does not pick one.
pub const DEFAULT_TARGET_PALETTE: &str = "gruvbox";

const BUILTIN_PALETTES: &str = include_str!("../palettes.toml");

/// A color value as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    /// Packed `0xRRGGBB` integer.
    Int(i64),
    /// Hexadecimal string, e.g. `"ebdbb2"` or `"#ebdbb2"`.
    Hex(String),
    /// Anything else; always fails to decode.
    Other(toml::Value),
}

impl RawColor {
    /// Decode into a [`Color`], masking to 24 bits. `None` for negative
    /// integers, unparseable strings, and non-color values.
    pub fn decode(&self) -> Option<Color> {
        match self {
            RawColor::Int(value) => u64::try_from(*value).ok().map(Color::from_rgb24),
            RawColor::Hex(text) => Color::from_hex(text),
            RawColor::Other(_) => None,
        }
    }
}

impl fmt::Display for RawColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawColor::Int(value) => write!(f, "{value}"),
            RawColor::Hex(text) => f.write_str(text),
            RawColor::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Role name to color value, before validation.
pub type RawPalette = BTreeMap<String, RawColor>;

/// A complete, validated mapping from every [`ColorRole`] to a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; ColorRole::COUNT],
}

impl Palette {
    pub fn from_fn(f: impl FnMut(ColorRole) -> Color) -> Self {
        Self {
            colors: ColorRole::ALL.map(f),
        }
    }

    pub fn get(&self, role: ColorRole) -> Color {
        self.colors[role.index()]
    }

    /// Roles and their colors in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, Color)> + '_ {
        ColorRole::ALL.into_iter().zip(self.colors.iter().copied())
    }

    /// First role (in canonical order) whose color equals `color`.
    pub fn role_of(&self, color: Color) -> Option<ColorRole> {
        self.iter().find(|(_, c)| *c == color).map(|(role, _)| role)
    }
}

impl Index<ColorRole> for Palette {
    type Output = Color;

    fn index(&self, role: ColorRole) -> &Color {
        &self.colors[role.index()]
    }
}

/// Named raw palettes, as read from a configuration source.
#[derive(Debug, Clone, Default)]
pub struct PaletteStore {
    palettes: BTreeMap<String, RawPalette>,
}

impl PaletteStore {
    /// The palette set compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PALETTES)
    }

    /// Parse palette tables from TOML. Top-level keys that are not tables
    /// are skipped with a warning.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        let mut palettes = BTreeMap::new();
        for (name, value) in table {
            if !value.is_table() {
                warn!(key = name.as_str(), "ignoring top-level key that is not a palette table");
                continue;
            }
            palettes.insert(name, value.try_into::<RawPalette>()?);
        }
        debug!(count = palettes.len(), "parsed palette definitions");
        Ok(Self { palettes })
    }

    /// Read palette definitions from a TOML file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read palettes from {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse palettes in {}", path.display()))
    }

    /// Palette names in store order.
    pub fn list_palette_names(&self) -> Vec<&str> {
        self.palettes.keys().map(String::as_str).collect()
    }

    /// Look up `name`, check that all 15 roles are present, and decode them.
    ///
    /// Roles may be keyed by canonical name (`white_dim`) or short name
    /// (`white_d`); the canonical key wins when both are present. Keys that
    /// name no role are ignored.
    pub fn load_palette(&self, name: &str) -> Result<Palette> {
        let raw = self
            .palettes
            .get(name)
            .ok_or_else(|| Error::UnknownPalette(name.to_string()))?;

        let mut found = Vec::with_capacity(ColorRole::COUNT);
        let mut missing = Vec::new();
        for role in ColorRole::ALL {
            let value = raw
                .get(role.name())
                .or_else(|| role.short_name().and_then(|short| raw.get(short)));
            match value {
                Some(value) => found.push((role, value)),
                None => missing.push(role),
            }
        }
        if !missing.is_empty() {
            return Err(Error::IncompletePalette {
                name: name.to_string(),
                missing,
            });
        }

        for key in raw.keys() {
            if key.parse::<ColorRole>().is_err() {
                warn!(palette = name, key = key.as_str(), "ignoring unknown color key");
            }
        }

        let mut colors = [Color::new(0, 0, 0); ColorRole::COUNT];
        for (role, value) in found {
            colors[role.index()] = value.decode().ok_or_else(|| Error::MalformedColor {
                palette: name.to_string(),
                role,
                value: value.to_string(),
            })?;
        }
        debug!(palette = name, "loaded palette");
        Ok(Palette { colors })
    }

    /// The ZX Spectrum palette every image is matched against.
    pub fn source_palette(&self) -> Result<Palette> {
        self.load_palette(SOURCE_PALETTE)
    }
}

impl From<BTreeMap<String, RawPalette>> for PaletteStore {
    fn from(palettes: BTreeMap<String, RawPalette>) -> Self {
        Self { palettes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// TOML for a palette where every role is present except `skip`.
    /// Role `i` gets color `0x0000ii + 1`.
    fn palette_toml(name: &str, skip: &[&str]) -> String {
        let mut out = format!("[{name}]\n");
        for (i, role) in ColorRole::ALL.iter().enumerate() {
            if !skip.contains(&role.name()) {
                out.push_str(&format!("{} = {}\n", role.name(), i + 1));
            }
        }
        out
    }

    #[test]
    fn builtin_has_source_and_default_target() {
        let store = PaletteStore::builtin().unwrap();
        let names = store.list_palette_names();
        assert!(names.contains(&SOURCE_PALETTE));
        assert!(names.contains(&DEFAULT_TARGET_PALETTE));
        for name in store.list_palette_names() {
            store
                .load_palette(name)
                .unwrap_or_else(|e| panic!("builtin palette {name} failed: {e}"));
        }
    }

    #[test]
    fn builtin_source_palette_values() {
        let source = PaletteStore::builtin().unwrap().source_palette().unwrap();
        assert_eq!(source[ColorRole::Black], Color::new(0, 0, 0));
        assert_eq!(source[ColorRole::White], Color::new(255, 255, 255));
        assert_eq!(source[ColorRole::RedDim], Color::new(0xCD, 0, 0));
        assert_eq!(source[ColorRole::Blue], Color::new(0, 0, 255));
        assert_eq!(source[ColorRole::YellowDim], Color::new(0xCD, 0xCD, 0));
    }

    #[test]
    fn builtin_source_palette_colors_are_distinct() {
        let source = PaletteStore::builtin().unwrap().source_palette().unwrap();
        for (role, color) in source.iter() {
            assert_eq!(source.role_of(color), Some(role));
        }
    }

    #[test]
    fn builtin_gruvbox_mixes_strings() {
        let gruvbox = PaletteStore::builtin()
            .unwrap()
            .load_palette(DEFAULT_TARGET_PALETTE)
            .unwrap();
        assert_eq!(gruvbox[ColorRole::Black], Color::new(0x28, 0x28, 0x28));
        assert_eq!(gruvbox[ColorRole::White], Color::new(0xeb, 0xdb, 0xb2));
    }

    #[test]
    fn unknown_palette() {
        let store = PaletteStore::builtin().unwrap();
        let err = store.load_palette("no-such-palette").unwrap_err();
        assert!(matches!(err, Error::UnknownPalette(ref n) if n == "no-such-palette"));
        assert_eq!(err.to_string(), "palette `no-such-palette` is not defined");
    }

    #[test]
    fn missing_cyan_dim_is_incomplete() {
        let store = PaletteStore::from_toml_str(&palette_toml("p", &["cyan_dim"])).unwrap();
        match store.load_palette("p").unwrap_err() {
            Error::IncompletePalette { name, missing } => {
                assert_eq!(name, "p");
                assert_eq!(missing, vec![ColorRole::CyanDim]);
            }
            other => panic!("expected IncompletePalette, got {other:?}"),
        }
    }

    #[test]
    fn missing_roles_reported_in_canonical_order() {
        let store =
            PaletteStore::from_toml_str(&palette_toml("p", &["yellow", "black", "red_dim"]))
                .unwrap();
        match store.load_palette("p").unwrap_err() {
            Error::IncompletePalette { missing, .. } => assert_eq!(
                missing,
                vec![ColorRole::Black, ColorRole::RedDim, ColorRole::Yellow]
            ),
            other => panic!("expected IncompletePalette, got {other:?}"),
        }
    }

    #[test]
    fn empty_palette_is_incomplete() {
        let store = PaletteStore::from_toml_str("[empty]\n").unwrap();
        match store.load_palette("empty").unwrap_err() {
            Error::IncompletePalette { missing, .. } => {
                assert_eq!(missing.len(), ColorRole::COUNT)
            }
            other => panic!("expected IncompletePalette, got {other:?}"),
        }
    }

    #[test]
    fn integer_and_string_values_agree() {
        let mut text = palette_toml("p", &["red"]);
        text.push_str("red = \"ff0000\"\n");
        let mut ints = palette_toml("q", &["red"]);
        ints.push_str("red = 0xff0000\n");
        text.push_str(&ints);

        let store = PaletteStore::from_toml_str(&text).unwrap();
        let p = store.load_palette("p").unwrap();
        let q = store.load_palette("q").unwrap();
        assert_eq!(p, q);
        assert_eq!(p[ColorRole::Red], Color::new(255, 0, 0));
    }

    #[test]
    fn oversized_integer_is_masked() {
        let mut text = palette_toml("p", &["red"]);
        text.push_str("red = 0x1FF0000\n");
        let palette = PaletteStore::from_toml_str(&text)
            .unwrap()
            .load_palette("p")
            .unwrap();
        assert_eq!(palette[ColorRole::Red], Color::new(255, 0, 0));
    }

    #[test]
    fn malformed_string_value() {
        let mut text = palette_toml("p", &["green"]);
        text.push_str("green = \"zz00zz\"\n");
        let store = PaletteStore::from_toml_str(&text).unwrap();
        match store.load_palette("p").unwrap_err() {
            Error::MalformedColor {
                palette,
                role,
                value,
            } => {
                assert_eq!(palette, "p");
                assert_eq!(role, ColorRole::Green);
                assert_eq!(value, "zz00zz");
            }
            other => panic!("expected MalformedColor, got {other:?}"),
        }
    }

    #[test]
    fn negative_integer_is_malformed() {
        let mut text = palette_toml("p", &["blue"]);
        text.push_str("blue = -1\n");
        let store = PaletteStore::from_toml_str(&text).unwrap();
        assert!(matches!(
            store.load_palette("p").unwrap_err(),
            Error::MalformedColor { role: ColorRole::Blue, .. }
        ));
    }

    #[test]
    fn non_color_value_is_malformed() {
        let mut text = palette_toml("p", &["white"]);
        text.push_str("white = true\n");
        let store = PaletteStore::from_toml_str(&text).unwrap();
        assert!(matches!(
            store.load_palette("p").unwrap_err(),
            Error::MalformedColor { role: ColorRole::White, .. }
        ));
    }

    #[test]
    fn short_role_names_accepted() {
        let mut text = palette_toml("p", &["white_dim", "magenta_dim"]);
        text.push_str("white_d = \"010203\"\nmagenta_d = 0x040506\n");
        let palette = PaletteStore::from_toml_str(&text)
            .unwrap()
            .load_palette("p")
            .unwrap();
        assert_eq!(palette[ColorRole::WhiteDim], Color::new(1, 2, 3));
        assert_eq!(palette[ColorRole::MagentaDim], Color::new(4, 5, 6));
    }

    #[test]
    fn canonical_name_wins_over_short_name() {
        let mut text = palette_toml("p", &["red_dim"]);
        text.push_str("red_dim = 0x111111\nred_d = 0x222222\n");
        let palette = PaletteStore::from_toml_str(&text)
            .unwrap()
            .load_palette("p")
            .unwrap();
        assert_eq!(palette[ColorRole::RedDim], Color::from_rgb24(0x111111));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut text = palette_toml("p", &[]);
        text.push_str("orange = \"ff8800\"\n");
        assert!(PaletteStore::from_toml_str(&text)
            .unwrap()
            .load_palette("p")
            .is_ok());
    }

    #[test]
    fn duplicate_colors_across_roles_allowed() {
        let mut text = palette_toml("p", &["magenta_dim", "yellow"]);
        text.push_str("magenta_dim = 0xabcdef\nyellow = 0xabcdef\n");
        let palette = PaletteStore::from_toml_str(&text)
            .unwrap()
            .load_palette("p")
            .unwrap();
        assert_eq!(
            palette.role_of(Color::from_rgb24(0xabcdef)),
            Some(ColorRole::MagentaDim)
        );
    }

    #[test]
    fn load_is_idempotent() {
        let store = PaletteStore::builtin().unwrap();
        assert_eq!(
            store.load_palette("nord").unwrap(),
            store.load_palette("nord").unwrap()
        );
    }

    #[test]
    fn names_follow_store_order() {
        let text = format!("{}{}", palette_toml("zeta", &[]), palette_toml("alpha", &[]));
        let store = PaletteStore::from_toml_str(&text).unwrap();
        assert_eq!(store.list_palette_names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn injected_map_source() {
        let mut raw = RawPalette::new();
        for role in ColorRole::ALL {
            raw.insert(role.name().to_string(), RawColor::Int(role.index() as i64));
        }
        let store = PaletteStore::from(BTreeMap::from([("mine".to_string(), raw)]));
        let palette = store.load_palette("mine").unwrap();
        assert_eq!(palette[ColorRole::YellowDim], Color::new(0, 0, 14));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = PaletteStore::from_toml_str("[broken\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn top_level_scalar_is_skipped() {
        let text = format!("version = 1\n{}", palette_toml("p", &[]));
        let store = PaletteStore::from_toml_str(&text).unwrap();
        assert_eq!(store.list_palette_names(), vec!["p"]);
        assert!(store.load_palette("p").is_ok());
        assert!(matches!(
            store.load_palette("version"),
            Err(Error::UnknownPalette(_))
        ));
    }

    #[test]
    fn builtin_set_survives_extra_top_level_key() {
        let text = format!("version = 1\n{BUILTIN_PALETTES}");
        let store = PaletteStore::from_toml_str(&text).unwrap();
        assert_eq!(
            store.list_palette_names(),
            PaletteStore::builtin().unwrap().list_palette_names()
        );
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = PaletteStore::from_path(Path::new("/nonexistent/palettes.toml")).unwrap_err();
        assert!(
            err.to_string().contains("/nonexistent/palettes.toml"),
            "expected path in error, got: {err}"
        );
    }

    #[test]
    fn from_fn_and_index_agree() {
        let palette = Palette::from_fn(|role| Color::new(role.index() as u8, 0, 0));
        for role in ColorRole::ALL {
            assert_eq!(palette[role], palette.get(role));
            assert_eq!(palette[role].r as usize, role.index());
        }
    }
}
