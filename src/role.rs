use std::fmt;
use std::str::FromStr;

/// One of the 15 color slots of the ZX Spectrum display attributes.
///
/// Declaration order is the canonical order: it drives palette storage,
/// iteration, and the tie-break when two roles share a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    Black,
    White,
    WhiteDim,
    Red,
    RedDim,
    Green,
    GreenDim,
    Blue,
    BlueDim,
    Cyan,
    CyanDim,
    Magenta,
    MagentaDim,
    Yellow,
    YellowDim,
}

impl ColorRole {
    pub const COUNT: usize = 15;

    pub const ALL: [ColorRole; Self::COUNT] = [
        ColorRole::Black,
        ColorRole::White,
        ColorRole::WhiteDim,
        ColorRole::Red,
        ColorRole::RedDim,
        ColorRole::Green,
        ColorRole::GreenDim,
        ColorRole::Blue,
        ColorRole::BlueDim,
        ColorRole::Cyan,
        ColorRole::CyanDim,
        ColorRole::Magenta,
        ColorRole::MagentaDim,
        ColorRole::Yellow,
        ColorRole::YellowDim,
    ];

    /// Position in [`ColorRole::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Configuration key, e.g. `white_dim`.
    pub fn name(self) -> &'static str {
        match self {
            ColorRole::Black => "black",
            ColorRole::White => "white",
            ColorRole::WhiteDim => "white_dim",
            ColorRole::Red => "red",
            ColorRole::RedDim => "red_dim",
            ColorRole::Green => "green",
            ColorRole::GreenDim => "green_dim",
            ColorRole::Blue => "blue",
            ColorRole::BlueDim => "blue_dim",
            ColorRole::Cyan => "cyan",
            ColorRole::CyanDim => "cyan_dim",
            ColorRole::Magenta => "magenta",
            ColorRole::MagentaDim => "magenta_dim",
            ColorRole::Yellow => "yellow",
            ColorRole::YellowDim => "yellow_dim",
        }
    }

    /// Legacy short key, e.g. `white_d`. `None` for roles without a dim suffix.
    pub fn short_name(self) -> Option<&'static str> {
        match self {
            ColorRole::WhiteDim => Some("white_d"),
            ColorRole::RedDim => Some("red_d"),
            ColorRole::GreenDim => Some("green_d"),
            ColorRole::BlueDim => Some("blue_d"),
            ColorRole::CyanDim => Some("cyan_d"),
            ColorRole::MagentaDim => Some("magenta_d"),
            ColorRole::YellowDim => Some("yellow_d"),
            _ => None,
        }
    }

    /// Short label for swatches.
    pub fn label(self) -> &'static str {
        match self {
            ColorRole::Black => "Blk",
            ColorRole::White => "Wht",
            ColorRole::WhiteDim => "wht",
            ColorRole::Red => "Red",
            ColorRole::RedDim => "red",
            ColorRole::Green => "Grn",
            ColorRole::GreenDim => "grn",
            ColorRole::Blue => "Blu",
            ColorRole::BlueDim => "blu",
            ColorRole::Cyan => "Cyn",
            ColorRole::CyanDim => "cyn",
            ColorRole::Magenta => "Mag",
            ColorRole::MagentaDim => "mag",
            ColorRole::Yellow => "Yel",
            ColorRole::YellowDim => "yel",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for ColorRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.name() == s || role.short_name() == Some(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, role) in ColorRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), i, "{role} out of place");
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = ColorRole::ALL.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ColorRole::COUNT);
    }

    #[test]
    fn parse_canonical_names() {
        for role in ColorRole::ALL {
            assert_eq!(role.name().parse::<ColorRole>(), Ok(role));
        }
    }

    #[test]
    fn parse_short_names() {
        assert_eq!("white_d".parse(), Ok(ColorRole::WhiteDim));
        assert_eq!("cyan_d".parse(), Ok(ColorRole::CyanDim));
        assert_eq!("yellow_d".parse(), Ok(ColorRole::YellowDim));
    }

    #[test]
    fn short_names_only_for_dim_roles() {
        assert_eq!(ColorRole::Black.short_name(), None);
        assert_eq!(ColorRole::Magenta.short_name(), None);
        assert_eq!(ColorRole::MagentaDim.short_name(), Some("magenta_d"));
    }

    #[test]
    fn parse_unknown() {
        let err = "orange".parse::<ColorRole>().unwrap_err();
        assert_eq!(err.to_string(), "unknown color role `orange`");
    }
}
