use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a bundle is placed in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Head,
    Begin,
    #[default]
    End,
    /// Stylesheets (always rendered in the head)
    Css,
}

impl Position {
    pub const fn index(self) -> u8 {
        match self {
            Self::Head => 0,
            Self::Begin => 1,
            Self::End => 2,
            Self::Css => 5,
        }
    }

    /// Tag used in remote object names, e.g. `scriptpos2`.
    pub fn tag(self) -> String {
        format!("scriptpos{}", self.index())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Head => "head",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Css => "css",
        })
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "head" => Ok(Self::Head),
            "begin" => Ok(Self::Begin),
            "end" => Ok(Self::End),
            "css" => Ok(Self::Css),
            _ => Err(format!("unknown position `{s}` (expected head, begin, end or css)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Position::Head.tag(), "scriptpos0");
        assert_eq!(Position::Begin.tag(), "scriptpos1");
        assert_eq!(Position::End.tag(), "scriptpos2");
        assert_eq!(Position::Css.tag(), "scriptpos5");
    }

    #[test]
    fn test_parse() {
        assert_eq!("HEAD".parse::<Position>().unwrap(), Position::Head);
        assert!("footer".parse::<Position>().is_err());
    }
}
