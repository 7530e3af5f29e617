//! Asset type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::utils::mime;

/// Kind of bundled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Js,
    Css,
}

impl AssetType {
    /// Query-string form (`js` / `css`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
        }
    }

    /// Content type used when serving or uploading the bundle.
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Js => mime::types::JAVASCRIPT,
            Self::Css => mime::types::CSS,
        }
    }

    /// File extension for published objects.
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(Self::Js),
            "css" => Ok(Self::Css),
            other => Err(AssetError::UnsupportedType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!("js".parse::<AssetType>().unwrap(), AssetType::Js);
        assert_eq!("css".parse::<AssetType>().unwrap(), AssetType::Css);
    }

    #[test]
    fn test_parse_rejects_other_types() {
        for raw in ["png", "JS", "", "javascript"] {
            let err = raw.parse::<AssetType>().unwrap_err();
            assert!(matches!(err, AssetError::UnsupportedType(t) if t == raw));
        }
    }

    #[test]
    fn test_mime() {
        assert_eq!(AssetType::Js.mime(), "application/javascript");
        assert_eq!(AssetType::Css.mime(), "text/css");
    }
}
