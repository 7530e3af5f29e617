//! `[groups]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [groups]
//! dir = ".vasset/groups"   # Where group records are stored
//! prefix = "vasset"        # Namespaces group ids between applications
//! controller = "asset"     # Route of the asset endpoint
//! base_url = "/"           # Prefix of generated local URLs
//! ```

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Group records and local URL generation.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "groups")]
pub struct GroupsConfig {
    /// Directory holding one record per group (relative to the config file).
    pub dir: PathBuf,

    /// Group id prefix.
    #[config(inline_doc = "Group id prefix.")]
    pub prefix: String,

    /// Route segment of the endpoint: `{base_url}{controller}/index`.
    pub controller: String,

    /// Prefix of generated local URLs.
    pub base_url: String,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            dir: ".vasset/groups".into(),
            prefix: "vasset".into(),
            controller: "asset".into(),
            base_url: "/".into(),
        }
    }
}

impl GroupsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let controller = self.controller.trim_matches('/');
        if controller.is_empty() {
            diag.error(Self::FIELDS.controller, "must not be empty");
        } else if controller.contains(['?', '#']) {
            diag.error(Self::FIELDS.controller, "must be a plain path segment");
        }

        if !self.base_url.ends_with('/') {
            diag.error_with_hint(
                Self::FIELDS.base_url,
                "must end with `/`",
                format!("base_url = \"{}/\"", self.base_url),
            );
        }
    }

    /// Endpoint path relative to the origin, e.g. `/asset/index`.
    pub fn endpoint_path(&self) -> String {
        let base = url::Url::parse(&self.base_url)
            .map(|u| u.path().to_owned())
            .unwrap_or_else(|_| self.base_url.clone());
        format!("{base}{}/index", self.controller.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_groups_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.groups.prefix, "vasset");
        assert_eq!(config.groups.controller, "asset");
        assert_eq!(config.groups.endpoint_path(), "/asset/index");
    }

    #[test]
    fn test_endpoint_path_from_absolute_base() {
        let config = test_parse_config(
            "[groups]\nbase_url = \"https://example.com/app/\"\ncontroller = \"min\"",
        );
        assert_eq!(config.groups.endpoint_path(), "/app/min/index");
    }

    #[test]
    fn test_groups_validation() {
        let config = test_parse_config("[groups]\ncontroller = \"\"\nbase_url = \"/app\"");
        let mut diag = ConfigDiagnostics::new();
        config.groups.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
