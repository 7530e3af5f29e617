//! Script registry: collects script and stylesheet URLs while a page renders
//! and replaces runs of local files with bundle URLs when tags are emitted.
//!
//! Scripts are bucketed by [`Position`]; stylesheets keep registration order
//! and are bundled per run of identical media. A URL that does not map to a
//! local file (a CDN library, say) closes the current bundle and is emitted
//! unchanged, so the relative order of everything on the page is kept.

mod position;
mod resolver;

pub use position::Position;
pub use resolver::UrlResolver;

use std::mem;
use std::sync::Arc;

use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use crate::asset::AssetType;
use crate::bundler::Bundler;
use crate::config::BundleConfig;
use crate::debug;
use crate::error::Result;
use crate::group::FileSet;
use crate::utils::html::escape_attr;

pub struct ScriptRegistry {
    bundler: Arc<Bundler>,
    resolver: UrlResolver,
    minify: bool,
    scripts: FxHashMap<Position, Vec<String>>,
    css: Vec<(String, String)>,
}

impl ScriptRegistry {
    pub fn new(bundler: Arc<Bundler>, resolver: UrlResolver) -> Self {
        Self {
            bundler,
            resolver,
            minify: true,
            scripts: FxHashMap::default(),
            css: Vec::new(),
        }
    }

    /// Registry for one page, resolving URLs through `[roots]` and
    /// bundling only when `build.minify` is set.
    pub fn from_config(bundler: Arc<Bundler>, config: &BundleConfig) -> Self {
        Self::new(bundler, UrlResolver::from_config(&config.roots)).with_minify(config.build.minify)
    }

    /// With `false`, registered URLs are emitted as-is.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Register a script file. [`Position::Css`] is treated as the head.
    pub fn register_script(&mut self, url: impl Into<String>, pos: Position) -> &mut Self {
        let pos = if pos == Position::Css { Position::Head } else { pos };
        let url = url.into();
        let bucket = self.scripts.entry(pos).or_default();
        if !bucket.contains(&url) {
            bucket.push(url);
        }
        self
    }

    /// Register a stylesheet for `media` (empty for all media).
    ///
    /// Registering a known URL again keeps its place and replaces its media.
    pub fn register_css(&mut self, url: impl Into<String>, media: impl Into<String>) -> &mut Self {
        let url = url.into();
        let media = media.into();
        match self.css.iter_mut().find(|(u, _)| *u == url) {
            Some((_, existing)) => *existing = media,
            None => self.css.push((url, media)),
        }
        self
    }

    /// Register every `.js` file directly inside the directory at `dir_url`,
    /// in file name order. Returns the number of scripts registered.
    pub fn register_script_directory(&mut self, dir_url: &str, pos: Position) -> usize {
        let Some(dir) = self.resolver.path_for(dir_url).filter(|p| p.is_dir()) else {
            debug!("registry"; "script directory {} not found", dir_url);
            return 0;
        };

        let mut names: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_owned))
            .filter(|name| {
                std::path::Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
            })
            .collect();
        names.sort();

        let base = dir_url.trim_end_matches('/');
        for name in &names {
            self.register_script(format!("{base}/{name}"), pos);
        }
        names.len()
    }

    /// Stylesheet links followed by head scripts.
    pub fn render_head(&mut self) -> Result<String> {
        let mut html = String::new();
        for (url, media) in self.flush_css()? {
            html.push_str(&css_tag(&url, &media));
            html.push('\n');
        }
        html.push_str(&self.render_scripts(Position::Head)?);
        Ok(html)
    }

    pub fn render_body_begin(&mut self) -> Result<String> {
        self.render_scripts(Position::Begin)
    }

    pub fn render_body_end(&mut self) -> Result<String> {
        self.render_scripts(Position::End)
    }

    fn render_scripts(&mut self, pos: Position) -> Result<String> {
        let urls = self.scripts.remove(&pos).unwrap_or_default();
        let urls = self.bundle(urls, AssetType::Js, pos)?;
        Ok(urls.iter().map(|url| script_tag(url) + "\n").collect())
    }

    fn flush_css(&mut self) -> Result<Vec<(String, String)>> {
        let mut runs: Vec<(String, Vec<String>)> = Vec::new();
        for (url, media) in mem::take(&mut self.css) {
            match runs.last_mut() {
                Some((last, urls)) if *last == media => urls.push(url),
                _ => runs.push((media, vec![url])),
            }
        }

        let mut out = Vec::new();
        for (media, urls) in runs {
            for url in self.bundle(urls, AssetType::Css, Position::Css)? {
                out.push((url, media.clone()));
            }
        }
        Ok(out)
    }

    /// Replace consecutive local URLs with bundle URLs.
    fn bundle(&self, urls: Vec<String>, ty: AssetType, pos: Position) -> Result<Vec<String>> {
        if !self.minify {
            return Ok(urls);
        }

        let mut out = Vec::new();
        let mut pending = FileSet::default();
        for url in urls {
            match self.resolver.path_for(&url) {
                Some(path) => pending.push(path),
                None => {
                    if !pending.is_empty() {
                        out.push(self.bundler.create_group(mem::take(&mut pending), ty, pos)?);
                    }
                    out.push(url);
                }
            }
        }
        if !pending.is_empty() {
            out.push(self.bundler.create_group(pending, ty, pos)?);
        }
        Ok(out)
    }
}

fn script_tag(url: &str) -> String {
    format!(r#"<script type="text/javascript" src="{}"></script>"#, escape_attr(url))
}

fn css_tag(url: &str, media: &str) -> String {
    if media.is_empty() {
        format!(r#"<link rel="stylesheet" type="text/css" href="{}" />"#, escape_attr(url))
    } else {
        format!(
            r#"<link rel="stylesheet" type="text/css" href="{}" media="{}" />"#,
            escape_attr(url),
            escape_attr(media)
        )
    }
}
