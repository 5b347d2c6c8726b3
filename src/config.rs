// MFont
// copyright zipxing@hotmail.com 2022～2025

//! Build jobs.
//!
//! A [`Job`] holds everything one font build needs: input font and
//! character set, atlas size, per-size settings and output paths. Jobs come
//! from the command line or from a TOML file:
//!
//! ```toml
//! font = "fonts/main.ttf"
//! charset = "charset.txt"
//! icons = "icons"
//! atlas = { width = 2048, height = 2048 }
//!
//! [output]
//! glyph_table = "out/font.buct"
//! font_descriptor = "out/font_{}.bfont"
//! texture = "out/font.bctex"
//!
//! [pack]
//! algorithm = "skyline"
//!
//! [[size]]
//! size = 24
//! filter = "filters/24.txt"
//! icons = true
//! ```
//!
//! Relative paths in a job file are taken relative to the file itself.

use crate::error::{FontError, Result};
use crate::font::FontCollection;
use crate::format::OutputPaths;
use crate::icon::IconRegistry;
use crate::pack::PackOptions;
use crate::util::read_char_file;
use log::info;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings of one registered size
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizeSpec {
    pub size: u32,
    /// character file limiting the glyphs rendered at this size
    pub filter: Option<PathBuf>,
    /// TTF used instead of the job's main font
    pub font: Option<PathBuf>,
    pub icons: bool,
}

impl SizeSpec {
    pub fn new(size: u32) -> Self {
        SizeSpec {
            size,
            ..Default::default()
        }
    }
}

fn parse_size(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .map_err(|_| FontError::Config(format!("invalid font size '{}'", s)))
}

/// `SIZE`, `SIZE=` or `SIZE=FILTER`; an empty filter path means no filter
impl FromStr for SizeSpec {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        let (size, filter) = match s.split_once('=') {
            Some((size, path)) => (size, Some(path).filter(|p| !p.is_empty())),
            None => (s, None),
        };
        Ok(SizeSpec {
            filter: filter.map(PathBuf::from),
            ..SizeSpec::new(parse_size(size)?)
        })
    }
}

/// Parse a `SIZE=PATH` pair, the path must not be empty
pub fn parse_size_path(s: &str) -> Result<(u32, PathBuf)> {
    match s.split_once('=') {
        Some((size, path)) if !path.is_empty() => Ok((parse_size(size)?, PathBuf::from(path))),
        _ => Err(FontError::Config(format!("expected SIZE=PATH, got '{}'", s))),
    }
}

/// Everything needed to produce one font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub font: PathBuf,
    pub charset: PathBuf,
    pub icon_dir: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub sizes: Vec<SizeSpec>,
    pub output: OutputPaths,
    pub options: PackOptions,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    font: PathBuf,
    charset: PathBuf,
    #[serde(default)]
    icons: Option<PathBuf>,
    atlas: AtlasFile,
    output: OutputFile,
    #[serde(default)]
    pack: PackOptions,
    #[serde(default, rename = "size")]
    sizes: Vec<SizeFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtlasFile {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    glyph_table: PathBuf,
    font_descriptor: String,
    texture: PathBuf,
    glyph_table_in_game: Option<String>,
    texture_in_game: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SizeFile {
    size: u32,
    filter: Option<PathBuf>,
    font: Option<PathBuf>,
    #[serde(default)]
    icons: bool,
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Read a filter file; an empty file yields `None`, same as no filter
pub fn read_filter(path: &Path) -> Result<Option<BTreeSet<char>>> {
    let chars: BTreeSet<char> = read_char_file(path)?.into_iter().collect();
    Ok(Some(chars).filter(|c| !c.is_empty()))
}

impl Job {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FontError::Config(format!("{}: {}", path.display(), e)))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base)
    }

    /// Parse a job, resolving relative paths against `base`
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self> {
        let file: JobFile =
            toml::from_str(text).map_err(|e| FontError::Config(e.to_string()))?;

        let descriptor = resolve(base, PathBuf::from(&file.output.font_descriptor));
        let mut output = OutputPaths::new(
            resolve(base, file.output.glyph_table),
            &descriptor.to_string_lossy(),
            resolve(base, file.output.texture),
        );
        output.glyph_table_in_game = file.output.glyph_table_in_game;
        output.texture_in_game = file.output.texture_in_game;

        let sizes = file
            .sizes
            .into_iter()
            .map(|s| SizeSpec {
                size: s.size,
                filter: s.filter.map(|p| resolve(base, p)),
                font: s.font.map(|p| resolve(base, p)),
                icons: s.icons,
            })
            .collect();

        Ok(Job {
            font: resolve(base, file.font),
            charset: resolve(base, file.charset),
            icon_dir: file.icons.map(|p| resolve(base, p)),
            width: file.atlas.width,
            height: file.atlas.height,
            sizes,
            output,
            options: file.pack,
        })
    }

    fn check(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(FontError::Config("no font size registered".to_string()));
        }
        if self.icon_dir.is_none() {
            if let Some(s) = self.sizes.iter().find(|s| s.icons) {
                return Err(FontError::Config(format!(
                    "size {} uses icons but no icon directory is set",
                    s.size
                )));
            }
        }
        Ok(())
    }

    /// Load icons, register the sizes and add the character set
    pub fn build_collection(&self) -> Result<FontCollection> {
        self.check()?;
        let mut fc =
            FontCollection::new(&self.font, self.width, self.height).with_options(self.options);

        if let Some(dir) = &self.icon_dir {
            fc.set_icons(IconRegistry::load(dir)?);
        }
        for spec in &self.sizes {
            let filter = match &spec.filter {
                Some(path) => read_filter(path)?,
                None => None,
            };
            fc.register_size(spec.size, filter, spec.font.as_deref(), spec.icons)?;
        }

        let chars = read_char_file(&self.charset)?;
        let added = fc.add_characters(chars)?;
        info!("{} characters from {}", added, self.charset.display());
        Ok(fc)
    }

    /// Build and write all artifacts
    pub fn run(&self) -> Result<FontCollection> {
        let mut fc = self.build_collection()?;
        fc.save(&self.output)?;
        Ok(fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{IconPolicy, PackAlgorithm, PackOrder};

    const JOB: &str = r#"
font = "fonts/main.ttf"
charset = "charset.txt"
icons = "/abs/icons"
atlas = { width = 1024, height = 512 }

[output]
glyph_table = "out/font.buct"
font_descriptor = "out/font_{}.bfont"
texture = "out/font.bctex"
texture_in_game = "system/fonts/font.bctex"

[pack]
algorithm = "max-rects"
icon-policy = "always"

[[size]]
size = 24
filter = "filters/24.txt"
icons = true

[[size]]
size = 16
font = "fonts/small.ttf"
"#;

    #[test]
    fn test_parse_job_file() {
        let job = Job::from_toml_str(JOB, Path::new("/work")).unwrap();
        assert_eq!(job.font, PathBuf::from("/work/fonts/main.ttf"));
        assert_eq!(job.charset, PathBuf::from("/work/charset.txt"));
        assert_eq!(job.icon_dir, Some(PathBuf::from("/abs/icons")));
        assert_eq!((job.width, job.height), (1024, 512));
        assert_eq!(job.output.descriptor_path(24), PathBuf::from("/work/out/font_24.bfont"));
        assert_eq!(job.output.texture_ref(), "system/fonts/font.bctex");
        assert_eq!(job.output.glyph_table_ref(), "/work/out/font.buct");
        assert_eq!(job.options.algorithm, PackAlgorithm::MaxRects);
        assert_eq!(job.options.order, PackOrder::DescendingArea);
        assert_eq!(job.options.icon_policy, IconPolicy::Always);
        assert_eq!(job.sizes.len(), 2);
        assert_eq!(job.sizes[0].filter, Some(PathBuf::from("/work/filters/24.txt")));
        assert!(job.sizes[0].icons);
        assert_eq!(job.sizes[1].font, Some(PathBuf::from("/work/fonts/small.ttf")));
        assert!(!job.sizes[1].icons);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = JOB.replace("charset =", "charsets =");
        assert!(matches!(
            Job::from_toml_str(&text, Path::new("")),
            Err(FontError::Config(_))
        ));
    }

    #[test]
    fn test_icons_need_icon_dir() {
        let text = JOB.replace("icons = \"/abs/icons\"\n", "");
        let job = Job::from_toml_str(&text, Path::new("")).unwrap();
        match job.build_collection() {
            Err(FontError::Config(msg)) => assert!(msg.contains("size 24")),
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_size_spec() {
        let s: SizeSpec = "16=filters/16.txt".parse().unwrap();
        assert_eq!((s.size, s.filter), (16, Some(PathBuf::from("filters/16.txt"))));
        let s: SizeSpec = "20=".parse().unwrap();
        assert_eq!((s.size, s.filter), (20, None));
        let s: SizeSpec = "12".parse().unwrap();
        assert_eq!((s.size, s.filter), (12, None));
        assert!("x=foo".parse::<SizeSpec>().is_err());
    }

    #[test]
    fn test_size_path() {
        assert_eq!(
            parse_size_path("24=alt.ttf").unwrap(),
            (24, PathBuf::from("alt.ttf"))
        );
        assert!(parse_size_path("24=").is_err());
        assert!(parse_size_path("alt.ttf").is_err());
    }

    #[test]
    fn test_empty_filter_file_is_no_filter() {
        let dir = std::env::temp_dir().join(format!("mfont_filter_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let empty = dir.join("empty.txt");
        std::fs::write(&empty, [0xFF, 0xFE, b'\n', 0]).unwrap();
        assert_eq!(read_filter(&empty).unwrap(), None);

        let some = dir.join("some.txt");
        std::fs::write(&some, [0xFF, 0xFE, b'B', 0, b'A', 0, b'B', 0]).unwrap();
        let f = read_filter(&some).unwrap().unwrap();
        assert_eq!(f.into_iter().collect::<String>(), "AB");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
