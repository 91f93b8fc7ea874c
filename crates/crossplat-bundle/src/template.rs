//! File-name templates.
//!
//! Templates substitute `{NAME}`, `{GOOS}`, `{GOARCH}`, `{EXT}` and `{ZIP}`.
//! `{{` and `}}` produce literal braces. Anything else inside braces is a
//! parse error, so a typo never silently renders as an empty string.

use std::fmt;
use std::str::FromStr;

use crossplat_core::PlatformPair;

use crate::error::{BundleError, Result};

/// Default template for the binary stored inside each archive.
pub const DEFAULT_BINARY_TEMPLATE: &str = "{NAME}{EXT}";
/// Default template for the archive file name.
pub const DEFAULT_ARCHIVE_TEMPLATE: &str = "{NAME}_{GOOS}_{GOARCH}{ZIP}";
/// Default pattern of archives removed by a clean.
pub const DEFAULT_CLEAN_GLOB: &str = "*.zip";
/// Executable extension for windows targets.
pub const WINDOWS_EXE_EXT: &str = ".exe";
/// Archive extension.
pub const ARCHIVE_EXT: &str = ".zip";

/// A substitution variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Os,
    Arch,
    Ext,
    Zip,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Placeholder::Name,
        Placeholder::Os,
        Placeholder::Arch,
        Placeholder::Ext,
        Placeholder::Zip,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Placeholder::Name => "NAME",
            Placeholder::Os => "GOOS",
            Placeholder::Arch => "GOARCH",
            Placeholder::Ext => "EXT",
            Placeholder::Zip => "ZIP",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Values substituted for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub os: &'a str,
    pub arch: &'a str,
    pub ext: &'static str,
    pub zip: &'static str,
}

impl<'a> TemplateVars<'a> {
    pub fn for_pair(name: &'a str, pair: &'a PlatformPair) -> Self {
        let ext = if pair.os == "windows" {
            WINDOWS_EXE_EXT
        } else {
            ""
        };
        Self {
            name,
            os: &pair.os,
            arch: &pair.arch,
            ext,
            zip: ARCHIVE_EXT,
        }
    }

    fn value(&self, p: Placeholder) -> &str {
        match p {
            Placeholder::Name => self.name,
            Placeholder::Os => self.os,
            Placeholder::Arch => self.arch,
            Placeholder::Ext => self.ext,
            Placeholder::Zip => self.zip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(Placeholder),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let err = |position: usize, detail: String| BundleError::Template {
            template: source.to_string(),
            position,
            detail,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(err(i, "unmatched '}'".into())),
                '{' => {
                    let rest = &source[i + 1..];
                    let end = rest
                        .find('}')
                        .ok_or_else(|| err(i, "unclosed '{'".into()))?;
                    let key = &rest[..end];
                    let placeholder = Placeholder::from_key(key).ok_or_else(|| {
                        err(
                            i,
                            format!(
                                "unknown placeholder '{key}' (expected one of NAME, GOOS, GOARCH, EXT, ZIP)"
                            ),
                        )
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Var(placeholder));
                    // Skip the key and its closing brace.
                    for _ in 0..key.chars().count() + 1 {
                        chars.next();
                    }
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the template references a placeholder.
    pub fn uses(&self, p: Placeholder) -> bool {
        self.segments.contains(&Segment::Var(p))
    }

    pub fn render(&self, vars: &TemplateVars<'_>) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Var(p) => out.push_str(vars.value(*p)),
            }
        }
        out
    }

    /// Render and check the result is a plain, non-empty file name.
    pub fn render_file_name(&self, vars: &TemplateVars<'_>) -> Result<String> {
        let rendered = self.render(vars);
        let problem = if rendered.trim().is_empty() {
            Some("name is empty")
        } else if rendered.contains(['/', '\\']) {
            Some("name contains a path separator")
        } else if rendered == "." || rendered == ".." {
            Some("name is a relative directory")
        } else {
            None
        };
        match problem {
            Some(detail) => Err(BundleError::InvalidName {
                template: self.source.clone(),
                rendered,
                detail: detail.to_string(),
            }),
            None => Ok(rendered),
        }
    }
}

impl FromStr for Template {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        Template::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Names produced for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNames {
    /// Archive member name of the binary.
    pub binary: String,
    /// Archive file name.
    pub archive: String,
}

/// The binary and archive templates of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    binary: Template,
    archive: Template,
}

impl Renderer {
    pub fn new(binary_template: &str, archive_template: &str) -> Result<Self> {
        Ok(Self {
            binary: Template::parse(binary_template)?,
            archive: Template::parse(archive_template)?,
        })
    }

    pub fn binary_template(&self) -> &Template {
        &self.binary
    }

    pub fn archive_template(&self) -> &Template {
        &self.archive
    }

    pub fn render(&self, name: &str, pair: &PlatformPair) -> Result<RenderedNames> {
        let vars = TemplateVars::for_pair(name, pair);
        Ok(RenderedNames {
            binary: self.binary.render_file_name(&vars)?,
            archive: self.archive.render_file_name(&vars)?,
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            binary: Template {
                source: DEFAULT_BINARY_TEMPLATE.to_string(),
                segments: vec![Segment::Var(Placeholder::Name), Segment::Var(Placeholder::Ext)],
            },
            archive: Template {
                source: DEFAULT_ARCHIVE_TEMPLATE.to_string(),
                segments: vec![
                    Segment::Var(Placeholder::Name),
                    Segment::Literal("_".into()),
                    Segment::Var(Placeholder::Os),
                    Segment::Literal("_".into()),
                    Segment::Var(Placeholder::Arch),
                    Segment::Var(Placeholder::Zip),
                ],
            },
        }
    }
}
