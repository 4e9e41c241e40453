// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Document renderers for [`Report`]s.
//!
//! A renderer turns the whole report into bytes in memory; [`save_report`]
//! only touches the filesystem once that has succeeded.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::errors::RenderError;
use crate::report::{Body, Report, Section, SectionKind};
use crate::utils::pretty_table;

pub trait Renderer {
    fn extension(&self) -> &'static str;
    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown format: {} (use text|json|csv)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::default()),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Csv => Box::new(CsvRenderer),
    }
}

/// Renders `report` and stores it as `<dir>/<file_stem>.<ext>`.
///
/// The bytes go to a `.partial` sibling first and are renamed into place, so
/// a failure never leaves a truncated report under the final name.
pub fn save_report(
    renderer: &dyn Renderer,
    report: &Report,
    dir: &Path,
) -> Result<PathBuf, RenderError> {
    let bytes = renderer.render(report)?;
    debug!(bytes = bytes.len(), file = %report.file_stem, "report rendered");

    fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.{}", report.file_stem, renderer.extension()));
    let partial = dir.join(format!(
        "{}.{}.partial",
        report.file_stem,
        renderer.extension()
    ));

    let written = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, &path));
    if let Err(source) = written {
        let _ = fs::remove_file(&partial);
        return Err(RenderError::Io { path, source });
    }
    info!(path = %path.display(), "report saved");
    Ok(path)
}

/// Splits blocks of lines into pages of `page_height` lines. A block starts a
/// new page when fewer than `min_space` lines are left on the current one;
/// blocks longer than the remaining space continue on the next page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub page_height: usize,
    pub min_space: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator {
            page_height: 60,
            min_space: 8,
        }
    }
}

impl Paginator {
    pub fn paginate(&self, blocks: &[Vec<String>]) -> Vec<Vec<String>> {
        let height = self.page_height.max(1);
        let mut pages: Vec<Vec<String>> = vec![Vec::new()];

        for block in blocks {
            let current = pages.len() - 1;
            let remaining = height - pages[current].len();
            if !pages[current].is_empty() && remaining < self.min_space {
                pages.push(Vec::new());
            }
            for line in block {
                if pages[pages.len() - 1].len() >= height {
                    pages.push(Vec::new());
                }
                let last = pages.len() - 1;
                pages[last].push(line.clone());
            }
        }
        pages
    }
}

/// Plain-text document: one block per section, pages separated by a form
/// feed and numbered at the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub paginator: Paginator,
}

impl TextRenderer {
    fn section_lines(section: &Section) -> Vec<String> {
        let mut lines = Vec::new();
        if !section.title.is_empty() {
            let underline = if section.kind == SectionKind::Header {
                '='
            } else {
                '-'
            };
            lines.push(section.title.clone());
            lines.push(underline.to_string().repeat(section.title.chars().count()));
        }
        match &section.body {
            Body::Lines(ls) => lines.extend(ls.iter().cloned()),
            Body::Table(t) => {
                let head: Vec<&str> = t.head.iter().map(String::as_str).collect();
                let table = pretty_table(&head, t.rows.clone());
                lines.extend(table.to_string().lines().map(str::to_string));
            }
            Body::Placeholder(p) => lines.push(format!("({})", p)),
        }
        lines.push(String::new());
        lines
    }
}

impl Renderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let blocks: Vec<Vec<String>> = report.sections.iter().map(Self::section_lines).collect();
        let pages = self.paginator.paginate(&blocks);
        let total = pages.len();

        let mut out = String::new();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                out.push('\u{c}');
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&format!("Page {} of {}\n", i + 1, total));
        }
        Ok(out.into_bytes())
    }
}

/// The report descriptor itself, for other tools to lay out.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(report)?)
    }
}

/// Tabular sections only, each introduced by a row holding its title.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for section in &report.sections {
            match &section.body {
                Body::Table(t) => {
                    wtr.write_record([section.title.as_str()])?;
                    wtr.write_record(&t.head)?;
                    for row in &t.rows {
                        wtr.write_record(row)?;
                    }
                }
                Body::Placeholder(p) => {
                    wtr.write_record([section.title.as_str(), p.as_str()])?;
                }
                Body::Lines(_) => {}
            }
        }
        wtr.into_inner()
            .map_err(|e| RenderError::Backend(e.to_string()))
    }
}
