use anyhow::Result;
use crossterm::style::{Color, Stylize};

use crate::identify::MagikaResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path: description (group)`
    Text,
    /// `path: label`
    Label,
    Json,
    JsonLines,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub output_score: bool,
    pub colors: bool,
}

/// Render all results at once; JSON output is a single array.
pub fn render_all(
    results: &[MagikaResult],
    opts: RenderOptions,
) -> Result<String> {
    if opts.format == OutputFormat::Json {
        let mut s = serde_json::to_string_pretty(results)?;
        s.push('\n');
        return Ok(s);
    }
    let mut out = String::new();
    for r in results {
        out.push_str(&render_line(r, opts)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn render_line(
    result: &MagikaResult,
    opts: RenderOptions,
) -> Result<String> {
    let line = match opts.format {
        OutputFormat::Json | OutputFormat::JsonLines => return Ok(serde_json::to_string(result)?),
        OutputFormat::Label => format!("{}: {}", result.path, result.output.ct_label),
        OutputFormat::Text => format!(
            "{}: {} ({})",
            result.path, result.output.description, result.output.group
        ),
    };
    let line = if opts.output_score {
        format!("{line} {}%", (result.output.score * 100.0).round() as u32)
    } else {
        line
    };
    if opts.colors {
        Ok(line.with(group_color(&result.output.group)).to_string())
    } else {
        Ok(line)
    }
}

fn group_color(group: &str) -> Color {
    match group {
        "document" => Color::Magenta,
        "executable" => Color::Red,
        "archive" => Color::DarkRed,
        "audio" | "video" => Color::DarkYellow,
        "image" => Color::Yellow,
        "code" => Color::Cyan,
        "text" => Color::Green,
        "inode" => Color::Blue,
        _ => Color::Grey,
    }
}
