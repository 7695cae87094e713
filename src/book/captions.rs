use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::config::CaptionFormat;

lazy_static! {
    static ref BLANK_LINES: Regex = Regex::new(r"\n(?:[ \t]*\n)+").expect("valid regex");
    static ref NUMBER_LINE: Regex = Regex::new(r"^\d+$").expect("valid regex");
}

pub fn load_captions(path: &Path, format: CaptionFormat) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read caption file {}", path.display()))?;
    Ok(parse_captions(&contents, format))
}

/// Split caption file contents into one caption per segment.
pub fn parse_captions(contents: &str, format: CaptionFormat) -> Vec<String> {
    let normalized = contents.replace("\r\n", "\n");
    let blocks = split_blocks(&normalized);

    let format = match format {
        CaptionFormat::Auto => detect_format(&blocks),
        explicit => explicit,
    };

    match format {
        CaptionFormat::Numbered => blocks
            .iter()
            .filter_map(|block| numbered_caption(block))
            .collect(),
        _ => blocks.iter().map(|block| block.to_string()).collect(),
    }
}

fn split_blocks(contents: &str) -> Vec<&str> {
    BLANK_LINES
        .split(contents.trim())
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

fn detect_format(blocks: &[&str]) -> CaptionFormat {
    let numbered = !blocks.is_empty()
        && blocks.iter().all(|block| {
            let mut lines = block.lines();
            let first_is_number = lines
                .next()
                .is_some_and(|line| NUMBER_LINE.is_match(line.trim()));
            first_is_number && lines.next().is_some()
        });

    if numbered {
        CaptionFormat::Numbered
    } else {
        CaptionFormat::Blocks
    }
}

/// The line right after the number line; a block without one has no caption.
fn numbered_caption(block: &str) -> Option<String> {
    let mut lines = block.lines();
    let first = lines.next()?;
    if !NUMBER_LINE.is_match(first.trim()) {
        return None;
    }
    lines
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
