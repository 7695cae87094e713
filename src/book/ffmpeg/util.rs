use std::path::Path;

/// Escape a path used as a filter option value inside a filtergraph.
///
/// ffmpeg unescapes twice: once when splitting the graph into filters and
/// once when splitting a filter's options.
pub fn escape_ffmpeg_path(path: &Path) -> String {
    escape_filtergraph(&escape_filter_option(&path.to_string_lossy()))
}

fn escape_filter_option(value: &str) -> String {
    escape_chars(value, &['\\', '\'', ':'])
}

fn escape_filtergraph(value: &str) -> String {
    escape_chars(value, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quote a path for a concat demuxer `file` directive.
pub fn quote_concat_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "'\\''"))
}

/// Shortest decimal form of a filter parameter, never in exponent notation.
pub fn format_decimal(value: f64) -> String {
    format!("{value}")
}
