use crate::ui::prelude::{Level, emit};

#[derive(Debug, Clone)]
pub(crate) struct ReportLine {
    pub(crate) level: Level,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    pub(crate) data: Option<serde_json::Value>,
}

impl ReportLine {
    pub(crate) fn new(level: Level, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
            data: None,
        }
    }

    pub(crate) fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

pub(crate) fn emit_report(lines: &[ReportLine]) {
    for line in lines {
        emit(line.level, line.code, &line.message, line.data.clone());
    }
}

/// Human-readable durations: `MM:SS`, or `HH:MM:SS` from one hour on.
pub(crate) fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds.round().max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
