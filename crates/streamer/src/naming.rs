use crate::config::{CounterMode, FieldPolicy};

/// Extension of every output file, independent of the source suffix filter.
pub const OUTPUT_EXTENSION: &str = ".csv";

/// Longest field, in bytes, kept under [`FieldPolicy::Portable`]. Leaves room
/// for the prefix, counter and extension within a 255-byte filename.
pub const PORTABLE_FIELD_BYTES: usize = 200;

/// Returns the comma-separated field at `index`, or `None` when the line is too short.
pub fn extract_field(line: &str, index: usize) -> Option<&str> {
    line.split(',').nth(index)
}

pub fn sanitize_field(field: &str, policy: FieldPolicy) -> String {
    match policy {
        FieldPolicy::Verbatim => field
            .chars()
            .map(|c| if std::path::is_separator(c) || c == '\0' { '_' } else { c })
            .collect(),
        FieldPolicy::Portable => field
            .trim_end_matches(['\r', '\n'])
            .chars()
            .map(|c| {
                if c.is_ascii_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
                    '_'
                } else {
                    c
                }
            })
            .scan(0, |used, c| {
                *used += c.len_utf8();
                (*used <= PORTABLE_FIELD_BYTES).then_some(c)
            })
            .collect(),
    }
}

/// `<prefix><counter>#<field>.csv`
pub fn output_name(prefix: &str, counter: u64, field: &str) -> String {
    format!("{}{}#{}{}", prefix, counter, field, OUTPUT_EXTENSION)
}

/// Counter embedded in output names.
///
/// In [`CounterMode::Literal`] the value is reset at the start of every line,
/// so it never leaves 0. In [`CounterMode::PerFile`] it is reset once per
/// source file and grows by one per emitted line.
#[derive(Debug, Clone)]
pub struct Counter {
    mode: CounterMode,
    value: u64,
}

impl Counter {
    pub fn new(mode: CounterMode) -> Self {
        Self { mode, value: 0 }
    }

    pub fn begin_file(&mut self) {
        self.value = 0;
    }

    pub fn begin_line(&mut self) {
        if self.mode == CounterMode::Literal {
            self.value = 0;
        }
    }

    pub fn current(&self) -> u64 {
        self.value
    }

    pub fn advance(&mut self) {
        self.value += 1;
    }
}
