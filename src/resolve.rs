use crate::{
    statics::{DEFAULT_KEY_MARKER, KEY_VALUE_SEPARATOR, SECTION_DIVIDER},
    types::{StringMap, SymbolTable},
};

pub fn invalid_index_sentinel(line_index: usize) -> String {
    format!("<INVALID_INDEX_{line_index}>")
}

/// Resolves every symbolic key to its trimmed line. Keys pointing past the end of the
/// file resolve to a visible sentinel instead of failing.
pub fn resolve_indexed_lines(symbols: &SymbolTable, lines: &[String]) -> StringMap {
    symbols
        .iter()
        .map(|(key, &line_index): (&String, &usize)| {
            let value: String = match lines.get(line_index) {
                Some(line) => line.trim().to_owned(),
                None => invalid_index_sentinel(line_index),
            };

            (key.clone(), value)
        })
        .collect()
}

pub struct KeyValueResolution {
    pub table: StringMap,
    /// Lines that were neither key/value pairs nor section dividers, each ending with `\n`.
    pub residual: String,
}

pub struct KeyValueResolver<'a> {
    marker: &'a str,
    separator: char,
    divider: &'a str,
}

impl Default for KeyValueResolver<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_MARKER)
    }
}

impl<'a> KeyValueResolver<'a> {
    pub fn new(marker: &'a str) -> Self {
        Self {
            marker,
            separator: KEY_VALUE_SEPARATOR,
            divider: SECTION_DIVIDER,
        }
    }

    pub fn is_key_value_line(&self, line: &str) -> bool {
        line.contains(self.marker) && line.contains(self.separator)
    }

    fn is_divider_line(&self, line: &str) -> bool {
        line.contains(self.divider)
    }

    /// A qualifying line only enters the table when it has exactly one separator and a
    /// non-empty key; it is removed from the residual text either way.
    pub fn resolve(&self, lines: &[String]) -> KeyValueResolution {
        let mut table: StringMap = StringMap::default();
        let mut residual: String = String::new();

        for line in lines {
            if self.is_key_value_line(line) {
                let parts: Vec<&str> = line.split(self.separator).collect();

                if let [key, value] = parts.as_slice() {
                    if !key.is_empty() {
                        table.insert((*key).to_owned(), (*value).to_owned());
                    }
                }
            } else if !self.is_divider_line(line) {
                residual.push_str(line);
                residual.push('\n');
            }
        }

        KeyValueResolution { table, residual }
    }
}
