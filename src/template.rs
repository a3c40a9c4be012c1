//! Event-language templates.
//!
//! Every file under `Event/EventLanguages` describes one event:
//!
//! ```text
//! - Group : TaiwuVillage
//! - GroupName : 太吾村
//! - Language : CN
//! - EventGuid : 3f0c9c1e-5d2a-4f43-9b8e-0d9f1d7e2a11
//! - EventContent : 村口的老槐树下，
//! 站着一个陌生人。
//! - Option_1 : 上前搭话
//! - Option_2 :
//! -- OptionContent : 离开
//! -- OptionDesc : 什么也不做
//! ```
//!
//! Dashes give the nesting depth. Lines that are not fields continue the previous field.

use crate::{
    statics::{
        CONTENT_FIELD, IDENTIFIER_FIELD, OPTION_CONTENT_FIELD, OPTION_FIELD_PREFIX, QUALIFIED_KEY_SEPARATOR,
        TEMPLATE_FIELD_RE,
    },
    types::StringMap,
};
use regex::Captures;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("file is empty")]
    Empty,
    #[error("line {line}: expected a `- Label : value` field before any text")]
    MissingFieldStructure { line: usize },
    #[error("line {line}: nested field `{label}` has no enclosing option")]
    OrphanedField { line: usize, label: String },
    #[error("line {line}: field `{label}` is nested {depth} levels deep")]
    TooDeep { line: usize, label: String, depth: usize },
    #[error("line {line}: `{label}` has no valid option number")]
    InvalidOptionOrdinal { line: usize, label: String },
    #[error("line {line}: option {ordinal} is declared more than once")]
    DuplicateOption { line: usize, ordinal: u32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionGroup {
    pub ordinal: u32,
    pub fields: StringMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRecord {
    /// Grouping labels such as `Group`, `GroupName` and `Language`.
    pub metadata: StringMap,
    pub identifier: Option<String>,
    pub content: Option<String>,
    pub options: Vec<OptionGroup>,
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Metadata(&'a str),
    Identifier,
    Content,
    OptionField(usize, &'a str),
}

struct FieldLine<'a> {
    depth: usize,
    label: &'a str,
    value: &'a str,
}

fn parse_field_line(line: &str) -> Option<FieldLine<'_>> {
    let captures: Captures = TEMPLATE_FIELD_RE.captures(line)?;

    Some(FieldLine {
        depth: captures.get(1)?.as_str().len(),
        label: captures.get(2)?.as_str(),
        value: captures.get(3)?.as_str().trim(),
    })
}

fn append_continuation(value: &mut String, line: &str) {
    if !value.is_empty() {
        value.push('\n');
    }

    value.push_str(line);
}

impl TemplateRecord {
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        if text.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut record: TemplateRecord = TemplateRecord::default();
        let mut target: Option<Target> = None;

        for (i, raw_line) in text.lines().enumerate() {
            let line_number: usize = i + 1;
            let line: &str = raw_line.trim_end();

            if line.trim_start().is_empty() {
                continue;
            }

            let Some(field) = parse_field_line(line) else {
                let Some(target) = target else {
                    return Err(TemplateError::MissingFieldStructure { line: line_number });
                };

                append_continuation(record.value_mut(target), line);
                continue;
            };

            target = Some(match field.depth {
                1 => record.push_top_level(line_number, field.label, field.value)?,
                2 => {
                    let Some(option_index) = record.options.len().checked_sub(1) else {
                        return Err(TemplateError::OrphanedField {
                            line: line_number,
                            label: field.label.to_owned(),
                        });
                    };

                    record.options[option_index]
                        .fields
                        .insert(field.label.to_owned(), field.value.to_owned());
                    Target::OptionField(option_index, field.label)
                }
                depth => {
                    return Err(TemplateError::TooDeep {
                        line: line_number,
                        label: field.label.to_owned(),
                        depth,
                    })
                }
            });
        }

        Ok(record)
    }

    fn push_top_level<'a>(&mut self, line: usize, label: &'a str, value: &str) -> Result<Target<'a>, TemplateError> {
        if label == IDENTIFIER_FIELD {
            self.identifier = Some(value.to_owned());
            return Ok(Target::Identifier);
        }

        if label == CONTENT_FIELD {
            self.content = Some(value.to_owned());
            return Ok(Target::Content);
        }

        if let Some(ordinal) = label.strip_prefix(OPTION_FIELD_PREFIX) {
            let ordinal: u32 = match ordinal.parse::<u32>() {
                Ok(ordinal) if ordinal > 0 => ordinal,
                _ => {
                    return Err(TemplateError::InvalidOptionOrdinal {
                        line,
                        label: label.to_owned(),
                    })
                }
            };

            if self.options.iter().any(|option: &OptionGroup| option.ordinal == ordinal) {
                return Err(TemplateError::DuplicateOption { line, ordinal });
            }

            let mut option: OptionGroup = OptionGroup {
                ordinal,
                fields: StringMap::default(),
            };

            if !value.is_empty() {
                option.fields.insert(OPTION_CONTENT_FIELD.to_owned(), value.to_owned());
            }

            self.options.push(option);
            return Ok(Target::OptionField(self.options.len() - 1, OPTION_CONTENT_FIELD));
        }

        self.metadata.insert(label.to_owned(), value.to_owned());
        Ok(Target::Metadata(label))
    }

    fn value_mut(&mut self, target: Target) -> &mut String {
        match target {
            Target::Metadata(label) => self.metadata.entry(label.to_owned()).or_default(),
            Target::Identifier => self.identifier.get_or_insert_with(String::new),
            Target::Content => self.content.get_or_insert_with(String::new),
            Target::OptionField(index, label) => self.options[index].fields.entry(label.to_owned()).or_default(),
        }
    }

    /// A record with no identifier carries no text, e.g. a group file holding only metadata.
    pub fn is_stub(&self) -> bool {
        self.identifier.as_deref().map_or(true, str::is_empty)
    }

    /// `<guid>.EventGuid`, `<guid>.EventContent` when present, then `<guid>.Option_<n>.<field>`
    /// for every option field.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let Some(identifier) = self.identifier.as_deref().filter(|identifier: &&str| !identifier.is_empty()) else {
            return Vec::new();
        };

        let mut entries: Vec<(String, String)> = vec![(
            format!("{identifier}{QUALIFIED_KEY_SEPARATOR}{IDENTIFIER_FIELD}"),
            identifier.to_owned(),
        )];

        if let Some(content) = &self.content {
            entries.push((
                format!("{identifier}{QUALIFIED_KEY_SEPARATOR}{CONTENT_FIELD}"),
                content.clone(),
            ));
        }

        for option in &self.options {
            for (field, value) in &option.fields {
                entries.push((
                    format!(
                        "{identifier}{QUALIFIED_KEY_SEPARATOR}{OPTION_FIELD_PREFIX}{}{QUALIFIED_KEY_SEPARATOR}{field}",
                        option.ordinal
                    ),
                    value.clone(),
                ));
            }
        }

        entries
    }
}

#[derive(Debug, Default)]
pub struct FlattenedEvents {
    pub entries: StringMap,
    /// Qualified keys that were written more than once. The last write wins.
    pub collisions: Vec<String>,
}

impl FlattenedEvents {
    pub fn extend(&mut self, record: &TemplateRecord) {
        for (key, value) in record.flatten() {
            if self.entries.insert(key.clone(), value).is_some() {
                self.collisions.push(key);
            }
        }
    }
}

pub fn flatten_records<'a>(records: impl IntoIterator<Item = &'a TemplateRecord>) -> FlattenedEvents {
    let mut flattened: FlattenedEvents = FlattenedEvents::default();

    for record in records {
        flattened.extend(record);
    }

    flattened
}
