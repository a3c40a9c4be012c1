//! Decompiled syntax trees and the services that produce them.
//!
//! Decompilation itself happens outside of this tool: a tree is either read from a JSON
//! dump or printed to stdout by an external decompiler program. Both produce the same
//! node shape:
//!
//! ```json
//! { "kind": "field_declaration", "modifiers": ["private", "static"], "children": [ ... ] }
//! { "kind": "literal", "value": "LK_Confirm" }
//! ```

use crate::types::Error;
use serde::Deserialize;
use std::{
    fmt,
    fs::read,
    path::{Path, PathBuf},
    process::{Command, Output},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    SyntaxTree,
    TypeDeclaration,
    FieldDeclaration,
    VariableInitializer,
    ObjectCreation,
    ArrayInitializer,
    Literal,
    #[serde(other)]
    Other,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::SyntaxTree => "syntax tree",
            NodeKind::TypeDeclaration => "type declaration",
            NodeKind::FieldDeclaration => "field declaration",
            NodeKind::VariableInitializer => "variable initializer",
            NodeKind::ObjectCreation => "object creation",
            NodeKind::ArrayInitializer => "array initializer",
            NodeKind::Literal => "literal",
            NodeKind::Other => "unrecognized node",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Readonly,
    Const,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub value: Option<Literal>,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn first_child_of(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|child: &&SyntaxNode| child.kind == kind)
    }
}

/// Builders for trees written by hand in tests.
#[cfg(test)]
impl SyntaxNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            modifiers: Vec::new(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn literal(value: Literal) -> Self {
        Self {
            value: Some(value),
            ..Self::new(NodeKind::Literal)
        }
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SyntaxNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Turns a compiled module into the syntax tree of one of its types.
pub trait Decompiler {
    fn decompile_type(&self, assembly: &Path, type_name: &str) -> Result<SyntaxNode, Error>;
}

/// A tree dumped to disk ahead of time. The assembly is only used by the producer of the dump.
pub struct DumpedSyntaxTree {
    path: PathBuf,
}

impl DumpedSyntaxTree {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Decompiler for DumpedSyntaxTree {
    fn decompile_type(&self, _assembly: &Path, _type_name: &str) -> Result<SyntaxNode, Error> {
        let content: Vec<u8> = read(&self.path).map_err(|err| Error::ReadFileFailed {
            file: self.path.clone(),
            err,
        })?;

        sonic_rs::from_slice(&content).map_err(|err| Error::JSONParseFailed {
            file: self.path.clone(),
            err,
        })
    }
}

/// Runs `program <assembly> <type name>` and reads the tree from its stdout.
pub struct ExternalDecompiler {
    program: PathBuf,
}

impl ExternalDecompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Decompiler for ExternalDecompiler {
    fn decompile_type(&self, assembly: &Path, type_name: &str) -> Result<SyntaxNode, Error> {
        let output: Output = Command::new(&self.program)
            .arg(assembly)
            .arg(type_name)
            .output()
            .map_err(|err| Error::DecompilerFailed {
                program: self.program.clone(),
                err,
            })?;

        if !output.status.success() {
            return Err(Error::DecompilerExited {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        sonic_rs::from_slice(&output.stdout).map_err(|err| Error::JSONParseFailed {
            file: self.program.clone(),
            err,
        })
    }
}
