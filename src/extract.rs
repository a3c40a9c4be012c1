use crate::{
    syntax::{Literal, Modifier, NodeKind, SyntaxNode},
    types::SymbolTable,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("expected a {expected} under the {parent}")]
    MissingNode { parent: NodeKind, expected: NodeKind },
    #[error("the type declaration has no private field")]
    MissingPrivateField,
    #[error("entry {index}: expected a two-element array initializer, found a {found} with {children} children")]
    InvalidEntry {
        index: usize,
        found: NodeKind,
        children: usize,
    },
    #[error("entry {index}: key must be a string literal, found {found:?}")]
    InvalidKey { index: usize, found: Option<Literal> },
    #[error("entry {index}: line index must be a non-negative integer literal, found {found:?}")]
    InvalidLineIndex { index: usize, found: Option<Literal> },
}

fn child_of(parent: &SyntaxNode, expected: NodeKind) -> Result<&SyntaxNode, ExtractError> {
    parent.first_child_of(expected).ok_or(ExtractError::MissingNode {
        parent: parent.kind,
        expected,
    })
}

fn literal_of(node: &SyntaxNode) -> Option<&Literal> {
    if node.kind == NodeKind::Literal {
        node.value.as_ref()
    } else {
        None
    }
}

fn parse_entry(index: usize, entry: &SyntaxNode) -> Result<(String, usize), ExtractError> {
    let (key_node, value_node) = match (entry.kind, entry.children.as_slice()) {
        (NodeKind::ArrayInitializer, [key_node, value_node]) => (key_node, value_node),
        _ => {
            return Err(ExtractError::InvalidEntry {
                index,
                found: entry.kind,
                children: entry.children.len(),
            })
        }
    };

    let key: String = match literal_of(key_node) {
        Some(Literal::String(key)) => key.clone(),
        _ => {
            return Err(ExtractError::InvalidKey {
                index,
                found: key_node.value.clone(),
            })
        }
    };

    let line_index: usize = match literal_of(value_node) {
        Some(Literal::Integer(value)) => usize::try_from(*value).map_err(|_| ExtractError::InvalidLineIndex {
            index,
            found: value_node.value.clone(),
        })?,
        _ => {
            return Err(ExtractError::InvalidLineIndex {
                index,
                found: value_node.value.clone(),
            })
        }
    };

    Ok((key, line_index))
}

/// Rebuilds the language key table from the decompiled `LanguageKey` type.
///
/// The type holds a single private field initialized as
/// `new Dictionary<string, int> { { "LK_Foo", 0 }, { "LK_Bar", 1 }, ... }`, which the
/// decompiler renders as an object creation wrapping an array initializer of pairs.
/// Anything else means the game build is not one this tool understands, so every
/// mismatch is an error rather than a skipped entry.
///
/// Duplicate keys keep their first position and take the last value.
pub fn extract_symbol_table(tree: &SyntaxNode) -> Result<SymbolTable, ExtractError> {
    let type_declaration: &SyntaxNode = child_of(tree, NodeKind::TypeDeclaration)?;

    let field: &SyntaxNode = type_declaration
        .children
        .iter()
        .find(|node: &&SyntaxNode| node.kind == NodeKind::FieldDeclaration && node.has_modifier(Modifier::Private))
        .ok_or(ExtractError::MissingPrivateField)?;

    let initializer: &SyntaxNode = child_of(field, NodeKind::VariableInitializer)?;
    let creation: &SyntaxNode = child_of(initializer, NodeKind::ObjectCreation)?;
    let entries: &SyntaxNode = child_of(creation, NodeKind::ArrayInitializer)?;

    let mut symbols: SymbolTable = SymbolTable::default();

    for (index, entry) in entries.children.iter().enumerate() {
        let (key, line_index) = parse_entry(index, entry)?;
        symbols.insert(key, line_index);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(value: &str) -> SyntaxNode {
        SyntaxNode::literal(Literal::String(value.to_owned()))
    }

    fn integer(value: i64) -> SyntaxNode {
        SyntaxNode::literal(Literal::Integer(value))
    }

    fn pair(key: SyntaxNode, value: SyntaxNode) -> SyntaxNode {
        SyntaxNode::new(NodeKind::ArrayInitializer).with_children([key, value])
    }

    fn language_key_tree(entries: Vec<SyntaxNode>) -> SyntaxNode {
        let creation = SyntaxNode::new(NodeKind::ObjectCreation).with_children([
            SyntaxNode::new(NodeKind::Other),
            SyntaxNode::new(NodeKind::ArrayInitializer).with_children(entries),
        ]);
        let initializer = SyntaxNode::new(NodeKind::VariableInitializer).with_children([creation]);

        let public_field = SyntaxNode::new(NodeKind::FieldDeclaration).with_modifiers([Modifier::Public, Modifier::Const]);
        let private_field = SyntaxNode::new(NodeKind::FieldDeclaration)
            .with_modifiers([Modifier::Private, Modifier::Static, Modifier::Readonly])
            .with_children([SyntaxNode::new(NodeKind::Other), initializer]);

        let type_declaration = SyntaxNode::new(NodeKind::TypeDeclaration)
            .with_modifiers([Modifier::Public])
            .with_children([public_field, private_field]);

        SyntaxNode::new(NodeKind::SyntaxTree).with_children([SyntaxNode::new(NodeKind::Other), type_declaration])
    }

    #[test]
    fn one_entry_per_pair() {
        let tree = language_key_tree(vec![
            pair(string("LK_Confirm"), integer(0)),
            pair(string("LK_Cancel"), integer(1)),
            pair(string("LK_Taiwu"), integer(1024)),
        ]);

        let symbols = extract_symbol_table(&tree).unwrap();

        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            vec![
                (String::from("LK_Confirm"), 0),
                (String::from("LK_Cancel"), 1),
                (String::from("LK_Taiwu"), 1024),
            ]
        );
    }

    #[test]
    fn later_duplicate_overwrites_in_place() {
        let tree = language_key_tree(vec![
            pair(string("LK_Confirm"), integer(0)),
            pair(string("LK_Cancel"), integer(1)),
            pair(string("LK_Confirm"), integer(7)),
        ]);

        let symbols = extract_symbol_table(&tree).unwrap();

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols.get_index(0), Some((&String::from("LK_Confirm"), &7)));
        assert_eq!(symbols["LK_Cancel"], 1);
    }

    #[test]
    fn empty_array_gives_empty_table() {
        let symbols = extract_symbol_table(&language_key_tree(Vec::new())).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn missing_type_declaration() {
        let tree = SyntaxNode::new(NodeKind::SyntaxTree).with_children([SyntaxNode::new(NodeKind::Other)]);

        assert_eq!(
            extract_symbol_table(&tree),
            Err(ExtractError::MissingNode {
                parent: NodeKind::SyntaxTree,
                expected: NodeKind::TypeDeclaration,
            })
        );
    }

    #[test]
    fn public_fields_are_skipped() {
        let type_declaration = SyntaxNode::new(NodeKind::TypeDeclaration)
            .with_children([SyntaxNode::new(NodeKind::FieldDeclaration).with_modifiers([Modifier::Public])]);
        let tree = SyntaxNode::new(NodeKind::SyntaxTree).with_children([type_declaration]);

        assert_eq!(extract_symbol_table(&tree), Err(ExtractError::MissingPrivateField));
    }

    #[test]
    fn field_without_object_creation() {
        let initializer = SyntaxNode::new(NodeKind::VariableInitializer).with_children([integer(3)]);
        let field = SyntaxNode::new(NodeKind::FieldDeclaration)
            .with_modifiers([Modifier::Private])
            .with_children([initializer]);
        let tree = SyntaxNode::new(NodeKind::SyntaxTree)
            .with_children([SyntaxNode::new(NodeKind::TypeDeclaration).with_children([field])]);

        assert_eq!(
            extract_symbol_table(&tree),
            Err(ExtractError::MissingNode {
                parent: NodeKind::VariableInitializer,
                expected: NodeKind::ObjectCreation,
            })
        );
    }

    #[test]
    fn entry_must_be_a_pair() {
        let tree = language_key_tree(vec![
            pair(string("LK_Confirm"), integer(0)),
            SyntaxNode::new(NodeKind::ArrayInitializer).with_children([string("LK_Cancel")]),
        ]);

        assert_eq!(
            extract_symbol_table(&tree),
            Err(ExtractError::InvalidEntry {
                index: 1,
                found: NodeKind::ArrayInitializer,
                children: 1,
            })
        );

        let tree = language_key_tree(vec![SyntaxNode::new(NodeKind::Other).with_children([string("LK_A"), integer(0)])]);
        assert!(matches!(
            extract_symbol_table(&tree),
            Err(ExtractError::InvalidEntry { index: 0, found: NodeKind::Other, .. })
        ));
    }

    #[test]
    fn key_must_be_string_literal() {
        let tree = language_key_tree(vec![pair(integer(5), integer(0))]);

        assert_eq!(
            extract_symbol_table(&tree),
            Err(ExtractError::InvalidKey {
                index: 0,
                found: Some(Literal::Integer(5)),
            })
        );
    }

    #[test]
    fn line_index_must_be_non_negative_integer() {
        let tree = language_key_tree(vec![pair(string("LK_Confirm"), integer(-1))]);
        assert_eq!(
            extract_symbol_table(&tree),
            Err(ExtractError::InvalidLineIndex {
                index: 0,
                found: Some(Literal::Integer(-1)),
            })
        );

        let tree = language_key_tree(vec![pair(string("LK_Confirm"), string("0"))]);
        assert!(matches!(
            extract_symbol_table(&tree),
            Err(ExtractError::InvalidLineIndex { index: 0, .. })
        ));
    }
}
