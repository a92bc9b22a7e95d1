//! Node kinds and their structural contracts.
//!
//! Documents travel through the crate as `serde_json::Value` trees (see the
//! crate docs for the node shape). The writer never dispatches on raw type
//! strings: it resolves them to a [`NodeKind`] and consults that kind's
//! [`Contract`].

use std::fmt;

/// Every node type the canonical writer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Cube,
    Sphere,
    Cylinder,
    Union,
    Difference,
    Intersection,
    Group,
    Multmatrix,
}

/// Surface syntax of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `type(props);`
    Leaf,
    /// `type(props) {` children `}`
    Block,
}

/// What the writer requires of a node of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub form: Form,
    /// Fewest children a block may have.
    pub min_children: usize,
    /// A block with no children is written as `type();`.
    pub empty_shorthand: bool,
    /// `properties` may be a bare array, written as `type([...])`.
    pub matrix_form: bool,
}

impl Contract {
    const LEAF: Contract = Contract {
        form: Form::Leaf,
        min_children: 0,
        empty_shorthand: false,
        matrix_form: false,
    };

    const BOOLEAN_OP: Contract = Contract {
        form: Form::Block,
        min_children: 2,
        empty_shorthand: false,
        matrix_form: false,
    };
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Cube,
        NodeKind::Sphere,
        NodeKind::Cylinder,
        NodeKind::Union,
        NodeKind::Difference,
        NodeKind::Intersection,
        NodeKind::Group,
        NodeKind::Multmatrix,
    ];

    /// Resolve a node's `type` string. Returns `None` for types the writer
    /// does not support.
    pub fn from_type(type_name: &str) -> Option<NodeKind> {
        match type_name {
            "cube" => Some(NodeKind::Cube),
            "sphere" => Some(NodeKind::Sphere),
            "cylinder" => Some(NodeKind::Cylinder),
            "union" => Some(NodeKind::Union),
            "difference" => Some(NodeKind::Difference),
            "intersection" => Some(NodeKind::Intersection),
            "group" => Some(NodeKind::Group),
            "multmatrix" => Some(NodeKind::Multmatrix),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Cube => "cube",
            NodeKind::Sphere => "sphere",
            NodeKind::Cylinder => "cylinder",
            NodeKind::Union => "union",
            NodeKind::Difference => "difference",
            NodeKind::Intersection => "intersection",
            NodeKind::Group => "group",
            NodeKind::Multmatrix => "multmatrix",
        }
    }

    pub fn contract(self) -> Contract {
        match self {
            NodeKind::Cube | NodeKind::Sphere | NodeKind::Cylinder => Contract::LEAF,
            NodeKind::Union | NodeKind::Difference | NodeKind::Intersection => {
                Contract::BOOLEAN_OP
            }
            // OpenSCAD writes a childless group as `group();`
            NodeKind::Group => Contract {
                form: Form::Block,
                min_children: 0,
                empty_shorthand: true,
                matrix_form: false,
            },
            NodeKind::Multmatrix => Contract {
                form: Form::Block,
                min_children: 0,
                empty_shorthand: false,
                matrix_form: true,
            },
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `name` matches the grammar's name rule: an optional `$` followed
/// by one or more ASCII letters.
pub fn is_valid_name(name: &str) -> bool {
    let letters = name.strip_prefix('$').unwrap_or(name);
    !letters.is_empty() && letters.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_strings_roundtrip_through_kind() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_type(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_type("torus"), None);
        assert_eq!(NodeKind::from_type("Cube"), None);
    }

    #[test]
    fn boolean_operators_need_two_children() {
        for kind in [NodeKind::Union, NodeKind::Difference, NodeKind::Intersection] {
            let contract = kind.contract();
            assert_eq!(contract.form, Form::Block);
            assert_eq!(contract.min_children, 2);
        }
    }

    #[test]
    fn only_group_has_empty_shorthand() {
        let with_shorthand: Vec<_> = NodeKind::ALL
            .into_iter()
            .filter(|k| k.contract().empty_shorthand)
            .collect();
        assert_eq!(with_shorthand, vec![NodeKind::Group]);
    }

    #[test]
    fn name_rule() {
        assert!(is_valid_name("cube"));
        assert!(is_valid_name("$fn"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("$"));
        assert!(!is_valid_name("r1"));
        assert!(!is_valid_name("a_b"));
        assert!(!is_valid_name("$$fn"));
    }
}
