//! Menu tree — the parsed structure of a menu description
//!
//! The tree is a plain ownership hierarchy: every `Submenu` owns its
//! children in source order. No validation lives here; the parser checks
//! every invariant before attaching a node.

use serde::{Deserialize, Serialize};

/// An icon reference as declared by an `icon=` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Unvalidated filesystem path, resolved by the icon loader
    pub path: String,
    /// Pixel size in effect when the icon was declared
    pub size: u32,
}

/// A launchable menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
    pub command: String,
    pub icon: Option<Icon>,
}

/// A nested menu; the root menu is a `Submenu` with an empty label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submenu {
    pub label: String,
    pub icon: Option<Icon>,
    pub children: Vec<MenuNode>,
}

/// One node of the menu tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuNode {
    Item(Item),
    Submenu(Submenu),
    Separator,
}

impl Submenu {
    pub fn new(label: impl Into<String>, icon: Option<Icon>) -> Self {
        Submenu {
            label: label.into(),
            icon,
            children: Vec::new(),
        }
    }

    /// Append `node` after the existing children
    pub fn attach_child(&mut self, node: MenuNode) {
        self.children.push(node);
    }

    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }

    /// Depth-first, source-order traversal of everything below this menu
    ///
    /// Yields each node with its nesting depth; direct children are at
    /// depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self.children.iter())],
        }
    }
}

impl MenuNode {
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuNode::Item(item) => Some(&item.label),
            MenuNode::Submenu(submenu) => Some(&submenu.label),
            MenuNode::Separator => None,
        }
    }

    pub fn icon(&self) -> Option<&Icon> {
        match self {
            MenuNode::Item(item) => item.icon.as_ref(),
            MenuNode::Submenu(submenu) => submenu.icon.as_ref(),
            MenuNode::Separator => None,
        }
    }

    pub fn as_submenu(&self) -> Option<&Submenu> {
        match self {
            MenuNode::Submenu(submenu) => Some(submenu),
            MenuNode::Item(_) | MenuNode::Separator => None,
        }
    }
}

/// Iterator returned by [`Submenu::walk`]
pub struct Walk<'a> {
    stack: Vec<(usize, std::slice::Iter<'a, MenuNode>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a MenuNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, iter) = self.stack.last_mut()?;
            let depth = *depth;
            match iter.next() {
                Some(node) => {
                    if let MenuNode::Submenu(submenu) = node {
                        self.stack.push((depth + 1, submenu.children.iter()));
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
