//! Builds the nested tree view of the flat category table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryStore},
};

/// A category together with all of the categories nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name of the category.
    pub name: CategoryName,
    /// The ID of the parent category, `None` for roots.
    pub parent_id: Option<CategoryId>,
    /// The direct children of the category, each with their own subtree.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            children: Vec::new(),
        }
    }

    /// The IDs of this category and every category below it, in pre-order.
    pub fn subtree_ids(&self) -> Vec<CategoryId> {
        flatten(std::slice::from_ref(self))
            .into_iter()
            .map(|(_, node)| node.id)
            .collect()
    }

    /// The number of categories in this subtree, including this one.
    pub fn size(&self) -> usize {
        flatten(std::slice::from_ref(self)).len()
    }

    /// Find the node for `category_id` in this subtree.
    pub fn find(&self, category_id: CategoryId) -> Option<&TreeNode> {
        flatten(std::slice::from_ref(self))
            .into_iter()
            .map(|(_, node)| node)
            .find(|node| node.id == category_id)
    }
}

/// How siblings, including the roots, are ordered in a forest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOrder {
    /// The order the categories were added to the store.
    #[default]
    Insertion,
    /// Alphabetical by name.
    Name,
}

/// Build every category tree, with roots and siblings in insertion order.
///
/// # Errors
///
/// Returns [Error::CorruptHierarchy] if some categories cannot be reached from
/// a root, which means the stored parent links contain a loop or point at a
/// category that does not exist.
pub fn build_forest<S: CategoryStore>(store: &S) -> Result<Vec<TreeNode>, Error> {
    build_forest_with_order(store, SiblingOrder::Insertion)
}

/// Build every category tree, ordering siblings by `order`.
///
/// The trees are built from a single read of the store with an explicit
/// stack, so deep hierarchies cannot overflow the call stack.
///
/// # Errors
///
/// See [build_forest].
pub fn build_forest_with_order<S: CategoryStore>(
    store: &S,
    order: SiblingOrder,
) -> Result<Vec<TreeNode>, Error> {
    let categories = store.get_all()?;
    let total = categories.len();

    let mut children_by_parent: HashMap<Option<CategoryId>, Vec<Category>> = HashMap::new();
    for category in categories {
        children_by_parent
            .entry(category.parent_id)
            .or_default()
            .push(category);
    }

    let mut take_children = |parent_id: Option<CategoryId>| {
        let mut children = children_by_parent.remove(&parent_id).unwrap_or_default();
        if order == SiblingOrder::Name {
            children.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
        }
        children.into_iter()
    };

    struct Frame {
        node: TreeNode,
        pending: std::vec::IntoIter<Category>,
    }

    let mut forest = Vec::new();
    let mut visited = 0;

    for root in take_children(None) {
        visited += 1;
        let pending = take_children(Some(root.id));
        let mut stack = vec![Frame {
            node: TreeNode::leaf(root),
            pending,
        }];

        while let Some(frame) = stack.last_mut() {
            match frame.pending.next() {
                Some(child) => {
                    visited += 1;
                    let pending = take_children(Some(child.id));
                    stack.push(Frame {
                        node: TreeNode::leaf(child),
                        pending,
                    });
                }
                None => {
                    let Some(finished) = stack.pop() else {
                        break;
                    };

                    match stack.last_mut() {
                        Some(parent) => parent.node.children.push(finished.node),
                        None => forest.push(finished.node),
                    }
                }
            }
        }
    }

    if visited != total {
        let unreachable_id = children_by_parent
            .values()
            .flatten()
            .map(|category| category.id)
            .min()
            .unwrap_or_default();

        tracing::error!(
            "{} categories are not reachable from a root, starting with {unreachable_id}",
            total - visited
        );

        return Err(Error::CorruptHierarchy(unreachable_id));
    }

    Ok(forest)
}

/// List every node of `forest` in pre-order along with its depth, where roots
/// have depth 0.
pub fn flatten(forest: &[TreeNode]) -> Vec<(usize, &TreeNode)> {
    let mut nodes = Vec::new();
    let mut stack: Vec<(usize, &TreeNode)> =
        forest.iter().rev().map(|node| (0, node)).collect();

    while let Some((depth, node)) = stack.pop() {
        nodes.push((depth, node));
        stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    }

    nodes
}
