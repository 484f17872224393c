//! The form shared by the create and edit category pages.

use maud::{Markup, html};

use crate::{
    category::{CategoryId, TreeNode, flatten},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// A category that can be picked as the parent in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ParentOption {
    pub id: CategoryId,
    pub name: String,
    pub depth: usize,
}

/// List the categories in `forest` as parent options in tree order.
///
/// The category with `editing_id` and everything below it are left out, since
/// picking any of them would be rejected as a cycle.
pub(super) fn parent_options(
    forest: &[TreeNode],
    editing_id: Option<CategoryId>,
) -> Vec<ParentOption> {
    let excluded = editing_id
        .and_then(|editing_id| forest.iter().find_map(|tree| tree.find(editing_id)))
        .map(TreeNode::subtree_ids)
        .unwrap_or_default();

    flatten(forest)
        .into_iter()
        .filter(|(_, node)| !excluded.contains(&node.id))
        .map(|(depth, node)| ParentOption {
            id: node.id,
            name: node.name.to_string(),
            depth,
        })
        .collect()
}

/// Whether the form creates a new category or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormMode {
    Create,
    Update,
}

pub(super) struct CategoryFormView<'a> {
    pub mode: FormMode,
    pub endpoint: &'a str,
    pub name: &'a str,
    pub parent_id: Option<CategoryId>,
    pub parent_options: &'a [ParentOption],
    pub error_message: &'a str,
}

impl CategoryFormView<'_> {
    pub fn into_html(self) -> Markup {
        let submit_text = match self.mode {
            FormMode::Create => "Create Category",
            FormMode::Update => "Update Category",
        };

        let fields = html! {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    value=(self.name)
                    maxlength="255"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="parent_id"
                    class=(FORM_LABEL_STYLE)
                {
                    "Parent Category"
                }

                select
                    id="parent_id"
                    name="parent_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[self.parent_id.is_none()] { "None (root category)" }

                    @for parent_option in self.parent_options {
                        option
                            value=(parent_option.id)
                            selected[self.parent_id == Some(parent_option.id)]
                        {
                            ("\u{2014} ".repeat(parent_option.depth)) (parent_option.name)
                        }
                    }
                }
            }

            @if !self.error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (self.error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        };

        match self.mode {
            FormMode::Create => html! {
                form
                    hx-post=(self.endpoint)
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class="w-full space-y-4 md:space-y-6"
                {
                    (fields)
                }
            },
            FormMode::Update => html! {
                form
                    hx-put=(self.endpoint)
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class="w-full space-y-4 md:space-y-6"
                {
                    (fields)
                }
            },
        }
    }
}

#[cfg(test)]
mod parent_options_tests {
    use crate::category::{CategoryName, TreeNode};

    use super::{ParentOption, parent_options};

    fn node(id: i64, parent_id: Option<i64>, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            id,
            name: CategoryName::new_unchecked(&format!("Category {id}")),
            parent_id,
            children,
        }
    }

    fn option(id: i64, depth: usize) -> ParentOption {
        ParentOption {
            id,
            name: format!("Category {id}"),
            depth,
        }
    }

    fn forest() -> Vec<TreeNode> {
        vec![
            node(1, None, vec![node(2, Some(1), vec![node(3, Some(2), vec![])])]),
            node(4, None, vec![]),
        ]
    }

    #[test]
    fn lists_all_categories_for_new_category() {
        let options = parent_options(&forest(), None);

        assert_eq!(
            options,
            vec![option(1, 0), option(2, 1), option(3, 2), option(4, 0)]
        );
    }

    #[test]
    fn leaves_out_the_edited_subtree() {
        let options = parent_options(&forest(), Some(2));

        assert_eq!(options, vec![option(1, 0), option(4, 0)]);
    }
}
