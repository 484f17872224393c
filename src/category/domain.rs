//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// A validated category name: trimmed, non-empty and at most
/// [CategoryName::MAX_LENGTH] characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// The maximum number of user-perceived characters (graphemes) in a name.
    pub const MAX_LENGTH: usize = 255;

    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace, or an [Error::CategoryNameTooLong] if `name`
    /// is longer than [CategoryName::MAX_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else if name.graphemes(true).count() > Self::MAX_LENGTH {
            Err(Error::CategoryNameTooLong)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A named node in the category hierarchy, e.g., 'Electronics' or 'Phones'.
///
/// A category with no parent is a root category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID assigned by the store when the category was created.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
    /// The category this category is nested under, `None` for roots.
    pub parent_id: Option<CategoryId>,
}

impl Category {
    /// Whether this category sits at the top of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Form data for category creation and editing.
///
/// `parent_id` is the raw value of the parent dropdown, where an empty string
/// means "no parent".
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The submitted category name, before trimming and validation.
    pub name: String,
    /// The raw parent dropdown value, empty for a root category.
    #[serde(default)]
    pub parent_id: String,
}

impl CategoryFormData {
    /// Parse the parent dropdown value.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidParentId] if the value is neither empty nor an
    /// integer.
    pub fn parent_id(&self) -> Result<Option<CategoryId>, Error> {
        let raw_parent_id = self.parent_id.trim();

        if raw_parent_id.is_empty() {
            return Ok(None);
        }

        raw_parent_id
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidParentId(raw_parent_id.to_owned()))
    }
}
