use crate::catalog::status::ReadingStatus;
use crate::database::types::parse_date;
use crate::library::errors::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// An author or category picked in the book form: either one of the listed names or a name typed
/// into the "new" field, which is created when the form is saved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Selection {
    Existing(String),
    New(String),
}

impl Selection {
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(name) | Self::New(name) => name,
        }
    }

    /// Trimmed copy, or `None` if nothing but whitespace was entered
    fn normalized(&self) -> Option<Self> {
        let name = self.name().trim();
        if name.is_empty() {
            return None;
        }
        Some(match self {
            Self::Existing(_) => Self::Existing(name.to_owned()),
            Self::New(_) => Self::New(name.to_owned()),
        })
    }
}

/// The registration and edit form as submitted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BookSubmission {
    pub name: String,
    pub author: Option<Selection>,
    pub categories: Vec<Selection>,
    pub status: ReadingStatus,
    pub on_kindle: bool,
    pub description: Option<String>,
    /// Dates that are not valid `YYYY-MM-DD` are read as no date
    #[serde(deserialize_with = "lenient_date")]
    pub started_on: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub finished_on: Option<NaiveDate>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// A submission that passed validation: a non-empty name, an author and at least one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    pub name: String,
    pub author: Selection,
    pub categories: Vec<Selection>,
    pub status: ReadingStatus,
    pub on_kindle: bool,
    pub description: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl BookSubmission {
    /// Checks the required fields in form order: name, author, categories.
    /// # Errors
    /// Returns the first missing field
    #[allow(clippy::missing_inline_in_public_items, reason = "Called once per save")]
    pub fn validate(&self) -> Result<ValidatedBook, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let author = self
            .author
            .as_ref()
            .and_then(Selection::normalized)
            .ok_or(ValidationError::MissingAuthor)?;

        let mut categories: Vec<Selection> = Vec::with_capacity(self.categories.len());
        for category in self.categories.iter().filter_map(Selection::normalized) {
            if !categories
                .iter()
                .any(|seen| seen.name() == category.name())
            {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            return Err(ValidationError::MissingCategory);
        }

        Ok(ValidatedBook {
            name: name.to_owned(),
            author,
            categories,
            status: self.status,
            on_kindle: self.on_kindle,
            description: self.description.clone(),
            started_on: self.started_on,
            finished_on: self.finished_on,
        })
    }
}
