use crate::catalog::status::ReadingStatus;
use crate::database::types::BookRecord;
use std::collections::BTreeSet;

/// Selector value meaning "do not filter on this field"
pub const ALL_SENTINEL: &str = "Todos";

/// Which category the catalog is narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelector {
    #[default]
    All,
    Only(String),
}

impl CategorySelector {
    /// Reads a selector value as sent by the category picker. Missing, blank and sentinel
    /// values select every category.
    #[must_use]
    #[inline]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_SENTINEL) => Self::All,
            Some(name) => Self::Only(name.to_owned()),
        }
    }

    /// Category names are compared case-insensitively against each of the book's categories,
    /// so "Noir" does not match a book tagged only "Film-Noir".
    fn matches(&self, book: &BookRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => {
                let wanted = wanted.to_lowercase();
                book.category_names()
                    .iter()
                    .any(|name| name.to_lowercase() == wanted)
            }
        }
    }
}

/// Which reading status the catalog is narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusSelector {
    #[default]
    All,
    Only(ReadingStatus),
}

impl StatusSelector {
    /// Reads a selector value as sent by the status picker. Returns `None` for a value that is
    /// neither the sentinel nor a known status.
    #[must_use]
    #[inline]
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_SENTINEL) => Some(Self::All),
            Some(status) => ReadingStatus::parse(status).map(Self::Only),
        }
    }

    /// Stored statuses are normalized before comparing, so rows written as "por leer" and
    /// "Por leer" both match [`ReadingStatus::ToRead`].
    fn matches(self, book: &BookRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => ReadingStatus::parse(&book.status) == Some(wanted),
        }
    }
}

/// The four catalog filters. The default value lets every book through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Free text searched in title, author and categories
    pub text: String,
    pub category: CategorySelector,
    /// Substring of the author's name
    pub author: String,
    pub status: StatusSelector,
}

impl CatalogFilter {
    #[must_use]
    #[inline]
    pub fn with_text(mut self, text: &str) -> Self {
        text.clone_into(&mut self.text);
        self
    }

    #[must_use]
    #[inline]
    pub fn with_category(mut self, category: CategorySelector) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    #[inline]
    pub fn with_author(mut self, author: &str) -> Self {
        author.clone_into(&mut self.author);
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_status(mut self, status: StatusSelector) -> Self {
        self.status = status;
        self
    }

    /// Whether a single book passes all four filters
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Called in a loop, but large")]
    pub fn matches(&self, book: &BookRecord) -> bool {
        let haystack = format!(
            "{} {} {}",
            book.name.as_deref().unwrap_or_default(),
            book.author.as_deref().unwrap_or_default(),
            book.categories.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        let text_match = haystack.contains(&self.text.to_lowercase());

        let author_match = book
            .author
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&self.author.to_lowercase());

        text_match && author_match && self.category.matches(book) && self.status.matches(book)
    }
}

/// Narrows the catalog to the books matching `filter`, keeping the catalog's order.
#[must_use]
#[inline]
pub fn filter_catalog<'catalog>(
    catalog: &'catalog [BookRecord],
    filter: &CatalogFilter,
) -> Vec<&'catalog BookRecord> {
    catalog.iter().filter(|book| filter.matches(book)).collect()
}

/// Sorted, de-duplicated category names found in the catalog, the options of the category
/// picker (without the sentinel).
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per request")]
pub fn available_categories(catalog: &[BookRecord]) -> Vec<String> {
    catalog
        .iter()
        .flat_map(BookRecord::category_names)
        .map(str::to_owned)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<BookRecord> {
        vec![
            BookRecord::new(1, "Dune", "Herbert", "Sci-Fi", "leído"),
            BookRecord::new(2, "Emma", "Austen", "Romance", "por leer"),
        ]
    }

    fn names(books: &[&BookRecord]) -> Vec<String> {
        books
            .iter()
            .map(|book| book.name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_text_search() {
        let catalog = catalog();
        let filter = CatalogFilter::default().with_text("dune");
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Dune"]);

        // author and categories are searched too
        let filter = CatalogFilter::default().with_text("ROMANCE");
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Emma"]);
        let filter = CatalogFilter::default().with_text("herb");
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Dune"]);
    }

    #[test]
    fn test_category_filter() {
        let catalog = catalog();
        let filter = CatalogFilter::default()
            .with_category(CategorySelector::from_param(Some("Sci-Fi")));
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Dune"]);

        let filter = CatalogFilter::default()
            .with_category(CategorySelector::from_param(Some("sci-fi")));
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Dune"]);
    }

    #[test]
    fn test_category_filter_matches_whole_names() {
        let catalog = vec![
            BookRecord::new(1, "Chinatown", "Towne", "Film-Noir-Classic", "Leído"),
            BookRecord::new(2, "The Big Sleep", "Chandler", "Noir, Mystery", "Leído"),
        ];
        let filter =
            CatalogFilter::default().with_category(CategorySelector::Only(String::from("Noir")));
        assert_eq!(
            names(&filter_catalog(&catalog, &filter)),
            vec!["The Big Sleep"]
        );
    }

    #[test]
    fn test_status_filter() {
        let catalog = catalog();
        let filter =
            CatalogFilter::default().with_status(StatusSelector::from_param(Some("Todos")).unwrap());
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Dune", "Emma"]);

        // lower-case stored statuses still match the capitalized selector
        let filter = CatalogFilter::default()
            .with_status(StatusSelector::from_param(Some("Por leer")).unwrap());
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Emma"]);

        assert_eq!(StatusSelector::from_param(Some("Releyendo")), None);
    }

    #[test]
    fn test_author_filter() {
        let catalog = catalog();
        let filter = CatalogFilter::default().with_author("aus");
        assert_eq!(names(&filter_catalog(&catalog, &filter)), vec!["Emma"]);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let mut anonymous = BookRecord::new(3, "", "", "", "Leído");
        anonymous.name = None;
        anonymous.author = None;
        anonymous.categories = None;
        let catalog = vec![anonymous];

        assert_eq!(filter_catalog(&catalog, &CatalogFilter::default()).len(), 1);
        let filter = CatalogFilter::default().with_author("a");
        assert!(filter_catalog(&catalog, &filter).is_empty());
        let filter = CatalogFilter::default().with_text("none");
        assert!(filter_catalog(&catalog, &filter).is_empty());
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let catalog = catalog();
        let filtered = filter_catalog(&catalog, &CatalogFilter::default());
        let expected: Vec<&BookRecord> = catalog.iter().collect();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_filtering_twice_changes_nothing() {
        let catalog = vec![
            BookRecord::new(1, "Dune", "Herbert", "Sci-Fi, Classic", "Leído"),
            BookRecord::new(2, "Dune Messiah", "Herbert", "Sci-Fi", "Por leer"),
            BookRecord::new(3, "Emma", "Austen", "Romance, Classic", "Leído"),
            BookRecord::new(4, "Persuasion", "Austen", "Romance", "En proceso"),
        ];
        let filters = [
            CatalogFilter::default().with_text("e"),
            CatalogFilter::default().with_category(CategorySelector::Only(String::from("Classic"))),
            CatalogFilter::default()
                .with_author("her")
                .with_status(StatusSelector::Only(ReadingStatus::Read)),
        ];

        for filter in &filters {
            let once = filter_catalog(&catalog, filter);
            let owned: Vec<BookRecord> = once.iter().map(|&book| book.clone()).collect();
            let twice = filter_catalog(&owned, filter);
            assert_eq!(once.len(), twice.len());
            for (first, second) in once.iter().zip(twice) {
                assert_eq!(*first, second);
            }
            // never fabricates rows
            assert!(once.iter().all(|book| catalog.contains(book)));
        }
    }

    #[test]
    fn test_available_categories() {
        let catalog = vec![
            BookRecord::new(1, "Dune", "Herbert", "Sci-Fi, Classic", "Leído"),
            BookRecord::new(2, "Emma", "Austen", "Romance,Classic", "Leído"),
            BookRecord::new(3, "Untitled", "Nobody", "", "Leído"),
        ];
        assert_eq!(
            available_categories(&catalog),
            vec!["Classic", "Romance", "Sci-Fi"]
        );
    }
}
