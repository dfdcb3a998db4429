/// A submitted book form that cannot be saved. Nothing has been written when this is returned.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("El nombre es obligatorio.")]
    MissingName,

    #[error("Debe seleccionar o registrar un autor.")]
    MissingAuthor,

    #[error("Debe seleccionar o registrar al menos un tipo de novela.")]
    MissingCategory,
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("author `{0}` does not exist")]
    UnknownAuthor(String),

    #[error("book {0} does not exist")]
    BookNotFound(i64),

    #[error("name must not be empty")]
    EmptyName,

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
