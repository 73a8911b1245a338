//! Repository error and pagination types shared by all stores

use shelf_core::error::{ShelfError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("No row with id {0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored value the models cannot represent
    #[error("Unreadable row: {0}")]
    Validation(String),

    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Postgres `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

impl RepositoryError {
    /// Map a unique violation to the first of `fields` named by the violated
    /// constraint (Prisma names them `<Table>_<field>_key`). Other errors pass
    /// through unchanged.
    pub fn from_write(err: sqlx::Error, fields: &[&str]) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or_default();
                let field = fields
                    .iter()
                    .find(|f| constraint.contains(*f))
                    .copied()
                    .unwrap_or("base");
                return RepositoryError::UniqueViolation {
                    field: field.to_string(),
                };
            }
        }
        RepositoryError::Database(err)
    }
}

impl From<RepositoryError> for ShelfError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ShelfError::NotFound {
                entity: "Record",
                id,
            },
            RepositoryError::Database(e) => ShelfError::Database(e.to_string()),
            RepositoryError::Validation(message) => {
                let mut errors = ValidationErrors::new();
                errors.add_base(message);
                ShelfError::Validation(errors)
            }
            RepositoryError::UniqueViolation { field } => {
                let mut errors = ValidationErrors::new();
                if field == "base" {
                    errors.add_base("Record already exists.");
                } else {
                    errors.add(field.clone(), format!("{} is already taken.", field));
                }
                ShelfError::Validation(errors)
            }
        }
    }
}

/// `LIMIT`/`OFFSET` window of a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// 1-based page; pages below 1 read as the first
    pub fn page(page: i64, per_page: i64) -> Self {
        Self {
            limit: per_page,
            offset: (page.max(1) - 1).saturating_mul(per_page),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(1, shelf_core::pagination::DEFAULT_PER_PAGE)
    }
}

impl From<&shelf_core::pagination::PageParams> for Pagination {
    fn from(params: &shelf_core::pagination::PageParams) -> Self {
        Self {
            limit: params.limit(),
            offset: params.offset(),
        }
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by `ILIKE`
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
