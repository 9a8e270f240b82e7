use crate::error::PersonError;

/// Case-insensitive, unanchored substring match over `apelido`, `nome` and
/// every element of `stack`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPredicate {
    pattern: String,
}

impl SearchPredicate {
    pub const WHERE_CLAUSE: &'static str = "apelido ILIKE $1 \
        OR nome ILIKE $1 \
        OR EXISTS (SELECT 1 FROM unnest(stack) AS element WHERE element ILIKE $1)";

    /// The `ILIKE` pattern bound to `$1` in [`Self::WHERE_CLAUSE`].
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

pub fn build_search_predicate(term: Option<&str>) -> Result<SearchPredicate, PersonError> {
    match term {
        Some(term) if !term.is_empty() => Ok(SearchPredicate {
            pattern: format!("%{}%", escape_like(term)),
        }),
        _ => Err(PersonError::MissingSearchTerm),
    }
}

// `\` is the default LIKE escape character in PostgreSQL.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for character in term.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
