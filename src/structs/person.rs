use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// A person as persisted in the `pessoas` table.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Person {
    pub id: Uuid,
    #[sqlx(rename = "apelido")]
    pub nickname: String,
    #[sqlx(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "nascimento")]
    pub birth_date: NaiveDate,
    #[sqlx(rename = "stack")]
    pub stacks: Vec<String>,
}

/// A fully validated set of person fields, ready to be written.
///
/// `birth_date` keeps the literal `YYYY-MM-DD` text; the store turns it into a date.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonDraft {
    pub nickname: String,
    pub name: String,
    pub birth_date: String,
    pub stacks: Vec<String>,
}

/// A validated partial update. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonPatch {
    pub nickname: Field<String>,
    pub name: Field<String>,
    pub birth_date: Field<String>,
    pub stacks: Field<Vec<String>>,
}

/// Presence marker for a single payload key.
///
/// A JSON `null` and a missing key both deserialize to `Absent`; an explicit
/// empty value such as `[]` is `Present`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Absent => None,
            Field::Present(value) => Some(value),
        }
    }

    /// The provided value, or `fallback` when absent.
    pub fn unwrap_or(self, fallback: T) -> T {
        self.into_option().unwrap_or(fallback)
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Field<U>, E> {
        match self {
            Field::Absent => Ok(Field::Absent),
            Field::Present(value) => f(value).map(Field::Present),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}
