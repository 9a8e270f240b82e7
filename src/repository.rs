//! Persistence of [`Person`] records in the `pessoas` table.
//!
//! Every operation checks out a single connection (or one transaction for
//! updates) from the injected pool. The checkout is a guard: it goes back to the
//! pool when dropped, whichever way the operation returns.

use futures::stream::TryStreamExt;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::PersonError;
use crate::merge::merge;
use crate::search::SearchPredicate;
use crate::structs::person::{Person, PersonDraft, PersonPatch};

const PERSON_COLUMNS: &str = "id, apelido, nome, nascimento, stack";

#[derive(Clone, Debug)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, draft), fields(apelido = %draft.nickname))]
    pub async fn create(&self, draft: &PersonDraft) -> Result<Person, PersonError> {
        let mut connection = self.pool.acquire().await?;

        let person = sqlx::query_as::<_, Person>(&format!(
            "INSERT INTO pessoas (apelido, nome, nascimento, stack) \
             VALUES ($1, $2, $3::date, $4) \
             RETURNING {PERSON_COLUMNS}"
        ))
        .bind(&draft.nickname)
        .bind(&draft.name)
        .bind(&draft.birth_date)
        .bind(&draft.stacks)
        .fetch_one(&mut *connection)
        .await?;

        tracing::debug!(id = %person.id, "person created");
        Ok(person)
    }

    /// `Ok(None)` when no person has this id.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Person>, PersonError> {
        let id = parse_id(id)?;
        let mut connection = self.pool.acquire().await?;

        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM pessoas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *connection)
        .await?;

        Ok(person)
    }

    /// All matches in store order, unpaginated.
    #[tracing::instrument(skip(self, predicate), fields(pattern = predicate.pattern()))]
    pub async fn search(&self, predicate: &SearchPredicate) -> Result<Vec<Person>, PersonError> {
        let mut connection = self.pool.acquire().await?;

        let sql = format!(
            "SELECT {PERSON_COLUMNS} FROM pessoas WHERE {}",
            SearchPredicate::WHERE_CLAUSE
        );
        let found: Vec<Person> = sqlx::query_as::<_, Person>(&sql)
            .bind(predicate.pattern())
            .fetch(&mut *connection)
            .try_collect()
            .await?;

        Ok(found)
    }

    /// Applies `patch` on top of the stored record.
    ///
    /// The row is locked for the read-merge-write, so two concurrent patches on
    /// the same id are applied one after the other. `Ok(None)` when no person
    /// has this id.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: &str,
        patch: PersonPatch,
    ) -> Result<Option<Person>, PersonError> {
        let id = parse_id(id)?;
        let mut transaction = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM pessoas WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = merge(&existing, patch);
        let updated = sqlx::query_as::<_, Person>(&format!(
            "UPDATE pessoas \
             SET apelido = $1, nome = $2, nascimento = $3::date, stack = $4 \
             WHERE id = $5 \
             RETURNING {PERSON_COLUMNS}"
        ))
        .bind(&merged.nickname)
        .bind(&merged.name)
        .bind(&merged.birth_date)
        .bind(&merged.stacks)
        .bind(id)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;
        Ok(Some(updated))
    }

    #[tracing::instrument(skip(self))]
    pub async fn count(&self) -> Result<i64, PersonError> {
        let mut connection = self.pool.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pessoas")
            .fetch_one(&mut *connection)
            .await?;

        Ok(count)
    }
}

fn parse_id(id: &str) -> Result<Uuid, PersonError> {
    Uuid::parse_str(id).map_err(|_| PersonError::InvalidIdentifier(id.to_string()))
}
