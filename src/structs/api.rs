use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::person::{Field, Person};

/// Body of `POST /pessoas` and `PUT /pessoas/{id}`.
///
/// Values stay untyped so that a wrong JSON type surfaces as a validation
/// error instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PersonPayload {
    #[serde(default, rename(deserialize = "apelido"))]
    pub nickname: Field<Value>,
    #[serde(default, rename(deserialize = "nome"))]
    pub name: Field<Value>,
    #[serde(default, rename(deserialize = "nascimento"))]
    pub birth_date: Field<Value>,
    #[serde(default, rename(deserialize = "stack"))]
    pub stacks: Field<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchPersonQuery {
    #[serde(rename(deserialize = "t"))]
    pub search_term: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PersonBody {
    pub id: Uuid,
    #[serde(rename = "apelido")]
    pub nickname: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "stack")]
    pub stacks: Vec<String>,
}

impl From<Person> for PersonBody {
    fn from(person: Person) -> Self {
        PersonBody {
            id: person.id,
            nickname: person.nickname,
            name: person.name,
            birth_date: person.birth_date,
            stacks: person.stacks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub message: String,
}
