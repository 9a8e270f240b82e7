//! Field-level rules for person payloads. Pure functions, no store access.
//!
//! Lengths are counted in characters, matching the `VARCHAR` limits of the
//! `pessoas` table.

use serde_json::Value;

use crate::error::PersonError;
use crate::structs::api::PersonPayload;
use crate::structs::person::{Field, PersonDraft, PersonPatch};

pub const NICKNAME_MAX_LENGTH: usize = 32;
pub const NAME_MAX_LENGTH: usize = 100;
pub const STACK_ITEM_MAX_LENGTH: usize = 32;

/// Validates a full candidate for creation. An absent `stack` becomes empty.
pub fn validate_for_create(candidate: PersonPayload) -> Result<PersonDraft, PersonError> {
    let nickname = required(candidate.nickname, "apelido")?;
    let name = required(candidate.name, "nome")?;
    let birth_date = required(candidate.birth_date, "nascimento")?;

    let nickname = bounded_text(nickname, "apelido", NICKNAME_MAX_LENGTH)?;
    let name = bounded_text(name, "nome", NAME_MAX_LENGTH)?;
    let birth_date = date_literal(birth_date)?;
    let stacks = candidate.stacks.try_map(stacks)?.into_option().unwrap_or_default();

    Ok(PersonDraft {
        nickname,
        name,
        birth_date,
        stacks,
    })
}

/// Validates whichever fields are present; absent ones stay absent.
pub fn validate_for_update(partial: PersonPayload) -> Result<PersonPatch, PersonError> {
    if partial.nickname.is_absent()
        && partial.name.is_absent()
        && partial.birth_date.is_absent()
        && partial.stacks.is_absent()
    {
        return Err(PersonError::NoFieldsProvided);
    }

    Ok(PersonPatch {
        nickname: partial
            .nickname
            .try_map(|value| bounded_text(value, "apelido", NICKNAME_MAX_LENGTH))?,
        name: partial
            .name
            .try_map(|value| bounded_text(value, "nome", NAME_MAX_LENGTH))?,
        birth_date: partial.birth_date.try_map(date_literal)?,
        stacks: partial.stacks.try_map(stacks)?,
    })
}

fn required(field: Field<Value>, name: &'static str) -> Result<Value, PersonError> {
    match field {
        Field::Present(Value::String(text)) if text.is_empty() => {
            Err(PersonError::MissingRequiredField(name))
        }
        Field::Present(value) => Ok(value),
        Field::Absent => Err(PersonError::MissingRequiredField(name)),
    }
}

fn bounded_text(value: Value, field: &'static str, max: usize) -> Result<String, PersonError> {
    match value {
        Value::String(text) if text.is_empty() => Err(PersonError::InvalidFieldValue(field)),
        Value::String(text) if text.chars().count() > max => {
            Err(PersonError::FieldTooLong { field, max })
        }
        Value::String(text) => Ok(text),
        _ => Err(PersonError::InvalidFieldValue(field)),
    }
}

fn date_literal(value: Value) -> Result<String, PersonError> {
    match value {
        Value::String(text) if is_date_literal(&text) => Ok(text),
        _ => Err(PersonError::InvalidDateFormat),
    }
}

/// `^\d{4}-\d{2}-\d{2}$`, syntactically. `2023-02-31` passes.
fn is_date_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

// Array-ness is settled before any element is looked at.
fn stacks(value: Value) -> Result<Vec<String>, PersonError> {
    let Value::Array(items) = value else {
        return Err(PersonError::InvalidStackFormat);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(text) if text.chars().count() <= STACK_ITEM_MAX_LENGTH => Ok(text),
            _ => Err(PersonError::InvalidStackFormat),
        })
        .collect()
}
