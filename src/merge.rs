use crate::structs::person::{Person, PersonDraft, PersonPatch};

/// Resolves every mutable field as "patched value if provided, else stored value".
pub fn merge(existing: &Person, patch: PersonPatch) -> PersonDraft {
    PersonDraft {
        nickname: patch.nickname.unwrap_or(existing.nickname.clone()),
        name: patch.name.unwrap_or(existing.name.clone()),
        birth_date: patch
            .birth_date
            .unwrap_or(existing.birth_date.format("%Y-%m-%d").to_string()),
        stacks: patch.stacks.unwrap_or(existing.stacks.clone()),
    }
}
