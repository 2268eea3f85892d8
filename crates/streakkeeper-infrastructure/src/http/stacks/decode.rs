//! Mapping of contract return values onto domain types.

use streakkeeper_domain::shared::{DomainError, Identity};
use streakkeeper_domain::story::GlobalStory;
use streakkeeper_domain::streak::{StatisticsLookup, UserStatistics};

use crate::clarity::ClarityValue;

fn uint_field(tuple: &ClarityValue, name: &str) -> Result<u64, DomainError> {
    let value = tuple
        .field(name)
        .ok_or_else(|| DomainError::Deserialization(format!("missing field '{}'", name)))?;

    let raw = value.as_uint().ok_or_else(|| {
        DomainError::Deserialization(format!(
            "field '{}' is {}, expected uint",
            name,
            value.type_name()
        ))
    })?;

    u64::try_from(raw)
        .map_err(|_| DomainError::Deserialization(format!("field '{}' overflows u64", name)))
}

fn string_field(tuple: &ClarityValue, name: &str) -> Result<String, DomainError> {
    tuple
        .field(name)
        .and_then(ClarityValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| DomainError::Deserialization(format!("missing string field '{}'", name)))
}

/// `get-user` returns `(optional (tuple current-streak max-streak total-checkins))`
pub fn decode_user_statistics(value: ClarityValue) -> Result<StatisticsLookup, DomainError> {
    match value {
        ClarityValue::OptionalNone => Ok(StatisticsLookup::NotFound),
        ClarityValue::OptionalSome(inner) if matches!(*inner, ClarityValue::Tuple(_)) => {
            Ok(StatisticsLookup::Found(UserStatistics::new(
                uint_field(&inner, "current-streak")?,
                uint_field(&inner, "max-streak")?,
                uint_field(&inner, "total-checkins")?,
            )))
        }
        other => Err(DomainError::Deserialization(format!(
            "get-user returned {}, expected optional tuple",
            other.type_name()
        ))),
    }
}

/// `get-full-story` returns `(response (tuple content last-word) _)`
pub fn decode_global_story(value: ClarityValue) -> Result<GlobalStory, DomainError> {
    match value {
        ClarityValue::ResponseOk(inner) if matches!(*inner, ClarityValue::Tuple(_)) => {
            let content = string_field(&inner, "content")?;
            // last-word is absent before the first mint
            let last_word = string_field(&inner, "last-word").unwrap_or_default();
            Ok(GlobalStory::new(content, last_word))
        }
        other => Err(DomainError::Deserialization(format!(
            "get-full-story returned {}, expected ok tuple",
            other.type_name()
        ))),
    }
}

/// `get-contributors` returns `(response (list principal) _)`
pub fn decode_contributors(value: ClarityValue) -> Result<Vec<Identity>, DomainError> {
    let items = match value {
        ClarityValue::ResponseOk(inner) => match *inner {
            ClarityValue::List(items) => items,
            other => {
                return Err(DomainError::Deserialization(format!(
                    "get-contributors returned ok {}, expected list",
                    other.type_name()
                )))
            }
        },
        other => {
            return Err(DomainError::Deserialization(format!(
                "get-contributors returned {}, expected ok list",
                other.type_name()
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            ClarityValue::StandardPrincipal(p) => p
                .to_address()
                .map(|a| Identity::from_string(&a))
                .map_err(|e| DomainError::Deserialization(e.to_string())),
            ClarityValue::ContractPrincipal(p, name) => p
                .to_address()
                .map(|a| Identity::from_string(&format!("{}.{}", a, name)))
                .map_err(|e| DomainError::Deserialization(e.to_string())),
            other => Err(DomainError::Deserialization(format!(
                "contributor is {}, expected principal",
                other.type_name()
            ))),
        })
        .collect()
}
