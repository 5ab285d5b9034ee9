// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversions between stored column values and domain values.
//!
//! Every enumeration and timestamp read back from the database is
//! re-validated; a value that does not parse is a `ReconstructionError`.

use clinica_domain::Percentage;
use num_traits::ToPrimitive;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::PersistenceError;

pub(crate) fn timestamp_to_text(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub(crate) fn optional_timestamp_to_text(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(timestamp_to_text).transpose()
}

pub(crate) fn text_to_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}

pub(crate) fn optional_text_to_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(text_to_timestamp).transpose()
}

pub(crate) fn date_to_text(value: Date) -> Result<String, PersistenceError> {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub(crate) fn text_to_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::ReconstructionError(format!("date '{value}': {e}")))
}

/// Parses a stored enumeration string.
pub(crate) fn parse_enum<T: FromStr>(column: &str, value: &str) -> Result<T, PersistenceError> {
    value.parse::<T>().map_err(|_| {
        PersistenceError::ReconstructionError(format!("invalid {column} '{value}'"))
    })
}

pub(crate) fn percentage_from_column(basis_points: i64) -> Result<Percentage, PersistenceError> {
    Percentage::from_basis_points(basis_points).map_err(|e| {
        PersistenceError::ReconstructionError(format!("percentage {basis_points}: {e}"))
    })
}

pub(crate) fn count_to_column(count: u32) -> Result<i32, PersistenceError> {
    count
        .to_i32()
        .ok_or_else(|| PersistenceError::SerializationError(format!("count {count} out of range")))
}

pub(crate) fn count_from_column(value: i32) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("count {value} out of range")))
}

pub(crate) fn flag_to_column(value: bool) -> i32 {
    i32::from(value)
}

pub(crate) const fn flag_from_column(value: i32) -> bool {
    value != 0
}
