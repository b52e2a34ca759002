//! Input rules shared by create and update.
//!
//! Field rules are declared on the request types with `validator`; this
//! module flattens the result into an ordered list of [`FieldError`]s and
//! adds the date-dependent age rule, which needs "today" from the caller.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::models::{CreateUserRequest, UpdateUserRequest};

pub const MINIMUM_AGE_YEARS: u32 = 18;
pub const UNDERAGE: &str = "User must be at least 18 years old";

/// One failing rule, keyed by the wire name of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "Invalid email format")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All failures for a create request. Empty means valid.
pub fn validate_create(req: &CreateUserRequest, today: NaiveDate) -> Vec<FieldError> {
    collect(req.validate(), req.date_of_birth, today)
}

/// All failures for an update request. Empty means valid.
pub fn validate_update(req: &UpdateUserRequest, today: NaiveDate) -> Vec<FieldError> {
    collect(req.validate(), req.date_of_birth, today)
}

fn collect(
    result: Result<(), ValidationErrors>,
    date_of_birth: NaiveDate,
    today: NaiveDate,
) -> Vec<FieldError> {
    let mut errors = match result {
        Ok(()) => Vec::new(),
        Err(e) => flatten(&e),
    };

    if !is_adult(date_of_birth, today) {
        errors.push(FieldError::new("dateOfBirth", UNDERAGE));
    }

    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();

    for (field, failures) in errors.field_errors() {
        let name = to_camel_case(&field);

        // A missing value makes the format rules noise.
        let required = failures.iter().find(|f| f.code == "required");
        let kept: Vec<_> = match required {
            Some(f) => vec![f],
            None => failures.iter().collect(),
        };

        for failure in kept {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{name} is invalid"));
            out.push(FieldError::new(name.clone(), message));
        }
    }

    out
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// True when `date_of_birth` is on or before the same calendar date eighteen
/// years before `today`. A Feb 29 birthday becomes adult on Mar 1 in
/// non-leap years, since Feb 28 minus eighteen years is still Feb 28.
pub fn is_adult(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
    age_on(date_of_birth, today) >= MINIMUM_AGE_YEARS as i32
}

/// Whole years elapsed from `date_of_birth` to `today`. Negative for
/// dates in the future.
///
/// A year counts once `today` shifted back by that many years lands on or
/// after the birthday, so the age here and [`is_adult`] never disagree.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();

    let months = Months::new(age.unsigned_abs() * 12);
    let anchor = if age >= 0 {
        today.checked_sub_months(months)
    } else {
        today.checked_add_months(months)
    };

    if !anchor.is_some_and(|a| a >= date_of_birth) {
        age -= 1;
    }

    age
}
