//! Field-level validation for student payloads.
//!
//! The rules are a flat table of (field, message, predicate) entries
//! evaluated independently: a bad payload reports every violated field in
//! one pass, not just the first. Format rules pass on empty input so each
//! concern (required vs. format) reports exactly once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldError;
use crate::models::{StudentFields, StudentPayload};

/// Maximum length for the optional address field.
const MAX_ADDRESS_LEN: usize = 200;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s\-]+$").expect("invalid name regex"));

// Pragmatic local@domain.tld check; full RFC 5322 is out of scope here.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("invalid phone regex"));

static ID_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{13}$").expect("invalid id number regex"));

struct Rule {
    field: &'static str,
    message: &'static str,
    /// Returns true when the payload satisfies this rule.
    check: fn(&StudentPayload) -> bool,
}

static RULES: &[Rule] = &[
    Rule {
        field: "name",
        message: "Name is required",
        check: |p| !p.name.trim().is_empty(),
    },
    Rule {
        field: "name",
        message: "Name must contain letters, spaces, or hyphens only",
        check: |p| passes_format(&p.name, &NAME_RE),
    },
    Rule {
        field: "surname",
        message: "Surname is required",
        check: |p| !p.surname.trim().is_empty(),
    },
    Rule {
        field: "surname",
        message: "Surname must contain letters, spaces, or hyphens only",
        check: |p| passes_format(&p.surname, &NAME_RE),
    },
    Rule {
        field: "email",
        message: "Email is required",
        check: |p| !p.email.trim().is_empty(),
    },
    Rule {
        field: "email",
        message: "Email must be a valid email address",
        check: |p| passes_format(&p.email, &EMAIL_RE),
    },
    Rule {
        field: "phone",
        message: "Phone is required",
        check: |p| !p.phone.trim().is_empty(),
    },
    Rule {
        field: "phone",
        message: "Phone must be exactly 10 digits",
        check: |p| passes_format(&p.phone, &PHONE_RE),
    },
    Rule {
        field: "id_number",
        message: "ID number is required",
        check: |p| !p.id_number.trim().is_empty(),
    },
    Rule {
        field: "id_number",
        message: "ID number must be exactly 13 digits",
        check: |p| passes_format(&p.id_number, &ID_NUMBER_RE),
    },
    Rule {
        field: "course",
        message: "Course is required",
        check: |p| !p.course.trim().is_empty(),
    },
    Rule {
        field: "address",
        message: "Address must be at most 200 characters",
        check: |p| {
            p.address
                .as_deref()
                .map_or(true, |a| a.chars().count() <= MAX_ADDRESS_LEN)
        },
    },
];

fn passes_format(raw: &str, re: &Regex) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || re.is_match(trimmed)
}

/// Canonical email form used for storage and uniqueness checks.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check a payload against every rule, collecting all violations.
///
/// On success returns the trimmed, normalized column values; the store
/// only ever sees output of this function.
pub fn validate(payload: &StudentPayload) -> Result<StudentFields, Vec<FieldError>> {
    let errors: Vec<FieldError> = RULES
        .iter()
        .filter(|rule| !(rule.check)(payload))
        .map(|rule| FieldError::new(rule.field, rule.message))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(StudentFields {
        name: payload.name.trim().to_owned(),
        surname: payload.surname.trim().to_owned(),
        email: normalize_email(&payload.email),
        phone: payload.phone.trim().to_owned(),
        id_number: payload.id_number.trim().to_owned(),
        course: payload.course.trim().to_owned(),
        address: payload
            .address
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned(),
    })
}
