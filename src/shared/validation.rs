//! Validation Utilities

use validator::{ValidationErrors, ValidationErrorsKind};

use super::error::AppError;

/// Convert validation errors into a `ConfigMalformed` error naming the
/// first offending field (by dotted path, sorted).
pub fn validation_error(context: &str, errors: ValidationErrors) -> AppError {
    let mut fields = Vec::new();
    flatten("", &errors, &mut fields);
    fields.sort();

    let message = fields
        .into_iter()
        .next()
        .unwrap_or_else(|| "validation failed".into());

    AppError::ConfigMalformed(format!("{}: {}", context, message))
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| match &e.message {
                    Some(message) => format!("{}: {}", path, message),
                    None => format!("{}: {}", path, e.code),
                }));
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
