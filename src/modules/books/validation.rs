//! Field checks turning a [`BookPayload`] into a [`BookDraft`].
//!
//! Each check records a tagged [`FieldError`] instead of failing fast, so a
//! single response lists every problem with the payload.

use serde_json::json;

use super::models::{BookDraft, BookPayload};

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: &'static str,
}

impl FieldError {
    pub fn to_detail(self) -> serde_json::Value {
        json!({ "field": self.field, "error": self.error })
    }
}

#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &'static str, error: &'static str) {
        self.errors.push(FieldError { field, error });
    }

    fn required_text(&mut self, field: &'static str, value: Option<String>) -> String {
        match value.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                self.fail(field, "required");
                String::new()
            }
        }
    }

    fn published_year(&mut self, value: Option<i32>) -> i32 {
        value.unwrap_or_else(|| {
            self.fail("publishedYear", "required");
            0
        })
    }

    fn description(&mut self, value: Option<String>) -> Option<String> {
        let text = value?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        if text.chars().count() > MAX_DESCRIPTION_CHARS {
            self.fail("description", "too_long");
        }
        Some(text)
    }

    fn copies(&mut self, field: &'static str, value: Option<i32>) -> i32 {
        let copies = value.unwrap_or(0);
        if copies < 0 {
            self.fail(field, "negative");
        }
        copies
    }

    fn available_within_total(&mut self, available: i32, total: i32) {
        if available >= 0 && total >= 0 && available > total {
            self.fail("availableCopies", "exceeds_total");
        }
    }
}

/// Check every field of `payload`, returning the trimmed draft or all failures.
pub fn validate(payload: BookPayload) -> Result<BookDraft, Vec<FieldError>> {
    let mut checks = Checks::default();

    let title = checks.required_text("title", payload.title);
    let author = checks.required_text("author", payload.author);
    let isbn = checks.required_text("isbn", payload.isbn);
    let genre = checks.required_text("genre", payload.genre);
    let published_year = checks.published_year(payload.published_year);
    let publisher = checks.required_text("publisher", payload.publisher);
    let description = checks.description(payload.description);
    let total_copies = checks.copies("totalCopies", payload.total_copies);
    let available_copies = checks.copies("availableCopies", payload.available_copies);
    checks.available_within_total(available_copies, total_copies);

    if !checks.errors.is_empty() {
        return Err(checks.errors);
    }

    Ok(BookDraft {
        title,
        author,
        isbn,
        genre,
        published_year,
        publisher,
        description,
        total_copies,
        available_copies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> BookPayload {
        BookPayload {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("111".to_string()),
            genre: Some("Science Fiction".to_string()),
            published_year: Some(1965),
            publisher: Some("Chilton Books".to_string()),
            description: None,
            total_copies: Some(3),
            available_copies: Some(3),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let draft = validate(dune()).unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!((draft.total_copies, draft.available_copies), (3, 3));
    }

    #[test]
    fn trims_text_and_drops_blank_description() {
        let payload = BookPayload {
            title: Some("  Dune \n".to_string()),
            description: Some("   ".to_string()),
            ..dune()
        };

        let draft = validate(payload).unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate(BookPayload::default()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            vec!["title", "author", "isbn", "genre", "publishedYear", "publisher"]
        );
        assert!(errors.iter().all(|e| e.error == "required"));
    }

    #[test]
    fn missing_copy_counts_default_to_zero() {
        let payload = BookPayload {
            total_copies: None,
            available_copies: None,
            ..dune()
        };

        let draft = validate(payload).unwrap();
        assert_eq!((draft.total_copies, draft.available_copies), (0, 0));
    }

    #[test]
    fn rejects_copy_counts_out_of_bounds() {
        let negative = BookPayload {
            total_copies: Some(-1),
            available_copies: Some(0),
            ..dune()
        };
        assert_eq!(
            validate(negative).unwrap_err(),
            vec![FieldError { field: "totalCopies", error: "negative" }]
        );

        let oversold = BookPayload {
            total_copies: Some(2),
            available_copies: Some(3),
            ..dune()
        };
        assert_eq!(
            validate(oversold).unwrap_err(),
            vec![FieldError { field: "availableCopies", error: "exceeds_total" }]
        );
    }

    #[test]
    fn bounds_description_length_in_characters() {
        let at_limit = BookPayload {
            description: Some("é".repeat(MAX_DESCRIPTION_CHARS)),
            ..dune()
        };
        assert!(validate(at_limit).is_ok());

        let over_limit = BookPayload {
            description: Some("a".repeat(MAX_DESCRIPTION_CHARS + 1)),
            ..dune()
        };
        assert_eq!(
            validate(over_limit).unwrap_err(),
            vec![FieldError { field: "description", error: "too_long" }]
        );
    }
}
