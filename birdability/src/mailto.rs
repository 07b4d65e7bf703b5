//! Composing the report as an e-mail.

use crate::catalog;
use crate::photos::PhotoRecord;
use crate::report::{self, ReportError};
use birdability_types::AnswerTree;

const FALLBACK_LOCATION: &str = "New Site";

/// Subject and body of a report e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Describe the report and embed its JSON.
    pub fn compose(tree: &AnswerTree, photos: &[PhotoRecord]) -> Result<Self, ReportError> {
        let location = tree
            .text(&catalog::paths::LOCATION_NAME.into())
            .unwrap_or_default();
        let id = tree.text(&catalog::ID.into()).unwrap_or_default();
        let created = tree.text(&catalog::CREATED_AT.into()).unwrap_or_default();

        let subject = format!(
            "Birdability Report: {}",
            if location.is_empty() { FALLBACK_LOCATION } else { location }
        );

        let mut body = format!(
            "Please find the Birdability accessibility report.\n\n\
             Report ID: {id}\nLocation: {location}\nCreated: {created}"
        );
        if !photos.is_empty() {
            body.push_str("\n\n--- Photos ---\n");
            body.push_str(&format!(
                "This report includes {} photo(s).\n",
                photos.len()
            ));
            body.push_str(
                "Please use the \"Save JSON\" or \"Download JSON\" button to save the complete report with photo references.\n",
            );
            for (index, photo) in photos.iter().enumerate() {
                body.push_str(&format!(
                    "{}. {} ({}KB)\n",
                    index + 1,
                    photo.name,
                    photo.size_kb()
                ));
            }
        }
        body.push_str("\n\n--- JSON Data ---\n");
        body.push_str(&report::report_string(tree, photos)?);

        Ok(Self { subject, body })
    }

    /// A `mailto:` link with the subject and body percent-encoded.
    pub fn to_mailto_url(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> PhotoRecord {
        PhotoRecord {
            id: "photo_1".to_string(),
            name: "ramp.jpg".to_string(),
            size: 10 * 1024,
            mime: "image/jpeg".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn subject_falls_back_to_new_site() {
        let draft = EmailDraft::compose(&AnswerTree::new(), &[]).unwrap();
        assert_eq!(draft.subject, "Birdability Report: New Site");
        assert!(!draft.body.contains("--- Photos ---"));
        assert!(draft.body.contains("--- JSON Data ---\n{"));
    }

    #[test]
    fn body_lists_photos() {
        let mut tree = AnswerTree::new();
        tree.insert("id", "ABC").unwrap();
        tree.insert("generalInformation.locationName", "Test Park")
            .unwrap();

        let draft = EmailDraft::compose(&tree, &[photo()]).unwrap();
        assert_eq!(draft.subject, "Birdability Report: Test Park");
        assert!(draft.body.contains("Report ID: ABC\nLocation: Test Park"));
        assert!(draft.body.contains("This report includes 1 photo(s)."));
        assert!(draft.body.contains("1. ramp.jpg (10KB)\n"));
    }

    #[test]
    fn body_handles_largest_photo_size() {
        let huge = PhotoRecord {
            size: u64::MAX,
            ..photo()
        };
        let draft = EmailDraft::compose(&AnswerTree::new(), &[huge]).unwrap();
        assert!(
            draft
                .body
                .contains(&format!("1. ramp.jpg ({}KB)\n", u64::MAX / 1024 + 1))
        );
    }

    #[test]
    fn mailto_is_percent_encoded() {
        let draft = EmailDraft {
            subject: "Birdability Report: A & B".to_string(),
            body: "line one\nline two".to_string(),
        };
        assert_eq!(
            draft.to_mailto_url(),
            "mailto:?subject=Birdability%20Report%3A%20A%20%26%20B&body=line%20one%0Aline%20two"
        );
    }
}
