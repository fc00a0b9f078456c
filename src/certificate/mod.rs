pub mod layout;

pub use layout::{Align, Color, FontFace, Layout, TextLayer, TextRun};

use serde::{Deserialize, Serialize};

/// The four strings bound into a certificate template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub name: String,
    pub course_name: String,
    pub college_name: String,
    pub event_name: String,
}

impl Default for CertificateRecord {
    fn default() -> Self {
        Self {
            name: "Jonathon Deo".to_string(),
            course_name: "1st Rank in ".to_string(),
            college_name: "the Annual Tech Conference".to_string(),
            event_name: "the Annual Innovation Summit 2024".to_string(),
        }
    }
}

impl CertificateRecord {
    /// Replaces `{name}`, `{course}`, `{college}` and `{event}` in `text`.
    pub fn fill(&self, text: &str) -> String {
        text.replace("{name}", &self.name)
            .replace("{course}", &self.course_name)
            .replace("{college}", &self.college_name)
            .replace("{event}", &self.event_name)
    }
}
