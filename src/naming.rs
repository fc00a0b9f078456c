use chrono::Utc;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use uuid::Uuid;

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Id used to correlate the log lines of one batch.
pub fn generate_batch_id() -> String {
    format!(
        "{}_{}",
        Utc::now().format("%Y%m%d"),
        &Uuid::new_v4().simple().to_string()[..8]
    )
}

/// Drops every character outside `[A-Za-z0-9_ -]`, then turns each run of
/// whitespace into a single underscore.
pub fn sanitize_filename(input: &str) -> String {
    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_ -]").unwrap());
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let kept = disallowed.replace_all(input, "");
    whitespace.replace_all(&kept, "_").into_owned()
}

pub fn certificate_file_name(name: &str, event: &str, extension: &str) -> String {
    format!(
        "{}_{}_Participation_Certificate.{}",
        sanitize_filename(name),
        sanitize_filename(event),
        extension
    )
}

pub fn archive_file_name(event: &str) -> String {
    format!("{}_Certificates.zip", sanitize_filename(event))
}

/// Hands out archive entry names, appending `_2`, `_3`, ... before the
/// extension when a name was already used.
#[derive(Debug, Default)]
pub struct EntryNames {
    used: HashMap<String, usize>,
}

impl EntryNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: String) -> String {
        if !self.used.contains_key(&name) {
            self.used.insert(name.clone(), 1);
            return name;
        }

        let (stem, ext) = match name.rfind('.') {
            Some(dot) => (&name[..dot], &name[dot..]),
            None => (name.as_str(), ""),
        };
        let mut n = self.used[&name];
        loop {
            n += 1;
            let candidate = format!("{}_{}{}", stem, n, ext);
            if !self.used.contains_key(&candidate) {
                self.used.insert(name.clone(), n);
                self.used.insert(candidate.clone(), 1);
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(sanitize_filename("O'Brien, Seán!"), "OBrien_Sen");
        assert_eq!(sanitize_filename("a/b\\c:d"), "abcd");
        assert_eq!(sanitize_filename("keep_me-ok"), "keep_me-ok");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(sanitize_filename("Jane   Q  Public"), "Jane_Q_Public");
        assert_eq!(sanitize_filename(" padded "), "_padded_");
        // tabs are not in the allowed set, so they vanish before collapsing
        assert_eq!(sanitize_filename("a\tb"), "ab");
    }

    #[test]
    fn certificate_and_archive_names() {
        assert_eq!(
            certificate_file_name("Ada Lovelace", "Tech Fest 2024", "pdf"),
            "Ada_Lovelace_Tech_Fest_2024_Participation_Certificate.pdf"
        );
        assert_eq!(archive_file_name("Tech Fest/2024"), "Tech_Fest2024_Certificates.zip");
    }

    #[test]
    fn duplicate_entries_get_numbered() {
        let mut names = EntryNames::new();
        assert_eq!(names.claim("a.pdf".to_string()), "a.pdf");
        assert_eq!(names.claim("a.pdf".to_string()), "a_2.pdf");
        assert_eq!(names.claim("a.pdf".to_string()), "a_3.pdf");
        assert_eq!(names.claim("a_2.pdf".to_string()), "a_2_2.pdf");
        assert_eq!(names.claim("noext".to_string()), "noext");
        assert_eq!(names.claim("noext".to_string()), "noext_2");
    }

    #[test]
    fn batch_ids_are_dated_and_short() {
        let id = generate_batch_id();
        let (date, suffix) = id.split_once('_').unwrap();
        assert_eq!(date.len(), 8);
        assert_eq!(suffix.len(), 8);
    }
}
