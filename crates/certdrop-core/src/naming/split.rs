//! Base filename validation and stem/extension split.

use crate::error::UploadError;

/// A validated base filename, split at its last `.`.
///
/// `ext` keeps the separator (`".json"`) and is empty when the name has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetName {
    stem: String,
    ext: String,
}

impl TargetName {
    /// Validates `name` as a single path component and splits it.
    pub fn parse(name: &str) -> Result<Self, UploadError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0'])
        {
            return Err(UploadError::InvalidFilename(name.to_string()));
        }
        let (stem, ext) = split_filename(name);
        Ok(Self {
            stem: stem.to_string(),
            ext: ext.to_string(),
        })
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The `n`-th sibling name, e.g. `cert_3.json`.
    pub fn numbered(&self, n: u32) -> String {
        format!("{}_{}{}", self.stem, n, self.ext)
    }
}

impl std::fmt::Display for TargetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.ext)
    }
}

/// Splits `name` at the last `.` into `(stem, ext)`; `ext` includes the dot.
///
/// A name without a dot, or whose only dot is the leading one (`.env`), is all stem.
fn split_filename(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(i) => name.split_at(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(split_filename("cert.json"), ("cert", ".json"));
    }

    #[test]
    fn split_uses_last_dot() {
        assert_eq!(split_filename("archive.tar.gz"), ("archive.tar", ".gz"));
    }

    #[test]
    fn split_without_extension() {
        assert_eq!(split_filename("README"), ("README", ""));
        assert_eq!(split_filename(".env"), (".env", ""));
    }

    #[test]
    fn split_trailing_dot() {
        assert_eq!(split_filename("report."), ("report", "."));
    }

    #[test]
    fn numbered_names() {
        let name = TargetName::parse("cert.json").unwrap();
        assert_eq!(name.numbered(1), "cert_1.json");
        assert_eq!(name.numbered(42), "cert_42.json");
        let bare = TargetName::parse("dump").unwrap();
        assert_eq!(bare.numbered(7), "dump_7");
        assert_eq!(bare.to_string(), "dump");
    }

    #[test]
    fn rejects_paths_and_reserved_names() {
        for bad in ["", ".", "..", "a/b.json", "a\\b.json", "nul\0.json"] {
            assert!(
                matches!(TargetName::parse(bad), Err(UploadError::InvalidFilename(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
