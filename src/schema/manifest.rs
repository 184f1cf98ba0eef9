//! Show library manifest: the ordered list of available show files.

use serde::{Deserialize, Serialize};

/// Contents of `fileList.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Show file names, in display order.
    pub files: Vec<String>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// First listed show, opened at startup.
    pub fn first(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Whether `name` is a plain file name that cannot escape the data directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json(r#"{"files": ["opening.skyc", "finale.skyc"]}"#).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.first(), Some("opening.skyc"));
        assert!(manifest.contains("finale.skyc"));
        assert!(!manifest.contains("encore.skyc"));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(Manifest::from_json(r#"["a.skyc"]"#).is_err());
        assert!(Manifest::from_json(r#"{"files": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("show.skyc"));
        assert!(is_plain_file_name("..hidden.skyc"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("dir\\show.skyc"));
    }
}
