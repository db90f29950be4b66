//! In-memory linglong.yaml document
//!
//! The document is held as a generic YAML value so that every field this
//! tool does not touch survives the round trip with its key order intact.
//! Only `sources[i].{name,url,digest}`, `package.version` and `build` are
//! ever edited, and sections are never created when absent.

use crate::domain::extract_version;
use crate::error::ManifestError;
use serde_yaml_ng::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view of one entry in `sources`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Position in the `sources` sequence
    pub index: usize,
    /// `name` field, empty if absent
    pub name: String,
    /// `url` field, empty if absent
    pub url: String,
}

impl SourceEntry {
    /// Version embedded in the URL
    pub fn version(&self) -> Option<String> {
        extract_version(&self.url)
    }
}

/// New values for a source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUpdate {
    pub name: String,
    pub url: String,
    pub digest: String,
}

/// A parsed manifest file
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    root: Value,
}

impl ManifestDocument {
    /// Read and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(path, &content)
    }

    /// Parse manifest content; `path` is kept for saving and error messages
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let root: Value = serde_yaml_ng::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error(&path, e.to_string()))?;

        if !root.is_mapping() {
            return Err(ManifestError::yaml_parse_error(
                &path,
                "document root is not a mapping",
            ));
        }

        let has_sources = root
            .get("sources")
            .and_then(Value::as_sequence)
            .is_some_and(|s| !s.is_empty());
        if !has_sources {
            return Err(ManifestError::missing_sources(&path));
        }

        Ok(Self { path, root })
    }

    /// Path the document was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every entry in `sources`
    pub fn sources(&self) -> Vec<SourceEntry> {
        let Some(sources) = self.root.get("sources").and_then(Value::as_sequence) else {
            return Vec::new();
        };

        sources
            .iter()
            .enumerate()
            .map(|(index, source)| SourceEntry {
                index,
                name: string_field(source, "name"),
                url: string_field(source, "url"),
            })
            .collect()
    }

    /// Version referenced by the first source URL that carries one
    pub fn current_version(&self) -> Option<String> {
        self.sources()
            .iter()
            .filter(|s| !s.url.is_empty())
            .find_map(SourceEntry::version)
    }

    /// `package.version`, if present and textual
    pub fn package_version(&self) -> Option<&str> {
        self.root
            .get("package")
            .and_then(|p| p.get("version"))
            .and_then(Value::as_str)
    }

    /// `build`, if present and textual
    pub fn build(&self) -> Option<&str> {
        self.root.get("build").and_then(Value::as_str)
    }

    /// Overwrite name, url and digest of the source at `index`
    ///
    /// Returns false if there is no mapping at that position.
    pub fn update_source(&mut self, index: usize, update: &SourceUpdate) -> bool {
        let Some(source) = self
            .root
            .get_mut("sources")
            .and_then(Value::as_sequence_mut)
            .and_then(|s| s.get_mut(index))
            .and_then(Value::as_mapping_mut)
        else {
            return false;
        };

        source.insert("url".into(), update.url.clone().into());
        source.insert("digest".into(), update.digest.clone().into());
        source.insert("name".into(), update.name.clone().into());
        true
    }

    /// Set `package.version`; returns false if there is no `package` mapping
    pub fn set_package_version(&mut self, version: &str) -> bool {
        match self.root.get_mut("package").and_then(Value::as_mapping_mut) {
            Some(package) => {
                package.insert("version".into(), version.into());
                true
            }
            None => false,
        }
    }

    /// Replace every literal occurrence of `old` with `new` in `build`
    ///
    /// Returns true only if the text actually changed.
    pub fn replace_in_build(&mut self, old: &str, new: &str) -> bool {
        if old.is_empty() || old == new {
            return false;
        }
        let Some(Value::String(build)) = self.root.get_mut("build") else {
            return false;
        };
        if !build.contains(old) {
            return false;
        }
        *build = build.replace(old, new);
        true
    }

    /// Serialize the document back to YAML
    ///
    /// Multi-line strings such as `build` come out in literal block style.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        serde_yaml_ng::to_string(&self.root).map_err(|e| ManifestError::YamlWriteError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the document back to where it was loaded from
    pub fn save(&self) -> Result<(), ManifestError> {
        let content = self.to_yaml()?;
        fs::write(&self.path, content).map_err(|e| ManifestError::write_error(&self.path, e))
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"version: '1'
package:
  id: com.sublimetext.sublime-text
  name: sublime-text
  version: 4.0.0.0101
  kind: app
command:
  - /opt/apps/com.sublimetext.sublime-text/files/bin/sublime_text
base: org.deepin.base/23.1.0
sources:
  - kind: file
    url: https://download.sublimetext.com/sublime-text_build-4192_amd64.deb
    digest: aaaa
    name: sublime-text_build-4192_amd64.deb
build: |
  dpkg -x sublime-text_build-4192_amd64.deb $PREFIX
  echo done
"#;

    fn doc() -> ManifestDocument {
        ManifestDocument::parse("linglong.yaml", MANIFEST).unwrap()
    }

    #[test]
    fn test_parse_and_read_fields() {
        let doc = doc();
        assert_eq!(doc.package_version(), Some("4.0.0.0101"));
        assert!(doc.build().unwrap().contains("4192"));
        let sources = doc.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "sublime-text_build-4192_amd64.deb");
    }

    #[test]
    fn test_current_version_from_url() {
        assert_eq!(doc().current_version(), Some("4192".to_string()));
    }

    #[test]
    fn test_current_version_skips_sources_without_version() {
        let content = r#"sources:
  - kind: git
    url: https://github.com/org/helper.git
  - kind: file
    url: https://example.com/app_1.2.3_amd64.deb
"#;
        let doc = ManifestDocument::parse("linglong.yaml", content).unwrap();
        assert_eq!(doc.current_version(), Some("1.2.3".to_string()));
    }

    #[test]
    fn test_parse_missing_sources() {
        let err = ManifestDocument::parse("linglong.yaml", "package:\n  version: 1\n").unwrap_err();
        assert!(matches!(err, ManifestError::MissingSources { .. }));

        let err = ManifestDocument::parse("linglong.yaml", "sources: []\n").unwrap_err();
        assert!(matches!(err, ManifestError::MissingSources { .. }));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = ManifestDocument::parse("linglong.yaml", "sources: [unclosed\n").unwrap_err();
        assert!(matches!(err, ManifestError::YamlParseError { .. }));
    }

    #[test]
    fn test_parse_non_mapping_root() {
        let err = ManifestDocument::parse("linglong.yaml", "- a\n- b\n").unwrap_err();
        assert!(matches!(err, ManifestError::YamlParseError { .. }));
    }

    #[test]
    fn test_update_source_keeps_key_order() {
        let mut doc = doc();
        assert!(doc.update_source(
            0,
            &SourceUpdate {
                name: "sublime-text_build-4200_amd64.deb".to_string(),
                url: "https://download.sublimetext.com/sublime-text_build-4200_amd64.deb"
                    .to_string(),
                digest: "bbbb".to_string(),
            },
        ));

        let yaml = doc.to_yaml().unwrap();
        let kind = yaml.find("kind: file").unwrap();
        let url = yaml
            .find("url: https://download.sublimetext.com/sublime-text_build-4200")
            .unwrap();
        let digest = yaml.find("digest: bbbb").unwrap();
        let name = yaml.find("name: sublime-text_build-4200_amd64.deb").unwrap();
        assert!(kind < url && url < digest && digest < name);
    }

    #[test]
    fn test_update_source_out_of_range() {
        let mut doc = doc();
        let update = SourceUpdate {
            name: String::new(),
            url: String::new(),
            digest: String::new(),
        };
        assert!(!doc.update_source(5, &update));
    }

    #[test]
    fn test_set_package_version_without_package() {
        let mut doc = ManifestDocument::parse(
            "linglong.yaml",
            "sources:\n  - url: https://x/app_1.0.deb\n",
        )
        .unwrap();
        assert!(!doc.set_package_version("1.0.0.0101"));
        assert!(!doc.to_yaml().unwrap().contains("package:"));
    }

    #[test]
    fn test_replace_in_build() {
        let mut doc = doc();
        assert!(doc.replace_in_build(
            "sublime-text_build-4192_amd64.deb",
            "sublime-text_build-4200_amd64.deb"
        ));
        let build = doc.build().unwrap();
        assert!(build.contains("sublime-text_build-4200_amd64.deb"));
        assert!(!build.contains("4192"));
    }

    #[test]
    fn test_replace_in_build_no_match() {
        let mut doc = doc();
        assert!(!doc.replace_in_build("other.deb", "new.deb"));
        assert!(!doc.replace_in_build("", "new.deb"));
    }

    #[test]
    fn test_to_yaml_uses_literal_block_for_build() {
        let yaml = doc().to_yaml().unwrap();
        assert!(yaml.contains("build: |"));
        assert!(yaml.contains("  echo done"));
    }

    #[test]
    fn test_round_trip_preserves_untouched_fields() {
        let doc = doc();
        let reparsed = ManifestDocument::parse("linglong.yaml", &doc.to_yaml().unwrap()).unwrap();
        assert_eq!(doc.root, reparsed.root);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("linglong.yaml");
        fs::write(&path, MANIFEST).unwrap();

        let mut doc = ManifestDocument::load(&path).unwrap();
        assert!(doc.set_package_version("4.2.0.1018"));
        doc.save().unwrap();

        let reloaded = ManifestDocument::load(&path).unwrap();
        assert_eq!(reloaded.package_version(), Some("4.2.0.1018"));
        assert_eq!(reloaded.path(), path.as_path());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ManifestDocument::load(Path::new("/nonexistent/linglong.yaml")).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }
}
