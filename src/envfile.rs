use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key/value snapshot parsed from a `.env` style file.
///
/// Keys keep the order of their first appearance; a later duplicate
/// overwrites the earlier value.
#[derive(Default, PartialEq, Debug)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<EnvFile> {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(err) => {
                return Err(anyhow!(
                    "Cannot read environment file `{}`: {}",
                    path.as_ref().display(),
                    err
                ))
            }
        };

        let env = EnvFile::parse(&content);
        debug!(
            "Parsed {} variables from `{}`",
            env.len(),
            path.as_ref().display()
        );
        Ok(env)
    }

    pub fn parse(content: &str) -> EnvFile {
        let mut env = EnvFile::default();

        for line in content.lines() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            env.insert(key, unquote(value.trim()));
        }

        env
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value.to_owned(),
            None => {
                self.index.insert(key.to_owned(), self.entries.len());
                self.entries.push((key.to_owned(), value.to_owned()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip one pair of matching single or double quotes
fn unquote(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        return &value[1..value.len() - 1];
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic() {
        let env = EnvFile::parse(
            "# comment\n\
             \n\
             NEXT_PUBLIC_API_URL=http://localhost:8000/api\n\
             NEXT_PUBLIC_APP_NAME = My App \n\
             NO_EQUALS_SIGN\n\
             =orphan\n",
        );

        assert_eq!(env.len(), 2);
        assert_eq!(
            env.get("NEXT_PUBLIC_API_URL"),
            Some("http://localhost:8000/api")
        );
        assert_eq!(env.get("NEXT_PUBLIC_APP_NAME"), Some("My App"));
        assert_eq!(env.get("NO_EQUALS_SIGN"), None);
    }

    #[test]
    fn test_parse_quotes() {
        let env = EnvFile::parse(
            "DOUBLE=\"hello world\"\n\
             SINGLE='hello world'\n\
             NESTED=\"\"twice\"\"\n\
             MIXED=\"half'\n\
             LONE=\"\n\
             ESCAPED=\"a\\nb\"\n",
        );

        assert_eq!(env.get("DOUBLE"), Some("hello world"));
        assert_eq!(env.get("SINGLE"), Some("hello world"));
        assert_eq!(env.get("NESTED"), Some("\"twice\""));
        assert_eq!(env.get("MIXED"), Some("\"half'"));
        assert_eq!(env.get("LONE"), Some("\""));
        assert_eq!(env.get("ESCAPED"), Some("a\\nb"));
    }

    #[test]
    fn test_parse_value_keeps_later_equals() {
        let env = EnvFile::parse("API_SECRET_URL=http://host/?a=1&b=2\nEMPTY=\n");
        assert_eq!(env.get("API_SECRET_URL"), Some("http://host/?a=1&b=2"));
        assert_eq!(env.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_parse_comment_must_start_line() {
        let env = EnvFile::parse("  # INDENTED=yes\n#COMMENTED=yes\n");
        assert_eq!(env.get("# INDENTED"), Some("yes"));
        assert_eq!(env.get("#COMMENTED"), None);
    }

    #[test]
    fn test_parse_crlf() {
        let env = EnvFile::parse("A=1\r\nB=\"two\"\r\n");
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("two"));
    }

    #[test]
    fn test_parse_duplicate_last_wins() {
        let env = EnvFile::parse("FIRST=1\nDUP=a\nSECOND=2\nDUP=b\n");
        assert_eq!(env.get("DUP"), Some("b"));
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["FIRST", "DUP", "SECOND"]);
    }

    #[test]
    fn test_from_file() {
        let mut f = tempfile::Builder::new()
            .prefix("validate-env-")
            .suffix(".env")
            .tempfile()
            .unwrap();
        writeln!(f, "NEXT_PUBLIC_APP_NAME=\"Demo\"").unwrap();
        writeln!(f, "TOKEN_STORAGE=localStorage").unwrap();

        let env = EnvFile::from_file(f.path()).unwrap();
        assert_eq!(env.get("NEXT_PUBLIC_APP_NAME"), Some("Demo"));
        assert_eq!(env.get("TOKEN_STORAGE"), Some("localStorage"));
    }

    #[test]
    fn test_from_file_unreadable() {
        let tempdir = tempfile::tempdir().unwrap();
        let missing = tempdir.path().join(".env");
        let err = EnvFile::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("Cannot read environment file"));
        assert!(err.to_string().contains(missing.to_str().unwrap()));
    }
}
