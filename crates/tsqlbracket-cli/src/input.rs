//! File selection, reading and write-back.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Suffix a path must end with to be processed.
pub const SQL_SUFFIX: &str = ".sql";

/// Keep only paths ending in `.sql` (case-sensitive), in the order given.
pub fn select_sql_files(files: &[PathBuf]) -> Vec<&Path> {
    files
        .iter()
        .map(PathBuf::as_path)
        .filter(|path| is_sql_file(path))
        .collect()
}

fn is_sql_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(SQL_SUFFIX)
}

/// Read a whole script as text.
pub fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Replace a script's contents.
pub fn write_script(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write bracketed SQL to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_select_sql_files_keeps_order() {
        let files = vec![
            PathBuf::from("b.sql"),
            PathBuf::from("notes.txt"),
            PathBuf::from("a.sql"),
            PathBuf::from("script.SQL"),
            PathBuf::from("sql"),
        ];
        let selected = select_sql_files(&files);
        assert_eq!(selected, vec![Path::new("b.sql"), Path::new("a.sql")]);
    }

    #[test]
    fn test_select_sql_files_accepts_bare_suffix_name() {
        let files = vec![
            PathBuf::from(".sql"),
            PathBuf::from("dir/.sql"),
            PathBuf::from("x.sql.bak"),
        ];
        let selected = select_sql_files(&files);
        assert_eq!(selected, vec![Path::new(".sql"), Path::new("dir/.sql")]);
    }

    #[test]
    fn test_read_script() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SELECT * FROM users").unwrap();

        let content = read_script(file.path()).unwrap();
        assert!(content.contains("SELECT * FROM users"));
    }

    #[test]
    fn test_write_script_replaces_content() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SELECT id FROM users").unwrap();

        write_script(file.path(), "SELECT [id] FROM [users]\n").unwrap();
        assert_eq!(
            read_script(file.path()).unwrap(),
            "SELECT [id] FROM [users]\n"
        );
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_script(Path::new("/nonexistent/file.sql"));
        assert!(result.is_err());
    }
}
