//! This module provides the `ProgramLoader` struct, responsible for loading machine programs
//! from files, strings and directories.

use crate::analyzer::analyze;
use crate::parser::parse;
use crate::types::{MachineError, Program};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of text program descriptions.
pub const PROGRAM_EXTENSION: &str = "dtm";
/// File extension of JSON program descriptions.
pub const JSON_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading machine programs.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// Files with a `.json` extension are deserialized with `serde_json`; anything else is
    /// parsed as the `.dtm` text format. Either way the program is analyzed before it is
    /// returned.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and turned into a valid `Program`.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` / `Err(MachineError::JsonError)` if the content is malformed.
    /// * `Err(MachineError::ValidationError)` if the program fails analysis.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loading program");

        if path.extension().is_some_and(|ext| ext == JSON_EXTENSION) {
            Self::load_program_from_json(&content)
        } else {
            Self::load_program_from_string(&content)
        }
    }

    /// Loads a single program from `.dtm` text content, e.g. from user input.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        parse(content)
    }

    /// Loads a single program from its JSON representation.
    pub fn load_program_from_json(content: &str) -> Result<Program, MachineError> {
        let program: Program = serde_json::from_str(content)?;
        analyze(&program)?;

        Ok(program)
    }

    /// Loads every program file (`.dtm` or `.json`) from a given directory, ordered by path.
    ///
    /// Subdirectories and files with other extensions are skipped. Every program file yields
    /// one result, so a broken program does not hide the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        let mut paths = match Self::program_files(directory) {
            Ok(paths) => paths,
            Err(e) => return vec![Err(e)],
        };
        paths.sort();

        paths
            .into_iter()
            .map(|path| match Self::load_program(&path) {
                Ok(program) => Ok((path, program)),
                Err(e) => Err(MachineError::FileError(format!(
                    "Failed to load program from {}: {}",
                    path.display(),
                    e
                ))),
            })
            .collect()
    }

    /// Returns `true` for paths with one of the extensions `load_program` understands.
    pub fn is_program_file(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == PROGRAM_EXTENSION || ext == JSON_EXTENSION)
    }

    fn program_files(directory: &Path) -> Result<Vec<PathBuf>, MachineError> {
        let entries = fs::read_dir(directory).map_err(|e| {
            MachineError::FileError(format!(
                "Failed to read directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| {
                    MachineError::FileError(format!("Failed to read directory entry: {e}"))
                })?
                .path();

            if path.is_file() && Self::is_program_file(&path) {
                paths.push(path);
            }
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Machine;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID_PROGRAM: &str =
        "name: Test Program\nstates: 2\ntapes: 0\nstart: 0\naccepting: 1\n(0, a, ~) -> (1, +1, a, +1)";

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.dtm");
        write_file(&file_path, VALID_PROGRAM);

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.name, "Test Program");
        assert_eq!(program.commands.len(), 1);
        assert!(Machine::from(&program).check("a"));
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.dtm");
        write_file(&file_path, "This is not a valid program");

        let result = ProgramLoader::load_program(&file_path);
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("missing.dtm"));

        let error = result.unwrap_err();
        assert!(matches!(error, MachineError::FileError(_)));
        assert!(error.to_string().contains("missing.dtm"));
    }

    #[test]
    fn test_load_json_program() {
        let dir = tempdir().unwrap();
        let program = ProgramLoader::load_program_from_string(VALID_PROGRAM).unwrap();

        let file_path = dir.path().join("test.json");
        write_file(&file_path, &serde_json::to_string_pretty(&program).unwrap());

        let loaded = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_load_json_defaults() {
        let json = r#"{ "states": 1, "tapes": 0, "start": 0, "accepting": [0] }"#;
        let program = ProgramLoader::load_program_from_json(json).unwrap();

        assert_eq!(program.name, "Untitled");
        assert!(program.commands.is_empty());
        assert!(Machine::from(&program).check(""));
    }

    #[test]
    fn test_load_invalid_json() {
        let result = ProgramLoader::load_program_from_json("{ \"states\": ");
        assert!(matches!(result, Err(MachineError::JsonError(_))));

        let result = ProgramLoader::load_program_from_json(
            r#"{ "states": 1, "tapes": 0, "start": 3 }"#,
        );
        assert!(matches!(result, Err(MachineError::ValidationError(_))));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.dtm"), VALID_PROGRAM);
        write_file(&dir.path().join("invalid.dtm"), "This is not a valid program");
        write_file(&dir.path().join("ignored.txt"), "This file should be ignored");

        let results = ProgramLoader::load_programs(dir.path());

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_programs_includes_json_in_path_order() {
        let dir = tempdir().unwrap();
        let program = ProgramLoader::load_program_from_string(VALID_PROGRAM).unwrap();

        write_file(&dir.path().join("b.dtm"), VALID_PROGRAM);
        write_file(
            &dir.path().join("a.json"),
            &serde_json::to_string(&program).unwrap(),
        );
        fs::create_dir(dir.path().join("nested.dtm")).unwrap();

        let results = ProgramLoader::load_programs(dir.path());
        let paths: Vec<_> = results
            .iter()
            .map(|r| r.as_ref().unwrap().0.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(paths, ["a.json", "b.dtm"]);
        assert!(results.iter().all(|r| r.as_ref().unwrap().1 == program));
    }

    #[test]
    fn test_is_program_file() {
        assert!(ProgramLoader::is_program_file(Path::new("x/palindrome.dtm")));
        assert!(ProgramLoader::is_program_file(Path::new("palindrome.json")));
        assert!(!ProgramLoader::is_program_file(Path::new("notes.txt")));
        assert!(!ProgramLoader::is_program_file(Path::new("dtm")));
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(MachineError::FileError(_))));
    }
}
