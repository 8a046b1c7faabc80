//! Locate and read settings files (procsugar.toml)
use crate::desugar::settings::DesugarSettings;
use crate::driver::error::ProcsugarError;
use crate::driver::options::ProcsugarOptions;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

/// Name of the settings file looked for in the current path
pub const SETTINGS_FILE: &str = "procsugar.toml";

/// Return the path to the nearest procsugar.toml in an ancestor of
/// `start`
pub fn settings_file_from(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());

    while let Some(ref mut current) = dir {
        let candidate = current.join(SETTINGS_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Return the path to a .procsugar.toml in the users home directory
/// if it exists
pub fn dotfile() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".procsugar.toml");
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Read the definition keywords from settings text. `None` if the
/// text does not set any.
pub fn read_keywords(text: &str, name: &str) -> Result<Option<Vec<String>>, ProcsugarError> {
    let invalid = |msg: String| ProcsugarError::InvalidSettings(name.to_string(), msg);

    let value = text.parse::<Value>().map_err(|e| invalid(e.to_string()))?;

    match value.get("keywords") {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|k| {
                k.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("keywords must be strings".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid("keywords must be an array".to_string())),
    }
}

/// The settings file that applies to a run, if any
fn applicable_file(opt: &ProcsugarOptions) -> Option<PathBuf> {
    if let Some(config) = &opt.config {
        return Some(config.clone());
    }
    if opt.batch {
        return None;
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| settings_file_from(&cwd))
        .or_else(dotfile)
}

/// Work out settings from defaults, any settings file, then the
/// command line.
///
/// Keywords in a settings file replace the defaults; keywords on the
/// command line are added to them.
pub fn settings(opt: &ProcsugarOptions) -> Result<DesugarSettings, ProcsugarError> {
    let base = match applicable_file(opt) {
        Some(path) => {
            let name = path.to_string_lossy().to_string();
            let text = fs::read_to_string(&path)
                .map_err(|_| ProcsugarError::FileCouldNotBeRead(name.clone()))?;
            match read_keywords(&text, &name)? {
                Some(keywords) => DesugarSettings::new(keywords),
                None => DesugarSettings::default(),
            }
        }
        None => DesugarSettings::default(),
    };

    Ok(base.with_keywords(&opt.keywords))
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_read_keywords() {
        assert_eq!(
            read_keywords("keywords = [\"process\", \"task\"]\n", "t.toml").unwrap(),
            Some(vec!["process".to_string(), "task".to_string()])
        );
        assert_eq!(read_keywords("other = 1\n", "t.toml").unwrap(), None);
    }

    #[test]
    pub fn test_invalid_keywords() {
        let err = read_keywords("keywords = \"process\"\n", "t.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid settings in t.toml: keywords must be an array"
        );
        assert!(read_keywords("keywords = [1]\n", "t.toml").is_err());
        assert!(read_keywords("keywords = [", "t.toml").is_err());
    }

    #[test]
    pub fn test_command_line_adds_to_file() {
        let opt = ProcsugarOptions::for_tree("harness/001_definition.json")
            .with_config("harness/procsugar.toml")
            .with_keyword("step");
        let settings = settings(&opt).unwrap();
        assert_eq!(
            settings.keywords(),
            &["process".to_string(), "task".to_string(), "step".to_string()]
        );
    }

    #[test]
    pub fn test_batch_mode_uses_defaults() {
        let opt = ProcsugarOptions::for_tree("harness/001_definition.json").batch();
        assert_eq!(settings(&opt).unwrap(), DesugarSettings::default());
    }

    #[test]
    pub fn test_ancestor_lookup() {
        let harness = std::env::current_dir().unwrap().join("harness");
        assert_eq!(
            settings_file_from(&harness),
            Some(harness.join(SETTINGS_FILE))
        );
    }
}
