use crate::error::{HabitError, Result};

use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path};

/// Reads a TOML file into `T`, falling back to `T::default()` when the file
/// does not exist yet.
pub fn toml_to_struct<T: for<'a> Deserialize<'a> + Default>(path: &Path) -> Result<T> {
    let toml_string = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(HabitError::storage(path.display().to_string(), err)),
    };
    Ok(toml::from_str(&toml_string)?)
}

pub fn struct_to_toml<T: Serialize>(instance: &T, path: &Path) -> Result<()> {
    let data = toml::to_string_pretty(instance)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| HabitError::storage(parent.display().to_string(), err))?;
    }
    fs::write(path, data).map_err(|err| HabitError::storage(path.display().to_string(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        count: u8,
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let sample: Sample = toml_to_struct(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn writes_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("sample.toml");
        let sample = Sample {
            name: "x".into(),
            count: 3,
        };
        struct_to_toml(&sample, &path).unwrap();
        assert_eq!(toml_to_struct::<Sample>(&path).unwrap(), sample);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "name = ").unwrap();
        assert!(matches!(
            toml_to_struct::<Sample>(&path),
            Err(HabitError::Config(_))
        ));
    }
}
