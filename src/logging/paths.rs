use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "segment-tts";

/// Get the log directory, creating it if needed
///
/// Resolution order:
/// 1. Custom directory from parameter (if provided)
/// 2. SEGMENT_TTS_LOG_DIR environment variable
/// 3. Platform data directory (via `dirs`)
/// 4. Temp directory as last resort
pub fn get_log_directory(custom_dir: Option<&str>) -> Result<PathBuf, std::io::Error> {
    let env_dir = env::var("SEGMENT_TTS_LOG_DIR").ok();
    let log_dir = resolve_log_directory(custom_dir, env_dir.as_deref());
    ensure_directory_exists(log_dir)
}

fn resolve_log_directory(custom_dir: Option<&str>, env_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = [custom_dir, env_dir]
        .into_iter()
        .flatten()
        .find(|d| !d.trim().is_empty())
    {
        return PathBuf::from(dir);
    }

    platform_log_dir().unwrap_or_else(|| env::temp_dir().join("segment_tts_logs"))
}

/// `~/.local/share/segment-tts/logs` on Linux, `~/Library/Application Support/...` on
/// macOS, `%LOCALAPPDATA%\...` on Windows
fn platform_log_dir() -> Option<PathBuf> {
    if let Some(data_dir) = dirs::data_local_dir() {
        let path = data_dir.join(APP_DIR_NAME).join("logs");
        if can_create(&path) {
            return Some(path);
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".local").join(APP_DIR_NAME).join("logs"))
        .filter(|path| can_create(path))
}

/// Check if a directory is writable
fn is_writable(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    let test_file = path.join(".write_test");
    let ok = fs::write(&test_file, "test").is_ok();
    let _ = fs::remove_file(&test_file);
    ok
}

/// Walk up to the nearest existing ancestor and check that it is writable
fn can_create(path: &Path) -> bool {
    path.ancestors()
        .find(|ancestor| ancestor.exists())
        .map(is_writable)
        .unwrap_or(false)
}

fn ensure_directory_exists(path: PathBuf) -> Result<PathBuf, std::io::Error> {
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");

        let result = ensure_directory_exists(log_dir.clone());
        assert_eq!(result.unwrap(), log_dir);
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_is_writable() {
        let temp_dir = TempDir::new().unwrap();
        assert!(is_writable(temp_dir.path()));
        assert!(!is_writable(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_can_create_under_writable_parent() {
        let temp_dir = TempDir::new().unwrap();
        assert!(can_create(&temp_dir.path().join("a").join("b")));
    }

    #[test]
    fn test_custom_directory_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().join("custom_logs");

        let result = get_log_directory(Some(custom_path.to_str().unwrap()));
        assert_eq!(result.unwrap(), custom_path);
        assert!(custom_path.exists());
    }

    #[test]
    fn test_custom_dir_wins_over_env_dir() {
        let resolved = resolve_log_directory(Some("/srv/custom"), Some("/srv/env"));
        assert_eq!(resolved, PathBuf::from("/srv/custom"));
    }

    #[test]
    fn test_env_dir_used_without_custom() {
        let resolved = resolve_log_directory(None, Some("/srv/env"));
        assert_eq!(resolved, PathBuf::from("/srv/env"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let resolved = resolve_log_directory(Some("  "), Some("/srv/env"));
        assert_eq!(resolved, PathBuf::from("/srv/env"));
    }
}
