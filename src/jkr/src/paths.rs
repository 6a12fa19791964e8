//! Save directory layout and platform detection.
//!
//! Balatro keeps one live save per profile slot under the LÖVE save
//! directory (`.../AppData/Roaming/Balatro`); backups live next to it in a
//! `backups/` subdirectory.

use std::path::{Path, PathBuf};

/// Suffix every Balatro save folder ends with, native or Proton.
pub const SAVE_FOLDER_SUFFIX: &str = "AppData/Roaming/Balatro";

/// Live save file, relative to the save folder (profile slot 1).
pub const LIVE_SAVE_SUFFIX: &str = "1/save.jkr";

/// Backup directory name, relative to the save folder.
pub const BACKUP_DIR_NAME: &str = "backups";

/// Balatro's Steam app id, used to locate the Proton prefix.
#[cfg(target_os = "linux")]
const BALATRO_APP_ID: &str = "2379780";

/// Resolved locations for one monitored save folder.
///
/// Threaded explicitly into [`SaveCoordinator`](crate::SaveCoordinator);
/// nothing here is global state.
#[derive(Debug, Clone)]
pub struct SavePaths {
    root: PathBuf,
}

impl SavePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SavePaths { root: root.into() }
    }

    /// The save folder root - the directory the monitor watches.
    pub fn save_folder(&self) -> &Path {
        &self.root
    }

    /// The live save file (`<root>/1/save.jkr`).
    pub fn live_save(&self) -> PathBuf {
        self.root.join(LIVE_SAVE_SUFFIX)
    }

    /// The backup directory (`<root>/backups`).
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(BACKUP_DIR_NAME)
    }

    /// Whether the root looks like a Balatro save folder.
    ///
    /// Hosts are expected to check this before handing the folder to the
    /// coordinator. Tolerates trailing separators and Windows-style
    /// backslashes.
    pub fn is_balatro_folder(&self) -> bool {
        let normalized = self.root.to_string_lossy().replace('\\', "/");
        normalized
            .trim_end_matches('/')
            .ends_with(SAVE_FOLDER_SUFFIX)
    }
}

/// Detect the default Balatro save folder for the current platform.
///
/// Checks the standard locations:
/// - **Windows**: `%APPDATA%\Balatro`
/// - **Linux (Proton)**: `<steam library>/steamapps/compatdata/2379780/pfx/drive_c/users/steamuser/AppData/Roaming/Balatro`
///
/// Returns the first location that exists, or `None`.
///
/// # Example
///
/// ```no_run
/// if let Some(folder) = jkr::detect_save_directory() {
///     println!("Found saves at: {}", folder.display());
/// }
/// ```
pub fn detect_save_directory() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        detect_windows_save_directory()
    }

    #[cfg(target_os = "linux")]
    {
        detect_linux_save_directory()
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(target_os = "windows")]
fn detect_windows_save_directory() -> Option<PathBuf> {
    // %APPDATA% already points at AppData\Roaming
    let appdata = std::env::var("APPDATA").ok()?;
    let dir = PathBuf::from(appdata).join("Balatro");
    dir.is_dir().then_some(dir)
}

#[cfg(target_os = "linux")]
fn detect_linux_save_directory() -> Option<PathBuf> {
    let proton_suffix = format!(
        "steamapps/compatdata/{}/pfx/drive_c/users/steamuser/AppData/Roaming/Balatro",
        BALATRO_APP_ID
    );

    // Try XDG_DATA_HOME first
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        let dir = PathBuf::from(xdg_data).join("Steam").join(&proton_suffix);
        if dir.is_dir() {
            return Some(dir);
        }
    }

    // Then the usual Steam roots under $HOME
    if let Ok(home) = std::env::var("HOME") {
        for steam_root in [".local/share/Steam", ".steam/steam", ".steam"] {
            let dir = PathBuf::from(&home).join(steam_root).join(&proton_suffix);
            if dir.is_dir() {
                return Some(dir);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let paths = SavePaths::new("/data/AppData/Roaming/Balatro");
        assert_eq!(
            paths.live_save(),
            PathBuf::from("/data/AppData/Roaming/Balatro/1/save.jkr")
        );
        assert_eq!(
            paths.backup_dir(),
            PathBuf::from("/data/AppData/Roaming/Balatro/backups")
        );
    }

    #[test]
    fn test_is_balatro_folder() {
        assert!(SavePaths::new("/data/AppData/Roaming/Balatro").is_balatro_folder());
        assert!(SavePaths::new("/data/AppData/Roaming/Balatro/").is_balatro_folder());
        assert!(SavePaths::new(r"C:\Users\u\AppData\Roaming\Balatro").is_balatro_folder());

        assert!(!SavePaths::new("/data/AppData/Roaming/Terraria").is_balatro_folder());
        assert!(!SavePaths::new("/data/Balatro").is_balatro_folder());
    }
}
