//! Path resolution for datasets and generated reports

use std::path::PathBuf;

pub const HOME_ENV: &str = "CHATGALAXY_HOME";

/// Resolves standard chatgalaxy paths
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// Use `$CHATGALAXY_HOME`, else `~/.chatgalaxy`
    pub fn new() -> std::io::Result<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(dir)));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_root(home.join(".chatgalaxy")))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.root.join("datasets")
    }

    pub fn dataset_dir(&self, dataset_id: &str) -> PathBuf {
        self.datasets_dir().join(dataset_id)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// `reports/<dataset>.insights.json`
    pub fn report_file(&self, dataset_id: &str) -> PathBuf {
        self.reports_dir().join(format!("{}.insights.json", dataset_id))
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }
}
