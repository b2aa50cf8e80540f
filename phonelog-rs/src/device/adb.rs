use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::DeviceQuery;
use crate::error::{PhoneError, Result};

/// Marker in adb output when a content provider does not exist
const MISSING_PROVIDER: &str = "Could not find provider";
/// Line printed by `content query` for an empty result
const NO_RESULT: &str = "No result found.";

/// Device reached through `adb shell content query`
pub struct AdbDevice {
    adb_path: String,
}

impl AdbDevice {
    pub fn new(adb_path: impl Into<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
        }
    }
}

#[async_trait]
impl DeviceQuery for AdbDevice {
    async fn query(&self, uri: &str) -> Result<Vec<String>> {
        debug!("{} shell content query --uri {}", self.adb_path, uri);

        let output = Command::new(&self.adb_path)
            .args(["shell", "content", "query", "--uri", uri])
            .output()
            .await
            .map_err(|e| PhoneError::Query(format!("Failed to run {}: {}", self.adb_path, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stdout.contains(MISSING_PROVIDER) || stderr.contains(MISSING_PROVIDER) {
                return Err(PhoneError::Query(format!("Provider not available: {}", uri)));
            }
            return Err(PhoneError::Query(format!(
                "{} exited with {}: {}",
                self.adb_path,
                output.status,
                stderr.trim()
            )));
        }

        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty() && line.trim() != NO_RESULT)
            .map(str::to_string)
            .collect())
    }
}
