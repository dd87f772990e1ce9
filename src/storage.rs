use crate::errors::AppError;
use crate::models::NutritionLog;
use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// Reads the persisted log. A missing file starts an empty log; a file that
/// no longer parses is renamed aside so the next write cannot clobber it.
pub async fn load_log(path: &Path) -> io::Result<NutritionLog> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(NutritionLog::default()),
        Err(err) => return Err(err),
    };
    match serde_json::from_slice(&bytes) {
        Ok(log) => Ok(log),
        Err(err) => {
            let aside = corrupt_path(path);
            error!("failed to parse data file: {err}");
            fs::rename(path, &aside).await?;
            warn!(moved_to = %aside.display(), "unreadable data file moved aside");
            Ok(NutritionLog::default())
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{stamp}"));
    path.with_file_name(name)
}

pub async fn persist_log(path: &Path, log: &NutritionLog) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(log)?;
    fs::write(path, payload).await?;
    Ok(())
}
