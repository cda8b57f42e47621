use crate::error::IngestError;
use log::info;
use std::io;
use std::path::Path;

pub fn ensure_output_dir_exists(path: &Path) -> Result<(), IngestError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(IngestError::OutputNotDirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| IngestError::OutputDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(IngestError::OutputDirCreation(path.to_path_buf(), e)),
    }
}
