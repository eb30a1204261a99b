use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `*.json` files directly inside `dir`, sorted by name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Zip every JSON record in `json_dir` (flat, deflated) into `archive`,
/// replacing any previous archive. Returns the number of entries.
pub fn package(json_dir: &Path, archive: &Path) -> Result<usize> {
    let files = json_files(json_dir)?;
    if archive.exists() {
        std::fs::remove_file(archive)
            .with_context(|| format!("Failed to remove old archive {}", archive.display()))?;
    }

    let out = File::create(archive).with_context(|| format!("Failed to create {}", archive.display()))?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }
    zip.finish()?;

    info!("Packaged {} records into {}", files.len(), archive.display());
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packages_only_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records");
        std::fs::create_dir(&records).unwrap();
        std::fs::write(records.join("ptt__a__.json"), "{\"title\": \"甲\"}").unwrap();
        std::fs::write(records.join("dcard__b__.json"), "{}").unwrap();
        std::fs::write(records.join("notes.txt"), "skip").unwrap();

        let archive = dir.path().join("out.zip");
        std::fs::write(&archive, "stale").unwrap();
        assert_eq!(package(&records, &archive).unwrap(), 2);

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["dcard__b__.json", "ptt__a__.json"]);

        let mut body = String::new();
        std::io::Read::read_to_string(&mut zip.by_name("ptt__a__.json").unwrap(), &mut body).unwrap();
        assert_eq!(body, "{\"title\": \"甲\"}");
    }

    #[test]
    fn empty_dir_gives_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("empty.zip");
        assert_eq!(package(dir.path(), &archive).unwrap(), 0);
        assert!(archive.exists());
    }
}
