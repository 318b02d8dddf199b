//! JAR/ZIP archive handling.
//!
//! Minecraft mods ship as zip-structured `.jar` files. This module unpacks
//! them into a working directory and repacks a working directory into a new
//! archive. Repacking strips stale JAR signature entries: the game refuses
//! to load a signed archive whose contents no longer match the signature.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use zip::read::ZipArchive;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive not found: {0}")]
    NotFound(String),

    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Check whether a path looks like a mod archive (`.jar` or `.zip`).
pub fn is_archive_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "jar" | "zip"))
        .unwrap_or(false)
}

/// Unpack an archive into `output_dir/<archive stem>/`.
///
/// Returns the directory the entries were extracted into.
pub fn unpack_archive(archive_path: &Path, output_dir: &Path) -> ArchiveResult<PathBuf> {
    if !archive_path.exists() {
        return Err(ArchiveError::NotFound(archive_path.display().to_string()));
    }
    if !is_archive_file(archive_path) {
        return Err(ArchiveError::InvalidFormat(
            archive_path.display().to_string(),
        ));
    }

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|err| {
        ArchiveError::InvalidFormat(format!("{}: {err}", archive_path.display()))
    })?;

    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("archive");
    let extract_path = output_dir.join(stem);
    fs::create_dir_all(&extract_path)?;

    archive.extract(&extract_path)?;
    debug!(
        "unpacked {} entries from {} into {}",
        archive.len(),
        archive_path.display(),
        extract_path.display()
    );

    Ok(extract_path)
}

/// Pack a directory tree into a zip-structured archive at `output_path`.
///
/// Signature entries are silently omitted; everything else is stored with
/// deflate compression under its path relative to `source_dir`. An existing
/// archive at `output_path` is overwritten.
pub fn pack_archive(source_dir: &Path, output_path: &Path) -> ArchiveResult<PathBuf> {
    if !source_dir.exists() {
        return Err(ArchiveError::NotFound(source_dir.display().to_string()));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut files = Vec::new();
    collect_files(source_dir, &mut files)?;
    files.sort();

    let output_file = File::create(output_path)?;
    let mut writer = ZipWriter::new(output_file);

    let options = FileOptions::<()>::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in &files {
        let relative = path
            .strip_prefix(source_dir)
            .expect("collected path is under source_dir");

        if is_signature_entry(relative) {
            debug!("dropping stale signature entry {}", relative.display());
            continue;
        }

        let entry_name = relative.to_string_lossy().replace('\\', "/");
        writer.start_file(entry_name.as_str(), options.clone())?;
        writer.write_all(&fs::read(path)?)?;
    }

    writer.finish()?;
    Ok(output_path.to_path_buf())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// JAR signature entries live under META-INF and must not survive repacking.
fn is_signature_entry(relative: &Path) -> bool {
    let mut parts = relative.components();
    let first = match parts.next() {
        Some(part) => part.as_os_str().to_string_lossy().to_uppercase(),
        None => return false,
    };
    if first != "META-INF" {
        return false;
    }

    let name = match relative.file_name() {
        Some(name) => name.to_string_lossy().to_uppercase(),
        None => return false,
    };

    name.ends_with(".SF")
        || name.ends_with(".RSA")
        || name.ends_with(".DSA")
        || name.starts_with("SIG-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_file(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn entry_names(archive_path: &Path) -> BTreeSet<String> {
        let file = File::open(archive_path).unwrap();
        let archive = ZipArchive::new(file).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn detects_archive_files() {
        assert!(is_archive_file(Path::new("mod.jar")));
        assert!(is_archive_file(Path::new("mod.JAR")));
        assert!(is_archive_file(Path::new("pack.zip")));
        assert!(!is_archive_file(Path::new("file.json")));
        assert!(!is_archive_file(Path::new("noext")));
    }

    #[test]
    fn signature_rule_matches_meta_inf_artifacts() {
        assert!(is_signature_entry(Path::new("META-INF/CERT.RSA")));
        assert!(is_signature_entry(Path::new("META-INF/CERT.SF")));
        assert!(is_signature_entry(Path::new("META-INF/KEY.DSA")));
        assert!(is_signature_entry(Path::new("META-INF/SIG-ALIAS")));
        assert!(is_signature_entry(Path::new("meta-inf/cert.rsa")));
    }

    #[test]
    fn signature_rule_keeps_everything_else() {
        assert!(!is_signature_entry(Path::new("META-INF/MANIFEST.MF")));
        assert!(!is_signature_entry(Path::new("META-INF/mods.toml")));
        assert!(!is_signature_entry(Path::new("assets/CERT.RSA")));
        assert!(!is_signature_entry(Path::new("CERT.RSA")));
    }

    #[test]
    fn unpack_missing_archive_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = unpack_archive(&dir.path().join("absent.jar"), dir.path());
        assert!(matches!(result, Err(ArchiveError::NotFound(_))));
    }

    #[test]
    fn unpack_rejects_non_zip_bytes() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("bogus.jar");
        fs::write(&bogus, b"not a zip at all").unwrap();
        let result = unpack_archive(&bogus, dir.path());
        assert!(matches!(result, Err(ArchiveError::InvalidFormat(_))));
    }

    #[test]
    fn pack_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = pack_archive(&dir.path().join("absent"), &dir.path().join("out.jar"));
        assert!(matches!(result, Err(ArchiveError::NotFound(_))));
    }

    #[test]
    fn round_trip_preserves_entries_minus_signatures() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("mod");
        write_file(&tree, "assets/mymod/lang/en_us.json", "{}");
        write_file(&tree, "assets/mymod/textures/icon.png", "png");
        write_file(&tree, "META-INF/MANIFEST.MF", "Manifest-Version: 1.0");
        write_file(&tree, "META-INF/CERT.RSA", "signature");
        write_file(&tree, "META-INF/CERT.SF", "digests");

        let jar = dir.path().join("mod.jar");
        pack_archive(&tree, &jar).unwrap();

        let names = entry_names(&jar);
        assert!(names.contains("assets/mymod/lang/en_us.json"));
        assert!(names.contains("assets/mymod/textures/icon.png"));
        assert!(names.contains("META-INF/MANIFEST.MF"));
        assert!(!names.contains("META-INF/CERT.RSA"));
        assert!(!names.contains("META-INF/CERT.SF"));

        let unpacked = unpack_archive(&jar, &dir.path().join("work")).unwrap();
        assert!(unpacked.ends_with("mod"));
        assert!(unpacked.join("assets/mymod/lang/en_us.json").exists());
        assert!(unpacked.join("META-INF/MANIFEST.MF").exists());

        // Packing the untouched working copy again only drops what the
        // signature rule names.
        let repacked = dir.path().join("repacked.jar");
        pack_archive(&unpacked, &repacked).unwrap();
        assert_eq!(entry_names(&repacked), names);
    }

    #[test]
    fn pack_overwrites_existing_archive() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("mod");
        write_file(&tree, "a.txt", "first");

        let jar = dir.path().join("out.jar");
        pack_archive(&tree, &jar).unwrap();
        write_file(&tree, "b.txt", "second");
        pack_archive(&tree, &jar).unwrap();

        let names = entry_names(&jar);
        assert!(names.contains("a.txt"));
        assert!(names.contains("b.txt"));
    }
}
