use std::io::{Cursor, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use gonv_archive::{ArchiveFormat, Error, ExtractOptions, extract_file, extract_from_reader};
use tempfile::tempdir;

fn go_tar_gz() -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_mode(0o755);
    dir.set_size(0);
    builder.append_data(&mut dir, "go/", &[][..]).unwrap();

    for (path, mode, body) in [
        ("go/VERSION", 0o644, &b"go1.21.0\n"[..]),
        ("go/bin/go", 0o755, &b"#!/bin/sh\necho go\n"[..]),
        ("go/bin/gofmt", 0o755, &b"#!/bin/sh\necho gofmt\n"[..]),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_mode(mode);
        header.set_size(body.len() as u64);
        builder.append_data(&mut header, path, body).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn go_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    writer.add_directory("go/", options).unwrap();
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn extract_tar_gz_strips_go_dir() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("go1.21.0.linux-amd64.tar.gz");
    std::fs::write(&archive, go_tar_gz()).unwrap();
    let dest = dir.path().join("out");

    let report = extract_file(&archive, &dest, &ExtractOptions::default().strip_components(1)).unwrap();
    assert_eq!(report.format, ArchiveFormat::TarGz);
    assert_eq!(report.entry_count, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(std::fs::read_to_string(dest.join("VERSION")).unwrap(), "go1.21.0\n");
    assert!(dest.join("bin/gofmt").is_file());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dest.join("bin/go")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        let mode = std::fs::metadata(dest.join("VERSION")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}

#[test]
fn extract_zip_strips_go_dir() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("out");
    let bytes = go_zip(&[("go/bin/go.exe", b"MZ"), ("go/VERSION", b"go1.21.0")]);

    let report = extract_from_reader(Cursor::new(bytes), &dest, &ExtractOptions::default().strip_components(1)).unwrap();
    assert_eq!(report.format, ArchiveFormat::Zip);
    assert_eq!(std::fs::read(dest.join("bin/go.exe")).unwrap(), b"MZ");
    assert_eq!(std::fs::read(dest.join("VERSION")).unwrap(), b"go1.21.0");
}

#[test]
fn zip_slip_is_rejected() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("out");
    let bytes = go_zip(&[("../evil.txt", b"pwned")]);

    let err = extract_from_reader(Cursor::new(bytes), &dest, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::ZipSlip { .. }));
    assert!(!dir.path().join("evil.txt").exists());
}

#[cfg(unix)]
#[test]
fn escaping_symlink_is_rejected() {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    builder
        .append_link(&mut header, "go/bin/evil", "../../../outside")
        .unwrap();
    let bytes = builder.into_inner().unwrap();

    let dir = tempdir().unwrap();
    let err = extract_from_reader(Cursor::new(bytes), dir.path().join("out"), &ExtractOptions::default().strip_components(1))
        .unwrap_err();
    assert!(matches!(err, Error::SymlinkEscape { .. }));
}

#[test]
fn unsupported_format_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not an archive").unwrap();

    match extract_file(&path, dir.path().join("out"), &ExtractOptions::default()).unwrap_err() {
        Error::UnsupportedFormat { path: reported } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!Path::new(&dir.path().join("out")).exists());
}
