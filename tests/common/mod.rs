//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ARCHIVE_ROUTE: &str = "/openal-binaries/openal-soft-1.18.2-bin.zip";

const ROOT: &str = "openal-soft-1.18.2-bin";

/// Entries of a cut-down OpenAL Soft binary distribution.
pub fn openal_entries() -> Vec<(String, &'static str)> {
    [
        ("README.txt", "readme"),
        ("include/AL/al.h", "al.h"),
        ("include/AL/alc.h", "alc.h"),
        ("include/AL/alext.h", "alext.h"),
        ("include/AL/efx.h", "efx.h"),
        ("libs/Win32/OpenAL32.lib", "lib32"),
        ("libs/Win32/libOpenAL32.dll.a", "mingw32"),
        ("libs/Win64/OpenAL32.lib", "lib64"),
        ("bin/Win32/soft_oal.dll", "dll32"),
        ("bin/Win32/openal-info.exe", "info32"),
        ("bin/Win64/soft_oal.dll", "dll64"),
        ("bin/Win64/openal-info.exe", "info64"),
    ]
    .into_iter()
    .map(|(name, data)| (format!("{}/{}", ROOT, name), data))
    .collect()
}

/// Build a zip archive in memory.
pub fn zip_bytes(entries: &[(String, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn openal_zip() -> Vec<u8> {
    zip_bytes(&openal_entries())
}

/// Serve `body` at the archive route, expecting exactly `hits` requests.
pub async fn serve_archive(server: &MockServer, body: Vec<u8>, hits: u64) {
    Mock::given(method("GET"))
        .and(path(ARCHIVE_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(hits)
        .mount(server)
        .await;
}

pub fn archive_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), ARCHIVE_ROUTE)
}

/// File names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

/// Every file under `dir` with its contents, keyed by relative path.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}
