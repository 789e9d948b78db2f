#![cfg(feature = "image-io")]

use humoments::io::load_binary_image;
use humoments::source::{list_entry_names, load_reference, DirectorySource};
use humoments::{hu_moments, BatchConfig, BatchRunner, HuError, SkipReason};
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("humoments-src-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_mask(path: &Path, width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) {
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        image::Luma([if inside(x, y) { 200 } else { 0 }])
    });
    img.save(path).unwrap();
}

#[test]
fn loaded_png_thresholds_nonzero_samples() {
    let dir = scratch_dir("load");
    let path = dir.join("square.png");
    write_mask(&path, 5, 5, |_, _| true);
    let img = load_binary_image(&path).unwrap();
    let hu = hu_moments(&img).unwrap();
    assert!((hu[0] - 0.16).abs() < 1e-15);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn directory_run_skips_noise_and_keeps_listing_order() {
    let dir = scratch_dir("run");
    let search = dir.join("bank");
    fs::create_dir_all(search.join("nested")).unwrap();
    write_mask(&search.join("b.png"), 12, 12, |x, y| x < 6 && y < 9);
    write_mask(&search.join("a.png"), 12, 12, |x, y| x > 2 && y < 4);
    fs::write(search.join("Thumbs.db"), b"cache").unwrap();
    fs::write(search.join("notes.txt"), b"not an image").unwrap();
    let reference = dir.join("ref.png");
    write_mask(&reference, 10, 10, |x, y| x + y < 12);

    let names: Vec<String> = list_entry_names(&search)
        .unwrap()
        .iter()
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    let source = DirectorySource::open(&search).unwrap();
    let mut runner = BatchRunner::new(BatchConfig::default());
    let report = runner.run(load_reference(&reference), source).unwrap();

    assert_eq!(report.reference().label, "ref.png");
    let expected: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| n.ends_with(".png"))
        .collect();
    let labels: Vec<&str> = report.search_rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, expected);

    let mut skipped = report.skipped().to_vec();
    skipped.sort_by(|a, b| a.name.cmp(&b.name));
    let names: Vec<&str> = skipped.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Thumbs.db", "nested", "notes.txt"]);
    assert_eq!(skipped[0].reason, SkipReason::SkipName);
    assert_eq!(skipped[1].reason, SkipReason::Directory);
    assert!(matches!(skipped[2].reason, SkipReason::Decode(_)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = scratch_dir("missing");
    let err = DirectorySource::open(dir.join("nope")).err().unwrap();
    assert!(matches!(err, HuError::Io { .. }));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn skip_list_is_decided_by_the_runner_only() {
    let dir = scratch_dir("skiplist");
    write_mask(&dir.join("ref.png"), 8, 8, |x, y| x < 5 && y < 3);
    let search = dir.join("bank");
    fs::create_dir_all(&search).unwrap();
    fs::write(search.join("Thumbs.db"), b"cache").unwrap();

    let config = BatchConfig {
        skip_names: Vec::new(),
        ..BatchConfig::default()
    };
    let mut runner = BatchRunner::new(config);
    let report = runner
        .run(
            load_reference(dir.join("ref.png")),
            DirectorySource::open(&search).unwrap(),
        )
        .unwrap();
    assert_eq!(report.skipped().len(), 1);
    assert!(matches!(report.skipped()[0].reason, SkipReason::Decode(_)));

    let mut runner = BatchRunner::default();
    let report = runner
        .run(
            load_reference(dir.join("ref.png")),
            DirectorySource::open(&search).unwrap(),
        )
        .unwrap();
    assert_eq!(report.skipped()[0].reason, SkipReason::SkipName);
    let _ = fs::remove_dir_all(&dir);
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_names_still_load() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = scratch_dir("nonutf8");
    write_mask(&dir.join("ref.png"), 8, 8, |x, y| x < 5 && y < 3);
    let search = dir.join("bank");
    fs::create_dir_all(&search).unwrap();
    let odd = OsStr::from_bytes(b"odd\xff.png");
    write_mask(&search.join(odd), 8, 8, |x, y| x < 3 && y < 6);

    let mut runner = BatchRunner::default();
    let report = runner
        .run(
            load_reference(dir.join("ref.png")),
            DirectorySource::open(&search).unwrap(),
        )
        .unwrap();
    assert!(report.skipped().is_empty());
    assert_eq!(report.search_rows().len(), 1);
    assert_eq!(report.search_rows()[0].label, "odd\u{fffd}.png");
    let _ = fs::remove_dir_all(&dir);
}
