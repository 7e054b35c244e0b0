//! End-to-end pipeline tests over the real backend, cache, and emitters.
//!
//! Everything runs against temp directories: a synthetic source image goes
//! in, and we assert on the emitted artifact, the output dimensions, and the
//! cache behavior across repeated runs.

use imgpipe::cache::ResizeCache;
use imgpipe::directive::parse_query;
use imgpipe::emit::Artifact;
use imgpipe::imaging::{RasterBackend, RustBackend};
use imgpipe::process::{AssetPipeline, AssetRequest};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a synthetic PNG with the given dimensions and seed byte. Different
/// seeds produce different file contents (and lengths).
fn write_png(path: &Path, width: u32, height: u32, seed: u8) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, seed])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

fn measure(bytes: &[u8]) -> (u32, u32) {
    let dims = RustBackend::new().measure(bytes).unwrap();
    (dims.width, dims.height)
}

struct Harness {
    tmp: TempDir,
    out_dir: PathBuf,
    cache_dir: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("dist");
        let cache_dir = tmp.path().join("cache");
        Self {
            tmp,
            out_dir,
            cache_dir,
        }
    }

    fn pipeline(&self, inline_limit: usize) -> AssetPipeline<RustBackend> {
        let cache = ResizeCache::open(&self.cache_dir);
        AssetPipeline::new(RustBackend::new(), cache, &self.out_dir, inline_limit)
    }

    fn request(&self, file_name: &str, query: &str) -> AssetRequest {
        let path = self.tmp.path().join(file_name);
        AssetRequest {
            source_bytes: std::fs::read(&path).unwrap(),
            source_path: path,
            query: parse_query(query),
        }
    }
}

#[test]
fn resize_emits_file_with_directive_name_and_dimensions() {
    let h = Harness::new();
    let source = h.tmp.path().join("photo.png");
    write_png(&source, 400, 300, 0);

    let pipeline = h.pipeline(64);
    let asset = pipeline.handle(&h.request("photo.png", "resize=200x")).unwrap();

    assert!(asset.transformed);
    assert!(!asset.from_cache);

    let Artifact::File { path } = &asset.artifact else {
        panic!("expected file artifact");
    };
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "photo@resize-200x.png"
    );

    // Height 0 resolves to the intrinsic 300; free resize hits the box exactly
    let out = std::fs::read(path).unwrap();
    assert_eq!(measure(&out), (200, 300));
}

#[test]
fn shrink_larger_respects_small_sources() {
    let h = Harness::new();
    let source = h.tmp.path().join("small.png");
    write_png(&source, 100, 80, 0);

    let pipeline = h.pipeline(64);
    let asset = pipeline
        .handle(&h.request("small.png", "resize=400x400>"))
        .unwrap();

    let Artifact::File { path } = &asset.artifact else {
        panic!("expected file artifact");
    };
    let out = std::fs::read(path).unwrap();
    assert_eq!(measure(&out), (100, 80));
}

#[test]
fn second_run_is_served_from_cache() {
    let h = Harness::new();
    let source = h.tmp.path().join("photo.png");
    write_png(&source, 400, 300, 0);
    let query = "resize=200x150";

    let first = h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();
    assert!(!first.from_cache);

    // Fresh pipeline, same cache directory: entry survives the restart
    let second = h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();
    assert!(second.from_cache);
    assert_eq!(second.emitted_bytes, first.emitted_bytes);
}

#[test]
fn changed_source_bytes_force_a_fresh_transform() {
    let h = Harness::new();
    let source = h.tmp.path().join("photo.png");
    write_png(&source, 400, 300, 0);
    let query = "resize=200x150";

    h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();

    // Different seed and different dimensions change size and mtime
    write_png(&source, 401, 300, 7);
    let asset = h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();
    assert!(!asset.from_cache);
}

#[test]
fn no_cache_store_still_records_fresh_entries() {
    let h = Harness::new();
    let source = h.tmp.path().join("photo.png");
    write_png(&source, 400, 300, 0);
    let query = "resize=200x150";

    h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();

    // Empty store ignores the warm cache but still flushes its own entry
    let cache = ResizeCache::open_empty(&h.cache_dir);
    let pipeline = AssetPipeline::new(RustBackend::new(), cache, &h.out_dir, 64);
    let asset = pipeline.handle(&h.request("photo.png", query)).unwrap();
    assert!(!asset.from_cache);

    let warm = h.pipeline(64).handle(&h.request("photo.png", query)).unwrap();
    assert!(warm.from_cache);
}

#[test]
fn passthrough_copies_bytes_verbatim() {
    let h = Harness::new();
    let source = h.tmp.path().join("plain.png");
    write_png(&source, 50, 50, 0);
    let original = std::fs::read(&source).unwrap();

    let pipeline = h.pipeline(64);
    let asset = pipeline.handle(&h.request("plain.png", "")).unwrap();

    assert!(!asset.transformed);
    let Artifact::File { path } = &asset.artifact else {
        panic!("expected file artifact");
    };
    assert_eq!(std::fs::read(path).unwrap(), original);
    // Passthrough leaves no cache index behind
    assert!(!h.cache_dir.exists());
}

#[test]
fn inline_directive_emits_data_uri() {
    let h = Harness::new();
    let source = h.tmp.path().join("icon.png");
    write_png(&source, 64, 64, 0);

    let pipeline = h.pipeline(1 << 20);
    let asset = pipeline
        .handle(&h.request("icon.png", "resize=16x16!&inline=inline"))
        .unwrap();

    let Artifact::Inline { uri } = &asset.artifact else {
        panic!("expected inline artifact");
    };
    assert!(uri.starts_with("data:image/png;base64,"));
}

#[test]
fn oversized_inline_falls_back_to_file() {
    let h = Harness::new();
    let source = h.tmp.path().join("big.png");
    write_png(&source, 256, 256, 0);

    // A 1-byte limit forces the fallback
    let pipeline = h.pipeline(1);
    let asset = pipeline
        .handle(&h.request("big.png", "resize=128x&inline=inline"))
        .unwrap();
    assert!(matches!(asset.artifact, Artifact::File { .. }));
}

#[test]
fn format_conversion_to_jpeg_with_quality() {
    let h = Harness::new();
    let source = h.tmp.path().join("photo.png");
    write_png(&source, 200, 150, 0);

    let pipeline = h.pipeline(64);
    let asset = pipeline
        .handle(&h.request("photo.png", "resize=100x&format=jpg&quality=80"))
        .unwrap();

    let Artifact::File { path } = &asset.artifact else {
        panic!("expected file artifact");
    };
    assert_eq!(path.extension().unwrap(), "jpg");
    let out = std::fs::read(path).unwrap();
    // JPEG SOI marker
    assert_eq!(&out[..2], &[0xFF, 0xD8]);
}

#[test]
fn batch_processes_mixed_assets() {
    let h = Harness::new();
    write_png(&h.tmp.path().join("a.png"), 100, 100, 1);
    write_png(&h.tmp.path().join("b.png"), 100, 100, 2);
    write_png(&h.tmp.path().join("c.png"), 100, 100, 3);

    let pipeline = h.pipeline(64);
    let requests = vec![
        h.request("a.png", "resize=50x50"),
        h.request("b.png", ""),
        h.request("c.png", "resize=oops"),
    ];

    let results = pipeline.run_batch(&requests);
    assert!(results[0].is_ok());
    assert!(!results[1].as_ref().unwrap().transformed);
    assert!(results[2].is_err());
}
