//! End-to-end request handling against JP2 files on disk.
//!
//! Each test writes a small synthetic JP2 (box structure and codestream
//! header only, no image data), then drives it through the public API the
//! way a tile server would: scan, describe, parse, negotiate, resolve.

use iiif_jp2::iiif::{Command, CommandError, FeatureSet};
use iiif_jp2::imaging::{Constraint, Decoder, Rect, RequestError, apply, image_info, plan_request};
use iiif_jp2::jp2::{ColorSpace, DecodePlan, JP2_SIGNATURE, Jp2HeaderDecoder, ScanError, scan_file};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn add_box(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
    out.extend(((8 + body.len()) as u32).to_be_bytes());
    out.extend(kind);
    out.extend(body);
}

/// RGB, 256×256 tiles, five decomposition levels.
fn page_jp2(width: u32, height: u32) -> Vec<u8> {
    let mut out = JP2_SIGNATURE.to_vec();
    add_box(&mut out, b"ftyp", b"jp2 \0\0\0\0jp2 ");

    let mut jp2h = Vec::new();
    let mut ihdr = Vec::new();
    ihdr.extend(height.to_be_bytes());
    ihdr.extend(width.to_be_bytes());
    ihdr.extend(3u16.to_be_bytes());
    ihdr.extend([7, 7, 0, 0]);
    add_box(&mut jp2h, b"ihdr", &ihdr);
    add_box(&mut jp2h, b"colr", &[1, 0, 0, 0, 0, 0, 16]);
    add_box(&mut out, b"jp2h", &jp2h);

    let mut cs = vec![0xFF, 0x4F, 0xFF, 0x51];
    cs.extend(47u16.to_be_bytes());
    cs.extend(0u16.to_be_bytes());
    for v in [width, height, 0, 0, 256, 256, 0, 0] {
        cs.extend(v.to_be_bytes());
    }
    cs.extend(3u16.to_be_bytes());
    cs.extend([7, 1, 1, 7, 1, 1, 7, 1, 1]);
    cs.extend([0xFF, 0x52, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05]);
    cs.extend([4, 4, 0, 0, 0xFF, 0xD9]);
    add_box(&mut out, b"jp2c", &cs);
    out
}

fn write(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (tmp, path)
}

fn decode(request: &str, path: &Path, constraint: &Constraint) -> Result<DecodePlan, RequestError> {
    let command = Command::parse(request).unwrap();
    let mut decoder = Jp2HeaderDecoder::open(path).unwrap();
    apply(&command, &FeatureSet::level2(), constraint, &mut decoder)
}

#[test]
fn header_scan() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let info = scan_file(&path).unwrap();

    assert_eq!((info.width, info.height), (800, 400));
    assert_eq!((info.tile_width(), info.tile_height()), (256, 256));
    assert_eq!(info.levels, 5);
    assert_eq!(info.color_space, ColorSpace::Rgb);
    assert_eq!(info.color_space.to_string(), "RGB");
}

#[test]
fn info_json_for_tiled_image() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let decoder = Jp2HeaderDecoder::open(&path).unwrap();
    let info = FeatureSet::level2().info(
        "http://example.org/iiif/page.jp2",
        &image_info(&decoder),
        &Constraint::unlimited(),
    );

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["@context"], "http://iiif.io/api/image/2/context.json");
    assert_eq!(json["@id"], "http://example.org/iiif/page.jp2");
    assert_eq!(json["protocol"], "http://iiif.io/api/image");
    assert_eq!(json["width"], 800);
    assert_eq!(json["height"], 400);
    assert_eq!(
        json["tiles"],
        serde_json::json!([{"width": 256, "height": 256, "scaleFactors": [1, 2, 4, 8, 16]}])
    );
    assert_eq!(
        json["profile"],
        serde_json::json!(["http://iiif.io/api/image/2/level2.json", {}])
    );
}

#[test]
fn full_request_decodes_at_full_resolution() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let plan = decode("page.jp2/full/full/0/default.jpg", &path, &Constraint::unlimited()).unwrap();

    assert_eq!(plan.crop, Rect::new(0, 0, 800, 400));
    assert_eq!((plan.width, plan.height), (800, 400));
    assert_eq!(plan.level, 0);
}

#[test]
fn downscaled_request_uses_a_reduced_level() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let plan = decode("page.jp2/full/200,/0/default.jpg", &path, &Constraint::unlimited()).unwrap();

    assert_eq!((plan.width, plan.height), (200, 100));
    assert_eq!(plan.level, 2);
}

#[test]
fn region_and_size() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let plan = decode(
        "page.jp2/0,0,400,400/100,100/90/gray.png",
        &path,
        &Constraint::unlimited(),
    )
    .unwrap();

    assert_eq!(plan.crop, Rect::new(0, 0, 400, 400));
    assert_eq!((plan.width, plan.height), (100, 100));
    assert_eq!(plan.level, 2);
}

#[test]
fn max_respects_server_limits() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let limits = Constraint {
        width: 400,
        ..Constraint::unlimited()
    };
    let plan = decode("page.jp2/full/max/0/default.jpg", &path, &limits).unwrap();

    assert_eq!((plan.width, plan.height), (400, 200));
    assert_eq!(plan.level, 1);
}

#[test]
fn full_size_over_limits_is_refused() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let limits = Constraint {
        width: 400,
        ..Constraint::unlimited()
    };
    let err = decode("page.jp2/full/full/0/default.jpg", &path, &limits).unwrap_err();

    assert!(matches!(err, RequestError::ExceedsLimits { width: 800, height: 400 }));
    assert_eq!(err.status_code(), 501);
}

#[test]
fn info_json_for_image_over_limits() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let decoder = Jp2HeaderDecoder::open(&path).unwrap();
    let limits = Constraint {
        width: 400,
        ..Constraint::unlimited()
    };
    let info = FeatureSet::level2().info(
        "http://example.org/iiif/page.jp2",
        &image_info(&decoder),
        &limits,
    );

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(
        json["profile"],
        serde_json::json!(["http://iiif.io/api/image/2/level2.json", {"maxWidth": 400}])
    );
}

#[test]
fn sub_pixel_region_never_decodes_the_whole_image() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let limits = Constraint {
        width: 100,
        height: 100,
        ..Constraint::unlimited()
    };
    let err = decode("page.jp2/3,3,0.5,0.5/full/0/default.jpg", &path, &limits).unwrap_err();

    assert!(matches!(err, RequestError::Invalid(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn single_side_size_keeps_aspect_ratio() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let plan = decode("page.jp2/full/1,/0/default.jpg", &path, &Constraint::unlimited()).unwrap();

    assert_eq!(plan.crop, Rect::new(0, 0, 800, 400));
    assert_eq!((plan.width, plan.height), (1, 1));
    assert_eq!(plan.level, 5);
}

#[test]
fn unsupported_feature_is_501() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let err = decode("page.jp2/square/full/0/default.jpg", &path, &Constraint::unlimited())
        .unwrap_err();

    assert!(matches!(err, RequestError::Unsupported(_)));
    assert_eq!(err.status_code(), 501);
}

#[test]
fn planning_matches_decoder_geometry() {
    let (_tmp, path) = write("page.jp2", &page_jp2(800, 400));
    let decoder = Jp2HeaderDecoder::open(&path).unwrap();
    let command = Command::parse("page.jp2/pct:50,0,50,100/pct:50/0/default.jpg").unwrap();
    let plan = plan_request(
        &command,
        &FeatureSet::level2(),
        &Constraint::unlimited(),
        decoder.width(),
        decoder.height(),
    )
    .unwrap();

    assert_eq!(plan.crop, Rect::new(400, 0, 800, 400));
    assert_eq!((plan.width, plan.height), (200, 200));
}

#[test]
fn malformed_and_bare_requests() {
    let err = Command::parse("page.jp2/nope/full/0/default.jpg").unwrap_err();
    assert!(matches!(err, CommandError::Invalid { .. }));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "invalid region");

    let err = Command::parse("page.jp2").unwrap_err();
    assert!(matches!(err, CommandError::RedirectToInfo { .. }));
    assert_eq!(err.status_code(), 303);

    let err = Command::parse("pageinfo.json").unwrap_err();
    assert!(matches!(
        err,
        CommandError::RedirectToInfo { ref id } if id.as_str() == "pageinfo.json"
    ));

    let info = Command::parse("page.jp2/info.json").unwrap();
    assert!(info.info);
    assert!(Command::parse("page.jp2/full/full/0/info.json").is_err());
}

#[test]
fn non_jp2_file() {
    let (_tmp, path) = write("photo.jpg", b"\xFF\xD8\xFF\xE0 not a jp2 at all");
    assert!(matches!(scan_file(&path), Err(ScanError::UnknownFormat)));

    let mut truncated = page_jp2(800, 400);
    truncated.truncate(60);
    let (_tmp, path) = write("short.jp2", &truncated);
    assert!(matches!(scan_file(&path), Err(ScanError::Io(_))));
}
