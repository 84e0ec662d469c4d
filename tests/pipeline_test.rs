// End-to-end checks for the generate -> pack pipeline
use std::collections::HashSet;
use std::io::{Cursor, Read};

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Rgba};
use metafav::favicon::{
    FaviconError, GeneratorConfig, GeneratorSession, HandleRegistry, SourceImage, VariantSetBuilder,
    catalog, pack, templates,
};
use proptest::prelude::*;
use zip::ZipArchive;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 255) as u8, (y * 3 % 255) as u8, 90, 255])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .expect("entry should be a valid png")
        .dimensions()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime init failed")
}

#[tokio::test]
async fn wide_png_yields_stretched_icons_and_fixed_manifest() {
    let builder = VariantSetBuilder::new(GeneratorConfig::default(), HandleRegistry::new());
    let set = builder
        .build(&SourceImage::new(png_bytes(400, 200), "image/png"))
        .await
        .expect("build should succeed");

    assert_eq!(set.len(), catalog::total_variants());
    let names: HashSet<_> = set.variants().map(|v| v.spec.file_name).collect();
    assert_eq!(names.len(), 14);

    let bundle = pack(&set, builder.config()).expect("pack should succeed");
    let mut archive = ZipArchive::new(Cursor::new(&bundle.bytes[..])).expect("valid zip");
    assert_eq!(archive.len(), 16);

    for (name, size) in [("favicon-16x16.png", 16), ("android-icon-512x512.png", 512)] {
        let mut entry = Vec::new();
        archive
            .by_name(name)
            .expect("entry present")
            .read_to_end(&mut entry)
            .expect("read entry");
        assert_eq!(png_dimensions(&entry), (size, size), "{name}");
    }

    let mut manifest = Vec::new();
    archive
        .by_name("manifest.json")
        .expect("manifest present")
        .read_to_end(&mut manifest)
        .expect("read manifest");
    assert_eq!(manifest, templates::MANIFEST_JSON.as_bytes());

    let mut browserconfig = Vec::new();
    archive
        .by_name("browserconfig.xml")
        .expect("browserconfig present")
        .read_to_end(&mut browserconfig)
        .expect("read browserconfig");
    assert_eq!(browserconfig, templates::BROWSERCONFIG_XML.as_bytes());
}

#[tokio::test]
async fn archive_entry_names_are_stable_across_packs() {
    let builder = VariantSetBuilder::new(GeneratorConfig::default(), HandleRegistry::new());
    let set = builder
        .build(&SourceImage::new(png_bytes(48, 48), "image/png"))
        .await
        .expect("build should succeed");

    let entry_names = |bytes: &[u8]| -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        archive.file_names().map(str::to_string).collect::<Vec<_>>()
    };

    let first = pack(&set, builder.config()).expect("first pack");
    let second = pack(&set, builder.config()).expect("second pack");

    let mut a = entry_names(&first.bytes);
    let mut b = entry_names(&second.bytes);
    a.sort();
    b.sort();
    assert_eq!(a, b);

    let mut expected: Vec<String> = catalog::all_specs().map(|s| s.file_name.to_string()).collect();
    expected.push(templates::MANIFEST_FILE_NAME.to_string());
    expected.push(templates::BROWSERCONFIG_FILE_NAME.to_string());
    expected.sort();
    assert_eq!(a, expected);
}

#[tokio::test]
async fn rejected_input_allocates_no_handles() {
    let session = GeneratorSession::new();
    let result = session
        .generate(SourceImage::new(b"name,email\nfoo,bar\n".to_vec(), "text/csv"))
        .await;

    assert!(matches!(result, Err(FaviconError::InvalidInput(_))));
    assert_eq!(session.live_handles(), 0);
    assert_eq!(session.current_generation(), None);
}

#[tokio::test]
async fn superseded_set_leaves_no_valid_handles() {
    let session = GeneratorSession::new();

    session
        .generate(SourceImage::new(png_bytes(20, 60), "image/png"))
        .await
        .expect("first generation");
    let first_handles: Vec<_> = catalog::all_specs()
        .filter_map(|spec| session.preview(spec.file_name))
        .collect();
    assert_eq!(first_handles.len(), 14);

    session
        .generate(SourceImage::new(png_bytes(60, 20), "image/png"))
        .await
        .expect("second generation");

    assert!(first_handles.iter().all(|h| session.resolve_preview(h).is_none()));
    assert_eq!(session.live_handles(), 14);

    session.teardown();
    assert_eq!(session.live_handles(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn every_variant_matches_its_target_size(width in 1u32..160, height in 1u32..160) {
        let builder = VariantSetBuilder::new(GeneratorConfig::default(), HandleRegistry::new());
        let set = runtime()
            .block_on(builder.build(&SourceImage::new(png_bytes(width, height), "image/png")))
            .expect("build should succeed");

        prop_assert_eq!(set.len(), 14);
        for variant in set.variants() {
            let size = variant.spec.size;
            prop_assert_eq!(png_dimensions(&variant.blob), (size, size));
        }
    }
}
