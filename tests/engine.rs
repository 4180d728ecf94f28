use chroma_palette::{
    CancelFlag, Color, CustomHarmonyRule, EngineConfig, HarmonyCatalog, HarmonyScheme, HarmonyStep,
    ImageColorExtractor, Palette, PaletteAssembler, PaletteError, PaletteSource, PixelBuffer,
    RuleLibrary, Temperature, apply_offset, derive_rule, derive_rule_from_colors, recolor,
    recolor_image, to_hsv, to_rgb,
};
use image::{DynamicImage, Rgba, RgbaImage};

fn within_one(a: Color, b: Color) -> bool {
    (a.r as i32 - b.r as i32).abs() <= 1
        && (a.g as i32 - b.g as i32).abs() <= 1
        && (a.b as i32 - b.b as i32).abs() <= 1
}

/// Four colored quadrants of unequal size on a white border.
fn quadrant_image() -> DynamicImage {
    let img = RgbaImage::from_fn(40, 40, |x, y| {
        if x < 2 || y < 2 || x >= 38 || y >= 38 {
            Rgba([255, 255, 255, 255])
        } else if x < 26 && y < 26 {
            Rgba([200, 40, (x % 4) as u8 * 3 + 30, 255])
        } else if x >= 26 && y < 26 {
            Rgba([30, 150 + (y % 3) as u8, 60, 255])
        } else if x < 26 {
            Rgba([40, 60, 190, 255])
        } else {
            Rgba([230, 200, 40, 255])
        }
    });
    DynamicImage::ImageRgba8(img)
}

#[test]
fn rgb_hsv_round_trip_is_stable() {
    for r in (0..=255u8).step_by(15) {
        for g in (0..=255u8).step_by(15) {
            for b in (0..=255u8).step_by(15) {
                let c = Color::new(r, g, b);
                assert!(within_one(to_rgb(to_hsv(c)), c), "{c} drifted");
            }
        }
    }
}

#[test]
#[ignore = "walks all 16.7M colors; run with --ignored"]
fn rgb_hsv_round_trip_is_stable_for_every_color() {
    for r in 0..=255u8 {
        for g in 0..=255u8 {
            for b in 0..=255u8 {
                let c = Color::new(r, g, b);
                assert!(within_one(to_rgb(to_hsv(c)), c), "{c} drifted");
            }
        }
    }
}

#[test]
fn hue_wraps_past_360() {
    let base = to_rgb(chroma_palette::Hsv::new(350.0, 80.0, 80.0));
    let shifted = apply_offset(base, 20.0, 0.0, 0.0);
    assert!((to_hsv(shifted).h - 10.0).abs() < 1.0);
}

#[test]
fn complementary_of_red() {
    let palette = HarmonyCatalog::default()
        .generate("Complementary", Color::new(255, 0, 0), 2)
        .unwrap();
    assert_eq!(palette.colors(), &[Color::new(255, 0, 0), Color::new(0, 255, 255)]);
}

#[test]
fn every_scheme_has_documented_size_and_starts_with_base() {
    let catalog = HarmonyCatalog::default();
    let base = Color::new(180, 90, 40);
    for scheme in HarmonyScheme::ALL {
        let natural = catalog.natural(scheme, base);
        assert_eq!(natural.len(), scheme.natural_len());
        assert_eq!(natural.first(), Some(base));

        let padded = catalog.generate_scheme(scheme, base, 9).unwrap();
        assert_eq!(padded.len(), 9, "{scheme}");
        assert_eq!(padded.colors()[..natural.len()], *natural.colors());

        let parsed: HarmonyScheme = scheme.name().to_lowercase().parse().unwrap();
        assert_eq!(parsed, scheme);
    }
    assert!(matches!(
        catalog.generate("Pentadic", base, 3),
        Err(PaletteError::UnknownScheme { .. })
    ));
}

#[test]
fn custom_rule_offsets_hue_only() {
    let base = Color::new(200, 50, 50);
    let rule = CustomHarmonyRule::new("comp", vec![HarmonyStep::offset(180.0, 0.0, 0.0)]);
    let palette = rule.evaluate(base);
    assert_eq!(palette.len(), 2);

    let (a, b) = (base.to_hsv(), palette.colors()[1].to_hsv());
    assert!(((a.h + 180.0) % 360.0 - b.h).abs() < 1.0);
    assert!((a.s - b.s).abs() < 1.0);
    assert!((a.v - b.v).abs() < 1.0);
}

#[test]
fn rule_library_survives_blob_storage() {
    let mut library = RuleLibrary::new();
    library
        .insert(CustomHarmonyRule::new(
            "accent",
            vec![HarmonyStep::offset(150.0, -10.0, 5.0), HarmonyStep::Fixed(Color::BLACK)],
        ))
        .unwrap();
    library.insert(CustomHarmonyRule::empty("plain")).unwrap();

    let restored = RuleLibrary::from_bytes(&library.to_bytes().unwrap()).unwrap();
    let base = Color::new(20, 120, 200);
    assert_eq!(
        restored.apply("accent", base).unwrap(),
        library.apply("accent", base).unwrap()
    );
    assert_eq!(restored.len(), 2);
}

#[test]
fn extraction_is_deterministic_for_a_seed() {
    let pixels = PixelBuffer::from_image(&quadrant_image()).unwrap();
    let extractor = ImageColorExtractor::default().with_seed(1234);
    let first = extractor.extract(&pixels, 4, true).unwrap();
    for _ in 0..3 {
        assert_eq!(extractor.extract(&pixels, 4, true).unwrap(), first);
    }
}

#[test]
fn extraction_finds_quadrants_in_dominance_order() {
    let pixels = PixelBuffer::from_image(&quadrant_image()).unwrap();
    let result = ImageColorExtractor::default().extract(&pixels, 4, true).unwrap();
    assert_eq!(result.len(), 4);

    // Red block is the largest (24x24), yellow the smallest (12x12).
    let dominant = result.dominant().unwrap();
    assert!(dominant.r > 180 && dominant.g < 60);
    let counts: Vec<usize> = result.clusters().iter().map(|c| c.count).collect();
    assert_eq!(counts, [576, 288, 288, 144]);
    assert!(result.colors().iter().all(|c| *c != Color::WHITE));
}

#[test]
fn all_black_image_has_shortfall() {
    let pixels = PixelBuffer::solid(10, 10, Color::BLACK);
    let result = ImageColorExtractor::default().extract(&pixels, 5, false).unwrap();
    assert!(result.len() <= 1);
    assert_eq!(result.shortfall(), 4);

    assert!(matches!(
        ImageColorExtractor::default().extract(&pixels, 5, true),
        Err(PaletteError::EmptyImage)
    ));
}

#[test]
fn transparent_pixels_are_ignored() {
    let img = RgbaImage::from_fn(4, 4, |x, _| {
        if x < 2 {
            Rgba([10, 200, 90, 255])
        } else {
            Rgba([250, 0, 0, 0])
        }
    });
    let pixels = PixelBuffer::from_image(&DynamicImage::ImageRgba8(img)).unwrap();
    let result = ImageColorExtractor::default().extract(&pixels, 3, true).unwrap();
    assert_eq!(result.colors(), vec![Color::new(10, 200, 90)]);
}

#[test]
fn derived_harmony_uses_brightest_base() {
    let colors = [
        Color::new(10, 10, 10),
        Color::new(240, 240, 240),
        Color::new(100, 150, 200),
    ];
    let derived = derive_rule_from_colors(&colors, "derived").unwrap();
    assert_eq!(derived.base, Color::new(240, 240, 240));

    let pixels = PixelBuffer::from_image(&quadrant_image()).unwrap();
    let result = ImageColorExtractor::default().extract(&pixels, 4, true).unwrap();
    let derived = derive_rule(&result, "quadrants").unwrap();
    assert_eq!(derived.rule.len(), 3);
    let regenerated = derived.palette();
    for color in result.colors() {
        assert!(regenerated.iter().any(|c| within_one(*c, color)), "{color} lost");
    }
}

#[test]
fn assembler_pads_and_truncates() {
    let assembler = PaletteAssembler::new(&EngineConfig::default()).unwrap();
    let base = Color::new(255, 0, 0);

    let two = PaletteSource::Scheme {
        base,
        scheme: "complementary".into(),
    };
    let out = assembler.assemble(&two, 3).unwrap();
    assert_eq!(out.palette.len(), 3);
    assert_eq!(out.shortfall(), 0);

    let four = PaletteSource::Scheme {
        base,
        scheme: "Square".into(),
    };
    let out = assembler.assemble(&four, 1).unwrap();
    assert_eq!(out.palette.colors(), &[base]);
}

#[test]
fn assembler_reports_image_shortfall() {
    let pixels = PixelBuffer::from_image(&quadrant_image()).unwrap();
    let source = PaletteSource::Image {
        pixels: &pixels,
        k: 4,
        filter_background: true,
    };
    let assembler = PaletteAssembler::default();

    let out = assembler.assemble(&source, 8).unwrap();
    assert_eq!(out.palette.len(), 4);
    assert_eq!(out.shortfall(), 4);

    let out = assembler.assemble(&source, 2).unwrap();
    assert_eq!(out.palette.len(), 2);
    assert!(out.is_complete());
}

#[test]
fn cancellation_leaves_no_result() {
    let pixels = PixelBuffer::from_image(&quadrant_image()).unwrap();
    let source = PaletteSource::Image {
        pixels: &pixels,
        k: 4,
        filter_background: true,
    };
    let flag = CancelFlag::new();
    flag.cancel();
    let err = PaletteAssembler::default()
        .assemble_with_cancel(&source, 4, &flag)
        .unwrap_err();
    assert!(matches!(err, PaletteError::Cancelled { .. }));
    assert!(!err.is_input_error());
}

#[test]
fn config_from_json_drives_the_engine() {
    let config = EngineConfig::from_json_str(
        r#"{ "extraction": { "seed": 5, "sample_budget": 500 }, "harmony": { "fill_jitter": 20.0 } }"#,
    )
    .unwrap();
    let assembler = PaletteAssembler::new(&config).unwrap();
    assert_eq!(assembler.extractor().config().seed, 5);

    // One round of 20% value jitter on cyan.
    let source = PaletteSource::Scheme {
        base: Color::new(255, 0, 0),
        scheme: "complementary".into(),
    };
    let out = assembler.assemble(&source, 3).unwrap();
    assert_eq!(out.palette.colors()[2], Color::new(0, 204, 204));
}

#[test]
fn extracted_palette_recolors_its_own_image() {
    let img = quadrant_image();
    let pixels = PixelBuffer::from_image(&img).unwrap();
    let result = ImageColorExtractor::default().extract(&pixels, 4, true).unwrap();
    let palette = result.palette();

    let recolored = recolor(&pixels, &palette);
    assert_eq!(recolored.pixels().len(), pixels.pixels().len());
    assert!(recolored.pixels().iter().all(|c| palette.iter().any(|p| p == c)));

    // White border is the brightest region, so it takes the brightest color.
    let brightest = palette.sorted_by_luminance().first().unwrap();
    let rgba = recolor_image(&img, &palette);
    let corner = rgba.get_pixel(0, 0);
    assert_eq!([corner[0], corner[1], corner[2]], [brightest.r, brightest.g, brightest.b]);
}

#[test]
fn adjusted_palette_shifts_temperature() {
    let palette = Palette::from_hex_list(&["#808080", "#707878"]).unwrap();
    let warm = palette.with_warmth(30.0);
    assert!(warm.iter().all(|c| c.temperature() == Temperature::Warm));

    let cool = palette.with_warmth(-30.0);
    assert!(cool.iter().all(|c| c.temperature() == Temperature::Cool));

    let flat = palette.with_contrast(-1.0);
    assert!(flat.iter().all(|&c| c == Color::new(128, 128, 128)));
}
