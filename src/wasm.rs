//! JavaScript bindings
//!
//! Thin wrappers that decode browser-side inputs (encoded image bytes, hex
//! strings), call the engine, and hand back plain JS objects, arrays and PNG
//! bytes.
//! Engine errors become `JsValue` strings.

use image::ImageFormat;
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::color::{Color, Palette};
use crate::config::ExtractionConfig;
use crate::extract::{ImageColorExtractor, PixelBuffer};
use crate::harmony::{HarmonyCatalog, HarmonyStep, derive_rule};
use crate::recolor;
use crate::{PaletteError, Result};

fn to_js(err: PaletteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn decode(input: &[u8]) -> std::result::Result<PixelBuffer, JsValue> {
    let img = image::load_from_memory(input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;
    PixelBuffer::from_image(&img).map_err(to_js)
}

fn hex_array(palette: &Palette) -> Array {
    let out = Array::new();
    for hex in palette.to_hex_strings() {
        out.push(&JsValue::from_str(&hex));
    }
    out
}

fn palette_from_js(values: &Array) -> std::result::Result<Palette, JsValue> {
    let mut colors = Vec::new();
    for val in values.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        colors.push(Color::from_hex(&s).map_err(to_js)?);
    }
    Ok(Palette::new(colors))
}

fn extractor(seed: u32) -> Result<ImageColorExtractor> {
    ImageColorExtractor::new(ExtractionConfig {
        seed: seed as u64,
        ..ExtractionConfig::default()
    })
}

/// Extract the `n_colors` dominant colors of an encoded image (PNG, JPEG, ...).
///
/// Returns `{ palette: string[], counts: number[], shortfall: number }`, with
/// colors ordered by dominance.
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    filter_background: bool,
    seed: u32,
) -> std::result::Result<Object, JsValue> {
    let pixels = decode(&input)?;
    let result = extractor(seed)
        .and_then(|ex| ex.extract(&pixels, n_colors, filter_background))
        .map_err(to_js)?;

    let counts = Array::new();
    for cluster in result.clusters() {
        counts.push(&JsValue::from_f64(cluster.count as f64));
    }

    let out = Object::new();
    Reflect::set(&out, &JsValue::from_str("palette"), &hex_array(&result.palette()))?;
    Reflect::set(&out, &JsValue::from_str("counts"), &counts)?;
    Reflect::set(
        &out,
        &JsValue::from_str("shortfall"),
        &JsValue::from_f64(result.shortfall() as f64),
    )?;
    Ok(out)
}

/// Generate `count` colors of a named harmony scheme around `base_hex`.
#[wasm_bindgen]
pub fn harmony_palette(base_hex: &str, scheme: &str, count: usize) -> std::result::Result<Array, JsValue> {
    let base = Color::from_hex(base_hex).map_err(to_js)?;
    let palette = HarmonyCatalog::default().generate(scheme, base, count).map_err(to_js)?;
    Ok(hex_array(&palette))
}

/// Derive a harmony rule from an encoded image.
///
/// Returns `{ base: string, palette: string[], steps: object[] }` where each
/// step is `{ hue, saturation, value }`.
#[wasm_bindgen]
pub fn derive_harmony(input: Vec<u8>, n_colors: usize) -> std::result::Result<Object, JsValue> {
    let pixels = decode(&input)?;
    let result = extractor(0)
        .and_then(|ex| ex.extract(&pixels, n_colors, true))
        .map_err(to_js)?;
    let derived = derive_rule(&result, "From image").map_err(to_js)?;

    let steps = Array::new();
    for step in derived.rule.steps() {
        let HarmonyStep::Offset(offset) = step else {
            continue;
        };
        let js_step = Object::new();
        Reflect::set(&js_step, &JsValue::from_str("hue"), &JsValue::from_f64(offset.hue as f64))?;
        Reflect::set(
            &js_step,
            &JsValue::from_str("saturation"),
            &JsValue::from_f64(offset.saturation as f64),
        )?;
        Reflect::set(&js_step, &JsValue::from_str("value"), &JsValue::from_f64(offset.value as f64))?;
        steps.push(&js_step);
    }

    let out = Object::new();
    Reflect::set(&out, &JsValue::from_str("base"), &JsValue::from_str(&derived.base.to_hex()))?;
    Reflect::set(&out, &JsValue::from_str("palette"), &hex_array(&derived.palette()))?;
    Reflect::set(&out, &JsValue::from_str("steps"), &steps)?;
    Ok(out)
}

/// Recolor an encoded image with `palette` (hex strings) by brightness zones.
///
/// Returns the result as PNG bytes; alpha is preserved.
#[wasm_bindgen]
pub fn recolor_png(input: Vec<u8>, palette: Array) -> std::result::Result<Uint8Array, JsValue> {
    let palette = palette_from_js(&palette)?;
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;
    let recolored = recolor::recolor_image(&img, &palette);

    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        recolored
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| JsValue::from_str(&format!("PNG encode error: {e}")))?;
    }
    Ok(Uint8Array::from(buf.as_slice()))
}

/// Apply HSV, warmth and contrast adjustments to every color of `palette`.
///
/// Brightness and saturation are percentage-point deltas, hue is in degrees.
/// Zeros leave a color untouched.
#[wasm_bindgen]
pub fn adjust_palette(
    palette: Array,
    brightness: f32,
    saturation: f32,
    hue: f32,
    warmth: f32,
    contrast: f32,
) -> std::result::Result<Array, JsValue> {
    let adjusted = palette_from_js(&palette)?
        .adjust_brightness(brightness)
        .adjust_saturation(saturation)
        .adjust_hue(hue)
        .with_warmth(warmth)
        .with_contrast(contrast);
    Ok(hex_array(&adjusted))
}
