//! Scale-filter bookkeeping shared by the serializer and the export path.

/// Filter display name ↔ compact store code. Declared once; both lookup
/// directions read this table.
const FILTER_STORE_CODES: &[(&str, &str)] = &[
    ("Auto", "A"),
    ("Bell", "B"),
    ("Bicubic", "Bic"),
    ("Bilinear", "Bil"),
    ("BSpline", "BS"),
    ("Hermite", "H"),
    ("Lanczos3", "L"),
    ("Mitchell", "M"),
    ("NearestNeighbor", "NN"),
];

/// Store code for a filter name. Unknown names pass through verbatim so a
/// host with extra filter strategies still round-trips.
pub fn filter_store_code(name: &str) -> &str {
    FILTER_STORE_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .unwrap_or(name)
}

/// Filter name for a store code; unknown codes pass through verbatim.
pub fn filter_from_store_code(code: &str) -> &str {
    FILTER_STORE_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or(code)
}

/// Pick a scaling filter when the user left the choice on "Auto".
///
/// Mirrors the host's own auto-strategy: tiny sources (icons, sprite
/// sheets) keep hard pixel edges, everything else resamples through
/// bicubic.
pub fn auto_filter_strategy(
    original_width: u32,
    original_height: u32,
    desired_width: u32,
    desired_height: u32,
) -> &'static str {
    const PIXEL_ART_THRESHOLD: u32 = 256;
    if original_width <= PIXEL_ART_THRESHOLD || original_height <= PIXEL_ART_THRESHOLD {
        return "NearestNeighbor";
    }

    let x_scale = desired_width as f64 / original_width as f64;
    let y_scale = desired_height as f64 / original_height as f64;
    if x_scale != 1.0 || y_scale != 1.0 {
        "Bicubic"
    } else {
        "NearestNeighbor"
    }
}
