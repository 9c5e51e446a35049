//! FFmpeg video filter definitions.

use shortsplit_models::encoding::PORTRAIT_HEIGHT;
use shortsplit_models::CropMode;

/// Centered 9:16 crop followed by a scale to portrait height.
///
/// Crop width is `source_height * 9/16`, anchored at the horizontal center
/// with the x offset clamped so narrow sources never produce a negative
/// offset. The scale keeps aspect (`-2`), yielding 1080x1920 for a 9:16
/// window.
const FILTER_PORTRAIT_CENTER: &str = concat!(
    "crop=ih*9/16:ih:max((iw-ih*9/16)/2\\,0):0,",
    "scale=-2:1920"
);

/// Build the 9:16 conversion filter for a crop mode.
///
/// `Top` and `Smart` currently fall back to the centered crop; `Smart` is
/// reserved for face-aware window selection.
pub fn portrait_filter(mode: CropMode) -> String {
    match mode {
        CropMode::Center | CropMode::Top | CropMode::Smart => FILTER_PORTRAIT_CENTER.to_string(),
    }
}

/// Build the thumbnail scale filter (portrait height, aspect preserved).
pub fn thumbnail_filter() -> String {
    format!("scale=-2:{}", PORTRAIT_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_modes_currently_center() {
        let center = portrait_filter(CropMode::Center);
        assert_eq!(portrait_filter(CropMode::Top), center);
        assert_eq!(portrait_filter(CropMode::Smart), center);
        assert!(center.contains("crop=ih*9/16:ih"));
        assert!(center.ends_with("scale=-2:1920"));
    }

    #[test]
    fn thumbnail_scales_to_portrait_height() {
        assert_eq!(thumbnail_filter(), "scale=-2:1920");
    }
}
