use image::{ImageBuffer, Luma, Rgba};

/// Converts image to binary by keeping only bright pixels.
///
/// Pixels where R > threshold AND G > threshold AND B > threshold become black (text).
/// All other pixels become white (background).
///
/// Electronic sign-up boards draw light text on a dark panel, so this keeps
/// the text and drops the panel, bezel, and most of the surrounding room.
/// Pixel positions are unchanged, so word boxes stay in photo coordinates.
///
/// Recommended thresholds:
/// - Photos taken head-on: 170
/// - Photos with glare across the panel: 200
pub fn threshold_bright_pixels(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    threshold: u8,
) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;

        let value = if r > threshold && g > threshold && b > threshold {
            0u8 // Black (text)
        } else {
            255u8 // White (background)
        };

        output.put_pixel(x, y, Luma([value]));
    }

    output
}
