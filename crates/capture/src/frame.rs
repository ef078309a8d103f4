//! Encoded frames ready for upload.

use std::io::Cursor;

use attend_core::naming::frame_file_name;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::CaptureError;

/// One still image from the live stream, JPEG-encoded and labelled.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 1-based position within the capture sequence.
    pub index: u32,
    /// `{identity}{index}.jpg`
    pub file_name: String,
    /// JPEG bytes.
    pub bytes: Vec<u8>,
}

impl Frame {
    /// Encode `image` at `quality` (1-100) and label it for `identity`.
    pub fn encode(
        identity: &str,
        index: u32,
        image: &RgbImage,
        quality: u8,
    ) -> Result<Self, CaptureError> {
        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, quality).encode_image(image)?;

        Ok(Self {
            index,
            file_name: frame_file_name(identity, index),
            bytes: buf.into_inner(),
        })
    }
}
