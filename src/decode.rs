//! Conversion of raw camera frames into 8-bit grayscale or RGB pixels.

use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};

use crate::error::{Error, Result};
use crate::format::{ColorCoding, ColorFilter, PixelFormat};
use crate::frame::Frame;

/// Decodes `frame` into `dst`
///
/// `dst` must hold at least `width * height * format.channels()` bytes.
///
/// # Arguments
///
/// * `frame` - Raw frame borrowed from the DMA ring
/// * `format` - Output pixel layout
/// * `bayer` - Filter pattern of the sensor, if the frame is a Bayer mosaic
/// * `dst` - Output pixels
pub fn decode(
    frame: &Frame,
    format: PixelFormat,
    bayer: Option<ColorFilter>,
    dst: &mut [u8],
) -> Result<()> {
    if frame.width == 0 || frame.height == 0 {
        return Err(Error::InvalidGeometry {
            width: frame.width,
            height: frame.height,
            coding: frame.coding,
        });
    }

    let expected = format.image_size(frame.width, frame.height);
    let actual = dst.len();
    let dst = dst
        .get_mut(..expected)
        .ok_or(Error::ShortBuffer { expected, actual })?;

    match (format, bayer) {
        (PixelFormat::Gray8, _) => {
            dst.copy_from_slice(source(frame, frame.pixels())?);
            Ok(())
        }
        (PixelFormat::Rgb8, Some(filter)) => demosaic(frame, filter, dst),
        (PixelFormat::Rgb8, None) => to_rgb8(frame, dst),
    }
}

fn source<'a>(frame: &Frame<'a>, expected: usize) -> Result<&'a [u8]> {
    frame.data.get(..expected).ok_or(Error::ShortFrame {
        expected,
        actual: frame.data.len(),
    })
}

/// Bilinear demosaic of an 8-bit mosaic
fn demosaic(frame: &Frame, filter: ColorFilter, dst: &mut [u8]) -> Result<()> {
    let src = source(frame, frame.pixels())?;
    let mut raster = RasterMut::new(
        frame.width as usize,
        frame.height as usize,
        RasterDepth::Depth8,
        dst,
    );
    bayer::run_demosaic(
        &mut Cursor::new(src),
        BayerDepth::Depth8,
        filter.cfa(),
        Demosaic::Linear,
        &mut raster,
    )
    .map_err(|e| Error::Demosaic(format!("{:?}", e)))
}

fn to_rgb8(frame: &Frame, dst: &mut [u8]) -> Result<()> {
    let pixels = frame.pixels();
    let expected = frame
        .coding
        .bytes_for(pixels)
        .ok_or(Error::UnsupportedConversion {
            coding: frame.coding,
            format: PixelFormat::Rgb8,
        })?;
    let group = match frame.coding {
        ColorCoding::Yuv422 => 2,
        ColorCoding::Yuv411 => 4,
        _ => 1,
    };
    if pixels % group != 0 {
        return Err(Error::InvalidGeometry {
            width: frame.width,
            height: frame.height,
            coding: frame.coding,
        });
    }
    let src = source(frame, expected)?;

    match frame.coding {
        ColorCoding::Rgb8 => dst.copy_from_slice(src),
        ColorCoding::Mono8 => {
            for (rgb, &y) in dst.chunks_exact_mut(3).zip(src) {
                rgb.fill(y);
            }
        }
        ColorCoding::Yuv444 => {
            for (rgb, uyv) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
                yuv_to_rgb(uyv[1], uyv[0], uyv[2], rgb);
            }
        }
        ColorCoding::Yuv422 => {
            for (rgb, uyvy) in dst.chunks_exact_mut(6).zip(src.chunks_exact(4)) {
                let (u, v) = (uyvy[0], uyvy[2]);
                yuv_to_rgb(uyvy[1], u, v, &mut rgb[..3]);
                yuv_to_rgb(uyvy[3], u, v, &mut rgb[3..]);
            }
        }
        ColorCoding::Yuv411 => {
            for (rgb, uyyvyy) in dst.chunks_exact_mut(12).zip(src.chunks_exact(6)) {
                let (u, v) = (uyyvyy[0], uyyvyy[3]);
                let ys = [uyyvyy[1], uyyvyy[2], uyyvyy[4], uyyvyy[5]];
                for (px, y) in rgb.chunks_exact_mut(3).zip(ys) {
                    yuv_to_rgb(y, u, v, px);
                }
            }
        }
        coding => {
            return Err(Error::UnsupportedConversion {
                coding,
                format: PixelFormat::Rgb8,
            })
        }
    }

    Ok(())
}

/// Integer YUV to RGB transform used by IIDC cameras
fn yuv_to_rgb(y: u8, u: u8, v: u8, rgb: &mut [u8]) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;

    let r = y + ((v * 1436) >> 10);
    let g = y - ((u * 352 + v * 731) >> 10);
    let b = y + ((u * 1814) >> 10);

    rgb[0] = r.clamp(0, 255) as u8;
    rgb[1] = g.clamp(0, 255) as u8;
    rgb[2] = b.clamp(0, 255) as u8;
}
