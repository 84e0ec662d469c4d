//! # 缩放引擎
//!
//! ## 设计思路
//!
//! 每次调用把共享的源像素绘制到一个固定边长的正方形画布上，再编码为 PNG。
//! 非正方形源图片会被拉伸填满画布，不做裁剪或留边。
//!
//! ## 实现思路
//!
//! - 优先使用 `fast_image_resize`，失败时回退 `image::resize_exact` 并记录警告。
//! - 输出统一为 RGBA PNG（无损且保留透明度）。
//! - 不同尺寸之间没有顺序依赖，可在多个线程上同时执行。

use std::io::Cursor;

use bytes::Bytes;
use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};

use super::FaviconError;
use super::source::DecodedSurface;

/// 生成 `size × size` 的 PNG 字节。
pub fn resize(surface: &DecodedSurface, size: u32, filter: FilterType) -> Result<Bytes, FaviconError> {
    if size == 0 {
        return Err(FaviconError::Resize {
            size,
            message: "目标尺寸必须为正数".to_string(),
        });
    }

    let resized = match resize_with_fast_image_resize(&surface.pixels, size, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                err
            );
            DynamicImage::ImageRgba8(surface.pixels.as_ref().clone())
                .resize_exact(size, size, filter)
                .to_rgba8()
        }
    };

    encode_png(resized, size)
}

fn resize_with_fast_image_resize(
    src: &RgbaImage,
    size: u32,
    filter: FilterType,
) -> Result<RgbaImage, FaviconError> {
    let src_image = fr::images::ImageRef::new(
        src.width(),
        src.height(),
        src.as_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| FaviconError::Resize {
        size,
        message: format!("构建源图像缓冲失败：{}", e),
    })?;

    let mut dst_image = fr::images::Image::new(size, size, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(to_fast_alg(filter));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| FaviconError::Resize {
            size,
            message: format!("fast_image_resize 执行失败：{}", e),
        })?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(size, size, dst_image.into_vec()).ok_or_else(|| {
        FaviconError::Resize {
            size,
            message: "fast_image_resize 输出缓冲长度异常".to_string(),
        }
    })
}

fn to_fast_alg(filter: FilterType) -> fr::ResizeAlg {
    match filter {
        FilterType::Nearest => fr::ResizeAlg::Nearest,
        FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
        FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
        FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
    }
}

fn encode_png(image: RgbaImage, size: u32) -> Result<Bytes, FaviconError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| FaviconError::Resize {
            size,
            message: format!("PNG 编码失败：{}", e),
        })?;
    Ok(Bytes::from(cursor.into_inner()))
}
