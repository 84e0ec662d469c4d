//! # 解码模块
//!
//! ## 设计思路
//!
//! 将“字节 → RGBA 像素”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 按声明的媒体类型选择解码器（不做内容嗅探）
//! 2. 读取 header 尺寸并按像素/内存上限快速拒绝
//! 3. 完整解码并转换为 RGBA（只做一次，供所有尺寸共享）

use std::io::Cursor;

use image::{GenericImageView, ImageReader};

use super::source::{DecodedSurface, MediaType, SourceImage};
use super::{FaviconError, GeneratorConfig};

/// 将源图片解码为可供缩放的共享像素表面。
pub fn decode(source: &SourceImage, config: &GeneratorConfig) -> Result<DecodedSurface, FaviconError> {
    let media_type = source.media_type()?;
    let bytes = source.bytes();

    if bytes.is_empty() {
        return Err(FaviconError::Decode("图片内容为空".to_string()));
    }

    if bytes.len() as u64 > config.max_file_size {
        return Err(FaviconError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let (header_width, header_height) = inspect_dimensions(bytes, media_type)?;
    validate_pixel_limits(config, header_width, header_height)?;
    validate_decoded_memory_limits(config, header_width, header_height)?;

    let decoded = ImageReader::with_format(Cursor::new(&bytes[..]), media_type.image_format())
        .decode()
        .map_err(|e| FaviconError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(FaviconError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
    }
    validate_pixel_limits(config, width, height)?;

    log::info!(
        "✅ 源图片解码成功 - 类型: {} 尺寸: {}x{}",
        media_type.as_str(),
        width,
        height
    );

    Ok(DecodedSurface::new(decoded.to_rgba8()))
}

/// 仅通过图片头信息读取宽高，用于在完整解码前做像素限制检查。
fn inspect_dimensions(bytes: &[u8], media_type: MediaType) -> Result<(u32, u32), FaviconError> {
    ImageReader::with_format(Cursor::new(bytes), media_type.image_format())
        .into_dimensions()
        .map_err(|e| FaviconError::Decode(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &GeneratorConfig, width: u32, height: u32) -> Result<(), FaviconError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| FaviconError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(FaviconError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

fn validate_decoded_memory_limits(
    config: &GeneratorConfig,
    width: u32,
    height: u32,
) -> Result<(), FaviconError> {
    let estimated = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| FaviconError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(FaviconError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}
