//! 源文件读取模块
//!
//! # 设计思路
//!
//! 扮演“文件选择器”的角色：读取本地文件，给出声明的媒体类型，
//! 只做“是否属于图片族”的粗略检查，具体类型是否被接受由流水线决定。
//!
//! # 实现思路
//!
//! - 存在性 + metadata 体积限制 + 读取。
//! - 未显式指定类型时，通过 `infer` 的文件签名推断声明类型。
//! - `data:` 开头的参数按 Data URL 处理。

use std::path::Path;

use crate::error::AppError;
use crate::favicon::{FaviconError, SourceImage};

/// 从本地路径（或 Data URL）读取源图片。
///
/// `declared_type` 为 `None` 时按文件签名推断。
pub fn load_source(
    path: &str,
    declared_type: Option<&str>,
    max_file_size: u64,
) -> Result<SourceImage, AppError> {
    if path.trim_start().starts_with("data:") {
        return Ok(SourceImage::from_data_url(path)?);
    }

    log::info!("📁 开始读取源图片 - 路径: {}", path);

    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(AppError::Input(format!("文件不存在：{}", path)));
    }

    let metadata = std::fs::metadata(file_path)?;
    if metadata.len() > max_file_size {
        return Err(FaviconError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            max_file_size as f64 / 1024.0 / 1024.0
        ))
        .into());
    }

    let bytes = std::fs::read(file_path)?;
    let declared = match declared_type {
        Some(declared) => declared.to_string(),
        None => sniff_image_family(&bytes)?.to_string(),
    };

    Ok(SourceImage::new(bytes, declared))
}

/// 通过文件签名判断是否属于图片族，并返回其媒体类型。
fn sniff_image_family(bytes: &[u8]) -> Result<&'static str, FaviconError> {
    if bytes.is_empty() {
        return Err(FaviconError::InvalidInput("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| FaviconError::InvalidInput("无法识别文件类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(FaviconError::InvalidInput(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(kind.mime_type())
}
