//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `SourceImage` 表示用户选择的原始载荷与声明的媒体类型
//! - `MediaType` 表示可接受的位图类型集合
//! - `DecodedSurface` 表示解码完成、可供多个缩放任务共享的 RGBA 像素

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use image::{ImageFormat, RgbaImage};

use super::FaviconError;

/// 可接受的源图片媒体类型。
///
/// 矢量格式与多帧格式（SVG / GIF 等）不在此列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl MediaType {
    /// 解析声明的媒体类型（忽略大小写与参数部分）。
    pub fn parse(declared: &str) -> Result<Self, FaviconError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/webp" => Ok(Self::Webp),
            "image/bmp" | "image/x-ms-bmp" => Ok(Self::Bmp),
            "" => Err(FaviconError::InvalidInput("缺少媒体类型".to_string())),
            other => Err(FaviconError::InvalidInput(format!(
                "不支持的媒体类型：{}（可选：image/png、image/jpeg、image/webp、image/bmp）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

/// 用户选择的源图片。创建后不可变。
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Bytes,
    declared_type: String,
}

impl SourceImage {
    /// 以原始字节与声明的媒体类型构造源图片。
    ///
    /// 此处不做校验：类型校验由 [`SourceImage::media_type`] 在生成前完成。
    pub fn new(bytes: impl Into<Bytes>, declared_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            declared_type: declared_type.into(),
        }
    }

    /// 从 Data URL（`data:image/png;base64,...`）构造源图片。
    ///
    /// 拖放区域或网页端通常以这种形式交付文件。
    pub fn from_data_url(data_url: &str) -> Result<Self, FaviconError> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| FaviconError::InvalidInput("不是 Data URL".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| FaviconError::InvalidInput("Data URL 缺少数据部分".to_string()))?;

        let declared_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| FaviconError::InvalidInput("仅支持 base64 编码的 Data URL".to_string()))?;

        let bytes = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| FaviconError::Decode(format!("Base64 解码失败：{}", e)))?;

        Ok(Self::new(bytes, declared_type))
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// 校验声明的媒体类型是否属于可接受集合。
    pub fn media_type(&self) -> Result<MediaType, FaviconError> {
        MediaType::parse(&self.declared_type)
    }
}

/// 解码阶段输出：共享只读的 RGBA 像素。
///
/// 克隆只增加引用计数，多个缩放任务可同时读取同一份像素。
#[derive(Debug, Clone)]
pub struct DecodedSurface {
    pub(crate) pixels: Arc<RgbaImage>,
}

impl DecodedSurface {
    pub(crate) fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_accepted_media_types() {
        assert_eq!(MediaType::parse("image/png").expect("png"), MediaType::Png);
        assert_eq!(MediaType::parse("IMAGE/JPG").expect("jpg"), MediaType::Jpeg);
        assert_eq!(
            MediaType::parse("image/webp; charset=binary").expect("webp"),
            MediaType::Webp
        );
    }

    #[test]
    fn rejects_vector_multiframe_and_text_types() {
        for declared in ["image/svg+xml", "image/gif", "text/plain", "", "   "] {
            let result = MediaType::parse(declared);
            assert!(
                matches!(result, Err(FaviconError::InvalidInput(_))),
                "{declared:?} should be rejected"
            );
        }
    }

    #[test]
    fn data_url_parsing() {
        let source = SourceImage::from_data_url("data:image/png;base64,iVBORw0KGgo=")
            .expect("parse data url");
        assert_eq!(source.declared_type(), "image/png");
        assert_eq!(&source.bytes()[..4], &[0x89, b'P', b'N', b'G']);

        assert!(matches!(
            SourceImage::from_data_url("image/png;base64,AAAA"),
            Err(FaviconError::InvalidInput(_))
        ));
        assert!(matches!(
            SourceImage::from_data_url("data:image/png,plain"),
            Err(FaviconError::InvalidInput(_))
        ));
        assert!(matches!(
            SourceImage::from_data_url("data:image/png;base64,@@@"),
            Err(FaviconError::Decode(_))
        ));
    }
}
