//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `GeneratorConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中性能档位（balanced / speed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ResizeProfile` 负责档位字符串解析与反向输出。
//! - `apply_profile` 将档位转换为具体参数。
//! - `load_from_path` 从 JSON 文件读取配置；文件缺失或损坏时回退默认值。

use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::FaviconError;

/// 图标生成配置。
///
/// 字段覆盖了解码限制、缩放与打包三个阶段。
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// 源图片载荷允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩放滤镜，仅允许最近邻或线性。
    pub resize_filter: FilterType,
    /// 是否并行执行各尺寸的缩放任务。
    pub parallel_resize: bool,
    /// 归档的 deflate 压缩等级（`None` 为默认等级）。
    pub compression_level: Option<i64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::Triangle,
            parallel_resize: true,
            compression_level: None,
        }
    }
}

/// 缩放性能档位。
///
/// - `Balanced`：线性插值，质量与速度平衡
/// - `Speed`：最近邻，优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeProfile {
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    pub fn parse(profile: &str) -> Result<Self, FaviconError> {
        match profile.trim().to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(FaviconError::Config(format!(
                "未知性能档位：{}（可选：balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl GeneratorConfig {
    /// 基于当前滤镜反推档位。
    pub fn profile(&self) -> ResizeProfile {
        match self.resize_filter {
            FilterType::Nearest => ResizeProfile::Speed,
            _ => ResizeProfile::Balanced,
        }
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_profile(&mut self, profile: ResizeProfile) {
        match profile {
            ResizeProfile::Balanced => {
                self.resize_filter = FilterType::Triangle;
                self.compression_level = None;
            }
            ResizeProfile::Speed => {
                self.resize_filter = FilterType::Nearest;
                self.compression_level = Some(1);
            }
        }
    }

    /// 从 JSON 文件加载配置。
    ///
    /// 文件不存在时返回默认配置；内容无法解析时记录警告并回退默认配置。
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| FaviconError::Config(format!("读取配置文件失败：{}", e)))
            .and_then(|content| {
                serde_json::from_str::<ConfigFile>(&content)
                    .map_err(|e| FaviconError::Config(format!("解析配置文件失败：{}", e)))
            })
            .and_then(ConfigFile::into_config);

        match parsed {
            Ok(config) => {
                log::info!("⚙️ 已加载配置文件：{}", path.display());
                config
            }
            Err(err) => {
                log::warn!("⚠️ {}，使用默认配置", err);
                Self::default()
            }
        }
    }
}

/// 配置文件的磁盘格式。所有字段可选，缺省时取默认值。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigFile {
    pub(crate) profile: Option<String>,
    pub(crate) max_file_size: Option<u64>,
    pub(crate) max_decoded_pixels: Option<u64>,
    pub(crate) max_decoded_bytes: Option<u64>,
    pub(crate) parallel_resize: Option<bool>,
    pub(crate) compression_level: Option<i64>,
}

impl ConfigFile {
    fn into_config(self) -> Result<GeneratorConfig, FaviconError> {
        let mut config = GeneratorConfig::default();

        if let Some(profile) = self.profile.as_deref() {
            config.apply_profile(ResizeProfile::parse(profile)?);
        }
        if let Some(max_file_size) = self.max_file_size {
            config.max_file_size = max_file_size;
        }
        if let Some(max_decoded_pixels) = self.max_decoded_pixels {
            config.max_decoded_pixels = max_decoded_pixels;
        }
        if let Some(max_decoded_bytes) = self.max_decoded_bytes {
            config.max_decoded_bytes = max_decoded_bytes;
        }
        if let Some(parallel_resize) = self.parallel_resize {
            config.parallel_resize = parallel_resize;
        }
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(FaviconError::Config(format!(
                    "compression_level 必须在 0~9 之间，当前为 {}",
                    level
                )));
            }
            config.compression_level = Some(level);
        }

        Ok(config)
    }
}
