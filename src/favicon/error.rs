//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图标生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 每个错误都只作用于单次生成请求，不会让进程退出；调用方重新发起即可。

/// 图标生成统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum FaviconError {
    /// 声明的媒体类型不在可接受的位图集合内（用户可修正）。
    #[error("输入无效：{0}")]
    InvalidInput(String),

    /// 载荷不是合法的位图。
    #[error("解码错误：{0}")]
    Decode(String),

    /// 某个目标尺寸的缩放或编码失败。
    #[error("缩放错误（{size}x{size}）：{message}")]
    Resize { size: u32, message: String },

    /// 聚合错误：包装第一个导致整次生成失败的底层错误。
    #[error("图标生成失败：{source}")]
    Generation {
        #[source]
        source: Box<FaviconError>,
    },

    /// 打包时图标集缺失或不完整（调用契约被破坏）。
    #[error("打包错误：{0}")]
    Packaging(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 更新的生成请求已开始，本次结果被丢弃。
    #[error("生成请求已被新的请求取代（第 {0} 次）")]
    Superseded(u64),

    #[error("保存失败：{0}")]
    Save(String),

    #[error("配置错误：{0}")]
    Config(String),

    /// 会话内部状态不可用（锁中毒、后台任务异常退出等），与输入无关。
    #[error("内部错误：{0}")]
    Internal(String),
}

impl FaviconError {
    /// 将底层错误包装为聚合的生成错误；已经是聚合错误时保持原样。
    pub(crate) fn into_generation(self) -> Self {
        match self {
            Self::Generation { .. } => self,
            other => Self::Generation {
                source: Box::new(other),
            },
        }
    }

    /// 稳定的错误码，供日志与外部调用方匹配。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Decode(_) => "E_DECODE",
            Self::Resize { .. } => "E_RESIZE",
            Self::Generation { .. } => "E_GENERATION",
            Self::Packaging(_) => "E_PACKAGING",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Superseded(_) => "E_SUPERSEDED",
            Self::Save(_) => "E_SAVE",
            Self::Config(_) => "E_CONFIG",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    /// 出错所在阶段。聚合错误报告其底层错误的阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "validate",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Resize { .. } => "resize",
            Self::Generation { source } => source.stage(),
            Self::Packaging(_) => "package",
            Self::Superseded(_) => "generate",
            Self::Save(_) => "save",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_wraps_first_error_once() {
        let err = FaviconError::Decode("bad header".to_string())
            .into_generation()
            .into_generation();

        match &err {
            FaviconError::Generation { source } => {
                assert!(matches!(source.as_ref(), FaviconError::Decode(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.code(), "E_GENERATION");
        assert_eq!(err.stage(), "decode");
    }

    #[test]
    fn resize_error_mentions_target_size() {
        let err = FaviconError::Resize {
            size: 48,
            message: "encode failed".to_string(),
        };
        assert!(err.to_string().contains("48x48"));
        assert_eq!(err.stage(), "resize");
    }

    #[test]
    fn internal_errors_do_not_report_a_pipeline_stage() {
        let err = FaviconError::Internal("图标集锁已中毒".to_string());
        assert_eq!(err.code(), "E_INTERNAL");
        assert_eq!(err.stage(), "internal");
        assert_eq!(err.into_generation().stage(), "internal");
    }
}
