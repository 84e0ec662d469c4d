//! # 会话层（唯一的“当前图标集”）
//!
//! ## 设计思路
//!
//! `GeneratorSession` 对应界面上下文：它持有唯一一份当前图标集，以及会话级句柄表。
//! 每次上传都会整体替换图标集，不会出现两份结果合并的情况。
//!
//! ## 实现思路
//!
//! - 每个生成请求开始时递增 `epoch`，完成后只有最新的请求可以写入当前图标集。
//! - 过期请求的结果在完成时被直接释放（句柄随之撤销），并返回 `Superseded`。
//! - 替换成功后，旧图标集的句柄一次性撤销。
//! - 配置通过 `RwLock` 支持运行时切换档位；单次请求使用同一份配置快照。

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};

use bytes::Bytes;
use serde::Serialize;

use super::catalog;
use super::handles::{DisplayHandle, HandleRegistry};
use super::packager::{self, ArchiveBundle};
use super::save::SaveTarget;
use super::variant_set::VariantSet;
use super::{FaviconError, GeneratorConfig, ResizeProfile, SourceImage, VariantSetBuilder};

/// 单个图标的摘要信息，供界面或命令行展示。
#[derive(Debug, Clone, Serialize)]
pub struct VariantSummary {
    pub group: &'static str,
    pub file_name: &'static str,
    pub size: u32,
    pub bytes: usize,
    pub preview_url: String,
}

/// 一次成功生成的摘要。
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub generation: u64,
    pub variants: Vec<VariantSummary>,
}

impl GenerationSummary {
    fn from_set(generation: u64, set: &VariantSet) -> Self {
        let variants = set
            .groups()
            .flat_map(|(kind, variants)| {
                variants.iter().map(move |variant| VariantSummary {
                    group: kind.as_str(),
                    file_name: variant.spec.file_name,
                    size: variant.spec.size,
                    bytes: variant.blob.len(),
                    preview_url: variant.handle.url(),
                })
            })
            .collect();

        Self {
            generation,
            variants,
        }
    }
}

struct CurrentSet {
    generation: u64,
    set: VariantSet,
}

/// 图标生成会话。
pub struct GeneratorSession {
    config: RwLock<GeneratorConfig>,
    registry: HandleRegistry,
    epoch: AtomicU64,
    current: Mutex<Option<CurrentSet>>,
}

impl Default for GeneratorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorSession {
    /// 使用默认配置创建会话。
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// 使用自定义配置创建会话。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use metafav::favicon::{GeneratorConfig, GeneratorSession};
    ///
    /// let mut config = GeneratorConfig::default();
    /// config.parallel_resize = false;
    /// let session = GeneratorSession::with_config(config);
    /// assert_eq!(session.live_handles(), 0);
    /// ```
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config: RwLock::new(config),
            registry: HandleRegistry::new(),
            epoch: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    fn config_snapshot(&self) -> Result<GeneratorConfig, FaviconError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| FaviconError::Internal("配置读取锁已中毒".to_string()))
    }

    fn current(&self) -> Result<MutexGuard<'_, Option<CurrentSet>>, FaviconError> {
        self.current
            .lock()
            .map_err(|_| FaviconError::Internal("图标集锁已中毒".to_string()))
    }

    /// 切换缩放档位，对之后发起的请求生效。
    pub fn set_profile(&self, profile: &str) -> Result<(), FaviconError> {
        let profile = ResizeProfile::parse(profile)?;
        let mut config = self
            .config
            .write()
            .map_err(|_| FaviconError::Internal("配置写入锁已中毒".to_string()))?;
        config.apply_profile(profile);

        log::info!(
            "⚙️ 已切换缩放档位：{}（filter={:?}）",
            profile.as_str(),
            config.resize_filter
        );
        Ok(())
    }

    pub fn profile(&self) -> Result<ResizeProfile, FaviconError> {
        Ok(self.config_snapshot()?.profile())
    }

    /// 执行一次生成请求。
    ///
    /// 成功时替换当前图标集并撤销旧句柄；若期间有更新的请求开始，
    /// 本次结果被释放并返回 `Superseded`。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use metafav::favicon::{GeneratorSession, SourceImage};
    ///
    /// # async fn demo(png: Vec<u8>) -> Result<(), metafav::favicon::FaviconError> {
    /// let session = GeneratorSession::new();
    /// let summary = session.generate(SourceImage::new(png, "image/png")).await?;
    /// assert_eq!(summary.variants.len(), 14);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(&self, source: SourceImage) -> Result<GenerationSummary, FaviconError> {
        source.media_type()?;

        let config = self.config_snapshot()?;
        let generation = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("🚀 开始第 {} 次生成 - 类型: {}", generation, source.declared_type());

        let builder = VariantSetBuilder::new(config, self.registry.clone());
        let result = builder.build(&source).await;

        if self.epoch.load(Ordering::SeqCst) != generation {
            if let Ok(stale) = result {
                let released = stale.release();
                log::info!("⏭️ 第 {} 次生成已过期，释放 {} 个预览句柄", generation, released);
            }
            return Err(FaviconError::Superseded(generation));
        }

        let set = result.inspect_err(|err| {
            log::warn!("⚠️ 第 {} 次生成失败（{}）：{}", generation, err.code(), err);
        })?;

        let mut current = self.current()?;
        if self.epoch.load(Ordering::SeqCst) != generation {
            drop(current);
            let released = set.release();
            log::info!("⏭️ 第 {} 次生成已过期，释放 {} 个预览句柄", generation, released);
            return Err(FaviconError::Superseded(generation));
        }

        let summary = GenerationSummary::from_set(generation, &set);
        let previous = current.replace(CurrentSet { generation, set });
        drop(current);

        if let Some(previous) = previous {
            let released = previous.set.release();
            log::info!(
                "🧹 第 {} 次生成的图标集已被替换，撤销 {} 个预览句柄",
                previous.generation,
                released
            );
        }

        Ok(summary)
    }

    /// 当前图标集对应的生成序号。
    pub fn current_generation(&self) -> Option<u64> {
        self.current()
            .ok()
            .and_then(|current| current.as_ref().map(|c| c.generation))
    }

    /// 单个文件下载：返回字节与输出文件名。
    pub fn download_variant(&self, file_name: &str) -> Result<(Bytes, &'static str), FaviconError> {
        let spec = catalog::find(file_name)
            .ok_or_else(|| FaviconError::InvalidInput(format!("未知的图标文件名：{}", file_name)))?;

        let current = self.current()?;
        let current = current
            .as_ref()
            .ok_or_else(|| FaviconError::Packaging("尚未生成图标集".to_string()))?;

        current
            .set
            .get(spec.file_name)
            .map(|variant| (variant.blob.clone(), spec.file_name))
            .ok_or_else(|| FaviconError::Packaging(format!("图标集缺少条目：{}", spec.file_name)))
    }

    /// 打包当前图标集。
    pub fn download_archive(&self) -> Result<ArchiveBundle, FaviconError> {
        let config = self.config_snapshot()?;
        let current = self.current()?;
        let current = current.as_ref().ok_or_else(|| {
            let err = FaviconError::Packaging("尚未生成图标集，无法打包".to_string());
            log::error!("{}", err);
            err
        })?;

        packager::pack(&current.set, &config).inspect_err(|err| log::error!("{}", err))
    }

    /// 当前图标集中某个文件的预览句柄。
    pub fn preview(&self, file_name: &str) -> Option<DisplayHandle> {
        let current = self.current().ok()?;
        current
            .as_ref()?
            .set
            .get(file_name)
            .map(|variant| variant.handle.clone())
    }

    /// 解析预览句柄；句柄已撤销时返回 `None`。
    pub fn resolve_preview(&self, handle: &DisplayHandle) -> Option<Bytes> {
        self.registry.resolve(handle)
    }

    pub fn live_handles(&self) -> usize {
        self.registry.live_count()
    }

    /// 保存单个图标。保存失败仅记录提示，不影响当前图标集。
    pub fn save_variant(&self, file_name: &str, target: &dyn SaveTarget) -> Result<PathBuf, FaviconError> {
        let (bytes, name) = self.download_variant(file_name)?;
        target
            .save(&bytes, name)
            .inspect_err(|err| log::warn!("⚠️ {}", err))
    }

    /// 打包并保存整个归档。
    pub fn save_archive(&self, target: &dyn SaveTarget) -> Result<PathBuf, FaviconError> {
        let bundle = self.download_archive()?;
        target
            .save(&bundle.bytes, bundle.file_name)
            .inspect_err(|err| log::warn!("⚠️ {}", err))
    }

    /// 结束会话：使进行中的请求过期，并撤销当前图标集的全部句柄。
    pub fn teardown(&self) -> usize {
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let taken = match self.current.lock() {
            Ok(mut current) => current.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        let released = taken.map(|current| current.set.release()).unwrap_or(0);
        log::info!("👋 会话结束，撤销 {} 个预览句柄", released);
        released
    }
}
