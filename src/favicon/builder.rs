//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `VariantSetBuilder` 只负责流程编排，不关心结果如何展示或保存。
//! 处理链路固定为：
//! 1. 校验声明的媒体类型（失败时不解码、不分配任何句柄）
//! 2. 解码一次，得到共享像素
//! 3. 为目录中每个规格派发一个独立的缩放任务
//! 4. 全部成功后按目录顺序组装，并统一分配预览句柄
//!
//! ## 实现思路
//!
//! - 缩放是 CPU 密集型操作，并行时通过 `JoinSet::spawn_blocking` 派发，
//!   顺序模式下整体放入一个 `spawn_blocking`，都不占用异步执行线程。
//! - 任务结果按目录下标归位，因此输出顺序与完成顺序无关。
//! - 任一任务失败即中止其余任务，并以 `Generation` 包装第一个错误返回。
//! - 记录 `decode/resize/total` 阶段耗时，便于性能诊断。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use image::imageops::FilterType;
use tokio::task::{self, JoinSet};

use super::catalog::{self, VariantSpec};
use super::handles::HandleRegistry;
use super::source::{DecodedSurface, SourceImage};
use super::variant_set::{GeneratedVariant, VariantSet};
use super::{FaviconError, GeneratorConfig, decoder, resize};

/// 图标集生成器。
///
/// 持有配置快照与会话级句柄表；单次 `build` 的全部句柄都登记在同一个 arena 中。
#[derive(Debug, Clone)]
pub struct VariantSetBuilder {
    config: Arc<GeneratorConfig>,
    registry: HandleRegistry,
}

impl VariantSetBuilder {
    pub fn new(config: GeneratorConfig, registry: HandleRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// 为一张源图片生成完整图标集。
    ///
    /// 类型不被接受时返回 `InvalidInput`；其余任何失败都返回 `Generation`，
    /// 且不会留下任何已分配的句柄。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use metafav::favicon::{GeneratorConfig, HandleRegistry, SourceImage, VariantSetBuilder};
    ///
    /// # async fn demo(png: Vec<u8>) -> Result<(), metafav::favicon::FaviconError> {
    /// let builder = VariantSetBuilder::new(GeneratorConfig::default(), HandleRegistry::new());
    /// let set = builder.build(&SourceImage::new(png, "image/png")).await?;
    /// assert_eq!(set.len(), 14);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(&self, source: &SourceImage) -> Result<VariantSet, FaviconError> {
        let specs: Vec<&'static VariantSpec> = catalog::all_specs().collect();
        self.build_with_specs(source, &specs).await
    }

    /// 按给定规格列表生成；`build` 总是传入完整目录。
    pub(crate) async fn build_with_specs(
        &self,
        source: &SourceImage,
        specs: &[&'static VariantSpec],
    ) -> Result<VariantSet, FaviconError> {
        source.media_type()?;

        let total_start = Instant::now();

        let decode_start = Instant::now();
        let surface = self.decode(source).await.map_err(FaviconError::into_generation)?;
        let decode_elapsed = decode_start.elapsed();

        let resize_start = Instant::now();
        let resized = if self.config.parallel_resize {
            resize_concurrently(&surface, specs, self.config.resize_filter).await
        } else {
            resize_sequentially(&surface, specs, self.config.resize_filter).await
        };
        let blobs = resized.map_err(FaviconError::into_generation)?;
        let resize_elapsed = resize_start.elapsed();

        let set = self.assemble(specs, blobs);
        set.verify_complete().map_err(FaviconError::into_generation)?;

        log::info!(
            "✅ 图标集生成完成 - 源尺寸: {}x{} 条目: {} decode={}ms resize={}ms total={}ms",
            surface.width(),
            surface.height(),
            set.len(),
            decode_elapsed.as_millis(),
            resize_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(set)
    }

    async fn decode(&self, source: &SourceImage) -> Result<DecodedSurface, FaviconError> {
        let source = source.clone();
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || decoder::decode(&source, &config))
            .await
            .map_err(|e| FaviconError::Decode(format!("解码任务异常退出：{}", e)))?
    }

    /// 按目录分组组装，并为每个结果分配预览句柄。
    fn assemble(&self, specs: &[&'static VariantSpec], blobs: Vec<Bytes>) -> VariantSet {
        let mut arena = self.registry.arena();
        let resized: Vec<(&'static VariantSpec, Bytes)> =
            specs.iter().copied().zip(blobs).collect();

        let groups = catalog::CATALOG
            .iter()
            .map(|group| {
                let variants = resized
                    .iter()
                    .filter(|(spec, _)| group.specs.contains(*spec))
                    .map(|(spec, blob)| GeneratedVariant {
                        spec: *spec,
                        handle: arena.acquire(blob.clone()),
                        blob: blob.clone(),
                    })
                    .collect();
                (group.kind, variants)
            })
            .collect();

        VariantSet::from_parts(groups, arena)
    }
}

/// 为每个规格派发独立任务，并按目录下标收集结果。
async fn resize_concurrently(
    surface: &DecodedSurface,
    specs: &[&'static VariantSpec],
    filter: FilterType,
) -> Result<Vec<Bytes>, FaviconError> {
    let mut tasks = JoinSet::new();
    let mut task_sizes: HashMap<task::Id, u32> = HashMap::with_capacity(specs.len());
    for (index, spec) in specs.iter().copied().enumerate() {
        let surface = surface.clone();
        let handle = tasks.spawn_blocking(move || (index, resize::resize(&surface, spec.size, filter)));
        task_sizes.insert(handle.id(), spec.size);
    }

    let mut slots: Vec<Option<Bytes>> = vec![None; specs.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(blob))) => slots[index] = Some(blob),
            Ok((index, Err(err))) => {
                log::warn!("⚠️ {} 生成失败，中止其余任务：{}", specs[index].file_name, err);
                tasks.abort_all();
                return Err(err);
            }
            Err(join_err) => {
                tasks.abort_all();
                let message = format!("缩放任务异常退出：{}", join_err);
                return Err(match task_sizes.get(&join_err.id()) {
                    Some(&size) => FaviconError::Resize { size, message },
                    None => FaviconError::Internal(message),
                });
            }
        }
    }

    slots
        .into_iter()
        .zip(specs)
        .map(|(slot, spec)| {
            slot.ok_or_else(|| FaviconError::Resize {
                size: spec.size,
                message: "缩放任务未返回结果".to_string(),
            })
        })
        .collect()
}

/// 在单个后台线程中逐个尺寸依次缩放。
async fn resize_sequentially(
    surface: &DecodedSurface,
    specs: &[&'static VariantSpec],
    filter: FilterType,
) -> Result<Vec<Bytes>, FaviconError> {
    let surface = surface.clone();
    let specs = specs.to_vec();

    tokio::task::spawn_blocking(move || {
        specs
            .iter()
            .map(|spec| resize::resize(&surface, spec.size, filter))
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| FaviconError::Internal(format!("缩放任务异常退出：{}", e)))?
}
