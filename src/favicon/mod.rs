//! # 图标生成模块（favicon）
//!
//! ## 设计思路
//!
//! 该模块将“类型校验 → 解码 → 多尺寸缩放 → 组装图标集 → 打包归档”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `catalog`：静态规格目录（尺寸 + 输出文件名）
//! - `decoder`：按声明类型解码，带像素/内存上限
//! - `resize`：单个尺寸的缩放与 PNG 编码
//! - `builder`：编排整条流水线（并行派发 + 全有或全无）
//! - `handles`：预览句柄的分配与一次性撤销
//! - `variant_set`：完整图标集模型
//! - `packager` / `templates`：zip 归档与静态模板
//! - `session`：持有唯一“当前图标集”的会话
//! - `save`：保存到用户设备的协作方
//! - `config/error/source`：配置、错误、输入模型
//!
//! ## 调用链
//!
//! ```text
//! 文件选择（声明媒体类型）
//!    ↓
//! session.rs（epoch 判定、替换当前图标集）
//!    ↓
//! builder.rs（统一编排 + 阶段耗时日志）
//!    ├─ decoder.rs（解码一次）
//!    ├─ resize.rs × 14（JoinSet 并行）
//!    └─ handles.rs（全部成功后分配句柄）
//!    ↓
//! packager.rs → save.rs（favicons.zip）
//! ```

pub mod builder;
pub mod catalog;
mod config;
pub mod decoder;
mod error;
pub mod handles;
pub mod packager;
pub mod resize;
pub mod save;
pub mod session;
mod source;
pub mod templates;
pub mod variant_set;

pub use builder::VariantSetBuilder;
pub use catalog::{VariantGroup, VariantGroupKind, VariantSpec};
pub use config::{GeneratorConfig, ResizeProfile};
pub use error::FaviconError;
pub use handles::{DisplayHandle, HandleArena, HandleRegistry};
pub use packager::{ARCHIVE_FILE_NAME, ArchiveBundle, pack};
pub use save::{DirectorySaveTarget, SaveTarget};
pub use session::{GenerationSummary, GeneratorSession, VariantSummary};
pub use source::{DecodedSurface, MediaType, SourceImage};
pub use variant_set::{GeneratedVariant, VariantSet};
