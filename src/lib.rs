//! # metafav — 图标集生成工具库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            外部协作方（文件选择 / 保存到设备）             │
//! │        main.rs：命令行参数 → SourceImage → 保存目标        │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            核心 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ input ────── 读取文件 + 推断声明类型 (infer)          │
//! │  │                                                       │
//! │  └─ favicon ──── 解码·缩放·句柄·打包                     │
//! │      ├─ session   唯一的当前图标集                        │
//! │      ├─ builder   JoinSet 并行缩放，全有或全无            │
//! │      └─ packager  favicons.zip + 静态模板                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`input`] | 读取源文件并推断声明的媒体类型 |
//! | [`favicon`] | 图标集生成、预览句柄、归档打包与保存 |

pub mod error;
pub mod favicon;
pub mod input;
