//! # 预览句柄生命周期
//!
//! ## 设计思路
//!
//! 每个生成的图标都有一个可撤销的预览句柄（类似浏览器的 object URL），
//! 通过它可以展示图标而不复制字节。句柄表 `HandleRegistry` 在整个会话内共享，
//! 而句柄本身全部由一个 `HandleArena` 持有，arena 归属于唯一的 `VariantSet`。
//!
//! ## 实现思路
//!
//! - `HandleArena::acquire` 登记字节并返回句柄。
//! - `HandleArena::release_all` 消费 arena，一次性撤销全部句柄。
//! - `Drop` 兜底撤销尚未释放的句柄；释放后 arena 已被消费，无法重复释放。
//! - 已撤销的句柄在 `resolve` 时返回 `None`。

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;

const HANDLE_URL_PREFIX: &str = "blob:metafav/";

/// 预览句柄。仅作为引用存在，本身不持有字节。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle {
    id: u64,
}

impl DisplayHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 句柄的预览地址，例如 `blob:metafav/7`。
    pub fn url(&self) -> String {
        format!("{HANDLE_URL_PREFIX}{}", self.id)
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HANDLE_URL_PREFIX}{}", self.id)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, Bytes>>,
}

/// 会话级句柄表：记录所有仍然有效的句柄。
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<RegistryInner>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为当前句柄表创建一个新的 arena。
    pub fn arena(&self) -> HandleArena {
        HandleArena {
            registry: self.clone(),
            handles: Vec::new(),
        }
    }

    /// 解析句柄；已撤销或未知的句柄返回 `None`。
    pub fn resolve(&self, handle: &DisplayHandle) -> Option<Bytes> {
        self.live().get(&handle.id).cloned()
    }

    /// 当前仍然有效的句柄数量。
    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    fn live(&self) -> MutexGuard<'_, HashMap<u64, Bytes>> {
        // 表中只有插入与删除，中毒后的数据仍然一致
        self.inner
            .live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn register(&self, blob: Bytes) -> DisplayHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live().insert(id, blob);
        DisplayHandle { id }
    }

    fn revoke(&self, ids: &[u64]) -> usize {
        let mut live = self.live();
        ids.iter().filter(|id| live.remove(id).is_some()).count()
    }
}

/// 一个图标集的全部句柄。
///
/// 每个句柄只会被撤销一次：要么通过 `release_all`，要么在 `Drop` 时。
#[derive(Debug)]
pub struct HandleArena {
    registry: HandleRegistry,
    handles: Vec<u64>,
}

impl HandleArena {
    /// 登记一段字节并返回其预览句柄。
    pub fn acquire(&mut self, blob: Bytes) -> DisplayHandle {
        let handle = self.registry.register(blob);
        self.handles.push(handle.id);
        handle
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 一次性撤销全部句柄，返回实际撤销的数量。
    pub fn release_all(mut self) -> usize {
        self.revoke_held()
    }

    fn revoke_held(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }
        let ids = std::mem::take(&mut self.handles);
        let revoked = self.registry.revoke(&ids);
        log::debug!("🧹 已撤销 {} 个预览句柄", revoked);
        revoked
    }
}

impl Drop for HandleArena {
    fn drop(&mut self) {
        self.revoke_held();
    }
}
