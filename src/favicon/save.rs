//! # 保存目标
//!
//! ## 设计思路
//!
//! “保存到用户设备”是流水线之外的协作方：接收 `(字节, 建议文件名)`，成功或失败。
//! 失败只作为一次性提示反馈给用户，不影响当前图标集。
//!
//! ## 实现思路
//!
//! - `SaveTarget` trait 隔离具体的保存方式，便于测试替换。
//! - `DirectorySaveTarget` 写入指定目录，目录不存在时自动 `create_dir_all`。
//! - 建议文件名只允许单层文件名，拒绝路径分隔符与 `..`。

use std::fs;
use std::path::{Path, PathBuf};

use super::FaviconError;

/// 保存协作方。
pub trait SaveTarget: Send + Sync {
    /// 保存字节，返回实际写入位置。
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<PathBuf, FaviconError>;
}

/// 将文件写入本地目录的保存目标。
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<PathBuf, FaviconError> {
        validate_file_name(suggested_name)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                FaviconError::Save(format!("创建输出目录 '{}' 失败：{}", self.dir.display(), e))
            })?;
        }

        let path = self.dir.join(suggested_name);
        fs::write(&path, bytes)
            .map_err(|e| FaviconError::Save(format!("写入 '{}' 失败：{}", path.display(), e)))?;

        log::info!("💾 已保存 {}（{} 字节）", path.display(), bytes.len());
        Ok(path)
    }
}

fn validate_file_name(name: &str) -> Result<(), FaviconError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FaviconError::Save(format!("非法文件名：{:?}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        std::env::temp_dir().join(format!("metafav-save-test-{nanos}"))
    }

    #[test]
    fn saves_into_created_directory() {
        let dir = unique_temp_dir().join("nested");
        let target = DirectorySaveTarget::new(&dir);

        let path = target.save(b"zip-bytes", "favicons.zip").expect("save should succeed");
        assert_eq!(path, dir.join("favicons.zip"));
        assert_eq!(fs::read(&path).expect("read back"), b"zip-bytes");

        let _ = fs::remove_dir_all(dir.parent().unwrap_or(&dir));
    }

    #[test]
    fn rejects_path_like_names() {
        let target = DirectorySaveTarget::new(unique_temp_dir());
        for name in ["", "..", "../evil.png", "a/b.png", "a\\b.png"] {
            assert!(matches!(target.save(b"x", name), Err(FaviconError::Save(_))), "{name:?}");
        }
    }
}
