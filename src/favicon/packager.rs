//! # 归档打包模块
//!
//! ## 设计思路
//!
//! 把完整图标集与两个静态模板序列化为一个 zip 归档。
//! 所有条目平铺在根目录（不按分组建子目录），条目名即目录中的输出文件名。
//!
//! ## 实现思路
//!
//! - 打包前校验图标集完整性，不完整视为调用契约被破坏（`Packaging`）。
//! - 条目顺序：目录顺序的图标，随后 `manifest.json`、`browserconfig.xml`。
//! - 条目时间戳固定，同一图标集多次打包得到相同的条目集合。

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::variant_set::VariantSet;
use super::{FaviconError, GeneratorConfig, templates};

pub const ARCHIVE_FILE_NAME: &str = "favicons.zip";

/// 序列化后的归档及建议文件名。
#[derive(Debug, Clone)]
pub struct ArchiveBundle {
    pub bytes: Bytes,
    pub file_name: &'static str,
    pub entry_count: usize,
}

/// 将图标集打包为 zip 归档。
pub fn pack(set: &VariantSet, config: &GeneratorConfig) -> Result<ArchiveBundle, FaviconError> {
    set.verify_complete()?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(config.compression_level)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entry_count = 0;

    for variant in set.variants() {
        write_entry(&mut zip, variant.spec.file_name, &variant.blob, options)?;
        entry_count += 1;
    }
    for (name, data) in templates::static_assets() {
        write_entry(&mut zip, name, data, options)?;
        entry_count += 1;
    }

    let bytes = zip
        .finish()
        .map_err(|e| FaviconError::Packaging(format!("完成归档失败：{}", e)))?
        .into_inner();

    log::info!(
        "📦 归档打包完成 - 条目: {} 大小: {}KB",
        entry_count,
        bytes.len() / 1024
    );

    Ok(ArchiveBundle {
        bytes: Bytes::from(bytes),
        file_name: ARCHIVE_FILE_NAME,
        entry_count,
    })
}

fn write_entry(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<(), FaviconError> {
    zip.start_file(name, options)
        .map_err(|e| FaviconError::Packaging(format!("写入条目 {} 失败：{}", name, e)))?;
    zip.write_all(data)
        .map_err(|e| FaviconError::Packaging(format!("写入条目 {} 失败：{}", name, e)))
}
