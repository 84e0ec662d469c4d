//! # 图标规格目录
//!
//! 静态表：每个目标尺寸对应的输出文件名，按平台分为三组。
//! 所有输出最终落在同一个扁平归档命名空间中，因此文件名必须全局唯一，
//! 这一点由本模块的测试保证，而不是运行时检查。
//!
//! 新增平台尺寸时只需修改此表，缩放引擎无需改动。

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 单个图标规格：目标边长（像素）与输出文件名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantSpec {
    pub size: u32,
    pub file_name: &'static str,
}

impl VariantSpec {
    pub(crate) const fn new(size: u32, file_name: &'static str) -> Self {
        Self { size, file_name }
    }
}

/// 图标分组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantGroupKind {
    Favicons,
    TouchIcons,
    AppIcons,
}

impl VariantGroupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favicons => "favicons",
            Self::TouchIcons => "apple-touch-icons",
            Self::AppIcons => "android-icons",
        }
    }
}

/// 命名的有序规格序列。
#[derive(Debug)]
pub struct VariantGroup {
    pub kind: VariantGroupKind,
    pub specs: &'static [VariantSpec],
}

const FAVICONS: &[VariantSpec] = &[
    VariantSpec::new(16, "favicon-16x16.png"),
    VariantSpec::new(32, "favicon-32x32.png"),
    VariantSpec::new(48, "favicon-48x48.png"),
];

const TOUCH_ICONS: &[VariantSpec] = &[
    VariantSpec::new(57, "apple-touch-icon-57x57.png"),
    VariantSpec::new(60, "apple-touch-icon-60x60.png"),
    VariantSpec::new(72, "apple-touch-icon-72x72.png"),
    VariantSpec::new(76, "apple-touch-icon-76x76.png"),
    VariantSpec::new(114, "apple-touch-icon-114x114.png"),
    VariantSpec::new(120, "apple-touch-icon-120x120.png"),
    VariantSpec::new(144, "apple-touch-icon-144x144.png"),
    VariantSpec::new(152, "apple-touch-icon-152x152.png"),
    VariantSpec::new(180, "apple-touch-icon-180x180.png"),
];

const APP_ICONS: &[VariantSpec] = &[
    VariantSpec::new(192, "android-icon-192x192.png"),
    VariantSpec::new(512, "android-icon-512x512.png"),
];

/// 完整目录，组顺序即归档中的条目顺序。
pub static CATALOG: &[VariantGroup] = &[
    VariantGroup {
        kind: VariantGroupKind::Favicons,
        specs: FAVICONS,
    },
    VariantGroup {
        kind: VariantGroupKind::TouchIcons,
        specs: TOUCH_ICONS,
    },
    VariantGroup {
        kind: VariantGroupKind::AppIcons,
        specs: APP_ICONS,
    },
];

static BY_FILE_NAME: Lazy<HashMap<&'static str, &'static VariantSpec>> =
    Lazy::new(|| all_specs().map(|spec| (spec.file_name, spec)).collect());

/// 目录中的规格总数。
pub fn total_variants() -> usize {
    CATALOG.iter().map(|group| group.specs.len()).sum()
}

/// 按目录顺序遍历全部规格。
pub fn all_specs() -> impl Iterator<Item = &'static VariantSpec> {
    CATALOG.iter().flat_map(|group| group.specs.iter())
}

/// 按输出文件名查找规格。
pub fn find(file_name: &str) -> Option<&'static VariantSpec> {
    BY_FILE_NAME.get(file_name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_fourteen_entries_in_three_groups() {
        assert_eq!(CATALOG.len(), 3);
        assert_eq!(total_variants(), 14);
        assert_eq!(all_specs().count(), 14);
    }

    #[test]
    fn file_names_are_globally_unique() {
        let mut seen = HashSet::new();
        for spec in all_specs() {
            assert!(seen.insert(spec.file_name), "duplicate file name {}", spec.file_name);
        }
        assert_eq!(BY_FILE_NAME.len(), total_variants());
    }

    #[test]
    fn file_names_match_their_sizes() {
        for group in CATALOG {
            let prefix = match group.kind {
                VariantGroupKind::Favicons => "favicon",
                VariantGroupKind::TouchIcons => "apple-touch-icon",
                VariantGroupKind::AppIcons => "android-icon",
            };
            for spec in group.specs {
                assert!(spec.size > 0);
                assert_eq!(
                    spec.file_name,
                    format!("{prefix}-{n}x{n}.png", n = spec.size)
                );
            }
        }
    }

    #[test]
    fn file_names_do_not_collide_with_static_assets() {
        assert!(find("manifest.json").is_none());
        assert!(find("browserconfig.xml").is_none());
        assert_eq!(find("android-icon-512x512.png").map(|s| s.size), Some(512));
    }
}
