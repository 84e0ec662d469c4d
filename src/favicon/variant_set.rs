//! # 图标集模型
//!
//! `VariantSet` 要么完整（目录中每个规格恰好一个结果），要么不存在。
//! 它独占自己的 `HandleArena`：图标集被丢弃或替换时，全部预览句柄随之撤销。

use std::collections::HashSet;

use bytes::Bytes;

use super::FaviconError;
use super::catalog::{self, VariantGroupKind, VariantSpec};
use super::handles::{DisplayHandle, HandleArena};

/// 单个生成结果。
#[derive(Debug)]
pub struct GeneratedVariant {
    pub spec: &'static VariantSpec,
    pub blob: Bytes,
    pub handle: DisplayHandle,
}

/// 按目录分组、按目录顺序排列的完整图标集。
#[derive(Debug)]
pub struct VariantSet {
    groups: Vec<(VariantGroupKind, Vec<GeneratedVariant>)>,
    arena: HandleArena,
}

impl VariantSet {
    pub(crate) fn from_parts(
        groups: Vec<(VariantGroupKind, Vec<GeneratedVariant>)>,
        arena: HandleArena,
    ) -> Self {
        Self { groups, arena }
    }

    pub fn groups(&self) -> impl Iterator<Item = (VariantGroupKind, &[GeneratedVariant])> {
        self.groups.iter().map(|(kind, variants)| (*kind, variants.as_slice()))
    }

    /// 按目录顺序遍历全部结果。
    pub fn variants(&self) -> impl Iterator<Item = &GeneratedVariant> {
        self.groups.iter().flat_map(|(_, variants)| variants.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, variants)| variants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, file_name: &str) -> Option<&GeneratedVariant> {
        self.variants().find(|variant| variant.spec.file_name == file_name)
    }

    /// 校验图标集与目录一一对应：无缺失、无重复、分组一致。
    pub fn verify_complete(&self) -> Result<(), FaviconError> {
        let mut seen = HashSet::new();
        for variant in self.variants() {
            if !seen.insert(variant.spec.file_name) {
                return Err(FaviconError::Packaging(format!(
                    "图标集中存在重复条目：{}",
                    variant.spec.file_name
                )));
            }
        }

        for group in catalog::CATALOG {
            let generated = self
                .groups
                .iter()
                .find(|(kind, _)| *kind == group.kind)
                .map(|(_, variants)| variants.as_slice())
                .unwrap_or_default();

            for spec in group.specs {
                if !generated.iter().any(|variant| variant.spec == spec) {
                    return Err(FaviconError::Packaging(format!(
                        "图标集缺少条目：{}（分组 {}）",
                        spec.file_name,
                        group.kind.as_str()
                    )));
                }
            }
        }

        if seen.len() != catalog::total_variants() {
            return Err(FaviconError::Packaging(format!(
                "图标集条目数异常：{}（应为 {}）",
                seen.len(),
                catalog::total_variants()
            )));
        }

        Ok(())
    }

    /// 撤销全部预览句柄并丢弃图标集。
    pub fn release(self) -> usize {
        let Self { groups, arena } = self;
        drop(groups);
        arena.release_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::handles::HandleRegistry;

    fn fake_set(registry: &HandleRegistry, skip: Option<&str>) -> VariantSet {
        let mut arena = registry.arena();
        let groups = catalog::CATALOG
            .iter()
            .map(|group| {
                let variants = group
                    .specs
                    .iter()
                    .filter(|spec| Some(spec.file_name) != skip)
                    .map(|spec| {
                        let blob = Bytes::from(spec.file_name.as_bytes().to_vec());
                        GeneratedVariant {
                            spec,
                            handle: arena.acquire(blob.clone()),
                            blob,
                        }
                    })
                    .collect();
                (group.kind, variants)
            })
            .collect();
        VariantSet::from_parts(groups, arena)
    }

    #[test]
    fn complete_set_verifies() {
        let registry = HandleRegistry::new();
        let set = fake_set(&registry, None);

        assert_eq!(set.len(), 14);
        set.verify_complete().expect("set should be complete");
        assert_eq!(set.get("favicon-32x32.png").map(|v| v.spec.size), Some(32));
    }

    #[test]
    fn missing_entry_is_reported() {
        let registry = HandleRegistry::new();
        let set = fake_set(&registry, Some("apple-touch-icon-76x76.png"));

        assert_eq!(set.len(), 13);
        let err = set.verify_complete().expect_err("set should be incomplete");
        assert!(matches!(err, FaviconError::Packaging(ref msg) if msg.contains("76x76")));
    }

    #[test]
    fn release_revokes_all_handles() {
        let registry = HandleRegistry::new();
        let set = fake_set(&registry, None);
        let handles: Vec<_> = set.variants().map(|v| v.handle.clone()).collect();
        assert_eq!(registry.live_count(), 14);

        assert_eq!(set.release(), 14);
        assert_eq!(registry.live_count(), 0);
        assert!(handles.iter().all(|h| registry.resolve(h).is_none()));
    }
}
