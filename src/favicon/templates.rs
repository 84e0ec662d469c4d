//! # 静态模板
//!
//! 与源图片无关的固定文本：随每个归档打包的 `manifest.json` 与
//! `browserconfig.xml`，以及可直接粘贴到页面 `<head>` 中的引用片段。

use std::fmt::Write as _;

use super::catalog::{self, VariantGroupKind};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const BROWSERCONFIG_FILE_NAME: &str = "browserconfig.xml";

pub const MANIFEST_JSON: &str = r#"{
  "name": "App",
  "icons": [
    {
      "src": "/android-icon-192x192.png",
      "sizes": "192x192",
      "type": "image/png"
    },
    {
      "src": "/android-icon-512x512.png",
      "sizes": "512x512",
      "type": "image/png"
    }
  ]
}
"#;

pub const BROWSERCONFIG_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<browserconfig>
  <msapplication>
    <tile>
      <square150x150logo src="/apple-touch-icon-152x152.png"/>
      <TileColor>#ffffff</TileColor>
    </tile>
  </msapplication>
</browserconfig>
"#;

/// 打包进归档的静态资源（文件名, 内容），顺序即归档顺序。
pub fn static_assets() -> [(&'static str, &'static [u8]); 2] {
    [
        (MANIFEST_FILE_NAME, MANIFEST_JSON.as_bytes()),
        (BROWSERCONFIG_FILE_NAME, BROWSERCONFIG_XML.as_bytes()),
    ]
}

/// 生成引用全部图标与静态资源的 HTML 片段。
///
/// 仅依赖目录，无需运行生成流程。
pub fn html_snippet() -> String {
    let mut out = String::new();

    for group in catalog::CATALOG {
        for spec in group.specs {
            let size = format!("{n}x{n}", n = spec.size);
            let _ = match group.kind {
                VariantGroupKind::Favicons => writeln!(
                    out,
                    r#"<link rel="icon" type="image/png" sizes="{size}" href="/{}">"#,
                    spec.file_name
                ),
                VariantGroupKind::TouchIcons => writeln!(
                    out,
                    r#"<link rel="apple-touch-icon" sizes="{size}" href="/{}">"#,
                    spec.file_name
                ),
                VariantGroupKind::AppIcons => writeln!(
                    out,
                    r#"<link rel="icon" type="image/png" sizes="{size}" href="/{}">"#,
                    spec.file_name
                ),
            };
        }
    }

    let _ = writeln!(out, r#"<link rel="manifest" href="/{MANIFEST_FILE_NAME}">"#);
    let _ = writeln!(out, r##"<meta name="msapplication-TileColor" content="#ffffff">"##);
    let _ = writeln!(
        out,
        r#"<meta name="msapplication-TileImage" content="/apple-touch-icon-144x144.png">"#
    );
    let _ = writeln!(
        out,
        r#"<meta name="msapplication-config" content="/{BROWSERCONFIG_FILE_NAME}">"#
    );
    let _ = writeln!(out, r##"<meta name="theme-color" content="#ffffff">"##);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_references_every_output_file() {
        let snippet = html_snippet();
        for spec in catalog::all_specs() {
            assert!(
                snippet.contains(&format!("href=\"/{}\"", spec.file_name)),
                "snippet is missing {}",
                spec.file_name
            );
        }
        assert!(snippet.contains(MANIFEST_FILE_NAME));
        assert!(snippet.contains(BROWSERCONFIG_FILE_NAME));
        assert_eq!(html_snippet(), snippet);
    }

    #[test]
    fn manifest_is_valid_json_referencing_catalog_files() {
        let manifest: serde_json::Value =
            serde_json::from_str(MANIFEST_JSON).expect("manifest should be valid json");
        let icons = manifest["icons"].as_array().expect("icons array");

        for icon in icons {
            let src = icon["src"].as_str().expect("src");
            assert!(catalog::find(src.trim_start_matches('/')).is_some(), "{src} not in catalog");
        }
    }

    #[test]
    fn browserconfig_references_catalog_file() {
        assert!(BROWSERCONFIG_XML.starts_with("<?xml"));
        assert!(catalog::find("apple-touch-icon-152x152.png").is_some());
        assert!(BROWSERCONFIG_XML.contains("/apple-touch-icon-152x152.png"));
    }
}
