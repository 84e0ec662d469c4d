//! # metafav — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与协作方装配。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use metafav::error::AppError;
use metafav::favicon::{DirectorySaveTarget, GeneratorConfig, GeneratorSession, templates};
use metafav::input;

#[derive(Debug, Parser)]
#[command(name = "metafav", version, about = "从一张图片生成完整的 favicon / touch-icon 图标集")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 生成图标集并保存（默认保存 favicons.zip）
    Generate {
        /// 源图片路径，或 `data:image/png;base64,...`
        input: String,
        /// 输出目录
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// JSON 配置文件
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// 缩放档位：balanced / speed
        #[arg(long)]
        profile: Option<String>,
        /// 显式声明媒体类型（默认按文件签名推断）
        #[arg(long = "type")]
        media_type: Option<String>,
        /// 逐个尺寸依次缩放
        #[arg(long)]
        sequential: bool,
        /// 只保存指定的单个图标文件
        #[arg(long)]
        only: Option<String>,
        /// 同时把各图标文件单独保存到输出目录
        #[arg(long)]
        unpacked: bool,
        /// 打印 HTML 引用片段
        #[arg(long)]
        snippet: bool,
        /// 以 JSON 输出生成摘要
        #[arg(long)]
        json: bool,
    },
    /// 打印 HTML 引用片段（无需源图片）
    Snippet,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Snippet => {
            print!("{}", templates::html_snippet());
            Ok(())
        }
        Command::Generate {
            input,
            out,
            config,
            profile,
            media_type,
            sequential,
            only,
            unpacked,
            snippet,
            json,
        } => {
            let mut generator_config = config
                .as_deref()
                .map(GeneratorConfig::load_from_path)
                .unwrap_or_default();
            if sequential {
                generator_config.parallel_resize = false;
            }
            let max_file_size = generator_config.max_file_size;

            let session = GeneratorSession::with_config(generator_config);
            if let Some(profile) = profile.as_deref() {
                session.set_profile(profile)?;
            }

            let source = input::load_source(&input, media_type.as_deref(), max_file_size)?;
            let summary = session.generate(source).await?;

            if json {
                let rendered = serde_json::to_string_pretty(&summary)
                    .map_err(|e| AppError::Serialize(e.to_string()))?;
                println!("{}", rendered);
            } else {
                for variant in &summary.variants {
                    println!(
                        "{:<20} {:<32} {:>4}px {:>8} B  {}",
                        variant.group, variant.file_name, variant.size, variant.bytes, variant.preview_url
                    );
                }
            }

            let target = DirectorySaveTarget::new(out);
            match only.as_deref() {
                Some(file_name) => {
                    let path = session.save_variant(file_name, &target)?;
                    println!("{}", path.display());
                }
                None => {
                    if unpacked {
                        for variant in &summary.variants {
                            session.save_variant(variant.file_name, &target)?;
                        }
                    }
                    let path = session.save_archive(&target)?;
                    println!("{}", path.display());
                }
            }

            if snippet {
                print!("{}", templates::html_snippet());
            }

            session.teardown();
            Ok(())
        }
    }
}
