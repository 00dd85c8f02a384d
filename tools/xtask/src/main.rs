//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 shell-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `content-check`: 检查内容目录（字段类型、商品列表）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shell_runtime::{ContentStore, DiagnosticResult, analyze_content};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

/// 默认内容目录
const CONTENT_DIR: &str = "assets/content";

#[derive(Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 shell-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 检查内容目录
    ///
    /// 不带参数：检查 assets/content/ 下所有 .json 文件
    ContentCheck {
        /// 指定文件或目录
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Task::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            step("cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Task::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p shell-runtime --html");
            cmd!(sh, "cargo llvm-cov -p shell-runtime --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除 xtask，避免稀释信号
            step("cargo llvm-cov --workspace --exclude xtask --html");
            cmd!(
                sh,
                "cargo llvm-cov --workspace --exclude xtask --all-features --html"
            )
            .run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::ContentCheck { path } => content_check(path.as_deref())?,
    }

    Ok(())
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
    )
}

//=============================================================================
// content-check 命令实现
//=============================================================================

/// 内容检查结果
#[derive(Default)]
struct ContentCheckResult {
    files_checked: usize,
    /// 无法读取或解析的文件数
    parse_errors: usize,
    diagnostics: DiagnosticResult,
}

fn content_check(path: Option<&Path>) -> anyhow::Result<()> {
    let root = path.unwrap_or(Path::new(CONTENT_DIR));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定内容目录路径",
            root.display()
        );
    }

    let files = collect_content_files(root)?;
    if files.is_empty() {
        eprintln!("未找到内容目录文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个内容目录...\n", files.len());

    let mut result = ContentCheckResult::default();
    for file in &files {
        check_content_file(file, &mut result);
    }

    print_check_result(&result);

    if result.parse_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("内容检查发现错误");
    }
    Ok(())
}

fn collect_content_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn check_content_file(file: &Path, result: &mut ContentCheckResult) {
    result.files_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {e}", file.display());
            result.parse_errors += 1;
            return;
        }
    };

    let store: ContentStore = match serde_json::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[ERROR] {}: {e}", file.display());
            result.parse_errors += 1;
            return;
        }
    };

    let diagnostics = analyze_content(&store);
    if !diagnostics.is_empty() {
        eprintln!("{}:", file.display());
        for diag in &diagnostics.diagnostics {
            eprintln!("  {diag}");
        }
    }
    result.diagnostics.merge(diagnostics);
}

fn print_check_result(result: &ContentCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个内容目录", result.files_checked);

    let error_count = result.parse_errors + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {error_count} 个错误, {warn_count} 个警告");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {warn_count} 个警告");
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
