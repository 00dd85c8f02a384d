//! # Terminal 模块
//!
//! 无界面的终端前端：从输入流逐行读取命令，视图变化时打印文本。
//!
//! | 命令 | 操作 |
//! |---|---|
//! | `hero <name>` | 提交英雄名 |
//! | `store` | 进入商店 |
//! | `back` | 返回大厅 |
//! | `claim` | 领取欢迎优惠 |
//! | `close` / `dismiss` | 关闭欢迎优惠 |
//! | `retry` | 重试失败的启动步骤 |
//! | `view` | 重新打印当前界面 |
//! | `help` | 命令列表 |
//! | `quit` / `exit` | 退出 |

use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use shell_runtime::{
    Attribution, ContentStore, DiagnosticLevel, ShellAction, ShellResult, analyze_content,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

use crate::driver::ShellDriver;
use crate::provider::ContentProvider;
use crate::text_view::render_text;

const HELP: &str = "\
commands:
  hero <name>    submit hero name
  store          enter the store
  back           back to the lobby
  claim          claim the welcome offer
  close          close the welcome offer
  retry          retry a failed start
  view           print the current screen
  quit           exit
";

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Hero(String),
    Store,
    Back,
    Claim,
    Close,
    Retry,
    View,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("空命令")]
    Empty,

    #[error("未知命令: {0}（输入 help 查看命令列表）")]
    Unknown(String),
}

impl FromStr for TerminalCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            // 英雄名原样交给路由，空白名由路由忽略
            "hero" => Ok(Self::Hero(rest.to_string())),
            "store" => Ok(Self::Store),
            "back" => Ok(Self::Back),
            "claim" => Ok(Self::Claim),
            "close" | "dismiss" => Ok(Self::Close),
            "retry" => Ok(Self::Retry),
            "view" => Ok(Self::View),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandParseError::Unknown(word.to_string())),
        }
    }
}

impl TerminalCommand {
    /// 对应的玩家操作
    pub fn action(&self) -> Option<ShellAction> {
        match self {
            Self::Hero(name) => Some(ShellAction::submit_hero(name.clone())),
            Self::Store => Some(ShellAction::EnterStore),
            Self::Back => Some(ShellAction::BackToLobby),
            Self::Claim => Some(ShellAction::ClaimOffer),
            Self::Close => Some(ShellAction::DismissOffer),
            Self::Retry | Self::View | Self::Help | Self::Quit => None,
        }
    }
}

/// 终端前端
pub struct Terminal<W: Write + 'static> {
    out: Rc<RefCell<W>>,
    content_check: bool,
    content_checked: bool,
}

impl<W: Write + 'static> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
            content_check: false,
            content_checked: false,
        }
    }

    /// 内容就绪后输出内容目录诊断
    pub fn with_content_check(mut self, enabled: bool) -> Self {
        self.content_check = enabled;
        self
    }

    /// 已写出的内容
    pub fn output(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    /// 启动并处理输入，直到输入结束或 `quit`
    pub async fn run<P, R>(
        &mut self,
        driver: &mut ShellDriver<P>,
        attribution: Attribution,
        input: R,
    ) -> anyhow::Result<()>
    where
        P: ContentProvider + 'static,
        R: AsyncBufRead + Unpin,
    {
        let out = Rc::clone(&self.out);
        driver.observe(move |view: &shell_runtime::View| {
            write_out(&out, &render_text(view));
        });

        driver.launch(attribution).await?;
        self.check_content(driver);

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<TerminalCommand>() {
                Ok(command) => command,
                Err(e) => {
                    self.print(&format!("{e}\n"));
                    continue;
                }
            };
            debug!(command = ?command, "终端命令");

            match command {
                TerminalCommand::Quit => break,
                TerminalCommand::Help => self.print(HELP),
                TerminalCommand::View => self.print(&render_text(&driver.view())),
                TerminalCommand::Retry => {
                    let result = driver.retry().await;
                    self.report(result);
                    self.check_content(driver);
                }
                other => {
                    if let Some(action) = other.action() {
                        let result = driver.dispatch(action).await;
                        self.report(result);
                    }
                }
            }
        }

        driver.settle().await;
        info!("终端前端退出");
        Ok(())
    }

    fn print(&self, text: &str) {
        write_out(&self.out, text);
    }

    /// 操作被拒绝时提示，不中断会话
    fn report(&self, result: ShellResult<()>) {
        if let Err(e) = result {
            debug!(error = %e, "操作被拒绝");
            self.print(&format!("! {e}\n"));
        }
    }

    fn check_content<P: ContentProvider + 'static>(&mut self, driver: &ShellDriver<P>) {
        let state = driver.router().state();
        if !self.content_check || self.content_checked || !state.phase.is_ready() {
            return;
        }
        self.content_checked = true;
        report_content_diagnostics(&state.content);
    }
}

fn write_out<W: Write>(out: &RefCell<W>, text: &str) {
    let mut out = out.borrow_mut();
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        warn!(error = %e, "终端输出失败");
    }
}

/// 把内容目录诊断写入日志
pub fn report_content_diagnostics(store: &ContentStore) {
    let result = analyze_content(store);
    if result.is_empty() {
        info!("内容检查通过");
        return;
    }

    for diagnostic in &result.diagnostics {
        match diagnostic.level {
            DiagnosticLevel::Error => error!("{diagnostic}"),
            DiagnosticLevel::Warn => warn!("{diagnostic}"),
            DiagnosticLevel::Info => info!("{diagnostic}"),
        }
    }
    info!(
        errors = result.error_count(),
        warnings = result.warn_count(),
        "内容检查完成"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "hero Aria".parse::<TerminalCommand>(),
            Ok(TerminalCommand::Hero("Aria".to_string()))
        );
        assert_eq!(
            "  HERO   Star Knight ".parse::<TerminalCommand>(),
            Ok(TerminalCommand::Hero("  Star Knight".to_string()))
        );
        assert_eq!("dismiss".parse::<TerminalCommand>(), Ok(TerminalCommand::Close));
        assert_eq!("exit".parse::<TerminalCommand>(), Ok(TerminalCommand::Quit));
        assert_eq!("".parse::<TerminalCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "dance".parse::<TerminalCommand>(),
            Err(CommandParseError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_bare_hero_maps_to_blank_submission() {
        let command: TerminalCommand = "hero".parse().unwrap();
        assert_eq!(command.action(), Some(ShellAction::submit_hero("")));
        assert_eq!(TerminalCommand::View.action(), None);
    }
}
