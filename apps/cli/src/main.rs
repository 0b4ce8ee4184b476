//! # Roboarm CLI
//!
//! 通过 UART 帧协议驱动模拟机械臂的命令行工具。
//!
//! ```bash
//! # 执行 JSON 脚本（每条命令都经过 编码 -> 分发 -> 解码）
//! roboarm-cli run demo.json --config arm.toml --ticks 200
//!
//! # 打印请求帧
//! roboarm-cli encode set-new-position --joints 10,-20,0,0,45
//! roboarm-cli encode set-speed --speed 200
//!
//! # 解析带长度前缀的响应帧
//! roboarm-cli decode 0101
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod script;

use commands::{DecodeCommand, EncodeCommand, RunCommand};

/// Roboarm CLI - 机械臂串口协议工具
#[derive(Parser, Debug)]
#[command(name = "roboarm-cli")]
#[command(about = "Drive a simulated roboarm through its UART frame protocol", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 对模拟机械臂执行脚本
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 编码请求帧并以十六进制输出
    Encode {
        #[command(flatten)]
        args: EncodeCommand,
    },

    /// 解析十六进制响应帧
    Decode {
        #[command(flatten)]
        args: DecodeCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roboarm_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Encode { args } => args.execute(),
        Commands::Decode { args } => args.execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["roboarm-cli", "run", "demo.json", "--ticks", "50"]).unwrap();
        match cli.command {
            Commands::Run { args } => {
                assert_eq!(args.script, "demo.json");
                assert_eq!(args.ticks, 50);
                assert!(args.config.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
