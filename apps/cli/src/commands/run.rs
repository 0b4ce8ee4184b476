//! run 命令
//!
//! 在模拟机械臂上执行脚本文件

use anyhow::{Context, Result};
use clap::Args;
use roboarm_driver::ArmConfig;
use roboarm_driver::sim::simulated_arm;
use tracing::info;

use crate::script::{ScriptExecutor, format_joints};

/// 脚本执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 脚本文件路径（JSON）
    pub script: String,

    /// 机械臂配置文件（TOML），缺省使用参考机构
    #[arg(short, long)]
    pub config: Option<String>,

    /// 每处理一帧后推进的调度节拍数
    #[arg(short, long, default_value_t = 1000)]
    pub ticks: usize,
}

impl RunCommand {
    /// 执行脚本
    pub fn execute(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => ArmConfig::load(path)
                .with_context(|| format!("加载配置文件失败: {path}"))?,
            None => ArmConfig::default(),
        };
        let arm = simulated_arm(config).context("初始化机械臂失败")?;

        println!("📜 加载脚本: {}", self.script);
        let script = ScriptExecutor::load_script(&self.script)?;

        println!("📋 脚本: {}", script.name);
        if !script.description.is_empty() {
            println!("    {}", script.description);
        }
        println!("    {} 个命令", script.commands.len());
        println!();

        let mut executor = ScriptExecutor::new(arm, self.ticks);
        let result = executor.execute(&script)?;
        info!("Script '{}' finished after {} ticks", script.name, result.ticks);

        println!();
        println!("📊 执行结果:");
        println!("  总命令数: {}", result.total_commands);
        println!("  成功: {}", result.succeeded.len());
        println!("  失败: {}", result.failed.len());
        println!("  调度节拍: {}", result.ticks);

        let arm = executor.arm();
        println!(
            "  模式: {:?}, 已标定: {}, 运动中: {}",
            arm.mode(),
            arm.is_calibrated(),
            arm.is_in_move()
        );
        if let Ok(position) = arm.get_current_position() {
            println!("  位置: {}", format_joints(&position));
        }

        if !result.failed.is_empty() {
            println!();
            println!("❌ 失败的命令:");
            for (idx, code) in &result.failed {
                println!("  命令 {}: {:?}", idx + 1, code);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roboarm_protocol::ResultCode;
    use std::io::Write;

    #[test]
    fn test_run_script_with_config() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        write!(
            script,
            r#"{{
                "name": "calibrate-and-move",
                "commands": [
                    {{ "type": "start_calibration" }},
                    {{ "type": "finish_calibration" }},
                    {{ "type": "move", "joints": {{ "x": 1.0, "y": 0.0, "z": 0.0, "v": 0.0, "w": 0.0 }} }},
                    {{ "type": "wait_idle" }},
                    {{ "type": "position" }}
                ]
            }}"#
        )
        .unwrap();

        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "[gripper]\npulse_ms = 0").unwrap();

        let cmd = RunCommand {
            script: script.path().display().to_string(),
            config: Some(config.path().display().to_string()),
            ticks: 10,
        };
        cmd.execute().unwrap();
    }

    #[test]
    fn test_run_bundled_demo() {
        let demos = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos");
        let mut config = ArmConfig::load(format!("{demos}/arm.toml")).unwrap();
        assert!(!config.axes.z.range.is_unbounded());
        config.gripper.pulse_ms = 0;

        let script = ScriptExecutor::load_script(format!("{demos}/calibrate_and_move.json")).unwrap();
        let mut executor = ScriptExecutor::new(simulated_arm(config).unwrap(), 0);
        let result = executor.execute(&script).unwrap();

        let failed: Vec<_> = result.failed.iter().map(|(_, code)| *code).collect();
        assert_eq!(
            failed,
            vec![
                ResultCode::ArmNotCalibrated,
                ResultCode::ArmInMove,
                ResultCode::ArmInvalidMoveRange
            ]
        );
        assert!(executor.arm().is_calibrated());
    }

    #[test]
    fn test_run_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = RunCommand {
            script: dir.path().join("missing.json").display().to_string(),
            config: None,
            ticks: 0,
        };
        assert!(cmd.execute().is_err());
    }

    #[test]
    fn test_run_invalid_config() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "[speed]\nmin = 500.0\nmax = 100.0").unwrap();

        let cmd = RunCommand {
            script: "unused.json".to_string(),
            config: Some(config.path().display().to_string()),
            ticks: 0,
        };
        let err = cmd.execute().unwrap_err();
        assert!(format!("{err:#}").contains("speed limits"));
    }
}
