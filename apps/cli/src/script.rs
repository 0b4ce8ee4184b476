//! 脚本系统
//!
//! JSON 脚本在模拟机械臂上执行。每条命令都走完整的串口路径：
//! 主机端编码请求帧 → 设备端分发 → 主机端解析带长度前缀的响应帧。

use anyhow::{Context, Result};
use roboarm_driver::dispatch;
use roboarm_driver::sim::SimArm;
use roboarm_protocol::{
    JointAngles, Request, Response, ResultCode, UART_BUFFER_SIZE, UartBuffer,
    decode_framed_response,
};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, warn};

/// 脚本命令序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 命令序列
    pub commands: Vec<ScriptCommand>,
}

/// 脚本命令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptCommand {
    /// 移动到关节角度（度）
    Move { joints: JointAngles },

    /// 设置加速度
    SetSpeed { speed: f32 },

    /// 查询位置
    Position,

    CheckCalibration,
    StartCalibration,
    FinishCalibration,
    AbortCalibration,
    CheckIdle,
    OpenGripper,
    CloseGripper,

    /// 推进固定数量的调度节拍（不发送请求帧）
    Service { ticks: usize },

    /// 推进直到空闲（不发送请求帧）
    WaitIdle {
        #[serde(default = "default_wait_ticks")]
        max_ticks: usize,
    },
}

fn default_wait_ticks() -> usize {
    1_000_000
}

impl ScriptCommand {
    /// 对应的请求（仅调度类命令返回 `None`）
    pub fn to_request(&self) -> Option<Request> {
        let request = match self {
            ScriptCommand::Move { joints } => Request::SetNewPosition(*joints),
            ScriptCommand::SetSpeed { speed } => Request::SetSpeed(*speed),
            ScriptCommand::Position => Request::GetCurrentPosition,
            ScriptCommand::CheckCalibration => Request::CheckCalibration,
            ScriptCommand::StartCalibration => Request::StartCalibration,
            ScriptCommand::FinishCalibration => Request::FinishCalibration,
            ScriptCommand::AbortCalibration => Request::AbortCalibration,
            ScriptCommand::CheckIdle => Request::CheckIdle,
            ScriptCommand::OpenGripper => Request::OpenGripper,
            ScriptCommand::CloseGripper => Request::CloseGripper,
            ScriptCommand::Service { .. } | ScriptCommand::WaitIdle { .. } => return None,
        };
        Some(request)
    }
}

/// 一次请求/响应交换
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request_frame: Vec<u8>,
    pub response_frame: Vec<u8>,
    pub response: Response,
}

/// 脚本执行结果
#[derive(Debug, Default)]
pub struct ScriptResult {
    /// 总命令数
    pub total_commands: usize,

    /// 成功的命令索引
    pub succeeded: Vec<usize>,

    /// 失败的命令（索引，结果码）
    pub failed: Vec<(usize, ResultCode)>,

    /// 全部调度节拍数
    pub ticks: usize,
}

/// 脚本执行器
pub struct ScriptExecutor {
    arm: SimArm,
    /// 每个请求之后推进的调度节拍数
    ticks_per_command: usize,
    request: UartBuffer,
    response: UartBuffer,
}

impl ScriptExecutor {
    pub fn new(arm: SimArm, ticks_per_command: usize) -> Self {
        Self {
            arm,
            ticks_per_command,
            request: [0; UART_BUFFER_SIZE],
            response: [0; UART_BUFFER_SIZE],
        }
    }

    /// 加载脚本文件
    pub fn load_script<P: AsRef<std::path::Path>>(path: P) -> Result<Script> {
        let content = fs::read_to_string(path).context("读取脚本文件失败")?;

        let script: Script = serde_json::from_str(&content).context("解析脚本 JSON 失败")?;

        Ok(script)
    }

    pub fn arm(&self) -> &SimArm {
        &self.arm
    }

    /// 发送一个请求并返回本次交换
    pub fn exchange(&mut self, request: Request) -> Result<Exchange> {
        let request_len = request
            .encode(&mut self.request)
            .context("编码请求帧失败")?;
        let response_len = dispatch::handle_frame(
            &mut self.arm,
            &self.request[..request_len],
            &mut self.response,
        )
        .context("编码响应帧失败")?;
        let response_frame = &self.response[..response_len];
        let response = decode_framed_response(response_frame).context("解析响应帧失败")?;

        Ok(Exchange {
            request_frame: self.request[..request_len].to_vec(),
            response_frame: response_frame.to_vec(),
            response,
        })
    }

    /// 执行脚本
    pub fn execute(&mut self, script: &Script) -> Result<ScriptResult> {
        let mut result = ScriptResult {
            total_commands: script.commands.len(),
            ..Default::default()
        };

        for (idx, command) in script.commands.iter().enumerate() {
            match command.to_request() {
                Some(request) => self.run_request(idx, request, &mut result)?,
                None => self.run_service(idx, command, &mut result),
            }
        }

        Ok(result)
    }

    fn run_request(&mut self, idx: usize, request: Request, result: &mut ScriptResult) -> Result<()> {
        let exchange = self.exchange(request)?;
        let code = exchange.response.code();
        println!(
            "  [{}] {:?}: {} -> {} ({:?})",
            idx + 1,
            request.action(),
            hex::encode(&exchange.request_frame),
            hex::encode(&exchange.response_frame),
            code
        );
        if let Some(joints) = exchange.response.joints() {
            println!("      {}", format_joints(&joints));
        }

        if code.is_ok() {
            result.succeeded.push(idx);
        } else {
            result.failed.push((idx, code));
        }

        // 模拟外部轮询循环：处理完一帧后推进若干节拍
        let ticks = self.arm.service_until_idle(self.ticks_per_command);
        result.ticks += ticks;
        debug!("Serviced {} ticks after command {}", ticks, idx + 1);
        Ok(())
    }

    fn run_service(&mut self, idx: usize, command: &ScriptCommand, result: &mut ScriptResult) {
        let max_ticks = match command {
            ScriptCommand::Service { ticks } => *ticks,
            ScriptCommand::WaitIdle { max_ticks } => *max_ticks,
            _ => return,
        };
        let ticks = self.arm.service_until_idle(max_ticks);
        result.ticks += ticks;

        if matches!(command, ScriptCommand::WaitIdle { .. }) && self.arm.is_in_move() {
            warn!("Arm still in move after {} ticks", ticks);
        }
        println!("  [{}] service: {} ticks", idx + 1, ticks);
        result.succeeded.push(idx);
    }
}

pub fn format_joints(joints: &JointAngles) -> String {
    format!(
        "x={:.4} y={:.4} z={:.4} v={:.1} w={:.1}",
        joints.x, joints.y, joints.z, joints.v, joints.w
    )
}
