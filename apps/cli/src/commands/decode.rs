//! decode 命令
//!
//! 解析带长度前缀的十六进制响应帧

use anyhow::{Context, Result};
use clap::Args;
use roboarm_protocol::{Response, decode_framed_response};

use crate::script::format_joints;

/// 响应帧解析参数
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// 十六进制响应帧（首字节为长度前缀），例如 0101
    pub frame: String,
}

impl DecodeCommand {
    pub fn execute(&self) -> Result<()> {
        let response = self.decode()?;
        println!("code: {:?} ({})", response.code(), response.code().as_u8());
        if let Some(joints) = response.joints() {
            println!("joints: {}", format_joints(&joints));
        }
        Ok(())
    }

    pub fn decode(&self) -> Result<Response> {
        let cleaned: String = self.frame.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = hex::decode(&cleaned).context("十六进制格式错误")?;
        decode_framed_response(&bytes).context("解析响应帧失败")
    }
}
