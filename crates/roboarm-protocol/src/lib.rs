//! # Roboarm Protocol
//!
//! 机械臂 UART 串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 动作 ID 与结果码
//! - `constants`: 帧布局常量（偏移、长度、缓冲区容量）
//! - `joints`: 关节角度载荷
//! - `codec`: 设备端编解码（解析请求、写入响应）
//! - `host`: 主机端编解码（构建请求、解析响应）
//!
//! ## 字节序
//!
//! 所有浮点数均为 IEEE-754 单精度、小端字节序（LSB 在前）。
//! 本模块提供了字节序转换工具函数。

pub mod codec;
pub mod constants;
pub mod host;
pub mod ids;
pub mod joints;

// 重新导出常用类型
pub use codec::*;
pub use constants::*;
pub use host::*;
pub use ids::*;
pub use joints::JointAngles;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Buffer overflow: {required} bytes required, capacity is {capacity}")]
    BufferOverflow { required: usize, capacity: usize },

    #[error("Unknown action id: {0}")]
    UnknownAction(u8),

    #[error("Unknown result code: {0}")]
    UnknownResultCode(u8),
}

impl ProtocolError {
    /// 映射为回传给主机的结果码
    ///
    /// 长度类错误统一为 `InvalidNumberOfParameters`。
    pub fn result_code(&self) -> ResultCode {
        match self {
            ProtocolError::UnknownAction(_) => ResultCode::UnknownAction,
            ProtocolError::BufferTooShort { .. }
            | ProtocolError::BufferOverflow { .. }
            | ProtocolError::UnknownResultCode(_) => ResultCode::InvalidNumberOfParameters,
        }
    }
}

/// 字节序转换工具函数
///
/// 协议使用小端字节序，这些函数用于在协议层进行转换。
///
/// 小端字节序转 f32
pub fn bytes_to_f32_le(bytes: [u8; 4]) -> f32 {
    f32::from_le_bytes(bytes)
}

/// f32 转小端字节序
pub fn f32_to_bytes_le(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}
