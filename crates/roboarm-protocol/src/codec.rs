//! 设备端帧编解码
//!
//! 无状态纯函数：从原始字节解析请求，把结果写入响应缓冲区。
//! 所有读写都先做边界检查，越界时返回错误而不是 panic。
//!
//! # 帧布局（小端）
//!
//! | 帧 | 偏移 0 | 偏移 1–20 |
//! |---|---|---|
//! | 带角度请求 | 动作 ID | x, y, z, v, w（各 4 字节 f32） |
//! | 设置速度请求 | 动作 ID | 速度（偏移 1 处 4 字节 f32） |
//! | 带角度响应 | 结果码 | x, y, z, v, w |
//! | 仅结果码响应 | 结果码 | - |

use crate::constants::*;
use crate::ids::{ActionId, ResultCode, parse_action_id};
use crate::joints::JointAngles;
use crate::{ProtocolError, bytes_to_f32_le, f32_to_bytes_le};

/// 串口缓冲区类型（固定 32 字节，栈上分配）
pub type UartBuffer = [u8; UART_BUFFER_SIZE];

/// 清空缓冲区
pub fn clear_buffer(buffer: &mut [u8]) {
    buffer.fill(0);
}

/// 检查缓冲区至少有 `expected` 字节可读
fn ensure_readable(buffer: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if buffer.len() < expected {
        return Err(ProtocolError::BufferTooShort {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}

/// 检查缓冲区至少有 `required` 字节可写
fn ensure_writable(buffer: &[u8], required: usize) -> Result<(), ProtocolError> {
    if buffer.len() < required {
        return Err(ProtocolError::BufferOverflow {
            required,
            capacity: buffer.len(),
        });
    }
    Ok(())
}

/// 读取偏移 `offset` 处的小端 f32
///
/// 调用方需保证 `offset + 4 <= buffer.len()`。
fn read_f32_at(buffer: &[u8], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buffer[offset..offset + 4]);
    bytes_to_f32_le(bytes)
}

fn write_f32_at(buffer: &mut [u8], offset: usize, value: f32) {
    buffer[offset..offset + 4].copy_from_slice(&f32_to_bytes_le(value));
}

/// 按固定偏移读取五个关节角度（忽略头部字节）
pub(crate) fn read_joint_angles(buffer: &[u8]) -> Result<JointAngles, ProtocolError> {
    ensure_readable(buffer, ACTION_WITH_JOINTS_SIZE)?;
    Ok(JointAngles::from_array(
        JOINT_ANGLE_OFFSETS.map(|offset| read_f32_at(buffer, offset)),
    ))
}

/// 写入头部字节和五个关节角度，返回写入的字节数
pub(crate) fn write_header_with_joints(
    buffer: &mut [u8],
    header: u8,
    joints: &JointAngles,
) -> Result<usize, ProtocolError> {
    ensure_writable(buffer, ACTION_WITH_JOINTS_SIZE)?;
    buffer[HEADER_OFFSET] = header;
    for (offset, value) in JOINT_ANGLE_OFFSETS.iter().zip(joints.to_array()) {
        write_f32_at(buffer, *offset, value);
    }
    Ok(ACTION_WITH_JOINTS_SIZE)
}

pub(crate) fn write_header_with_f32(
    buffer: &mut [u8],
    header: u8,
    value: f32,
) -> Result<usize, ProtocolError> {
    ensure_writable(buffer, SET_SPEED_SIZE)?;
    buffer[HEADER_OFFSET] = header;
    write_f32_at(buffer, SPEED_OFFSET, value);
    Ok(SET_SPEED_SIZE)
}

pub(crate) fn write_header(buffer: &mut [u8], header: u8) -> Result<usize, ProtocolError> {
    ensure_writable(buffer, HEADER_SIZE)?;
    buffer[HEADER_OFFSET] = header;
    Ok(HEADER_SIZE)
}

/// 解析带关节角度的请求帧
///
/// 头部字节已由分发层用于选择动作，此处忽略。
/// 缓冲区短于 21 字节时返回 `BufferTooShort`（对应 `InvalidNumberOfParameters`）。
pub fn decode_joints_command(buffer: &[u8]) -> Result<JointAngles, ProtocolError> {
    read_joint_angles(buffer)
}

/// 解析设置速度请求帧（偏移 1 处的 f32）
pub fn decode_speed_command(buffer: &[u8]) -> Result<f32, ProtocolError> {
    ensure_readable(buffer, SET_SPEED_SIZE)?;
    Ok(read_f32_at(buffer, SPEED_OFFSET))
}

/// 写入带关节角度的响应帧，返回写入的字节数（21）
pub fn encode_result_with_joints(
    buffer: &mut [u8],
    code: ResultCode,
    joints: &JointAngles,
) -> Result<usize, ProtocolError> {
    write_header_with_joints(buffer, code.as_u8(), joints)
}

/// 写入仅结果码的响应帧，返回写入的字节数（1）
pub fn encode_result_code(buffer: &mut [u8], code: ResultCode) -> Result<usize, ProtocolError> {
    write_header(buffer, code.as_u8())
}

/// 在已编码的载荷前插入 1 字节长度前缀
///
/// 载荷整体右移一个字节，偏移 0 写入载荷长度，返回加上前缀后的总长度。
/// 对端先读长度字节，再读取对应数量的后续字节。
pub fn prepend_length_prefix(buffer: &mut [u8], payload_len: usize) -> Result<usize, ProtocolError> {
    if payload_len > u8::MAX as usize {
        return Err(ProtocolError::BufferOverflow {
            required: payload_len.saturating_add(LENGTH_PREFIX_SIZE),
            capacity: u8::MAX as usize,
        });
    }
    let total = payload_len + LENGTH_PREFIX_SIZE;
    ensure_writable(buffer, total)?;
    buffer.copy_within(0..payload_len, LENGTH_PREFIX_SIZE);
    buffer[0] = payload_len as u8;
    Ok(total)
}

/// 已解析的请求
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    SetNewPosition(JointAngles),
    SetSpeed(f32),
    GetCurrentPosition,
    CheckCalibration,
    StartCalibration,
    FinishCalibration,
    AbortCalibration,
    CheckIdle,
    OpenGripper,
    CloseGripper,
}

impl Request {
    /// 对应的动作 ID
    pub fn action(&self) -> ActionId {
        match self {
            Request::SetNewPosition(_) => ActionId::SetNewPosition,
            Request::SetSpeed(_) => ActionId::SetSpeed,
            Request::GetCurrentPosition => ActionId::GetCurrentPosition,
            Request::CheckCalibration => ActionId::CheckCalibration,
            Request::StartCalibration => ActionId::StartCalibration,
            Request::FinishCalibration => ActionId::FinishCalibration,
            Request::AbortCalibration => ActionId::AbortCalibration,
            Request::CheckIdle => ActionId::CheckIdle,
            Request::OpenGripper => ActionId::OpenGripper,
            Request::CloseGripper => ActionId::CloseGripper,
        }
    }
}

/// 解析一个完整的请求帧
///
/// # 错误
///
/// - 空缓冲区：`BufferTooShort`
/// - 未知动作 ID：`UnknownAction`
/// - 载荷不足：`BufferTooShort`
pub fn decode_request(buffer: &[u8]) -> Result<Request, ProtocolError> {
    ensure_readable(buffer, HEADER_SIZE)?;
    let action = parse_action_id(buffer[HEADER_OFFSET])?;

    let request = match action {
        ActionId::SetNewPosition => Request::SetNewPosition(decode_joints_command(buffer)?),
        ActionId::SetSpeed => Request::SetSpeed(decode_speed_command(buffer)?),
        ActionId::GetCurrentPosition => Request::GetCurrentPosition,
        ActionId::CheckCalibration => Request::CheckCalibration,
        ActionId::StartCalibration => Request::StartCalibration,
        ActionId::FinishCalibration => Request::FinishCalibration,
        ActionId::AbortCalibration => Request::AbortCalibration,
        ActionId::CheckIdle => Request::CheckIdle,
        ActionId::OpenGripper => Request::OpenGripper,
        ActionId::CloseGripper => Request::CloseGripper,
    };
    Ok(request)
}

/// 响应
///
/// 仅结果码（1 字节）或结果码加关节角度（21 字节）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    Code(ResultCode),
    WithJoints(ResultCode, JointAngles),
}

impl Response {
    pub fn code(&self) -> ResultCode {
        match self {
            Response::Code(code) | Response::WithJoints(code, _) => *code,
        }
    }

    pub fn joints(&self) -> Option<JointAngles> {
        match self {
            Response::Code(_) => None,
            Response::WithJoints(_, joints) => Some(*joints),
        }
    }

    /// 编码后的字节数
    pub fn encoded_len(&self) -> usize {
        match self {
            Response::Code(_) => RESULT_CODE_SIZE,
            Response::WithJoints(..) => RESULT_WITH_JOINTS_SIZE,
        }
    }

    /// 编码到缓冲区（不含长度前缀），返回写入的字节数
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        match self {
            Response::Code(code) => encode_result_code(buffer, *code),
            Response::WithJoints(code, joints) => encode_result_with_joints(buffer, *code, joints),
        }
    }

    /// 编码并加上长度前缀，返回总字节数
    pub fn encode_framed(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let len = self.encode(buffer)?;
        prepend_length_prefix(buffer, len)
    }
}

impl From<ResultCode> for Response {
    fn from(code: ResultCode) -> Self {
        Response::Code(code)
    }
}
