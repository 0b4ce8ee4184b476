//! 主机端帧编解码
//!
//! 与 [`codec`](crate::codec) 对称：构建请求帧，解析设备返回的带长度前缀的响应。

use crate::codec::{
    Request, Response, read_joint_angles, write_header, write_header_with_f32,
    write_header_with_joints,
};
use crate::constants::*;
use crate::ids::{ActionId, ResultCode, parse_result_code};
use crate::joints::JointAngles;
use crate::ProtocolError;

/// 构建带关节角度的请求帧，返回写入的字节数（21）
pub fn encode_joints_command(
    buffer: &mut [u8],
    action: ActionId,
    joints: &JointAngles,
) -> Result<usize, ProtocolError> {
    write_header_with_joints(buffer, action.as_u8(), joints)
}

/// 构建设置速度请求帧，返回写入的字节数（5）
pub fn encode_speed_command(buffer: &mut [u8], speed: f32) -> Result<usize, ProtocolError> {
    write_header_with_f32(buffer, ActionId::SetSpeed.as_u8(), speed)
}

/// 构建无载荷请求帧，返回写入的字节数（1）
pub fn encode_action(buffer: &mut [u8], action: ActionId) -> Result<usize, ProtocolError> {
    write_header(buffer, action.as_u8())
}

impl Request {
    /// 编码为请求帧（不含长度前缀）
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        match self {
            Request::SetNewPosition(joints) => {
                encode_joints_command(buffer, ActionId::SetNewPosition, joints)
            },
            Request::SetSpeed(speed) => encode_speed_command(buffer, *speed),
            other => encode_action(buffer, other.action()),
        }
    }
}

/// 去掉长度前缀，返回载荷切片
///
/// 前缀声明的长度超过实际可读字节时返回 `BufferTooShort`。
pub fn strip_length_prefix(buffer: &[u8]) -> Result<&[u8], ProtocolError> {
    let Some((&len, rest)) = buffer.split_first() else {
        return Err(ProtocolError::BufferTooShort {
            expected: LENGTH_PREFIX_SIZE,
            actual: 0,
        });
    };
    let len = len as usize;
    if rest.len() < len {
        return Err(ProtocolError::BufferTooShort {
            expected: len + LENGTH_PREFIX_SIZE,
            actual: buffer.len(),
        });
    }
    Ok(&rest[..len])
}

/// 解析响应帧的结果码
pub fn decode_result_code(buffer: &[u8]) -> Result<ResultCode, ProtocolError> {
    match buffer.first() {
        Some(&code) => parse_result_code(code),
        None => Err(ProtocolError::BufferTooShort {
            expected: RESULT_CODE_SIZE,
            actual: 0,
        }),
    }
}

/// 解析带关节角度的响应帧
pub fn decode_result_with_joints(
    buffer: &[u8],
) -> Result<(ResultCode, JointAngles), ProtocolError> {
    let joints = read_joint_angles(buffer)?;
    let code = decode_result_code(buffer)?;
    Ok((code, joints))
}

/// 解析响应载荷（已去掉长度前缀）
///
/// 载荷长度决定形状：1 字节为仅结果码，21 字节及以上为带关节角度。
pub fn decode_response(payload: &[u8]) -> Result<Response, ProtocolError> {
    match payload.len() {
        0 => Err(ProtocolError::BufferTooShort {
            expected: RESULT_CODE_SIZE,
            actual: 0,
        }),
        RESULT_CODE_SIZE => Ok(Response::Code(decode_result_code(payload)?)),
        _ => {
            let (code, joints) = decode_result_with_joints(payload)?;
            Ok(Response::WithJoints(code, joints))
        },
    }
}

/// 解析带长度前缀的完整响应
pub fn decode_framed_response(buffer: &[u8]) -> Result<Response, ProtocolError> {
    decode_response(strip_length_prefix(buffer)?)
}
