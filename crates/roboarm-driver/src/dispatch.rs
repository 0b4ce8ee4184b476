//! 命令分发
//!
//! 一个请求帧 → 一个响应：解析动作 ID 与载荷，调用 [`Arm`] 的对应操作，
//! 把结果（或错误）映射为结果码。

use crate::actuator::{GripperDriver, Servo, Stepper};
use crate::arm::Arm;
use crate::error::ArmError;
use crate::mode::ArmMode;
use roboarm_protocol::{ProtocolError, Request, Response, ResultCode, decode_request};
use tracing::{debug, trace};

/// 解析并执行一个请求帧
///
/// 格式错误的帧不会触及机械臂：空帧或载荷不足返回 `InvalidNumberOfParameters`，
/// 未知动作返回 `UnknownAction`。
pub fn execute<S, V, G>(arm: &mut Arm<S, V, G>, frame: &[u8]) -> Response
where
    S: Stepper,
    V: Servo,
    G: GripperDriver,
{
    match decode_request(frame) {
        Ok(request) => execute_request(arm, request),
        Err(err) => {
            debug!("Malformed request frame {:02x?}: {}", frame, err);
            Response::Code(err.result_code())
        },
    }
}

/// 执行一个已解析的请求
pub fn execute_request<S, V, G>(arm: &mut Arm<S, V, G>, request: Request) -> Response
where
    S: Stepper,
    V: Servo,
    G: GripperDriver,
{
    trace!("Executing {:?}", request);

    let response = match request {
        Request::SetNewPosition(target) => with_joints(arm.set_new_position(&target)),
        Request::SetSpeed(speed) => code_only(arm.set_speed(speed)),
        Request::GetCurrentPosition => with_joints(arm.get_current_position()),
        Request::CheckCalibration => code_only(arm.check_calibration()),
        Request::StartCalibration => {
            arm.set_mode(ArmMode::Calibration);
            Response::Code(ResultCode::Ok)
        },
        Request::FinishCalibration => {
            let result = arm.set_current_position_as_reference();
            if result.is_ok() {
                arm.set_calibration(true);
                arm.set_mode(ArmMode::Normal);
            }
            code_only(result)
        },
        Request::AbortCalibration => {
            arm.set_mode(ArmMode::Normal);
            Response::Code(ResultCode::Ok)
        },
        Request::CheckIdle => {
            if arm.is_in_move() {
                Response::Code(ResultCode::ArmInMove)
            } else {
                Response::Code(ResultCode::Ok)
            }
        },
        Request::OpenGripper => {
            arm.open_gripper();
            Response::Code(ResultCode::Ok)
        },
        Request::CloseGripper => {
            arm.close_gripper();
            Response::Code(ResultCode::Ok)
        },
    };

    if !response.code().is_ok() {
        debug!("{:?} -> {:?}", request.action(), response.code());
    }
    response
}

/// 执行请求帧，并把带长度前缀的响应写入 `response_buffer`
///
/// 返回写入的总字节数（长度前缀 + 载荷）。
pub fn handle_frame<S, V, G>(
    arm: &mut Arm<S, V, G>,
    request: &[u8],
    response_buffer: &mut [u8],
) -> Result<usize, ProtocolError>
where
    S: Stepper,
    V: Servo,
    G: GripperDriver,
{
    execute(arm, request).encode_framed(response_buffer)
}

fn with_joints(result: Result<roboarm_protocol::JointAngles, ArmError>) -> Response {
    match result {
        Ok(joints) => Response::WithJoints(ResultCode::Ok, joints),
        Err(err) => Response::Code(err.into()),
    }
}

fn code_only(result: Result<(), ArmError>) -> Response {
    match result {
        Ok(()) => Response::Code(ResultCode::Ok),
        Err(err) => Response::Code(err.into()),
    }
}
