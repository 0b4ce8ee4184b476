//! 编解码属性测试
//!
//! 使用 proptest 验证帧布局的往返性质。

use proptest::prelude::*;
use roboarm_protocol::*;

fn finite_f32() -> impl Strategy<Value = f32> {
    prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO
}

fn joint_angles() -> impl Strategy<Value = JointAngles> {
    prop::array::uniform5(finite_f32()).prop_map(JointAngles::from_array)
}

proptest! {
    /// 响应帧按请求帧布局解析，角度逐位一致
    #[test]
    fn result_with_joints_decodes_as_command(joints in joint_angles()) {
        let mut buffer: UartBuffer = [0; UART_BUFFER_SIZE];
        let n = encode_result_with_joints(&mut buffer, ResultCode::Ok, &joints).unwrap();
        prop_assert_eq!(n, RESULT_WITH_JOINTS_SIZE);
        prop_assert_eq!(buffer[0], ResultCode::Ok.as_u8());

        let decoded = decode_joints_command(&buffer[..n]).unwrap();
        prop_assert!(decoded.bit_eq(&joints));
    }

    /// 主机端请求帧可被设备端解析
    #[test]
    fn joints_command_roundtrip(joints in joint_angles()) {
        let mut buffer: UartBuffer = [0; UART_BUFFER_SIZE];
        let n = encode_joints_command(&mut buffer, ActionId::SetNewPosition, &joints).unwrap();
        match decode_request(&buffer[..n]).unwrap() {
            Request::SetNewPosition(decoded) => prop_assert!(decoded.bit_eq(&joints)),
            other => prop_assert!(false, "unexpected request: {:?}", other),
        }
    }

    /// 带长度前缀的响应可被主机端完整解析
    #[test]
    fn framed_response_roundtrip(joints in joint_angles(), with_joints in any::<bool>()) {
        let response = if with_joints {
            Response::WithJoints(ResultCode::Ok, joints)
        } else {
            Response::Code(ResultCode::ArmInMove)
        };

        let mut buffer: UartBuffer = [0; UART_BUFFER_SIZE];
        let n = response.encode_framed(&mut buffer).unwrap();
        prop_assert_eq!(n, response.encoded_len() + LENGTH_PREFIX_SIZE);
        prop_assert_eq!(buffer[0] as usize, response.encoded_len());

        let decoded = decode_framed_response(&buffer[..n]).unwrap();
        prop_assert_eq!(decoded.code(), response.code());
        match (decoded.joints(), response.joints()) {
            (Some(a), Some(b)) => prop_assert!(a.bit_eq(&b)),
            (None, None) => {},
            _ => prop_assert!(false, "response shape changed"),
        }
    }

    /// 任意短缓冲区都不会 panic，而是返回长度错误
    #[test]
    fn short_buffers_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..ACTION_WITH_JOINTS_SIZE)) {
        let err = decode_joints_command(&bytes).unwrap_err();
        prop_assert_eq!(err.result_code(), ResultCode::InvalidNumberOfParameters);
        let _ = decode_request(&bytes);
        let _ = decode_framed_response(&bytes);
    }
}
