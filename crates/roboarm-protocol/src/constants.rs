//! 帧布局常量定义
//!
//! 集中定义所有偏移量和长度，避免在编解码代码中散落"魔法数"。

/// 串口收发缓冲区容量（字节）
pub const UART_BUFFER_SIZE: usize = 32;

/// 头部字节（动作 ID 或结果码）
pub const HEADER_OFFSET: usize = 0;
pub const HEADER_SIZE: usize = 1;

/// 单个关节角度（f32）长度
pub const JOINT_ANGLE_SIZE: usize = 4;

/// 关节角度偏移，顺序固定为 x, y, z, v, w
pub const X_JOINT_ANGLE_OFFSET: usize = HEADER_OFFSET + HEADER_SIZE;
pub const Y_JOINT_ANGLE_OFFSET: usize = X_JOINT_ANGLE_OFFSET + JOINT_ANGLE_SIZE;
pub const Z_JOINT_ANGLE_OFFSET: usize = Y_JOINT_ANGLE_OFFSET + JOINT_ANGLE_SIZE;
pub const V_JOINT_ANGLE_OFFSET: usize = Z_JOINT_ANGLE_OFFSET + JOINT_ANGLE_SIZE;
pub const W_JOINT_ANGLE_OFFSET: usize = V_JOINT_ANGLE_OFFSET + JOINT_ANGLE_SIZE;

/// 五个关节角度的偏移表（与 `JointAngles::to_array` 顺序一致）
pub const JOINT_ANGLE_OFFSETS: [usize; 5] = [
    X_JOINT_ANGLE_OFFSET,
    Y_JOINT_ANGLE_OFFSET,
    Z_JOINT_ANGLE_OFFSET,
    V_JOINT_ANGLE_OFFSET,
    W_JOINT_ANGLE_OFFSET,
];

/// 带关节角度的请求帧总长（1 + 5 × 4 = 21）
pub const ACTION_WITH_JOINTS_SIZE: usize = W_JOINT_ANGLE_OFFSET + JOINT_ANGLE_SIZE;

/// 带关节角度的响应帧总长（与请求帧布局相同）
pub const RESULT_WITH_JOINTS_SIZE: usize = ACTION_WITH_JOINTS_SIZE;

/// 仅结果码的响应帧总长
pub const RESULT_CODE_SIZE: usize = HEADER_SIZE;

/// 设置速度请求帧：速度 f32 位于偏移 1
pub const SPEED_OFFSET: usize = HEADER_OFFSET + HEADER_SIZE;
pub const SPEED_SIZE: usize = 4;
pub const SET_SPEED_SIZE: usize = SPEED_OFFSET + SPEED_SIZE;

/// 长度前缀（1 字节）
pub const LENGTH_PREFIX_SIZE: usize = 1;
