//! encode 命令
//!
//! 构建请求帧并以十六进制输出

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use roboarm_protocol::{JointAngles, Request, UART_BUFFER_SIZE, UartBuffer};

/// 可编码的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    SetNewPosition,
    SetSpeed,
    GetCurrentPosition,
    CheckCalibration,
    StartCalibration,
    FinishCalibration,
    AbortCalibration,
    CheckIdle,
    OpenGripper,
    CloseGripper,
}

/// 请求帧编码参数
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// 动作
    #[arg(value_enum)]
    pub action: ActionArg,

    /// 关节角度（度）：x,y,z,v,w
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub joints: Option<Vec<f32>>,

    /// 速度（仅 set-speed）
    #[arg(long, allow_hyphen_values = true)]
    pub speed: Option<f32>,
}

impl EncodeCommand {
    pub fn execute(&self) -> Result<()> {
        let frame = self.encode()?;
        println!("{}", hex::encode(frame));
        Ok(())
    }

    /// 构建请求帧字节
    pub fn encode(&self) -> Result<Vec<u8>> {
        let request = self.to_request()?;
        let mut buffer: UartBuffer = [0; UART_BUFFER_SIZE];
        let n = request.encode(&mut buffer).context("编码请求帧失败")?;
        Ok(buffer[..n].to_vec())
    }

    fn to_request(&self) -> Result<Request> {
        let request = match self.action {
            ActionArg::SetNewPosition => {
                let Some(values) = &self.joints else {
                    bail!("set-new-position requires --joints x,y,z,v,w");
                };
                let values: [f32; 5] = values
                    .as_slice()
                    .try_into()
                    .context("--joints expects exactly 5 values")?;
                Request::SetNewPosition(JointAngles::from_array(values))
            },
            ActionArg::SetSpeed => match self.speed {
                Some(speed) => Request::SetSpeed(speed),
                None => bail!("set-speed requires --speed"),
            },
            ActionArg::GetCurrentPosition => Request::GetCurrentPosition,
            ActionArg::CheckCalibration => Request::CheckCalibration,
            ActionArg::StartCalibration => Request::StartCalibration,
            ActionArg::FinishCalibration => Request::FinishCalibration,
            ActionArg::AbortCalibration => Request::AbortCalibration,
            ActionArg::CheckIdle => Request::CheckIdle,
            ActionArg::OpenGripper => Request::OpenGripper,
            ActionArg::CloseGripper => Request::CloseGripper,
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(action: ActionArg) -> EncodeCommand {
        EncodeCommand {
            action,
            joints: None,
            speed: None,
        }
    }

    #[test]
    fn test_encode_plain_action() {
        assert_eq!(cmd(ActionArg::CheckIdle).encode().unwrap(), vec![8]);
        assert_eq!(cmd(ActionArg::CloseGripper).encode().unwrap(), vec![10]);
    }

    #[test]
    fn test_encode_speed() {
        let mut c = cmd(ActionArg::SetSpeed);
        c.speed = Some(200.0);
        let frame = c.encode().unwrap();
        assert_eq!(frame.len(), 5);
        assert_eq!(frame[0], 2);
        assert_eq!(&frame[1..], &200.0f32.to_le_bytes());
    }

    #[test]
    fn test_encode_joints() {
        let mut c = cmd(ActionArg::SetNewPosition);
        c.joints = Some(vec![1.0, -2.0, 3.0, -4.0, 5.0]);
        let frame = c.encode().unwrap();
        assert_eq!(frame.len(), 21);
        assert_eq!(frame[0], 1);
        assert_eq!(&frame[5..9], &(-2.0f32).to_le_bytes());
    }

    #[test]
    fn test_encode_missing_arguments() {
        assert!(cmd(ActionArg::SetNewPosition).encode().is_err());
        assert!(cmd(ActionArg::SetSpeed).encode().is_err());

        let mut c = cmd(ActionArg::SetNewPosition);
        c.joints = Some(vec![1.0, 2.0]);
        assert!(c.encode().is_err());
    }
}
