//! 命令定义和实现

pub mod decode;
pub mod encode;
pub mod run;

pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use run::RunCommand;
