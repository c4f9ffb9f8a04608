#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    Ping,
    GetStatus,
    FileOperation,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "init" => Command::Init,
            "ping" => Command::Ping,
            "getStatus" => Command::GetStatus,
            "fileOperation" => Command::FileOperation,
            _ => Command::Unknown,
        }
    }
}
