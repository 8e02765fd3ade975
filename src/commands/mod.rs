pub mod fix;

pub type CmdResult<T> = tagfix::Result<(T, i32)>;
