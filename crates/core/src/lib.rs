pub mod club;
pub mod graduation;
pub mod membership;
pub mod note;
pub mod storage;
