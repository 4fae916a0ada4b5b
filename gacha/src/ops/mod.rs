pub mod collect;
pub mod storage;
pub mod util;
