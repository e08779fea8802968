pub mod dataset;
pub mod storage;
