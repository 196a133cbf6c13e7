pub mod declare;
pub mod scope;
pub mod show;
