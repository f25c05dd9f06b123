pub mod init;
pub mod print;
pub mod transform;

pub use init::execute_init;
pub use print::execute_print;
pub use transform::execute_transform;
