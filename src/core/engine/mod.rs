pub mod assemble;
pub mod resolver;
pub mod traits;
pub mod transform;
