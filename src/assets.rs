pub mod adapter;
pub mod decode;
pub mod media;
pub mod source;
