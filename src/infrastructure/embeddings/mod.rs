pub mod hashing;
pub mod huggingface;
pub mod noop;
pub mod openai;
