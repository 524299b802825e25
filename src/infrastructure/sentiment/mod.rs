pub mod huggingface;
