pub mod builtins;
pub mod codegen;
pub mod export;
