mod common;
mod export;
