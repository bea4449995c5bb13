#![allow(dead_code)]

pub use fetchrun_test_utils::{init_tracing, with_timeout};
