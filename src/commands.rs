//! # Commands Module / 命令模块
//!
//! Implementation of the command-line entry points.
//!
//! 命令行入口的实现。

pub mod run;
