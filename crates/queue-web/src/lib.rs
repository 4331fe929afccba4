//! # Queue Web
//!
//! 排队叫号系统的HTTP适配层：REST API与三个浏览器视图
//! （护士站、医生诊室、公共显示屏）。视图不含业务规则，
//! 定时轮询API并渲染返回结果。

pub mod handlers;
pub mod server;
pub mod static_files;

pub use server::WebServer;
