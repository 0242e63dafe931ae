pub mod cmd_io;
pub mod geometry;
pub mod window_server;
