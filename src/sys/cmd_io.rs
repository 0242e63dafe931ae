/// Reporting sink for a command.
///
/// Errors are plain, human-readable lines. `err` always returns `false` so a
/// failing command can end with `return io.err(..)`.
pub trait CmdIo {
    fn out(&mut self, msg: &str);

    fn err(&mut self, msg: &str) -> bool;
}

/// Buffers everything a command reports.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CmdOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CmdOutput {
    pub fn new() -> Self { Self::default() }
}

impl CmdIo for CmdOutput {
    fn out(&mut self, msg: &str) { self.stdout.push(msg.to_owned()); }

    fn err(&mut self, msg: &str) -> bool {
        self.stderr.push(msg.to_owned());
        false
    }
}
