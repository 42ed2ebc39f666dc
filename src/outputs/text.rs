/// Receives rendered timeline lines.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

impl<F: FnMut(&str)> LineSink for F {
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}

/// Default line printer.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLines;

impl LineSink for StdoutLines {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferedLines {
    pub lines: Vec<String>,
}

impl LineSink for BufferedLines {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
