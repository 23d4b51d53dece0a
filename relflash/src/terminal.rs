use std::io::{self, Write};

use relflash_lib::Terminal;

/// Terminal sink rendering to stdout.
pub struct StdoutTerminal;

impl Terminal for StdoutTerminal {
    fn clear(&mut self) {
        // ANSI clear screen + cursor home.
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }

    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }

    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }
}
