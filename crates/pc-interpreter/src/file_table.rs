// Copyright (C) 2024 The 9608 Pseudocode Project
// This file is part of the pc9608 library.

// The pc9608 library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The pc9608 library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the pc9608 library. If not, see <https://www.gnu.org/licenses/>.

use indexmap::IndexMap;
use pc_ast::FileMode;
use std::io;

/// The host-I/O seam, per `spec.md` §6: the interpreter never touches stdio
/// or the filesystem directly, only through this trait object, so the same
/// interpreter core drives both a real CLI run and an in-memory test run.
/// Grounded on the teacher's pattern of keeping the evaluator generic over an
/// I/O backend rather than hard-wiring `std::fs`/`std::io::stdin`.
pub trait HostIo {
    fn print(&mut self, text: &str);
    fn read_input_line(&mut self) -> io::Result<String>;

    fn file_open(&mut self, name: &str, mode: FileMode) -> io::Result<()>;
    /// `Ok(None)` signals end-of-file rather than an I/O error.
    fn file_read_line(&mut self, name: &str) -> io::Result<Option<String>>;
    fn file_is_eof(&mut self, name: &str) -> io::Result<bool>;
    fn file_write_line(&mut self, name: &str, line: &str) -> io::Result<()>;
    fn file_close(&mut self, name: &str) -> io::Result<()>;
}

/// The default adapter: real stdio and real files relative to the process's
/// current directory.
pub struct StdHostIo {
    readers: IndexMap<String, io::BufReader<std::fs::File>>,
    writers: IndexMap<String, std::fs::File>,
    stdin: io::BufReader<io::Stdin>,
}

impl Default for StdHostIo {
    fn default() -> Self {
        Self { readers: IndexMap::new(), writers: IndexMap::new(), stdin: io::BufReader::new(io::stdin()) }
    }
}

impl StdHostIo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostIo for StdHostIo {
    fn print(&mut self, text: &str) {
        use std::io::Write;
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn read_input_line(&mut self) -> io::Result<String> {
        use std::io::BufRead;
        let mut line = String::new();
        self.stdin.read_line(&mut line)?;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    fn file_open(&mut self, name: &str, mode: FileMode) -> io::Result<()> {
        use std::fs::OpenOptions;
        match mode {
            FileMode::Read => {
                let file = std::fs::File::open(name)?;
                self.readers.insert(name.to_string(), io::BufReader::new(file));
            }
            FileMode::Write => {
                let file = OpenOptions::new().write(true).create(true).truncate(true).open(name)?;
                self.writers.insert(name.to_string(), file);
            }
            FileMode::Append => {
                let file = OpenOptions::new().append(true).create(true).open(name)?;
                self.writers.insert(name.to_string(), file);
            }
        }
        Ok(())
    }

    fn file_read_line(&mut self, name: &str) -> io::Result<Option<String>> {
        use std::io::BufRead;
        let reader = self.readers.get_mut(name).expect("FileTable guarantees the file is open for reading");
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn file_is_eof(&mut self, name: &str) -> io::Result<bool> {
        use std::io::BufRead;
        let reader = self.readers.get_mut(name).expect("FileTable guarantees the file is open for reading");
        Ok(reader.fill_buf()?.is_empty())
    }

    fn file_write_line(&mut self, name: &str, line: &str) -> io::Result<()> {
        use std::io::Write;
        let file = self.writers.get_mut(name).expect("FileTable guarantees the file is open for writing");
        writeln!(file, "{line}")
    }

    fn file_close(&mut self, name: &str) -> io::Result<()> {
        self.readers.shift_remove(name);
        self.writers.shift_remove(name);
        Ok(())
    }
}

/// Tracks which files the running program currently has open and in what
/// mode, independent of how the bytes actually move -- `spec.md`'s "File
/// table". Double-opens, reads against a write-mode file, and the like are
/// caught here before ever reaching the [`HostIo`] backend.
#[derive(Default)]
pub struct FileTable {
    open: IndexMap<String, FileMode>,
}

impl FileTable {
    pub fn mode_of(&self, name: &str) -> Option<FileMode> {
        self.open.get(name).copied()
    }

    pub fn mark_open(&mut self, name: &str, mode: FileMode) {
        self.open.insert(name.to_string(), mode);
    }

    pub fn mark_closed(&mut self, name: &str) {
        self.open.shift_remove(name);
    }
}

/// An in-memory [`HostIo`] backend for tests: captures everything printed,
/// serves canned input lines, and keeps file contents in memory rather than
/// touching the real filesystem.
pub mod testing {
    use super::*;

    #[derive(Default)]
    pub struct MemoryHostIo {
        pub output: String,
        input_lines: std::collections::VecDeque<String>,
        files: IndexMap<String, Vec<String>>,
        cursors: IndexMap<String, usize>,
        write_modes: IndexMap<String, FileMode>,
    }

    impl MemoryHostIo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_input(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
            let mut io = Self::new();
            io.input_lines = lines.into_iter().map(Into::into).collect();
            io
        }

        pub fn seed_file(&mut self, name: &str, lines: impl IntoIterator<Item = impl Into<String>>) {
            self.files.insert(name.to_string(), lines.into_iter().map(Into::into).collect());
        }

        pub fn file_contents(&self, name: &str) -> Option<&[String]> {
            self.files.get(name).map(Vec::as_slice)
        }
    }

    impl HostIo for MemoryHostIo {
        fn print(&mut self, text: &str) {
            self.output.push_str(text);
        }

        fn read_input_line(&mut self) -> io::Result<String> {
            Ok(self.input_lines.pop_front().unwrap_or_default())
        }

        fn file_open(&mut self, name: &str, mode: FileMode) -> io::Result<()> {
            match mode {
                FileMode::Read => {
                    self.cursors.insert(name.to_string(), 0);
                    self.files.entry(name.to_string()).or_default();
                }
                FileMode::Write => {
                    self.files.insert(name.to_string(), Vec::new());
                    self.write_modes.insert(name.to_string(), FileMode::Write);
                }
                FileMode::Append => {
                    self.files.entry(name.to_string()).or_default();
                    self.write_modes.insert(name.to_string(), FileMode::Append);
                }
            }
            Ok(())
        }

        fn file_read_line(&mut self, name: &str) -> io::Result<Option<String>> {
            let cursor = self.cursors.entry(name.to_string()).or_insert(0);
            let lines = self.files.get(name).map(Vec::as_slice).unwrap_or_default();
            if *cursor >= lines.len() {
                return Ok(None);
            }
            let line = lines[*cursor].clone();
            *cursor += 1;
            Ok(Some(line))
        }

        fn file_is_eof(&mut self, name: &str) -> io::Result<bool> {
            let cursor = self.cursors.get(name).copied().unwrap_or(0);
            let len = self.files.get(name).map(Vec::len).unwrap_or(0);
            Ok(cursor >= len)
        }

        fn file_write_line(&mut self, name: &str, line: &str) -> io::Result<()> {
            self.files.entry(name.to_string()).or_default().push(line.to_string());
            Ok(())
        }

        fn file_close(&mut self, name: &str) -> io::Result<()> {
            self.cursors.shift_remove(name);
            self.write_modes.shift_remove(name);
            Ok(())
        }
    }
}
