//! Line-oriented front end for the `fibheap` binary
//!
//! A [`Session`] owns one heap of `i64` keys and interprets one [`Command`] at
//! a time. The heap never searches by key, so the session keeps its own index
//! from key to the handles holding that key. That lets `decrease` and `delete`
//! reach nodes at any depth, not just in the root list.

use std::fmt::Write as _;
use std::mem;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::error::HeapError;
use crate::fibonacci::FibonacciHeap;
use crate::node::NodeRef;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  insert <key>          insert a key
  min                   show the minimum key
  extract               remove and show the minimum key
  decrease <key> <new>  lower a key
  delete <key>          remove a key
  roots                 show the root list
  len                   show the number of keys
  check                 validate the heap structure
  help                  show this text
  quit                  release the heap and exit";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("missing argument for `{0}`")]
    MissingArgument(&'static str),
    #[error("invalid key `{0}`")]
    InvalidKey(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(i64),
    Min,
    Extract,
    Decrease { key: i64, new_key: i64 },
    Delete(i64),
    Roots,
    Len,
    Check,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let command = match name.to_ascii_lowercase().as_str() {
            "insert" | "i" => Command::Insert(key_arg(words.next(), "insert")?),
            "min" | "m" => Command::Min,
            "extract" | "x" => Command::Extract,
            "decrease" | "d" => Command::Decrease {
                key: key_arg(words.next(), "decrease")?,
                new_key: key_arg(words.next(), "decrease")?,
            },
            "delete" | "del" => Command::Delete(key_arg(words.next(), "delete")?),
            "roots" | "r" => Command::Roots,
            "len" => Command::Len,
            "check" => Command::Check,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        match words.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn key_arg(word: Option<&str>, command: &'static str) -> Result<i64, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(command))?;
    word.parse()
        .map_err(|_| CommandError::InvalidKey(word.to_string()))
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next command
    Continue(String),
    /// Print the text and stop; the heap has been released
    Quit(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Continue(message) | Outcome::Quit(message) => message,
        }
    }
}

/// One heap plus the key → handle index the heap itself does not keep
#[derive(Debug, Default)]
pub struct Session {
    heap: FibonacciHeap<i64>,
    index: FxHashMap<i64, Vec<NodeRef>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heap(&self) -> &FibonacciHeap<i64> {
        &self.heap
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        debug!(?command, "execute");
        let message = match command {
            Command::Insert(key) => {
                let handle = self.heap.insert(key);
                self.index.entry(key).or_default().push(handle);
                format!("Inserted key {key} successfully.")
            }
            Command::Min => match self.heap.find_min() {
                Some(key) => format!("Minimum key in heap: {key}"),
                None => "Heap is empty.".to_string(),
            },
            Command::Extract => match self.heap.extract_min() {
                Some((handle, key)) => {
                    self.forget(key, handle);
                    format!("Extracted minimum key: {key}")
                }
                None => "Heap is empty.".to_string(),
            },
            Command::Decrease { key, new_key } => self.decrease(key, new_key),
            Command::Delete(key) => self.delete(key),
            Command::Roots => self.roots(),
            Command::Len => format!("Heap size: {}", self.heap.len()),
            Command::Check => match self.heap.validate() {
                Ok(()) => "Invariants hold.".to_string(),
                Err(violation) => format!("Invariant violated: {violation}"),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => {
                return Outcome::Quit(format!("Released {} nodes. Goodbye!", self.dispose()));
            }
        };
        Outcome::Continue(message)
    }

    /// Releases every node; the session starts over with an empty heap
    pub fn dispose(&mut self) -> usize {
        self.index.clear();
        mem::take(&mut self.heap).dispose()
    }

    fn decrease(&mut self, key: i64, new_key: i64) -> String {
        let Some(&handle) = self.index.get(&key).and_then(|handles| handles.last()) else {
            return self.not_found(key);
        };
        match self.heap.decrease_key(handle, new_key) {
            Ok(()) => {
                self.forget(key, handle);
                self.index.entry(new_key).or_default().push(handle);
                format!("Decreased key {key} to {new_key} successfully.")
            }
            Err(HeapError::KeyIncrease) => {
                "Error: new key is greater than current key".to_string()
            }
            Err(err @ HeapError::InvalidHandle) => {
                self.forget(key, handle);
                format!("Error: {err}")
            }
        }
    }

    fn delete(&mut self, key: i64) -> String {
        let Some(&handle) = self.index.get(&key).and_then(|handles| handles.last()) else {
            return self.not_found(key);
        };
        self.forget(key, handle);
        match self.heap.delete(handle) {
            Ok(_) => format!("Deleted node with key {key} successfully."),
            Err(err) => format!("Error: {err}"),
        }
    }

    fn roots(&self) -> String {
        if self.heap.is_empty() {
            return "Heap is empty.".to_string();
        }
        let mut line = String::from("Root list:");
        for key in self.heap.root_keys() {
            let _ = write!(line, " {key}");
        }
        line
    }

    fn not_found(&self, key: i64) -> String {
        if self.heap.is_empty() {
            "Heap is empty.".to_string()
        } else {
            format!("Node with key {key} not found.")
        }
    }

    fn forget(&mut self, key: i64, handle: NodeRef) {
        if let Some(handles) = self.index.get_mut(&key) {
            handles.retain(|&h| h != handle);
            if handles.is_empty() {
                self.index.remove(&key);
            }
        }
    }
}
